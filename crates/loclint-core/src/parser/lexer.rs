//! Lexer for C# declaration syntax.
//!
//! Produces the token stream the declaration parser dispatches on. Comments
//! and the contents of string and character literals are consumed here so
//! that braces and identifiers inside them never reach the parser.

use crate::syntax::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword, including `@`-escaped spellings.
    Ident,
    Number,
    Str,
    Char,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Lt,
    Gt,
    Comma,
    Dot,
    Semi,
    Colon,
    /// `::`
    ColonColon,
    /// A single `=`, but not `==` or `=>`.
    Assign,
    /// `=>`
    FatArrow,
    Question,
    /// Any other punctuation or operator character.
    Other,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

/// Tokenizes `source`. The returned stream always ends with a single `Eof`
/// token so the parser can peek without bounds checks.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer { source, pos: 0 }.run()
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl Lexer<'_> {
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn bump_while(&mut self, keep: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !keep(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn run(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
                continue;
            }
            if c == '/' && self.peek_second() == Some('/') {
                self.bump_while(|c| c != '\n');
                continue;
            }
            if c == '/' && self.peek_second() == Some('*') {
                self.skip_block_comment();
                continue;
            }
            // preprocessor directives are line trivia, like comments
            if c == '#' {
                self.bump_while(|c| c != '\n');
                continue;
            }
            let start = self.pos;
            let kind = self.next_kind(c);
            tokens.push(Token {
                kind,
                text: self.source[start..self.pos].to_string(),
                span: Span::new(start as u32, self.pos as u32),
            });
        }
        let end = self.source.len() as u32;
        tokens.push(Token {
            kind: TokenKind::Eof,
            text: String::new(),
            span: Span::new(end, end),
        });
        tokens
    }

    fn next_kind(&mut self, c: char) -> TokenKind {
        if is_ident_start(c) {
            self.bump();
            self.bump_while(is_ident_continue);
            return TokenKind::Ident;
        }
        if c == '@' {
            return match self.peek_second() {
                // `@name` is one identifier token, marker included.
                Some(next) if is_ident_start(next) => {
                    self.bump();
                    self.bump();
                    self.bump_while(is_ident_continue);
                    TokenKind::Ident
                }
                Some('"') => {
                    self.bump();
                    self.lex_verbatim_string();
                    TokenKind::Str
                }
                _ => {
                    self.bump();
                    TokenKind::Other
                }
            };
        }
        if c.is_ascii_digit() {
            self.bump();
            self.bump_while(|c| c.is_ascii_alphanumeric() || c == '_');
            if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
                self.bump_while(|c| c.is_ascii_alphanumeric() || c == '_');
            }
            return TokenKind::Number;
        }
        if c == '"' {
            self.lex_string();
            return TokenKind::Str;
        }
        if c == '\'' {
            self.lex_char();
            return TokenKind::Char;
        }
        if c == '$' && self.peek_second() == Some('"') {
            self.bump();
            self.lex_string();
            return TokenKind::Str;
        }
        self.bump();
        match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ';' => TokenKind::Semi,
            '?' => TokenKind::Question,
            ':' => {
                if self.peek() == Some(':') {
                    self.bump();
                    TokenKind::ColonColon
                } else {
                    TokenKind::Colon
                }
            }
            '=' => match self.peek() {
                Some('>') => {
                    self.bump();
                    TokenKind::FatArrow
                }
                Some('=') => {
                    self.bump();
                    TokenKind::Other
                }
                _ => TokenKind::Assign,
            },
            _ => TokenKind::Other,
        }
    }

    fn skip_block_comment(&mut self) {
        self.bump();
        self.bump();
        while let Some(c) = self.bump() {
            if c == '*' && self.peek() == Some('/') {
                self.bump();
                return;
            }
        }
    }

    fn lex_string(&mut self) {
        self.bump();
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                '"' => return,
                _ => {}
            }
        }
    }

    /// `@"..."` — backslashes are plain content, `""` is an escaped quote.
    fn lex_verbatim_string(&mut self) {
        self.bump();
        while let Some(c) = self.bump() {
            if c == '"' {
                if self.peek() == Some('"') {
                    self.bump();
                } else {
                    return;
                }
            }
        }
    }

    fn lex_char(&mut self) {
        self.bump();
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                '\'' => return,
                _ => {}
            }
        }
    }
}
