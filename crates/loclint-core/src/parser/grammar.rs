//! Recovering parser for C# declaration syntax.
//!
//! Lowers a token stream into the declaration tree. Only declaration
//! structure is modeled; expression and type positions are scanned just far
//! enough to find the declarations they can contain (`out var`, patterns,
//! lambda parameters, deconstructions). Malformed input never aborts the
//! file: the parser records an error, skips ahead, and keeps going.

use super::lexer::{Token, TokenKind};
use super::{ParseError, offset_to_location};
use crate::syntax::{DeclId, DeclKind, Designation, IdentToken, NameSyntax, SyntaxTree};

/// Declaration-level modifiers. Consumed and discarded wherever they may
/// precede a declaration.
const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "readonly", "sealed", "abstract",
    "virtual", "override", "extern", "unsafe", "partial", "async", "new", "const", "volatile",
    "required", "file", "ref",
];

const PARAM_MODIFIERS: &[&str] = &["ref", "out", "in", "params", "this", "scoped", "readonly"];

/// Modifiers that may open a local declaration statement.
const LOCAL_MODIFIERS: &[&str] = &["const", "ref", "readonly", "scoped", "static", "async"];

/// Keywords that can sit next to an identifier inside an expression without
/// forming a declaration, e.g. `item in items` or `orderby x ascending`.
/// Neither side of a `Type name` declaration expression may be one of these.
const EXPR_KEYWORDS: &[&str] = &[
    "in", "is", "as", "out", "new", "base", "this", "null", "true", "false", "not", "and", "or",
    "when", "switch", "with", "stackalloc", "typeof", "default", "nameof", "sizeof", "await",
    "from", "select", "where", "let", "join", "on", "equals", "into", "orderby", "group", "by",
    "ascending", "descending", "ref", "else", "return", "yield", "goto",
];

pub(super) fn parse(source: &str, tokens: Vec<Token>) -> (SyntaxTree, Vec<ParseError>) {
    let mut parser = DeclParser {
        source,
        tokens,
        pos: 0,
        tree: SyntaxTree::new(),
        errors: Vec::new(),
    };
    parser.item_list(None, TokenKind::Eof);
    (parser.tree, parser.errors)
}

enum TypeKeyword {
    Class,
    Struct,
    Interface,
}

struct DeclParser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    tree: SyntaxTree,
    errors: Vec<ParseError>,
}

impl DeclParser<'_> {
    // ---- token stream -----------------------------------------------------

    fn cur(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn kind(&self) -> TokenKind {
        self.cur().kind
    }

    fn text(&self) -> &str {
        &self.cur().text
    }

    fn nth_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn nth_text(&self, n: usize) -> &str {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.text.as_str())
            .unwrap_or("")
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    fn at_kw(&self, keyword: &str) -> bool {
        self.at(TokenKind::Ident) && self.text() == keyword
    }

    fn at_other(&self, text: &str) -> bool {
        self.at(TokenKind::Other) && self.text() == text
    }

    fn bump(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            return true;
        }
        false
    }

    fn eat_kw(&mut self, keyword: &str) -> bool {
        if self.at_kw(keyword) {
            self.bump();
            return true;
        }
        false
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error_here(format!("expected {what}"));
        false
    }

    fn ident_token(&mut self) -> Option<IdentToken> {
        if !self.at(TokenKind::Ident) {
            return None;
        }
        let token = IdentToken::new(self.cur().text.clone(), self.cur().span);
        self.bump();
        Some(token)
    }

    // ---- errors and recovery ----------------------------------------------

    fn error_here(&mut self, message: impl Into<String>) {
        let span = self.cur().span;
        let (line, column) = offset_to_location(self.source, span.lo);
        self.errors.push(ParseError {
            message: message.into(),
            line,
            column,
            span_lo: span.lo,
            span_hi: span.hi,
        });
    }

    fn skip_unexpected(&mut self) {
        let found = if self.at(TokenKind::Eof) {
            "end of file".to_string()
        } else {
            format!("`{}`", self.text())
        };
        self.error_here(format!("unexpected {found} in declaration syntax"));
        self.bump();
    }

    /// Consumes tokens up to (not including) the first terminator found at
    /// bracket depth zero. A closing bracket that would unbalance the scan
    /// also stops it, unconsumed, since it belongs to an enclosing construct.
    fn skip_until(&mut self, terminators: &[TokenKind]) {
        let mut depth = 0usize;
        loop {
            let kind = self.kind();
            if kind == TokenKind::Eof {
                return;
            }
            if depth == 0 && terminators.contains(&kind) {
                return;
            }
            match kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    self.bump();
                }
                _ => self.bump(),
            }
        }
    }

    fn skip_to_semi(&mut self) {
        self.skip_until(&[TokenKind::Semi]);
        self.eat(TokenKind::Semi);
    }

    /// Consumes a balanced `open`..`close` group, nesting included. The
    /// current token must be `open`.
    fn skip_balanced(&mut self, open: TokenKind, close: TokenKind) {
        let mut depth = 0usize;
        while !self.at(TokenKind::Eof) {
            let kind = self.kind();
            self.bump();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
        }
    }

    fn skip_attribute_lists(&mut self) {
        while self.at(TokenKind::LBracket) {
            self.skip_balanced(TokenKind::LBracket, TokenKind::RBracket);
        }
    }

    fn skip_modifiers(&mut self) {
        while self.at(TokenKind::Ident) && MODIFIERS.contains(&self.text()) {
            self.bump();
        }
    }

    // ---- names and types --------------------------------------------------

    /// Parses a possibly dotted, possibly alias-qualified name. `::` binds
    /// first, then `.` extends to the left-associated spine.
    fn name_syntax(&mut self) -> Option<NameSyntax> {
        let first = self.ident_token()?;
        let mut name = NameSyntax::simple(first);
        if self.at(TokenKind::ColonColon) && self.nth_kind(1) == TokenKind::Ident {
            self.bump();
            if let Some(right) = self.ident_token() {
                name = NameSyntax::alias_qualified(name, NameSyntax::simple(right));
            }
        }
        while self.at(TokenKind::Dot) && self.nth_kind(1) == TokenKind::Ident {
            self.bump();
            if let Some(right) = self.ident_token() {
                name = NameSyntax::qualified(name, NameSyntax::simple(right));
            }
        }
        Some(name)
    }

    /// Consumes one type reference if the stream starts with one. Types are
    /// never recorded, only skipped with enough shape awareness to find the
    /// identifier that follows them.
    fn type_ref(&mut self) -> bool {
        if self.at(TokenKind::LParen) {
            // tuple type
            self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
        } else if self.at(TokenKind::Ident) {
            self.bump();
            if self.at(TokenKind::Lt) {
                self.try_generic_args();
            }
            if self.at(TokenKind::ColonColon) && self.nth_kind(1) == TokenKind::Ident {
                self.bump();
                self.bump();
                if self.at(TokenKind::Lt) {
                    self.try_generic_args();
                }
            }
            while self.at(TokenKind::Dot) && self.nth_kind(1) == TokenKind::Ident {
                self.bump();
                self.bump();
                if self.at(TokenKind::Lt) {
                    self.try_generic_args();
                }
            }
        } else {
            return false;
        }
        loop {
            if self.at(TokenKind::Question) {
                self.bump();
            } else if self.at(TokenKind::LBracket) {
                self.skip_balanced(TokenKind::LBracket, TokenKind::RBracket);
            } else if self.at_other("*") {
                self.bump();
            } else {
                break;
            }
        }
        true
    }

    /// Consumes `<...>` when its content can spell type arguments. Seeing a
    /// token no type can contain means the `<` was a comparison; the stream
    /// is restored and nothing is consumed.
    fn try_generic_args(&mut self) -> bool {
        let save = self.pos;
        let mut depth = 0usize;
        loop {
            match self.kind() {
                TokenKind::Lt => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::Gt => {
                    depth = depth.saturating_sub(1);
                    self.bump();
                    if depth == 0 {
                        return true;
                    }
                }
                TokenKind::Ident
                | TokenKind::Dot
                | TokenKind::Comma
                | TokenKind::Question
                | TokenKind::ColonColon
                | TokenKind::LBracket
                | TokenKind::RBracket
                | TokenKind::LParen
                | TokenKind::RParen => self.bump(),
                _ => {
                    self.pos = save;
                    return false;
                }
            }
        }
    }

    // ---- namespace-level items --------------------------------------------

    fn item_list(&mut self, parent: Option<DeclId>, end: TokenKind) {
        while !self.at(end) && !self.at(TokenKind::Eof) {
            let before = self.pos;
            self.item(parent);
            if self.pos == before {
                self.skip_unexpected();
            }
        }
    }

    fn item(&mut self, parent: Option<DeclId>) {
        self.skip_attribute_lists();
        if self.at_kw("global") && self.nth_text(1) == "using" {
            self.skip_to_semi();
            return;
        }
        if self.at_kw("extern") && self.nth_text(1) == "alias" {
            self.skip_to_semi();
            return;
        }
        if self.at_kw("using") {
            self.skip_to_semi();
            return;
        }
        self.skip_modifiers();
        if self.at_kw("namespace") {
            self.namespace_decl(parent);
            return;
        }
        if self.type_like_item(parent) {
            return;
        }
        self.eat(TokenKind::Semi);
    }

    /// Dispatches type declarations shared between namespace level and
    /// member level (nested types). Returns false without consuming when the
    /// current token opens none of them.
    fn type_like_item(&mut self, parent: Option<DeclId>) -> bool {
        if self.at_kw("class") {
            self.type_decl(parent, TypeKeyword::Class);
        } else if self.at_kw("struct") {
            self.type_decl(parent, TypeKeyword::Struct);
        } else if self.at_kw("interface") {
            self.type_decl(parent, TypeKeyword::Interface);
        } else if self.at_kw("enum") {
            self.enum_decl(parent);
        } else if self.at_kw("delegate") {
            self.delegate_decl(parent);
        } else if self.at_kw("record") {
            self.record_decl(parent);
        } else {
            return false;
        }
        true
    }

    fn namespace_decl(&mut self, parent: Option<DeclId>) {
        self.bump();
        let Some(name) = self.name_syntax() else {
            self.error_here("expected namespace name");
            return;
        };
        let id = self.tree.alloc(DeclKind::Namespace { name }, parent);
        if self.eat(TokenKind::LBrace) {
            self.item_list(Some(id), TokenKind::RBrace);
            self.expect(TokenKind::RBrace, "`}`");
        } else if self.eat(TokenKind::Semi) {
            // file-scoped namespace: the rest of the file nests under it
            self.item_list(Some(id), TokenKind::Eof);
        } else {
            self.error_here("expected `{` or `;` after namespace name");
        }
    }

    fn type_decl(&mut self, parent: Option<DeclId>, keyword: TypeKeyword) {
        self.bump();
        let Some(name) = self.ident_token() else {
            self.error_here("expected type name");
            return;
        };
        let kind = match keyword {
            TypeKeyword::Class => DeclKind::Class { name },
            TypeKeyword::Struct => DeclKind::Struct { name },
            TypeKeyword::Interface => DeclKind::Interface { name },
        };
        let id = self.tree.alloc(kind, parent);
        if self.at(TokenKind::Lt) {
            self.try_generic_args();
        }
        if self.at(TokenKind::LParen) {
            // primary constructor
            self.bump();
            self.parameter_list(Some(id), TokenKind::RParen);
            self.expect(TokenKind::RParen, "`)`");
        }
        self.skip_base_list();
        if self.eat(TokenKind::Semi) {
            return;
        }
        if self.expect(TokenKind::LBrace, "`{`") {
            self.member_list(id);
            self.expect(TokenKind::RBrace, "`}`");
        }
    }

    fn record_decl(&mut self, parent: Option<DeclId>) {
        self.bump();
        let is_struct = self.eat_kw("struct");
        self.eat_kw("class");
        let Some(name) = self.ident_token() else {
            self.error_here("expected record name");
            return;
        };
        let kind = if is_struct {
            DeclKind::Struct { name }
        } else {
            DeclKind::Class { name }
        };
        let id = self.tree.alloc(kind, parent);
        if self.at(TokenKind::Lt) {
            self.try_generic_args();
        }
        if self.at(TokenKind::LParen) {
            self.bump();
            self.parameter_list(Some(id), TokenKind::RParen);
            self.expect(TokenKind::RParen, "`)`");
        }
        self.skip_base_list();
        if self.eat(TokenKind::Semi) {
            return;
        }
        if self.expect(TokenKind::LBrace, "`{`") {
            self.member_list(id);
            self.expect(TokenKind::RBrace, "`}`");
        }
    }

    /// Skips a base list and any `where` constraints, up to the body or a
    /// terminating `;`.
    fn skip_base_list(&mut self) {
        if self.at(TokenKind::Colon) || self.at_kw("where") {
            while !self.at(TokenKind::LBrace) && !self.at(TokenKind::Semi) && !self.at(TokenKind::Eof)
            {
                self.bump();
            }
        }
    }

    fn enum_decl(&mut self, parent: Option<DeclId>) {
        self.bump();
        let Some(name) = self.ident_token() else {
            self.error_here("expected enum name");
            return;
        };
        let id = self.tree.alloc(DeclKind::Enum { name }, parent);
        self.skip_base_list();
        if !self.expect(TokenKind::LBrace, "`{`") {
            return;
        }
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            self.skip_attribute_lists();
            if self.at(TokenKind::RBrace) {
                break;
            }
            if let Some(member) = self.ident_token() {
                self.tree.alloc(DeclKind::EnumMember { name: member }, Some(id));
                if self.eat(TokenKind::Assign) {
                    self.skip_until(&[TokenKind::Comma, TokenKind::RBrace]);
                }
                if !self.eat(TokenKind::Comma) && !self.at(TokenKind::RBrace) {
                    self.skip_unexpected();
                }
            } else {
                self.skip_unexpected();
            }
        }
        self.expect(TokenKind::RBrace, "`}`");
        self.eat(TokenKind::Semi);
    }

    fn delegate_decl(&mut self, parent: Option<DeclId>) {
        self.bump();
        if !self.type_ref() {
            self.error_here("expected delegate return type");
            return;
        }
        let Some(name) = self.ident_token() else {
            self.error_here("expected delegate name");
            return;
        };
        let id = self.tree.alloc(DeclKind::Delegate { name }, parent);
        if self.at(TokenKind::Lt) {
            self.try_generic_args();
        }
        if self.expect(TokenKind::LParen, "`(`") {
            self.parameter_list(Some(id), TokenKind::RParen);
            self.expect(TokenKind::RParen, "`)`");
        }
        if self.at_kw("where") {
            self.skip_until(&[TokenKind::Semi]);
        }
        self.expect(TokenKind::Semi, "`;`");
    }

    // ---- type members -----------------------------------------------------

    fn member_list(&mut self, type_id: DeclId) {
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            let before = self.pos;
            self.member(type_id);
            if self.pos == before {
                self.skip_unexpected();
            }
        }
    }

    fn member(&mut self, type_id: DeclId) {
        self.skip_attribute_lists();
        self.skip_modifiers();
        if self.eat(TokenKind::Semi) {
            return;
        }
        if self.type_like_item(Some(type_id)) {
            return;
        }
        if self.at_kw("event") {
            self.event_member(type_id);
            return;
        }
        if self.at_kw("implicit") || self.at_kw("explicit") {
            self.bump();
            self.eat_kw("operator");
            self.type_ref();
            self.operator_tail(type_id);
            return;
        }
        if self.at_other("~") && self.nth_kind(1) == TokenKind::Ident {
            // destructor: only its (empty) parameter list matters
            self.bump();
        }
        if self.at(TokenKind::Ident) && self.nth_kind(1) == TokenKind::LParen {
            // constructor: the name repeats the type and is not its own
            // declaration site, but the parameters are
            self.bump();
            self.bump();
            self.parameter_list(Some(type_id), TokenKind::RParen);
            self.expect(TokenKind::RParen, "`)`");
            if self.eat(TokenKind::Colon) {
                // `: base(...)` / `: this(...)`, argument expressions can
                // still declare `out` variables
                self.expr_scan(type_id, &[TokenKind::LBrace, TokenKind::Semi, TokenKind::FatArrow]);
            }
            self.member_body(type_id);
            return;
        }
        if !self.type_ref() {
            return;
        }
        if self.at_kw("operator") {
            self.bump();
            while !self.at(TokenKind::LParen)
                && !self.at(TokenKind::LBrace)
                && !self.at(TokenKind::Semi)
                && !self.at(TokenKind::Eof)
            {
                self.bump();
            }
            self.operator_tail(type_id);
            return;
        }
        if self.at_kw("this") {
            // indexer: parameters only, the `this` keyword names nothing
            self.bump();
            if self.eat(TokenKind::LBracket) {
                self.parameter_list(Some(type_id), TokenKind::RBracket);
                self.expect(TokenKind::RBracket, "`]`");
            }
            if self.at(TokenKind::LBrace) {
                self.accessor_block(type_id);
            } else if self.eat(TokenKind::FatArrow) {
                self.expr_scan(type_id, &[TokenKind::Semi]);
                self.eat(TokenKind::Semi);
            } else {
                self.eat(TokenKind::Semi);
            }
            return;
        }
        let Some(name) = self.ident_token() else {
            return;
        };
        if self.at(TokenKind::Lt) {
            self.try_generic_args();
        }
        match self.kind() {
            TokenKind::LParen => {
                let id = self.tree.alloc(DeclKind::Method { name }, Some(type_id));
                self.bump();
                self.parameter_list(Some(id), TokenKind::RParen);
                self.expect(TokenKind::RParen, "`)`");
                if self.at_kw("where") {
                    self.skip_until(&[TokenKind::LBrace, TokenKind::Semi, TokenKind::FatArrow]);
                }
                self.member_body(id);
            }
            TokenKind::LBrace => {
                let id = self.tree.alloc(DeclKind::Property { name }, Some(type_id));
                self.accessor_block(id);
                if self.eat(TokenKind::Assign) {
                    self.expr_scan(id, &[TokenKind::Semi]);
                    self.eat(TokenKind::Semi);
                }
            }
            TokenKind::FatArrow => {
                let id = self.tree.alloc(DeclKind::Property { name }, Some(type_id));
                self.bump();
                self.expr_scan(id, &[TokenKind::Semi]);
                self.eat(TokenKind::Semi);
            }
            _ => {
                let declarators = self.declarator_list(name, type_id);
                self.expect(TokenKind::Semi, "`;`");
                self.tree.alloc(DeclKind::Field { declarators }, Some(type_id));
            }
        }
    }

    fn operator_tail(&mut self, type_id: DeclId) {
        if self.eat(TokenKind::LParen) {
            self.parameter_list(Some(type_id), TokenKind::RParen);
            self.expect(TokenKind::RParen, "`)`");
        }
        self.member_body(type_id);
    }

    /// Remaining declarators of a field-like member, first one already
    /// consumed. Initializer expressions are scanned for nested declarations.
    fn declarator_list(&mut self, first: IdentToken, parent: DeclId) -> Vec<IdentToken> {
        let mut declarators = vec![first];
        if self.eat(TokenKind::Assign) {
            self.expr_scan(parent, &[TokenKind::Comma, TokenKind::Semi]);
        }
        while self.eat(TokenKind::Comma) {
            let Some(more) = self.ident_token() else {
                break;
            };
            declarators.push(more);
            if self.eat(TokenKind::Assign) {
                self.expr_scan(parent, &[TokenKind::Comma, TokenKind::Semi]);
            }
        }
        declarators
    }

    fn event_member(&mut self, type_id: DeclId) {
        self.bump();
        if !self.type_ref() {
            self.error_here("expected event type");
            return;
        }
        let Some(first) = self.ident_token() else {
            self.error_here("expected event name");
            return;
        };
        if self.at(TokenKind::LBrace) {
            let id = self.tree.alloc(DeclKind::Event { name: first }, Some(type_id));
            self.accessor_block(id);
        } else {
            let declarators = self.declarator_list(first, type_id);
            self.expect(TokenKind::Semi, "`;`");
            self.tree.alloc(DeclKind::EventField { declarators }, Some(type_id));
        }
    }

    fn member_body(&mut self, parent: DeclId) {
        if self.at(TokenKind::LBrace) {
            self.block(parent);
        } else if self.eat(TokenKind::FatArrow) {
            self.expr_scan(parent, &[TokenKind::Semi]);
            self.eat(TokenKind::Semi);
        } else {
            self.eat(TokenKind::Semi);
        }
    }

    /// Accessor list of a property, indexer, or event: `{ get; set { ... } }`.
    fn accessor_block(&mut self, parent: DeclId) {
        self.expect(TokenKind::LBrace, "`{`");
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            let before = self.pos;
            self.skip_attribute_lists();
            self.skip_modifiers();
            if self.at(TokenKind::Ident) {
                // get / set / init / add / remove
                self.bump();
                if self.at(TokenKind::LBrace) {
                    self.block(parent);
                } else if self.eat(TokenKind::FatArrow) {
                    self.expr_scan(parent, &[TokenKind::Semi]);
                    self.eat(TokenKind::Semi);
                } else {
                    self.eat(TokenKind::Semi);
                }
            }
            if self.pos == before {
                self.skip_unexpected();
            }
        }
        self.expect(TokenKind::RBrace, "`}`");
    }

    // ---- parameters -------------------------------------------------------

    fn parameter_list(&mut self, parent: Option<DeclId>, end: TokenKind) {
        while !self.at(end) && !self.at(TokenKind::Eof) {
            let before = self.pos;
            self.parameter(parent, end);
            self.eat(TokenKind::Comma);
            if self.pos == before {
                self.skip_unexpected();
            }
        }
    }

    fn parameter(&mut self, parent: Option<DeclId>, end: TokenKind) {
        self.skip_attribute_lists();
        while self.at(TokenKind::Ident) && PARAM_MODIFIERS.contains(&self.text()) {
            self.bump();
        }
        if !self.type_ref() {
            return;
        }
        if let Some(name) = self.ident_token() {
            self.tree.alloc(DeclKind::Parameter { name }, parent);
            if self.eat(TokenKind::Assign) {
                // default values are constant expressions
                self.skip_until(&[TokenKind::Comma, end]);
            }
        }
    }

    // ---- statements -------------------------------------------------------

    fn block(&mut self, parent: DeclId) {
        self.expect(TokenKind::LBrace, "`{`");
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            let before = self.pos;
            self.statement(parent);
            if self.pos == before {
                self.skip_unexpected();
            }
        }
        self.expect(TokenKind::RBrace, "`}`");
    }

    fn statement(&mut self, parent: DeclId) {
        if self.at(TokenKind::LBrace) {
            self.block(parent);
            return;
        }
        if self.eat(TokenKind::Semi) {
            return;
        }
        if self.at_kw("if") {
            self.bump();
            self.paren_head(parent);
            self.statement(parent);
            if self.eat_kw("else") {
                self.statement(parent);
            }
            return;
        }
        if self.at_kw("switch") {
            self.switch_statement(parent);
            return;
        }
        // loop and resource heads declare no sites of their own; iteration
        // variables are not declaration sites
        if self.at_kw("for") || self.at_kw("foreach") || self.at_kw("while") || self.at_kw("lock")
            || self.at_kw("fixed")
        {
            self.bump();
            self.paren_head(parent);
            self.statement(parent);
            return;
        }
        if self.at_kw("using") {
            self.bump();
            if self.at(TokenKind::LParen) {
                self.paren_head(parent);
                self.statement(parent);
            } else if !self.try_declaration_statement(parent) {
                self.expr_scan(parent, &[TokenKind::Semi]);
                self.eat(TokenKind::Semi);
            }
            return;
        }
        if self.at_kw("do") {
            self.bump();
            self.statement(parent);
            if self.eat_kw("while") {
                self.paren_head(parent);
            }
            self.eat(TokenKind::Semi);
            return;
        }
        if self.at_kw("return") || self.at_kw("throw") {
            self.bump();
            if !self.at(TokenKind::Semi) {
                self.expr_scan(parent, &[TokenKind::Semi]);
            }
            self.eat(TokenKind::Semi);
            return;
        }
        if self.at_kw("break") || self.at_kw("continue") {
            self.bump();
            self.eat(TokenKind::Semi);
            return;
        }
        if self.at_kw("goto") || self.at_kw("new") || self.at_kw("await") || self.at_kw("yield") {
            self.bump();
            self.expr_scan(parent, &[TokenKind::Semi]);
            self.eat(TokenKind::Semi);
            return;
        }
        if self.at_kw("try") {
            self.try_statement(parent);
            return;
        }
        if self.at_kw("checked") || self.at_kw("unchecked") || self.at_kw("unsafe") {
            self.bump();
            if self.at(TokenKind::LBrace) {
                self.block(parent);
            } else {
                self.expr_scan(parent, &[TokenKind::Semi]);
                self.eat(TokenKind::Semi);
            }
            return;
        }
        if self.try_declaration_statement(parent) {
            return;
        }
        self.expr_scan(parent, &[TokenKind::Semi]);
        self.eat(TokenKind::Semi);
    }

    fn paren_head(&mut self, parent: DeclId) {
        if self.eat(TokenKind::LParen) {
            self.expr_scan(parent, &[TokenKind::RParen]);
            self.expect(TokenKind::RParen, "`)`");
        }
    }

    fn try_statement(&mut self, parent: DeclId) {
        self.bump();
        if self.at(TokenKind::LBrace) {
            self.block(parent);
        }
        while self.at_kw("catch") {
            self.bump();
            if self.at(TokenKind::LParen) {
                // a catch declaration binds an exception, not a declaration
                // site this analysis tracks
                self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
            }
            if self.at_kw("when") {
                self.bump();
                self.paren_head(parent);
            }
            if self.at(TokenKind::LBrace) {
                self.block(parent);
            }
        }
        if self.eat_kw("finally") {
            if self.at(TokenKind::LBrace) {
                self.block(parent);
            }
        }
    }

    /// Attempts to parse a local declaration statement or local function at
    /// the current position. Restores the stream and returns false when the
    /// tokens turn out to be an expression instead.
    fn try_declaration_statement(&mut self, parent: DeclId) -> bool {
        let save = self.pos;
        while self.at(TokenKind::Ident) && LOCAL_MODIFIERS.contains(&self.text()) {
            self.bump();
        }
        if self.at_kw("var") {
            self.var_statement(parent);
            return true;
        }
        if self.type_ref() && self.at(TokenKind::Ident) {
            match self.nth_kind(1) {
                TokenKind::Assign | TokenKind::Comma | TokenKind::Semi => {
                    self.local_declaration(parent);
                    return true;
                }
                TokenKind::LParen => {
                    self.local_function(parent);
                    return true;
                }
                _ => {}
            }
        }
        self.pos = save;
        false
    }

    fn var_statement(&mut self, parent: DeclId) {
        self.bump();
        if self.at(TokenKind::LParen) {
            // deconstruction declaration: `var (a, (b, _)) = ...`
            if let Some(designation) = self.designation() {
                self.tree.alloc(DeclKind::Binding { designation }, Some(parent));
            }
            if self.eat(TokenKind::Assign) {
                self.expr_scan(parent, &[TokenKind::Semi]);
            }
            self.eat(TokenKind::Semi);
            return;
        }
        self.local_declaration(parent);
    }

    /// Declarator list of a local declaration, type already consumed.
    fn local_declaration(&mut self, parent: DeclId) {
        let mut declarators = Vec::new();
        loop {
            let Some(name) = self.ident_token() else {
                break;
            };
            declarators.push(name);
            if self.eat(TokenKind::Assign) {
                self.expr_scan(parent, &[TokenKind::Comma, TokenKind::Semi]);
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Semi, "`;`");
        if !declarators.is_empty() {
            self.tree.alloc(DeclKind::Local { declarators }, Some(parent));
        }
    }

    /// Local function, return type already consumed. Its name is not a
    /// tracked declaration site, but its parameters and body are scanned.
    fn local_function(&mut self, parent: DeclId) {
        self.bump();
        if self.at(TokenKind::Lt) {
            self.try_generic_args();
        }
        if self.eat(TokenKind::LParen) {
            self.parameter_list(Some(parent), TokenKind::RParen);
            self.expect(TokenKind::RParen, "`)`");
        }
        if self.at_kw("where") {
            self.skip_until(&[TokenKind::LBrace, TokenKind::Semi, TokenKind::FatArrow]);
        }
        self.member_body(parent);
    }

    fn designation(&mut self) -> Option<Designation> {
        if self.at(TokenKind::LParen) {
            self.bump();
            let mut children = Vec::new();
            while !self.at(TokenKind::RParen) && !self.at(TokenKind::Eof) {
                if let Some(child) = self.designation() {
                    children.push(child);
                } else {
                    self.skip_unexpected();
                }
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen, "`)`");
            return Some(Designation::Parenthesized(children));
        }
        let token = self.ident_token()?;
        if token.text == "_" {
            Some(Designation::Discard(token.span))
        } else {
            Some(Designation::Single(token))
        }
    }

    fn switch_statement(&mut self, parent: DeclId) {
        self.bump();
        self.paren_head(parent);
        if !self.expect(TokenKind::LBrace, "`{`") {
            return;
        }
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            let before = self.pos;
            if self.at_kw("case") {
                self.bump();
                self.case_pattern(parent);
                self.expect(TokenKind::Colon, "`:`");
            } else if self.at_kw("default") {
                self.bump();
                self.expect(TokenKind::Colon, "`:`");
            } else {
                self.statement(parent);
            }
            if self.pos == before {
                self.skip_unexpected();
            }
        }
        self.expect(TokenKind::RBrace, "`}`");
    }

    /// One `case` label up to its `:`. `Type name` binds through a
    /// declaration pattern, also under `not`; `var name` is a var pattern and
    /// binds nothing this analysis tracks. The conjunction tail and any
    /// `when` clause are scanned for bindings their expressions introduce.
    fn case_pattern(&mut self, parent: DeclId) {
        while self.eat_kw("not") {}
        if self.eat_kw("var") {
            self.designation();
            self.expr_scan(parent, &[TokenKind::Colon]);
            return;
        }
        let save = self.pos;
        if self.type_ref()
            && self.at(TokenKind::Ident)
            && !matches!(self.text(), "when" | "and" | "or")
        {
            if let Some(name) = self.ident_token() {
                let designation = self.single_or_discard(name);
                self.tree.alloc(DeclKind::Binding { designation }, Some(parent));
            }
            self.expr_scan(parent, &[TokenKind::Colon]);
            return;
        }
        self.pos = save;
        self.expr_scan(parent, &[TokenKind::Colon]);
    }

    fn single_or_discard(&self, token: IdentToken) -> Designation {
        if token.text == "_" {
            Designation::Discard(token.span)
        } else {
            Designation::Single(token)
        }
    }

    // ---- expressions ------------------------------------------------------

    /// Scans expression tokens up to a depth-zero terminator, collecting the
    /// declarations expressions can introduce: `out` declarations, declaration
    /// patterns after `is`, lambda parameters, and tuple deconstruction
    /// elements.
    fn expr_scan(&mut self, parent: DeclId, terminators: &[TokenKind]) {
        let mut depth = 0usize;
        loop {
            let kind = self.kind();
            if kind == TokenKind::Eof {
                return;
            }
            if depth == 0 && terminators.contains(&kind) {
                return;
            }
            match kind {
                TokenKind::LParen => {
                    if self.lambda_params_ahead() {
                        self.lambda_params(parent);
                    } else {
                        depth += 1;
                        self.bump();
                    }
                }
                TokenKind::LBrace | TokenKind::LBracket => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    self.bump();
                }
                TokenKind::Ident if self.text() == "out" => {
                    self.bump();
                    self.out_argument(parent);
                }
                TokenKind::Ident
                    if self.text() == "switch" && self.nth_kind(1) == TokenKind::LBrace =>
                {
                    self.bump();
                    self.switch_expression_arms(parent);
                }
                TokenKind::Ident if self.text() == "is" => {
                    self.bump();
                    self.is_pattern(parent);
                }
                TokenKind::Ident if self.nth_kind(1) == TokenKind::FatArrow => {
                    // simple lambda: `x => ...`
                    if let Some(name) = self.ident_token() {
                        self.tree.alloc(DeclKind::Parameter { name }, Some(parent));
                    }
                    self.bump();
                }
                TokenKind::Ident => {
                    if !self.try_declaration_expression(parent) {
                        self.bump();
                    }
                }
                _ => self.bump(),
            }
        }
    }

    /// `Type name` directly inside an expression, as in a tuple
    /// deconstruction `(int x, string y) = ...`. Two adjacent identifiers are
    /// no legal expression unless one of them is an expression keyword, so
    /// the shape is unambiguous.
    fn try_declaration_expression(&mut self, parent: DeclId) -> bool {
        if EXPR_KEYWORDS.contains(&self.text()) {
            return false;
        }
        let save = self.pos;
        if self.type_ref()
            && self.at(TokenKind::Ident)
            && !EXPR_KEYWORDS.contains(&self.text())
            && matches!(self.nth_kind(1), TokenKind::Comma | TokenKind::RParen)
        {
            if let Some(name) = self.ident_token() {
                let designation = self.single_or_discard(name);
                self.tree.alloc(DeclKind::Binding { designation }, Some(parent));
            }
            return true;
        }
        self.pos = save;
        false
    }

    /// Argument after an `out` keyword. `out var d` and `out Type name`
    /// declare; `out existing` only references.
    fn out_argument(&mut self, parent: DeclId) {
        if self.eat_kw("var") {
            if let Some(designation) = self.designation() {
                self.tree.alloc(DeclKind::Binding { designation }, Some(parent));
            }
            return;
        }
        let save = self.pos;
        if self.type_ref() && self.at(TokenKind::Ident) {
            if let Some(name) = self.ident_token() {
                let designation = self.single_or_discard(name);
                self.tree.alloc(DeclKind::Binding { designation }, Some(parent));
            }
            return;
        }
        self.pos = save;
    }

    /// Arm list of a switch expression, `switch` already consumed.
    /// Declaration patterns in arm patterns bind the same way `case` labels
    /// do.
    fn switch_expression_arms(&mut self, parent: DeclId) {
        self.bump();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            let before = self.pos;
            self.arm_pattern(parent);
            if self.eat(TokenKind::FatArrow) {
                self.expr_scan(parent, &[TokenKind::Comma, TokenKind::RBrace]);
            }
            self.eat(TokenKind::Comma);
            if self.pos == before {
                self.skip_unexpected();
            }
        }
        self.expect(TokenKind::RBrace, "`}`");
    }

    /// One switch expression arm pattern up to its `=>`.
    fn arm_pattern(&mut self, parent: DeclId) {
        if self.at(TokenKind::Ident)
            && self.text() == "_"
            && self.nth_kind(1) == TokenKind::FatArrow
        {
            self.bump();
            return;
        }
        while self.eat_kw("not") {}
        if self.eat_kw("var") {
            self.designation();
            self.expr_scan(parent, &[TokenKind::FatArrow]);
            return;
        }
        if self.at(TokenKind::LParen) {
            self.positional_pattern(parent);
            // a designation after a positional pattern is not a declaration
            // pattern and stays unrecorded
            if self.at(TokenKind::Ident) && !matches!(self.text(), "when" | "and" | "or") {
                self.bump();
            }
            self.expr_scan(parent, &[TokenKind::FatArrow]);
            return;
        }
        let save = self.pos;
        if self.type_ref()
            && self.at(TokenKind::Ident)
            && !matches!(self.text(), "when" | "and" | "or")
        {
            if let Some(name) = self.ident_token() {
                let designation = self.single_or_discard(name);
                self.tree.alloc(DeclKind::Binding { designation }, Some(parent));
            }
            self.expr_scan(parent, &[TokenKind::FatArrow]);
            return;
        }
        self.pos = save;
        self.expr_scan(parent, &[TokenKind::FatArrow]);
    }

    /// Parenthesized positional pattern. Each subpattern that is a
    /// declaration pattern binds its name.
    fn positional_pattern(&mut self, parent: DeclId) {
        self.bump();
        while !self.at(TokenKind::RParen) && !self.at(TokenKind::Eof) {
            let before = self.pos;
            self.subpattern(parent);
            self.eat(TokenKind::Comma);
            if self.pos == before {
                self.skip_unexpected();
            }
        }
        self.expect(TokenKind::RParen, "`)`");
    }

    /// One positional subpattern: `Type name` binds, everything else does
    /// not.
    fn subpattern(&mut self, parent: DeclId) {
        while self.eat_kw("not") {}
        if self.eat_kw("var") {
            self.designation();
            return;
        }
        if self.at(TokenKind::LParen) {
            self.positional_pattern(parent);
            return;
        }
        let save = self.pos;
        if self.type_ref()
            && self.at(TokenKind::Ident)
            && !matches!(self.text(), "when" | "and" | "or")
        {
            if let Some(name) = self.ident_token() {
                let designation = self.single_or_discard(name);
                self.tree.alloc(DeclKind::Binding { designation }, Some(parent));
            }
            return;
        }
        self.pos = save;
        self.skip_until(&[TokenKind::Comma, TokenKind::RParen]);
    }

    /// Pattern after an `is` keyword. A declaration pattern (`is Type name`)
    /// binds, also under negation (`is not Type name`); var patterns do not.
    fn is_pattern(&mut self, parent: DeclId) {
        if self.eat_kw("not") {
            self.is_pattern(parent);
            return;
        }
        if self.eat_kw("var") {
            // var pattern: consume its designation so the scan does not
            // mistake it for anything else, but record no site
            self.designation();
            return;
        }
        if self.at_kw("null") {
            return;
        }
        let save = self.pos;
        if self.type_ref()
            && self.at(TokenKind::Ident)
            && !matches!(self.text(), "and" | "or" | "when")
        {
            if let Some(name) = self.ident_token() {
                let designation = self.single_or_discard(name);
                self.tree.alloc(DeclKind::Binding { designation }, Some(parent));
            }
            return;
        }
        self.pos = save;
    }

    /// True when the current `(` closes into `) =>`, i.e. opens a lambda
    /// parameter list rather than a grouping.
    fn lambda_params_ahead(&self) -> bool {
        let mut depth = 0usize;
        let mut i = self.pos;
        loop {
            match self.tokens.get(i).map(|t| t.kind) {
                Some(TokenKind::LParen) => depth += 1,
                Some(TokenKind::RParen) => {
                    depth -= 1;
                    if depth == 0 {
                        return self
                            .tokens
                            .get(i + 1)
                            .map(|t| t.kind == TokenKind::FatArrow)
                            .unwrap_or(false);
                    }
                }
                Some(TokenKind::Eof) | None => return false,
                _ => {}
            }
            i += 1;
        }
    }

    fn lambda_params(&mut self, parent: DeclId) {
        self.bump();
        while !self.at(TokenKind::RParen) && !self.at(TokenKind::Eof) {
            let before = self.pos;
            while self.at(TokenKind::Ident) && matches!(self.text(), "ref" | "out" | "in") {
                self.bump();
            }
            let save = self.pos;
            if self.type_ref() && self.at(TokenKind::Ident) {
                if let Some(name) = self.ident_token() {
                    self.tree.alloc(DeclKind::Parameter { name }, Some(parent));
                }
            } else {
                self.pos = save;
                if let Some(name) = self.ident_token() {
                    self.tree.alloc(DeclKind::Parameter { name }, Some(parent));
                }
            }
            self.eat(TokenKind::Comma);
            if self.pos == before {
                self.skip_unexpected();
            }
        }
        self.expect(TokenKind::RParen, "`)`");
        // the caller sees the `=>` as the next expression token
    }
}
