//! Shared helper functions for naming rules.

/// Reports whether `identifier` is spelled entirely in the restricted ASCII
/// identifier alphabet: decimal digits, unqualified Latin letters, and the
/// underscore.
///
/// A single leading `@` is the keyword escape marker, not identifier
/// content, and is skipped. Only the first character gets that treatment; a
/// second `@` fails like any other character. The empty string is not an
/// identifier and fails outright.
pub fn is_legal_ascii_identifier(identifier: &str) -> bool {
    if identifier.is_empty() {
        return false;
    }
    let mut chars = identifier.chars();
    if identifier.starts_with('@') {
        chars.next();
    }
    chars.all(is_legal_ascii_identifier_char)
}

/// The per-character alphabet behind [`is_legal_ascii_identifier`]. Note
/// that `@` itself is not in it.
pub fn is_legal_ascii_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
