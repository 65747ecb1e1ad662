//! Compound name syntax and its decomposition into simple parts.
//!
//! Namespace declarations carry dotted and alias-qualified names rather than
//! a single identifier token. `NameSyntax` models that shape and knows which
//! of its parts count as declared identifiers.

use super::token::{IdentToken, Span};

/// A possibly-qualified name as it appears after the `namespace` keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameSyntax {
    /// A single identifier, e.g. `System`.
    Simple(IdentToken),
    /// A dotted pair, e.g. `System.Text`. `left` may itself be qualified.
    Qualified {
        left: Box<NameSyntax>,
        right: Box<NameSyntax>,
    },
    /// An alias-qualified name, e.g. `global::System`. Only the alias side
    /// introduces a declared identifier; the right side resolves against an
    /// extern alias and is never a declaration.
    AliasQualified {
        alias: Box<NameSyntax>,
        name: Box<NameSyntax>,
    },
}

impl NameSyntax {
    pub fn simple(token: IdentToken) -> Self {
        NameSyntax::Simple(token)
    }

    pub fn qualified(left: NameSyntax, right: NameSyntax) -> Self {
        NameSyntax::Qualified {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn alias_qualified(alias: NameSyntax, name: NameSyntax) -> Self {
        NameSyntax::AliasQualified {
            alias: Box::new(alias),
            name: Box::new(name),
        }
    }

    /// Byte span of the full spelling, from the leftmost part through the
    /// rightmost, including separators.
    pub fn span(&self) -> Span {
        match self {
            NameSyntax::Simple(token) => token.span,
            NameSyntax::Qualified { left, right } => left.span().to(right.span()),
            NameSyntax::AliasQualified { alias, name } => alias.span().to(name.span()),
        }
    }

    /// The simple name parts of this name, left to right.
    ///
    /// Qualified names contribute both sides recursively. Alias-qualified
    /// names contribute only the alias part.
    pub fn flatten(&self) -> Vec<&IdentToken> {
        let mut parts = Vec::new();
        self.collect(&mut parts);
        parts
    }

    fn collect<'a>(&'a self, parts: &mut Vec<&'a IdentToken>) {
        match self {
            NameSyntax::Simple(token) => parts.push(token),
            NameSyntax::Qualified { left, right } => {
                left.collect(parts);
                right.collect(parts);
            }
            NameSyntax::AliasQualified { alias, .. } => alias.collect(parts),
        }
    }
}
