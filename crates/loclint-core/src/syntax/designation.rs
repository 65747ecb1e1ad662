//! Variable designations for deconstruction and pattern bindings.

use super::token::{IdentToken, Span};

/// The binding shape on the left of a deconstruction or inside an `out`/`is`
/// declaration. Mirrors how such bindings nest in source: a designation is a
/// discard, a single name, or a parenthesized list of designations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Designation {
    /// `_` — binds nothing and declares nothing.
    Discard(Span),
    /// A plain identifier binding one variable.
    Single(IdentToken),
    /// `(a, (b, _))` — nested designations, one per tuple element.
    Parenthesized(Vec<Designation>),
}

impl Designation {
    /// Every identifier this designation declares, in source order.
    /// Discards contribute nothing at any depth.
    pub fn flatten(&self) -> Vec<&IdentToken> {
        let mut tokens = Vec::new();
        self.collect(&mut tokens);
        tokens
    }

    fn collect<'a>(&'a self, tokens: &mut Vec<&'a IdentToken>) {
        match self {
            Designation::Discard(_) => {}
            Designation::Single(token) => tokens.push(token),
            Designation::Parenthesized(children) => {
                for child in children {
                    child.collect(tokens);
                }
            }
        }
    }
}
