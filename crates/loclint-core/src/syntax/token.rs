//! Spans and identifier tokens, the atoms of the declaration model.

/// Half-open byte range into the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub lo: u32,
    pub hi: u32,
}

impl Span {
    pub fn new(lo: u32, hi: u32) -> Self {
        Span { lo, hi }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.lo.min(other.lo), self.hi.max(other.hi))
    }

    pub fn len(&self) -> usize {
        (self.hi - self.lo) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.lo == self.hi
    }
}

/// An identifier exactly as spelled in the source, including any leading
/// `@` escape marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentToken {
    pub text: String,
    pub span: Span,
}

impl IdentToken {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        IdentToken {
            text: text.into(),
            span,
        }
    }
}
