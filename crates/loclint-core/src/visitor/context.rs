//! Shared context passed to visitors during declaration traversal.

use crate::parser::{ParsedFile, offset_to_location};
use crate::syntax::{DeclId, Span, SyntaxTree};

/// Read access to the file being traversed: its source text, its tree, and
/// position arithmetic over both.
pub struct VisitorContext<'a> {
    file: &'a ParsedFile,
}

impl<'a> VisitorContext<'a> {
    pub fn new(file: &'a ParsedFile) -> Self {
        Self { file }
    }

    pub fn file(&self) -> &ParsedFile {
        self.file
    }

    pub fn tree(&self) -> &SyntaxTree {
        self.file.tree()
    }

    /// (line, column) of the span start, both 1-based.
    pub fn span_to_location(&self, span: Span) -> (usize, usize) {
        offset_to_location(self.file.source(), span.lo)
    }

    /// (line, column) just past the span end, both 1-based.
    pub fn span_end_location(&self, span: Span) -> (usize, usize) {
        offset_to_location(self.file.source(), span.hi)
    }

    /// The source text a span covers, as spelled.
    pub fn source_text(&self, span: Span) -> Option<&str> {
        self.file.source().get(span.lo as usize..span.hi as usize)
    }

    /// Name of the declaration immediately enclosing `id`, when that
    /// declaration has a single identifying name of its own.
    pub fn enclosing_name(&self, id: DeclId) -> Option<&str> {
        self.tree()
            .parent(id)
            .and_then(|node| node.kind.name_token())
            .map(|token| token.text.as_str())
    }
}
