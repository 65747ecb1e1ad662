//! Diagnostic reporting for analysis results
//!
//! Structured findings produced by rules, and the sink that accumulates them
//! during a traversal.

use serde::{Deserialize, Serialize};

use crate::rules::Severity;

/// A single finding, positioned by 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl Diagnostic {
    /// Builds a diagnostic spanning a single point; callers widen it with
    /// [`Diagnostic::with_end`].
    pub fn new(
        rule_id: &str,
        severity: Severity,
        message: &str,
        file: &str,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity,
            message: message.to_string(),
            file: file.to_string(),
            line,
            column,
            end_line: line,
            end_column: column,
        }
    }

    pub fn with_end(mut self, line: usize, column: usize) -> Self {
        self.end_line = line;
        self.end_column = column;
        self
    }
}

/// Accumulates diagnostics in report order during one rule run.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_diagnostic_spans_a_point_until_widened() {
        let d = Diagnostic::new("LC1000", Severity::Warning, "msg", "a.cs", 3, 7);
        assert_eq!((d.end_line, d.end_column), (3, 7));
        let d = d.with_end(3, 12);
        assert_eq!((d.line, d.column), (3, 7));
        assert_eq!((d.end_line, d.end_column), (3, 12));
    }

    #[test]
    fn sink_keeps_report_order() {
        let mut sink = DiagnosticSink::new();
        assert!(sink.is_empty());
        sink.report(Diagnostic::new("LC1000", Severity::Warning, "first", "a.cs", 1, 1));
        sink.report(Diagnostic::new("LC1000", Severity::Warning, "second", "a.cs", 2, 1));
        assert_eq!(sink.len(), 2);
        let messages: Vec<String> = sink
            .into_diagnostics()
            .into_iter()
            .map(|d| d.message)
            .collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
