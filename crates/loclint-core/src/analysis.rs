//! Analysis engine for declaration analysis and diagnostic generation
//!
//! Provides the per-file entry point for host integrations.

use tracing::debug;

use crate::config::Config;
use crate::diagnostic::Diagnostic;
use crate::parser::ParsedFile;
use crate::rules::RuleRegistry;
use crate::rules::naming::NonAsciiIdentifier;

pub struct AnalysisEngine {
    registry: RuleRegistry,
}

impl AnalysisEngine {
    pub fn new() -> Self {
        Self {
            registry: create_default_registry(),
        }
    }

    pub fn with_config(config: &Config) -> Self {
        let mut registry = create_default_registry();
        registry.configure(&config.rules);
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn analyze(&self, file: &ParsedFile) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for error in file.errors() {
            diagnostics.push(Diagnostic::new(
                "PARSE",
                crate::rules::Severity::Error,
                &error.message,
                &file.metadata().filename,
                error.line,
                error.column,
            ));
        }

        diagnostics.extend(self.registry.run_all(file));

        debug!(
            "Analyzed {}: {} diagnostics",
            file.metadata().filename,
            diagnostics.len()
        );

        diagnostics
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn create_default_registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();

    registry.register(Box::new(NonAsciiIdentifier::new()));

    registry
}
