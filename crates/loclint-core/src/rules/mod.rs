//! Rule system for declaration analysis
//!
//! Provides naming rules for analyzing C# declaration syntax.

pub mod helpers;
pub mod naming;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::diagnostic::Diagnostic;
use crate::parser::ParsedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    Naming,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: RuleCategory,
    pub severity: Severity,
    pub examples: Option<&'static str>,
}

pub trait Rule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;
    fn check(&self, file: &ParsedFile) -> Vec<Diagnostic>;
}

pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    disabled_rules: HashSet<String>,
    severity_overrides: HashMap<String, Severity>,
    naming_enabled: bool,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            disabled_rules: HashSet::new(),
            severity_overrides: HashMap::new(),
            naming_enabled: true,
        }
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn configure(&mut self, config: &RulesConfig) {
        self.disabled_rules.clear();
        self.severity_overrides.clear();

        for rule_ref in &config.disabled {
            self.disabled_rules.insert(rule_ref.clone());
        }

        for (rule_ref, severity_value) in &config.severity {
            self.severity_overrides
                .insert(rule_ref.clone(), (*severity_value).into());
        }

        self.naming_enabled = config.naming.unwrap_or(true);
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn run_all(&self, file: &ParsedFile) -> Vec<Diagnostic> {
        self.rules
            .iter()
            .filter(|rule| self.should_run_rule(rule.as_ref()))
            .flat_map(|rule| {
                let mut diagnostics = rule.check(file);
                self.apply_severity_overrides(rule.as_ref(), &mut diagnostics);
                diagnostics
            })
            .collect()
    }

    fn should_run_rule(&self, rule: &dyn Rule) -> bool {
        let metadata = rule.metadata();

        if !self.naming_enabled && metadata.category == RuleCategory::Naming {
            return false;
        }

        !self.is_rule_disabled(metadata)
    }

    fn is_rule_disabled(&self, metadata: &RuleMetadata) -> bool {
        self.disabled_rules.contains(metadata.id) || self.disabled_rules.contains(metadata.name)
    }

    fn apply_severity_overrides(&self, rule: &dyn Rule, diagnostics: &mut [Diagnostic]) {
        let metadata = rule.metadata();

        let override_severity = self
            .severity_overrides
            .get(metadata.id)
            .or_else(|| self.severity_overrides.get(metadata.name));

        if let Some(severity) = override_severity {
            for diag in diagnostics.iter_mut() {
                diag.severity = *severity;
            }
        }
    }

    pub fn is_rule_enabled(&self, id_or_name: &str) -> bool {
        if let Some(rule) = self
            .get_rule(id_or_name)
            .or_else(|| self.get_rule_by_name(id_or_name))
        {
            self.should_run_rule(rule)
        } else {
            false
        }
    }

    pub fn get_rule(&self, id: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.metadata().id == id)
            .map(|r| r.as_ref())
    }

    pub fn get_rule_by_name(&self, name: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.metadata().name == name)
            .map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[macro_export]
macro_rules! declare_rule {
    (
        $name:ident,
        id = $id:literal,
        name = $rule_name:literal,
        description = $desc:literal,
        category = $cat:ident,
        severity = $sev:ident
        $(, examples = $examples:literal)?
    ) => {
        pub struct $name {
            metadata: $crate::rules::RuleMetadata,
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    metadata: $crate::rules::RuleMetadata {
                        id: $id,
                        name: $rule_name,
                        description: $desc,
                        category: $crate::rules::RuleCategory::$cat,
                        severity: $crate::rules::Severity::$sev,
                        examples: declare_rule!(@examples $($examples)?),
                    },
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
    (@examples $examples:literal) => { Some($examples) };
    (@examples) => { None };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRule {
        metadata: RuleMetadata,
        diagnostics_to_return: Vec<Diagnostic>,
    }

    impl TestRule {
        fn new(id: &'static str) -> Self {
            Self {
                metadata: RuleMetadata {
                    id,
                    name: "test-rule",
                    description: "A test rule",
                    category: RuleCategory::Naming,
                    severity: Severity::Warning,
                    examples: None,
                },
                diagnostics_to_return: Vec::new(),
            }
        }

        fn with_name(mut self, name: &'static str) -> Self {
            self.metadata.name = name;
            self
        }

        fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
            self.diagnostics_to_return.push(diagnostic);
            self
        }
    }

    impl Rule for TestRule {
        fn metadata(&self) -> &RuleMetadata {
            &self.metadata
        }

        fn check(&self, _file: &ParsedFile) -> Vec<Diagnostic> {
            self.diagnostics_to_return.clone()
        }
    }

    fn empty_file() -> ParsedFile {
        ParsedFile::from_source("test.cs", "")
    }

    #[test]
    fn rule_has_required_metadata() {
        let rule = TestRule::new("T001");
        let metadata = rule.metadata();
        assert_eq!(metadata.id, "T001");
        assert_eq!(metadata.name, "test-rule");
        assert_eq!(metadata.category, RuleCategory::Naming);
        assert_eq!(metadata.severity, Severity::Warning);
    }

    #[test]
    fn registry_registers_and_finds_rules() {
        let mut registry = RuleRegistry::new();
        assert!(registry.is_empty());

        registry.register(Box::new(TestRule::new("T001")));
        registry.register(Box::new(TestRule::new("T002").with_name("second-rule")));

        assert_eq!(registry.len(), 2);
        assert!(registry.get_rule("T001").is_some());
        assert!(registry.get_rule("T003").is_none());
        assert!(registry.get_rule_by_name("second-rule").is_some());
    }

    #[test]
    fn run_all_aggregates_diagnostics_from_every_rule() {
        let mut registry = RuleRegistry::new();
        let diag1 = Diagnostic::new("T001", Severity::Warning, "Issue 1", "test.cs", 1, 1);
        let diag2 = Diagnostic::new("T002", Severity::Error, "Issue 2", "test.cs", 2, 1);
        registry.register(Box::new(TestRule::new("T001").with_diagnostic(diag1)));
        registry.register(Box::new(
            TestRule::new("T002")
                .with_name("other")
                .with_diagnostic(diag2),
        ));

        let diagnostics = registry.run_all(&empty_file());

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].message, "Issue 1");
        assert_eq!(diagnostics[1].message, "Issue 2");
    }

    #[test]
    fn disabling_by_id_or_name_skips_the_rule() {
        let mut registry = RuleRegistry::new();
        let diag = Diagnostic::new("T001", Severity::Warning, "Issue", "test.cs", 1, 1);
        registry.register(Box::new(TestRule::new("T001").with_diagnostic(diag)));

        let config = RulesConfig {
            disabled: vec!["T001".to_string()],
            ..Default::default()
        };
        registry.configure(&config);
        assert!(registry.run_all(&empty_file()).is_empty());
        assert!(!registry.is_rule_enabled("T001"));

        let config = RulesConfig {
            disabled: vec!["test-rule".to_string()],
            ..Default::default()
        };
        registry.configure(&config);
        assert!(registry.run_all(&empty_file()).is_empty());
    }

    #[test]
    fn reconfiguring_clears_previous_disables() {
        let mut registry = RuleRegistry::new();
        let diag = Diagnostic::new("T001", Severity::Warning, "Issue", "test.cs", 1, 1);
        registry.register(Box::new(TestRule::new("T001").with_diagnostic(diag)));

        let config = RulesConfig {
            disabled: vec!["T001".to_string()],
            ..Default::default()
        };
        registry.configure(&config);
        assert!(registry.run_all(&empty_file()).is_empty());

        registry.configure(&RulesConfig::default());
        assert_eq!(registry.run_all(&empty_file()).len(), 1);
    }

    #[test]
    fn severity_overrides_apply_by_id_and_name() {
        let mut registry = RuleRegistry::new();
        let diag = Diagnostic::new("T001", Severity::Warning, "Issue", "test.cs", 1, 1);
        registry.register(Box::new(TestRule::new("T001").with_diagnostic(diag)));

        let mut severity_overrides = HashMap::new();
        severity_overrides.insert("T001".to_string(), crate::config::SeverityValue::Error);
        let config = RulesConfig {
            severity: severity_overrides,
            ..Default::default()
        };
        registry.configure(&config);
        let diagnostics = registry.run_all(&empty_file());
        assert_eq!(diagnostics[0].severity, Severity::Error);

        let mut severity_overrides = HashMap::new();
        severity_overrides.insert("test-rule".to_string(), crate::config::SeverityValue::Hint);
        let config = RulesConfig {
            severity: severity_overrides,
            ..Default::default()
        };
        registry.configure(&config);
        let diagnostics = registry.run_all(&empty_file());
        assert_eq!(diagnostics[0].severity, Severity::Hint);
    }

    #[test]
    fn naming_toggle_disables_the_whole_category() {
        let mut registry = RuleRegistry::new();
        let diag = Diagnostic::new("T001", Severity::Warning, "Issue", "test.cs", 1, 1);
        registry.register(Box::new(TestRule::new("T001").with_diagnostic(diag)));

        let config = RulesConfig {
            naming: Some(false),
            ..Default::default()
        };
        registry.configure(&config);

        assert!(registry.run_all(&empty_file()).is_empty());
        assert!(!registry.is_rule_enabled("T001"));
    }

    #[test]
    fn rules_iterator_walks_registered_rules() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(TestRule::new("T001")));
        registry.register(Box::new(TestRule::new("T002").with_name("other")));

        let ids: Vec<&str> = registry.rules().map(|r| r.metadata().id).collect();
        assert_eq!(ids, vec!["T001", "T002"]);
    }

    #[test]
    fn severity_variants_are_distinct() {
        let _error = Severity::Error;
        let _warning = Severity::Warning;
        let _info = Severity::Info;
        let _hint = Severity::Hint;
        assert_ne!(Severity::Error, Severity::Warning);
    }
}
