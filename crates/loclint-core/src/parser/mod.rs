//! Parser module for C# declaration syntax
//!
//! Integrates the lexer and the recovering declaration parser into the
//! `ParsedFile` the analysis engine consumes.

use tracing::debug;

use crate::syntax::SyntaxTree;

mod grammar;
mod lexer;

pub use lexer::{Token, TokenKind, tokenize};

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub span_lo: u32,
    pub span_hi: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub filename: String,
    pub line_count: usize,
    pub has_errors: bool,
}

/// One parsed source file: the original text, its declaration tree, and any
/// parse errors recovered from. A tree is always produced, even for
/// malformed input.
pub struct ParsedFile {
    source: String,
    metadata: FileMetadata,
    tree: SyntaxTree,
    errors: Vec<ParseError>,
}

impl std::fmt::Debug for ParsedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedFile")
            .field("metadata", &self.metadata)
            .field("decl_count", &self.tree.len())
            .field("error_count", &self.errors.len())
            .finish()
    }
}

impl ParsedFile {
    pub fn from_source(filename: &str, source: &str) -> Self {
        let tokens = lexer::tokenize(source);
        let (tree, errors) = grammar::parse(source, tokens);

        debug!(
            "Parsed {}: {} declarations, {} errors",
            filename,
            tree.len(),
            errors.len()
        );

        let line_count = if source.is_empty() {
            0
        } else {
            source.lines().count()
        };

        let metadata = FileMetadata {
            filename: filename.to_string(),
            line_count,
            has_errors: !errors.is_empty(),
        };

        Self {
            source: source.to_string(),
            metadata,
            tree,
            errors,
        }
    }

    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Converts a byte offset to a 1-based (line, column) pair. Columns count
/// characters, not bytes.
pub(crate) fn offset_to_location(source: &str, offset: u32) -> (usize, usize) {
    let offset = (offset as usize).min(source.len());
    let prefix = source.get(..offset).unwrap_or(source);
    let line = prefix.matches('\n').count() + 1;
    let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = prefix[line_start..].chars().count() + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::DeclKind;

    fn outline(source: &str) -> Vec<String> {
        let file = ParsedFile::from_source("test.cs", source);
        assert!(
            file.errors().is_empty(),
            "expected a clean parse, got {:?}",
            file.errors()
        );
        describe_tree(&file)
    }

    fn describe_tree(file: &ParsedFile) -> Vec<String> {
        file.tree().iter().map(|node| describe(&node.kind)).collect()
    }

    fn describe(kind: &DeclKind) -> String {
        let join = |tokens: Vec<&crate::syntax::IdentToken>| {
            tokens
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(",")
        };
        match kind {
            DeclKind::Binding { designation } => format!("binding {}", join(designation.flatten())),
            DeclKind::Class { name } => format!("class {}", name.text),
            DeclKind::Delegate { name } => format!("delegate {}", name.text),
            DeclKind::Enum { name } => format!("enum {}", name.text),
            DeclKind::EnumMember { name } => format!("enum-member {}", name.text),
            DeclKind::Event { name } => format!("event {}", name.text),
            DeclKind::EventField { declarators } => {
                format!("event-field {}", join(declarators.iter().collect()))
            }
            DeclKind::Field { declarators } => {
                format!("field {}", join(declarators.iter().collect()))
            }
            DeclKind::Interface { name } => format!("interface {}", name.text),
            DeclKind::Local { declarators } => {
                format!("local {}", join(declarators.iter().collect()))
            }
            DeclKind::Method { name } => format!("method {}", name.text),
            DeclKind::Namespace { name } => format!("namespace {}", join(name.flatten())),
            DeclKind::Parameter { name } => format!("parameter {}", name.text),
            DeclKind::Property { name } => format!("property {}", name.text),
            DeclKind::Struct { name } => format!("struct {}", name.text),
        }
    }

    #[test]
    fn class_members_nest_under_their_type() {
        let source = r#"
            public class Person
            {
                private string name;
                public int Age { get; set; }
                public string Describe(int depth) { return name; }
            }
        "#;
        assert_eq!(
            outline(source),
            vec![
                "class Person",
                "field name",
                "property Age",
                "method Describe",
                "parameter depth",
            ]
        );
    }

    #[test]
    fn constructors_contribute_parameters_only() {
        let source = r#"
            class Widget
            {
                public Widget(int täst) { }
                static Widget() { }
            }
        "#;
        assert_eq!(outline(source), vec!["class Widget", "parameter täst"]);
    }

    #[test]
    fn indexers_contribute_parameters_only() {
        let source = r#"
            class Bag
            {
                public object this[string käy]
                {
                    get { return null; }
                    set { }
                }
            }
        "#;
        assert_eq!(outline(source), vec!["class Bag", "parameter käy"]);
    }

    #[test]
    fn block_namespace_encloses_its_types() {
        let source = r#"
            namespace Täst.Values
            {
                enum Color { Red, Green }
            }
        "#;
        let file = ParsedFile::from_source("test.cs", source);
        assert!(file.errors().is_empty());
        assert_eq!(
            describe_tree(&file),
            vec![
                "namespace Täst,Values",
                "enum Color",
                "enum-member Red",
                "enum-member Green",
            ]
        );
        let namespace_id = file.tree().roots()[0];
        let enum_node = file.tree().get(file.tree().get(namespace_id).children[0]);
        assert_eq!(enum_node.parent, Some(namespace_id));
    }

    #[test]
    fn file_scoped_namespace_encloses_the_rest_of_the_file() {
        let source = "namespace App.Core;\n\nclass First { }\nclass Second { }\n";
        let file = ParsedFile::from_source("test.cs", source);
        assert!(file.errors().is_empty());
        let tree = file.tree();
        assert_eq!(tree.roots().len(), 1);
        assert_eq!(tree.get(tree.roots()[0]).children.len(), 2);
    }

    #[test]
    fn alias_qualified_namespace_names_keep_only_the_alias() {
        assert_eq!(outline("namespace global::App { }"), vec!["namespace global"]);
        assert_eq!(
            outline("namespace global::App.Extras { }"),
            vec!["namespace global,Extras"]
        );
    }

    #[test]
    fn locals_and_out_declarations_are_collected() {
        let source = r#"
            class C
            {
                void M(string input)
                {
                    int a = 1, b = 2;
                    var täst = a;
                    int.TryParse(input, out var parsed);
                    int.TryParse(input, out int 직접);
                }
            }
        "#;
        assert_eq!(
            outline(source),
            vec![
                "class C",
                "method M",
                "parameter input",
                "local a,b",
                "local täst",
                "binding parsed",
                "binding 직접",
            ]
        );
    }

    #[test]
    fn loop_and_catch_variables_are_not_declaration_sites() {
        let source = r#"
            class C
            {
                void M(int[] items)
                {
                    for (int i = 0; i < items.Length; i++) { }
                    foreach (var item in items) { }
                    try { } catch (System.Exception oops) { }
                    using (var res = Open()) { }
                }
            }
        "#;
        assert_eq!(outline(source), vec!["class C", "method M", "parameter items"]);
    }

    #[test]
    fn lambda_parameters_are_recorded_in_both_forms() {
        let source = r#"
            class C
            {
                void M()
                {
                    Apply(täst => täst + 1);
                    Apply((object left, object right) => left);
                    Apply((a, b) => b);
                }
            }
        "#;
        assert_eq!(
            outline(source),
            vec![
                "class C",
                "method M",
                "parameter täst",
                "parameter left",
                "parameter right",
                "parameter a",
                "parameter b",
            ]
        );
    }

    #[test]
    fn is_patterns_bind_only_declaration_patterns() {
        let source = r#"
            class C
            {
                void M(object o)
                {
                    if (o is string täst) { }
                    if (o is var anything) { }
                    if (o is not null) { }
                    if (o is not int number) { }
                }
            }
        "#;
        assert_eq!(
            outline(source),
            vec![
                "class C",
                "method M",
                "parameter o",
                "binding täst",
                "binding number",
            ]
        );
    }

    #[test]
    fn case_declaration_patterns_bind() {
        let source = r#"
            class C
            {
                void M(object o)
                {
                    switch (o)
                    {
                        case string täst:
                            break;
                        case 42:
                            break;
                        default:
                            break;
                    }
                }
            }
        "#;
        assert_eq!(
            outline(source),
            vec!["class C", "method M", "parameter o", "binding täst"]
        );
    }

    #[test]
    fn switch_expression_arms_bind_declaration_patterns() {
        let source = r#"
            class C
            {
                void M(object o)
                {
                    var r = o switch
                    {
                        string täst => 1,
                        (int left, _) => 2,
                        not null => 3,
                        _ => 4,
                    };
                }
            }
        "#;
        assert_eq!(
            outline(source),
            vec![
                "class C",
                "method M",
                "parameter o",
                "binding täst",
                "binding left",
                "local r",
            ]
        );
    }

    #[test]
    fn deconstruction_declarations_bind_each_element() {
        let source = r#"
            class C
            {
                void M()
                {
                    var (x, (y, _)) = Source();
                    (int left, string right) = Pair();
                }
            }
        "#;
        assert_eq!(
            outline(source),
            vec![
                "class C",
                "method M",
                "binding x,y",
                "binding left",
                "binding right",
            ]
        );
    }

    #[test]
    fn event_declarations_take_both_forms() {
        let source = r#"
            class C
            {
                public event System.EventHandler Changed, Moved;
                public event System.EventHandler Closed
                {
                    add { }
                    remove { }
                }
            }
        "#;
        assert_eq!(
            outline(source),
            vec!["class C", "event-field Changed,Moved", "event Closed"]
        );
    }

    #[test]
    fn delegates_record_name_and_parameters() {
        assert_eq!(
            outline("public delegate void Handler(object sender, int value);"),
            vec!["delegate Handler", "parameter sender", "parameter value"]
        );
    }

    #[test]
    fn local_functions_record_parameters_but_not_their_name() {
        let source = r#"
            class C
            {
                void M()
                {
                    int Add(int löft, int right) { return löft + right; }
                    var total = Add(1, 2);
                }
            }
        "#;
        assert_eq!(
            outline(source),
            vec![
                "class C",
                "method M",
                "parameter löft",
                "parameter right",
                "local total",
            ]
        );
    }

    #[test]
    fn verbatim_identifiers_survive_with_their_marker() {
        let source = r#"
            class C
            {
                void M()
                {
                    var @var = 5;
                    string @class = "x";
                }
            }
        "#;
        assert_eq!(
            outline(source),
            vec!["class C", "method M", "local @var", "local @class"]
        );
    }

    #[test]
    fn malformed_input_records_errors_and_keeps_going() {
        let source = "class { } class Ok { int x; }";
        let file = ParsedFile::from_source("broken.cs", source);
        assert!(file.metadata().has_errors);
        assert!(!file.errors().is_empty());
        let descriptions = describe_tree(&file);
        assert!(descriptions.contains(&"class Ok".to_string()));
        assert!(descriptions.contains(&"field x".to_string()));
    }

    #[test]
    fn empty_source_parses_to_an_empty_tree() {
        let file = ParsedFile::from_source("empty.cs", "");
        assert!(file.tree().is_empty());
        assert!(file.errors().is_empty());
        assert_eq!(file.metadata().line_count, 0);
    }

    #[test]
    fn parse_error_locations_are_one_based() {
        let file = ParsedFile::from_source("bad.cs", "class Ok { }\n???\n");
        let error = &file.errors()[0];
        assert_eq!(error.line, 2);
        assert_eq!(error.column, 1);
    }

    #[test]
    fn offset_location_counts_characters_not_bytes() {
        let source = "class Ä { }\nclass B { }";
        // `class B` starts after a two-byte character on line 1
        let offset = source.find("B").map(|i| i as u32).unwrap_or(0);
        assert_eq!(offset_to_location(source, offset), (2, 7));
        assert_eq!(offset_to_location(source, 0), (1, 1));
    }
}
