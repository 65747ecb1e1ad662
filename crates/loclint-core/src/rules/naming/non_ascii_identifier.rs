//! non-ascii-identifier rule (LC1000): flags declared identifiers spelled
//! outside the ASCII identifier alphabet.
//!
//! Each diagnostic names the declaration site the way a reader would
//! ("Method Printer.Wrïte", "Parameter täst", "Namespace Füo.Bar") and
//! points at the offending identifier token. Identifier uses are never
//! flagged, only declarations.

use std::ops::ControlFlow;

use crate::declare_rule;
use crate::diagnostic::{Diagnostic, DiagnosticSink};
use crate::parser::ParsedFile;
use crate::rules::helpers::is_legal_ascii_identifier;
use crate::rules::{Rule, RuleMetadata, Severity};
use crate::syntax::{DeclId, Designation, IdentToken, NameSyntax};
use crate::visitor::{DeclVisitor, VisitorContext, walk_tree};

declare_rule!(
    NonAsciiIdentifier,
    id = "LC1000",
    name = "non-ascii-identifier",
    description = "Ensures that all declared identifiers contain only ASCII characters",
    category = Naming,
    severity = Warning,
    examples = "// Bad\nclass Stück { }\n\n// Good\nclass Stueck { }"
);

impl Rule for NonAsciiIdentifier {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, file: &ParsedFile) -> Vec<Diagnostic> {
        let ctx = VisitorContext::new(file);
        let mut visitor = DeclarationSites {
            sink: DiagnosticSink::new(),
            file_path: file.metadata().filename.clone(),
        };
        walk_tree(file.tree(), &mut visitor, &ctx);
        visitor.sink.into_diagnostics()
    }
}

/// Label for sites described by their own name alone.
fn site_label(category: &str, name: &str) -> String {
    format!("{category} {name}")
}

/// Label for member sites, qualified by the immediately enclosing
/// declaration. A member whose encloser carries no single name renders an
/// empty segment instead of failing.
fn member_label(category: &str, enclosing: Option<&str>, name: &str) -> String {
    format!("{category} {}.{name}", enclosing.unwrap_or(""))
}

struct DeclarationSites {
    sink: DiagnosticSink,
    file_path: String,
}

impl DeclarationSites {
    /// Reports `token` under the given label when its spelling is illegal.
    /// The label is only rendered for offenders.
    fn check_token(
        &mut self,
        token: &IdentToken,
        label: impl FnOnce() -> String,
        ctx: &VisitorContext,
    ) {
        if is_legal_ascii_identifier(&token.text) {
            return;
        }
        let (line, column) = ctx.span_to_location(token.span);
        let (end_line, end_column) = ctx.span_end_location(token.span);
        self.sink.report(
            Diagnostic::new(
                "LC1000",
                Severity::Warning,
                &format!("{} contains non ASCII characters in its identifier.", label()),
                &self.file_path,
                line,
                column,
            )
            .with_end(end_line, end_column),
        );
    }
}

impl DeclVisitor for DeclarationSites {
    fn visit_binding(
        &mut self,
        _id: DeclId,
        designation: &Designation,
        ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        for token in designation.flatten() {
            self.check_token(token, || site_label("Variable", &token.text), ctx);
        }
        ControlFlow::Continue(())
    }

    fn visit_class(&mut self, _id: DeclId, name: &IdentToken, ctx: &VisitorContext) -> ControlFlow<()> {
        self.check_token(name, || site_label("Class", &name.text), ctx);
        ControlFlow::Continue(())
    }

    fn visit_delegate(
        &mut self,
        _id: DeclId,
        name: &IdentToken,
        ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        self.check_token(name, || site_label("Delegate", &name.text), ctx);
        ControlFlow::Continue(())
    }

    fn visit_enum(&mut self, _id: DeclId, name: &IdentToken, ctx: &VisitorContext) -> ControlFlow<()> {
        self.check_token(name, || site_label("Enum", &name.text), ctx);
        ControlFlow::Continue(())
    }

    fn visit_enum_member(
        &mut self,
        id: DeclId,
        name: &IdentToken,
        ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        let enclosing = ctx.enclosing_name(id);
        self.check_token(name, || member_label("Enum value", enclosing, &name.text), ctx);
        ControlFlow::Continue(())
    }

    fn visit_event(&mut self, id: DeclId, name: &IdentToken, ctx: &VisitorContext) -> ControlFlow<()> {
        let enclosing = ctx.enclosing_name(id);
        self.check_token(name, || member_label("Event", enclosing, &name.text), ctx);
        ControlFlow::Continue(())
    }

    fn visit_event_field(
        &mut self,
        id: DeclId,
        declarators: &[IdentToken],
        ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        let enclosing = ctx.enclosing_name(id);
        for token in declarators {
            self.check_token(token, || member_label("Event", enclosing, &token.text), ctx);
        }
        ControlFlow::Continue(())
    }

    fn visit_field(
        &mut self,
        id: DeclId,
        declarators: &[IdentToken],
        ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        let enclosing = ctx.enclosing_name(id);
        for token in declarators {
            self.check_token(token, || member_label("Field", enclosing, &token.text), ctx);
        }
        ControlFlow::Continue(())
    }

    fn visit_interface(
        &mut self,
        _id: DeclId,
        name: &IdentToken,
        ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        self.check_token(name, || site_label("Interface", &name.text), ctx);
        ControlFlow::Continue(())
    }

    fn visit_local(
        &mut self,
        _id: DeclId,
        declarators: &[IdentToken],
        ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        for token in declarators {
            self.check_token(token, || site_label("Variable", &token.text), ctx);
        }
        ControlFlow::Continue(())
    }

    fn visit_method(&mut self, id: DeclId, name: &IdentToken, ctx: &VisitorContext) -> ControlFlow<()> {
        let enclosing = ctx.enclosing_name(id);
        self.check_token(name, || member_label("Method", enclosing, &name.text), ctx);
        ControlFlow::Continue(())
    }

    fn visit_namespace(
        &mut self,
        _id: DeclId,
        name: &NameSyntax,
        ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        // one label for the whole spelled name, one diagnostic per
        // offending part
        let full = ctx.source_text(name.span()).unwrap_or("");
        for token in name.flatten() {
            self.check_token(token, || site_label("Namespace", full), ctx);
        }
        ControlFlow::Continue(())
    }

    fn visit_parameter(
        &mut self,
        _id: DeclId,
        name: &IdentToken,
        ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        self.check_token(name, || site_label("Parameter", &name.text), ctx);
        ControlFlow::Continue(())
    }

    fn visit_property(
        &mut self,
        id: DeclId,
        name: &IdentToken,
        ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        let enclosing = ctx.enclosing_name(id);
        self.check_token(name, || member_label("Property", enclosing, &name.text), ctx);
        ControlFlow::Continue(())
    }

    fn visit_struct(&mut self, _id: DeclId, name: &IdentToken, ctx: &VisitorContext) -> ControlFlow<()> {
        self.check_token(name, || site_label("Struct", &name.text), ctx);
        ControlFlow::Continue(())
    }
}
