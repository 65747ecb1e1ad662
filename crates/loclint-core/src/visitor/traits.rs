//! Visitor trait for declaration traversal.

use std::ops::ControlFlow;

use super::context::VisitorContext;
use crate::syntax::{DeclId, Designation, IdentToken, NameSyntax};

/// One callback per declaration category. Every callback defaults to
/// continuing the walk, so visitors implement only the categories they care
/// about. Returning `ControlFlow::Break(())` stops the whole traversal.
pub trait DeclVisitor {
    fn visit_binding(
        &mut self,
        _id: DeclId,
        _designation: &Designation,
        _ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_class(
        &mut self,
        _id: DeclId,
        _name: &IdentToken,
        _ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_delegate(
        &mut self,
        _id: DeclId,
        _name: &IdentToken,
        _ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_enum(
        &mut self,
        _id: DeclId,
        _name: &IdentToken,
        _ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_enum_member(
        &mut self,
        _id: DeclId,
        _name: &IdentToken,
        _ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_event(
        &mut self,
        _id: DeclId,
        _name: &IdentToken,
        _ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_event_field(
        &mut self,
        _id: DeclId,
        _declarators: &[IdentToken],
        _ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_field(
        &mut self,
        _id: DeclId,
        _declarators: &[IdentToken],
        _ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_interface(
        &mut self,
        _id: DeclId,
        _name: &IdentToken,
        _ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_local(
        &mut self,
        _id: DeclId,
        _declarators: &[IdentToken],
        _ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_method(
        &mut self,
        _id: DeclId,
        _name: &IdentToken,
        _ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_namespace(
        &mut self,
        _id: DeclId,
        _name: &NameSyntax,
        _ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_parameter(
        &mut self,
        _id: DeclId,
        _name: &IdentToken,
        _ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_property(
        &mut self,
        _id: DeclId,
        _name: &IdentToken,
        _ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_struct(
        &mut self,
        _id: DeclId,
        _name: &IdentToken,
        _ctx: &VisitorContext,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}
