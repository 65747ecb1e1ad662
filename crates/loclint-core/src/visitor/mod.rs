//! Visitor pattern for declaration-tree traversal
//!
//! Dispatches every node of a declaration tree to the matching `DeclVisitor`
//! callback, depth first in source order.

mod context;
mod traits;

pub use context::VisitorContext;
pub use traits::DeclVisitor;

use std::ops::ControlFlow;

use crate::syntax::{DeclId, DeclKind, SyntaxTree};

/// Walks `tree` depth first, dispatching each node by category. The match
/// below is the single place where categories fan out to callbacks; a new
/// `DeclKind` variant will not compile until it dispatches here.
pub fn walk_tree<V: DeclVisitor>(tree: &SyntaxTree, visitor: &mut V, ctx: &VisitorContext) {
    let mut walker = Walker {
        visitor,
        ctx,
        stopped: false,
    };
    for &root in tree.roots() {
        walker.walk(tree, root);
        if walker.stopped {
            break;
        }
    }
}

struct Walker<'a, V: DeclVisitor> {
    visitor: &'a mut V,
    ctx: &'a VisitorContext<'a>,
    stopped: bool,
}

impl<V: DeclVisitor> Walker<'_, V> {
    fn walk(&mut self, tree: &SyntaxTree, id: DeclId) {
        if self.stopped {
            return;
        }
        let node = tree.get(id);
        let flow = match &node.kind {
            DeclKind::Binding { designation } => self.visitor.visit_binding(id, designation, self.ctx),
            DeclKind::Class { name } => self.visitor.visit_class(id, name, self.ctx),
            DeclKind::Delegate { name } => self.visitor.visit_delegate(id, name, self.ctx),
            DeclKind::Enum { name } => self.visitor.visit_enum(id, name, self.ctx),
            DeclKind::EnumMember { name } => self.visitor.visit_enum_member(id, name, self.ctx),
            DeclKind::Event { name } => self.visitor.visit_event(id, name, self.ctx),
            DeclKind::EventField { declarators } => {
                self.visitor.visit_event_field(id, declarators, self.ctx)
            }
            DeclKind::Field { declarators } => self.visitor.visit_field(id, declarators, self.ctx),
            DeclKind::Interface { name } => self.visitor.visit_interface(id, name, self.ctx),
            DeclKind::Local { declarators } => self.visitor.visit_local(id, declarators, self.ctx),
            DeclKind::Method { name } => self.visitor.visit_method(id, name, self.ctx),
            DeclKind::Namespace { name } => self.visitor.visit_namespace(id, name, self.ctx),
            DeclKind::Parameter { name } => self.visitor.visit_parameter(id, name, self.ctx),
            DeclKind::Property { name } => self.visitor.visit_property(id, name, self.ctx),
            DeclKind::Struct { name } => self.visitor.visit_struct(id, name, self.ctx),
        };
        if let ControlFlow::Break(()) = flow {
            self.stopped = true;
            return;
        }
        for &child in &node.children {
            self.walk(tree, child);
            if self.stopped {
                return;
            }
        }
    }
}
