//! Arena-backed declaration tree.
//!
//! The parser lowers a source file into this tree: one node per declaration
//! site, parented by the immediately enclosing declaration. Rules walk the
//! tree instead of re-discovering declarations in raw syntax.

use id_arena::{Arena, Id};

use super::designation::Designation;
use super::name::NameSyntax;
use super::token::IdentToken;

pub type DeclId = Id<DeclNode>;

/// The closed set of declaration categories the analyzer recognizes.
///
/// Multi-declarator statements (`int a, b;`) stay one node carrying all of
/// their declarators, matching how the source groups them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    /// A variable bound by a deconstruction, pattern match, or `out`
    /// declaration.
    Binding { designation: Designation },
    Class { name: IdentToken },
    Delegate { name: IdentToken },
    Enum { name: IdentToken },
    EnumMember { name: IdentToken },
    /// An event with accessors, e.g. `event D Changed { add {} remove {} }`.
    Event { name: IdentToken },
    /// A field-like event, e.g. `event D Changed, Moved;`.
    EventField { declarators: Vec<IdentToken> },
    Field { declarators: Vec<IdentToken> },
    Interface { name: IdentToken },
    Local { declarators: Vec<IdentToken> },
    Method { name: IdentToken },
    Namespace { name: NameSyntax },
    Parameter { name: IdentToken },
    Property { name: IdentToken },
    Struct { name: IdentToken },
}

impl DeclKind {
    /// The single name token identifying this declaration, for the kinds
    /// that have exactly one. Declarator lists, designations, and compound
    /// namespace names have no single identifying token.
    pub fn name_token(&self) -> Option<&IdentToken> {
        match self {
            DeclKind::Class { name }
            | DeclKind::Delegate { name }
            | DeclKind::Enum { name }
            | DeclKind::EnumMember { name }
            | DeclKind::Event { name }
            | DeclKind::Interface { name }
            | DeclKind::Method { name }
            | DeclKind::Parameter { name }
            | DeclKind::Property { name }
            | DeclKind::Struct { name } => Some(name),
            DeclKind::Binding { .. }
            | DeclKind::EventField { .. }
            | DeclKind::Field { .. }
            | DeclKind::Local { .. }
            | DeclKind::Namespace { .. } => None,
        }
    }
}

#[derive(Debug)]
pub struct DeclNode {
    pub id: DeclId,
    pub kind: DeclKind,
    pub parent: Option<DeclId>,
    pub children: Vec<DeclId>,
}

/// All declaration sites of one file, in an arena keyed by `DeclId`.
#[derive(Debug, Default)]
pub struct SyntaxTree {
    arena: Arena<DeclNode>,
    roots: Vec<DeclId>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        SyntaxTree {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    /// Allocates a node and wires it to its parent, or records it as a root
    /// when it has none.
    pub fn alloc(&mut self, kind: DeclKind, parent: Option<DeclId>) -> DeclId {
        let id = self.arena.alloc_with_id(|id| DeclNode {
            id,
            kind,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent_id) => self.arena[parent_id].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn get(&self, id: DeclId) -> &DeclNode {
        &self.arena[id]
    }

    /// The parent node, if this node has one.
    pub fn parent(&self, id: DeclId) -> Option<&DeclNode> {
        self.arena[id].parent.map(|parent_id| &self.arena[parent_id])
    }

    pub fn roots(&self) -> &[DeclId] {
        &self.roots
    }

    /// All nodes in allocation order, which is also source order for a tree
    /// built by a single forward parse.
    pub fn iter(&self) -> impl Iterator<Item = &DeclNode> {
        self.arena.iter().map(|(_, node)| node)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }
}
