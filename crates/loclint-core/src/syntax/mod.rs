//! Syntax model for declaration analysis
//!
//! Declaration trees, compound names, binding designations, and the spans
//! and tokens they are made of.

pub mod designation;
pub mod name;
pub mod token;
pub mod tree;

pub use designation::Designation;
pub use name::NameSyntax;
pub use token::{IdentToken, Span};
pub use tree::{DeclId, DeclKind, DeclNode, SyntaxTree};
