//! Core analysis library for loclint
//!
//! loclint reads C# source text, builds a declaration-level syntax tree, and
//! reports identifiers that are spelled outside the ASCII alphabet. Only
//! declaration sites are inspected; uses of an identifier are never flagged.
//!
//! # Example
//!
//! ```
//! use loclint_core::analysis::AnalysisEngine;
//! use loclint_core::parser::ParsedFile;
//!
//! let file = ParsedFile::from_source("demo.cs", "class Stück { }");
//! let diagnostics = AnalysisEngine::new().analyze(&file);
//!
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(
//!     diagnostics[0].message,
//!     "Class Stück contains non ASCII characters in its identifier."
//! );
//! ```

pub mod analysis;
pub mod config;
pub mod diagnostic;
pub mod parser;
pub mod rules;
pub mod syntax;
pub mod visitor;
