//! Naming rules for declared identifiers

pub mod non_ascii_identifier;

pub use non_ascii_identifier::NonAsciiIdentifier;
