//! Domain model for wxFormBuilder project trees.
//!
//! # Responsibility
//! - Define the canonical object/property/project shapes used by checks.
//! - Keep one immutable tree shape shared by reader, dump, and validator.
//!
//! # Invariants
//! - Child order is the positional insertion order the sizer will use.
//! - Nodes are never mutated after the project is built.

pub mod object;
