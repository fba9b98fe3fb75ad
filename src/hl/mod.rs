//! High-level, safe interface.
pub mod tree;
