//! AST (abstract syntax tree) module.
//!
//! Contains the arena-backed syntax tree produced by the parsers:
//!
//! - tree: node arena, child/parent wiring, pruning
//! - printer: indented debug rendering of a tree
pub mod printer;
pub mod tree;

#[cfg(test)]
mod tests;
