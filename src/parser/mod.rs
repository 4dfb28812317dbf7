//! Parser module for the three expression grammars.
//!
//! This module contains the grammar-driven recursive-descent parsers that
//! transform a token stream into a pruned syntax tree. It handles:
//!
//! - The parse lifecycle (stream opening, end-token verification, pruning)
//! - Speculative sub-parses on private stream copies for disambiguation
//! - Arithmetic productions (precedence ladder, qualified fields, calls)
//! - Boolean/relational productions
//! - The flat text-template production
//!
//! Grammar productions are free functions over `&mut Parser`, one per
//! production rule.

pub mod arith;
pub mod boolean;
pub mod parser;
pub mod text;
