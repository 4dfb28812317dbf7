//! Error types and error handling for the expression engine.
//!
//! This module defines the error types used throughout tokenization and
//! parsing. It includes:
//!
//! - Error structures with source position information
//! - Lexical error variants (bad escapes, bad delimiter configuration)
//! - Syntax error variants (unexpected tokens, exhausted grammars)
//! - Stream usage errors (operating on an unopened or closed stream)
//! - Error formatting and display functionality

pub mod errors;
