//! Lexical analysis module for the expression engine.
//!
//! This module contains the lexer (tokenizer) that converts expression
//! source text into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of expression text using regex patterns
//! - Recognition of literals, fields, constants, operators and identifiers
//! - Configurable string and identifier delimiters
//! - Token position tracking for error reporting
//! - The navigable, copyable token stream used for speculative parsing

pub mod lexer;
pub mod stream;
pub mod tokens;

#[cfg(test)]
mod tests;
