//! Text-template grammar.
//!
//! A text expression is a flat sequence of segments: literal runs of
//! source text and embedded Field/Constant references. There is no
//! nesting and no precedence. References are found by re-scanning the
//! raw source: token boundaries carry no meaning inside a template, so
//! an apostrophe in prose cannot open a string literal that swallows a
//! `#field` or `$constant` standing between two of them.

use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    ast::tree::{NodeId, NodeKind},
    errors::errors::Error,
    lexer::{
        lexer::strip_braces,
        tokens::{Token, TokenKind},
    },
    Position, Span,
};

use super::parser::Parser;

lazy_static! {
    /// `$name`, `${...}`, `#name`, `group#name`, `#{...}` — the same
    /// shapes the lexer recognizes for Constant and Field tokens.
    static ref REFERENCE: Regex = Regex::new(
        "\\$(\\{[^}]*\\}|[a-zA-Z_][a-zA-Z0-9_]*)|([a-zA-Z_][a-zA-Z0-9_]*)?#(\\{[^}]*\\}|[a-zA-Z_][a-zA-Z0-9_]*)",
    )
    .unwrap();
}

pub fn parse_text_expression(parser: &mut Parser) -> Result<NodeId, Error> {
    let node = parser.tree.alloc(NodeKind::TextExpression, true);
    let source = parser.source().to_string();
    let chars: Vec<char> = source.chars().collect();
    let source_name = parser.stream.source_name();

    let mut run_start: usize = 0;
    for found in REFERENCE.find_iter(&source) {
        let start = source[..found.start()].chars().count();
        if start > run_start {
            let leaf = literal_leaf(parser, &chars, &source_name, run_start, start);
            parser.tree.add_child(node, leaf);
        }

        let leaf = reference_leaf(parser, found.as_str(), &source_name, start);
        parser.tree.add_child(node, leaf);
        run_start = start + found.as_str().chars().count();
    }

    if run_start < chars.len() {
        let leaf = literal_leaf(parser, &chars, &source_name, run_start, chars.len());
        parser.tree.add_child(node, leaf);
    }

    // The whole text is one production; leave the cursor on the sentinel.
    let end = parser.stream.len() - 1;
    parser.stream.move_to(end)?;

    Ok(node)
}

/// Builds a synthetic String token covering `start..end` of the raw
/// source and wraps it in a leaf.
fn literal_leaf(
    parser: &mut Parser,
    source: &[char],
    source_name: &Rc<String>,
    start: usize,
    end: usize,
) -> NodeId {
    let run: String = source[start..end].iter().collect();
    let token = Token {
        kind: TokenKind::String,
        value: run.clone(),
        source_text: run,
        span: Span {
            start: Position(start as u32, Rc::clone(source_name)),
            end: Position((end - 1) as u32, Rc::clone(source_name)),
        },
        tag: None,
    };
    parser.tree.leaf(token)
}

/// Classifies a scanned reference and wraps it in a leaf whose token
/// matches what the lexer emits for the same text.
fn reference_leaf(
    parser: &mut Parser,
    text: &str,
    source_name: &Rc<String>,
    start: usize,
) -> NodeId {
    let (kind, value) = match text.strip_prefix('$') {
        Some(name) => (TokenKind::Constant, strip_braces(name)),
        None => {
            let hash = text.find('#').unwrap();
            let group = &text[..hash];
            let name = strip_braces(&text[hash + 1..]);
            let value = if group.is_empty() {
                name
            } else {
                format!("{}#{}", group, name)
            };
            (TokenKind::Field, value)
        }
    };

    let end = start + text.chars().count() - 1;
    let token = Token {
        kind,
        value,
        source_text: text.to_string(),
        span: Span {
            start: Position(start as u32, Rc::clone(source_name)),
            end: Position(end as u32, Rc::clone(source_name)),
        },
        tag: None,
    };
    parser.tree.leaf(token)
}
