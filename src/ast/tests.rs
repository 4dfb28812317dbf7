use std::rc::Rc;

use crate::lexer::tokens::{Token, TokenKind};
use crate::{Position, Span};

use super::printer::print_tree;
use super::tree::{NodeKind, SyntaxTree};

fn tok_at(kind: TokenKind, text: &str, start: u32) -> Token {
    let name = Rc::new(String::from("test"));
    let end = start + text.chars().count().max(1) as u32 - 1;
    Token {
        kind,
        value: text.to_string(),
        source_text: text.to_string(),
        span: Span {
            start: Position(start, Rc::clone(&name)),
            end: Position(end, name),
        },
        tag: None,
    }
}

fn tok(kind: TokenKind, text: &str) -> Token {
    tok_at(kind, text, 0)
}

#[test]
fn test_prune_elides_single_child_chain() {
    let mut tree = SyntaxTree::new();
    let expression = tree.alloc(NodeKind::Expression, false);
    let term = tree.alloc(NodeKind::Term, false);
    let factor = tree.alloc(NodeKind::Factor, false);
    let leaf = tree.leaf(tok(TokenKind::Number, "1"));
    tree.add_child(expression, term);
    tree.add_child(term, factor);
    tree.add_child(factor, leaf);
    tree.set_root(expression);

    let root = tree.prune(expression);

    assert_eq!(root, leaf);
    assert_eq!(tree.root(), Some(leaf));
    assert_eq!(tree.kind(root), NodeKind::Leaf);
    assert_eq!(tree.live_count(), 1);
}

#[test]
fn test_prune_keeps_concrete_single_child() {
    let mut tree = SyntaxTree::new();
    let group = tree.alloc(NodeKind::Group, true);
    let leaf = tree.leaf(tok(TokenKind::Number, "1"));
    tree.add_child(group, leaf);

    let root = tree.prune(group);

    assert_eq!(root, group);
    assert_eq!(tree.children(group), vec![leaf]);
}

#[test]
fn test_prune_is_idempotent() {
    let mut tree = SyntaxTree::new();
    let expression = tree.alloc(NodeKind::Expression, false);
    let left = tree.alloc(NodeKind::Term, false);
    let one = tree.leaf(tok_at(TokenKind::Number, "1", 0));
    tree.add_child(left, one);
    let op = tree.leaf(tok_at(TokenKind::MathOp, "+", 1));
    let right = tree.alloc(NodeKind::Term, false);
    let two = tree.leaf(tok_at(TokenKind::Number, "2", 2));
    tree.add_child(right, two);
    tree.add_child(expression, left);
    tree.add_child(expression, op);
    tree.add_child(expression, right);
    tree.set_root(expression);

    let root = tree.prune(expression);
    let first_pass = print_tree(&tree, root);

    let root_again = tree.prune(root);
    let second_pass = print_tree(&tree, root_again);

    assert_eq!(root, root_again);
    assert_eq!(first_pass, second_pass);
}

#[test]
fn test_replace_child_destroys_old_subtree() {
    let mut tree = SyntaxTree::new();
    let parent = tree.alloc(NodeKind::Expression, false);
    let old = tree.alloc(NodeKind::Term, false);
    let old_leaf = tree.leaf(tok(TokenKind::Number, "1"));
    tree.add_child(old, old_leaf);
    tree.add_child(parent, old);

    let new = tree.leaf(tok(TokenKind::Number, "2"));
    tree.replace_child(parent, old, new);

    assert_eq!(tree.children(parent), vec![new]);
    assert_eq!(tree.get(new).parent, Some(parent));
    // The replaced node and its leaf are tombstoned.
    assert_eq!(tree.live_count(), 2);
}

#[test]
fn test_destroy_is_recursive() {
    let mut tree = SyntaxTree::new();
    let parent = tree.alloc(NodeKind::Expression, false);
    let child = tree.alloc(NodeKind::Term, false);
    let leaf = tree.leaf(tok(TokenKind::Number, "1"));
    tree.add_child(parent, child);
    tree.add_child(child, leaf);

    tree.destroy(child);

    assert_eq!(tree.live_count(), 1);
}

#[test]
fn test_adopt_deep_copies_subtree() {
    let mut donor = SyntaxTree::new();
    let relation = donor.alloc(NodeKind::Relation, false);
    let lhs = donor.leaf(tok(TokenKind::Number, "1"));
    let rhs = donor.leaf(tok(TokenKind::Number, "2"));
    donor.add_child(relation, lhs);
    donor.add_child(relation, rhs);

    let mut tree = SyntaxTree::new();
    let adopted = tree.adopt(&donor, relation);

    assert_eq!(tree.kind(adopted), NodeKind::Relation);
    assert_eq!(tree.children(adopted).len(), 2);
    assert_eq!(tree.live_count(), 3);
    // The donor still owns its own copy.
    assert_eq!(donor.live_count(), 3);
}

#[test]
fn test_text_rendering() {
    let mut tree = SyntaxTree::new();

    let call = tree.alloc(NodeKind::FunctionCall, true);
    let name = tree.leaf(tok(TokenKind::Identifier, "upper"));
    let arg = tree.leaf(tok(TokenKind::Field, "#campo"));
    tree.add_child(call, name);
    tree.add_child(call, arg);
    assert_eq!(tree.text(call), "upper(#campo)");

    let qualified = tree.alloc(NodeKind::QualifiedField, true);
    let group = tree.leaf(tok(TokenKind::Identifier, "gruppo"));
    let index = tree.leaf(tok(TokenKind::Number, "1"));
    let field = tree.leaf(tok(TokenKind::Field, "#campo"));
    tree.add_child(qualified, group);
    tree.add_child(qualified, index);
    tree.add_child(qualified, field);
    assert_eq!(tree.text(qualified), "gruppo[1]#campo");

    let parens = tree.alloc(NodeKind::Group, true);
    let one = tree.leaf(tok(TokenKind::Number, "1"));
    tree.add_child(parens, one);
    assert_eq!(tree.text(parens), "(1)");
}

#[test]
fn test_tree_is_debug_printable() {
    let mut tree = SyntaxTree::new();
    tree.leaf(tok(TokenKind::Number, "1"));

    let rendered = format!("{:?}", tree);
    assert!(rendered.contains("SyntaxTree"));
    assert!(rendered.contains("Leaf"));
}

#[test]
fn test_position_is_leftmost_leaf() {
    let mut tree = SyntaxTree::new();
    let term = tree.alloc(NodeKind::Term, false);
    let left = tree.leaf(tok_at(TokenKind::Number, "12", 4));
    let op = tree.leaf(tok_at(TokenKind::MathOp, "*", 7));
    tree.add_child(term, left);
    tree.add_child(term, op);

    assert_eq!(tree.position(term), 4);
}

#[test]
fn test_print_tree_layout() {
    let mut tree = SyntaxTree::new();
    let term = tree.alloc(NodeKind::Term, false);
    let left = tree.leaf(tok_at(TokenKind::Number, "1", 0));
    let op = tree.leaf(tok_at(TokenKind::MathOp, "*", 1));
    let right = tree.leaf(tok_at(TokenKind::Number, "2", 2));
    tree.add_child(term, left);
    tree.add_child(term, op);
    tree.add_child(term, right);

    let rendered = print_tree(&tree, term);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "Term  `1*2`");
    assert_eq!(lines[1], "  Number (1)");
    assert_eq!(lines[2], "  MathOp (*)");
    assert_eq!(lines[3], "  Number (2)");
}
