//! Boolean/relational grammar productions.
//!
//! `&&` binds tighter than `||`; relations are recognized speculatively,
//! because their operands share the token vocabulary with the boolean
//! primaries themselves.

use crate::{
    ast::tree::{NodeId, NodeKind},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::parser::{Parser, RELATION_FOLLOW};

/// BoolExpr := BoolTerm ('||' BoolTerm)*
pub fn parse_bool_expression(parser: &mut Parser) -> Result<NodeId, Error> {
    let node = parser.tree.alloc(NodeKind::BoolExpression, false);
    let term = parse_bool_term(parser)?;
    parser.tree.add_child(node, term);

    loop {
        let token = parser.current_token()?;
        if token.kind == TokenKind::LogicalOp && token.value == "||" {
            let op = parser.advance()?;
            let op_leaf = parser.tree.leaf(op);
            parser.tree.add_child(node, op_leaf);

            let term = parse_bool_term(parser)?;
            parser.tree.add_child(node, term);
        } else {
            break;
        }
    }

    Ok(node)
}

/// BoolTerm := BoolValue ('&&' BoolValue)*
pub fn parse_bool_term(parser: &mut Parser) -> Result<NodeId, Error> {
    let node = parser.tree.alloc(NodeKind::BoolTerm, false);
    let value = parse_bool_value(parser)?;
    parser.tree.add_child(node, value);

    loop {
        let token = parser.current_token()?;
        if token.kind == TokenKind::LogicalOp && token.value == "&&" {
            let op = parser.advance()?;
            let op_leaf = parser.tree.leaf(op);
            parser.tree.add_child(node, op_leaf);

            let value = parse_bool_value(parser)?;
            parser.tree.add_child(node, value);
        } else {
            break;
        }
    }

    Ok(node)
}

/// BoolValue := RelExpr | ['!'] BoolPrimary
///
/// A relation is recognized by trying to read a non-text expression that
/// leaves the cursor on a relational operator; if that trial fails the
/// span is a boolean primary after all.
pub fn parse_bool_value(parser: &mut Parser) -> Result<NodeId, Error> {
    let node = parser.tree.alloc(NodeKind::BoolValue, false);

    if let Some(lhs) = parser.try_non_text_operand(&[TokenKind::RelationalOp]) {
        let relation = parser.tree.alloc(NodeKind::Relation, false);
        parser.tree.add_child(relation, lhs);

        let op = parser.expect(TokenKind::RelationalOp)?;
        let op_leaf = parser.tree.leaf(op);
        parser.tree.add_child(relation, op_leaf);

        let rhs = parser.parse_non_text_operand(&RELATION_FOLLOW)?;
        parser.tree.add_child(relation, rhs);

        parser.tree.add_child(node, relation);
        return Ok(node);
    }

    let token = parser.current_token()?;
    if token.kind == TokenKind::LogicalOp && token.value == "!" {
        let op = parser.advance()?;
        let op_leaf = parser.tree.leaf(op);
        parser.tree.add_child(node, op_leaf);
    }

    let primary = parse_bool_primary(parser)?;
    parser.tree.add_child(node, primary);
    Ok(node)
}

/// BoolPrimary := BoolLiteral | Field | Constant | MethodCall
///              | Identifier | Identifier '(' ArgList ')'
///              | '(' BoolExpr ')'
pub fn parse_bool_primary(parser: &mut Parser) -> Result<NodeId, Error> {
    let token = parser.current_token()?;
    match token.kind {
        TokenKind::BoolLiteral
        | TokenKind::Field
        | TokenKind::Constant
        | TokenKind::MethodCall => {
            let token = parser.advance()?;
            Ok(parser.tree.leaf(token))
        }
        TokenKind::Identifier => {
            let ident = parser.advance()?;
            if parser.current_token_kind()? == TokenKind::OpenParen {
                super::arith::parse_function_call(parser, ident)
            } else {
                Ok(parser.tree.leaf(ident))
            }
        }
        TokenKind::OpenParen => {
            let node = parser.tree.alloc(NodeKind::Group, true);
            parser.advance()?;

            let inner = parse_bool_expression(parser)?;
            parser.tree.add_child(node, inner);

            let current = parser.current_token()?;
            let error = parser.unexpected_detailed(&current, "missing closing `)`");
            parser.expect_error(TokenKind::CloseParen, Some(error))?;
            Ok(node)
        }
        _ => Err(parser.unexpected(&token)),
    }
}
