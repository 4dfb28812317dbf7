//! Arithmetic grammar productions.
//!
//! Left recursion is eliminated with iteration, except exponentiation,
//! which recurses on the right so `2^3^2` groups as `2^(3^2)`.

use crate::{
    ast::tree::{NodeId, NodeKind},
    errors::errors::Error,
    lexer::tokens::{Token, TokenKind},
};

use super::parser::Parser;

/// Expr := Term (('+'|'-') Term)*
pub fn parse_expression(parser: &mut Parser) -> Result<NodeId, Error> {
    let node = parser.tree.alloc(NodeKind::Expression, false);
    let term = parse_term(parser)?;
    parser.tree.add_child(node, term);

    loop {
        let token = parser.current_token()?;
        if token.kind == TokenKind::MathOp && (token.value == "+" || token.value == "-") {
            let op = parser.advance()?;
            let op_leaf = parser.tree.leaf(op);
            parser.tree.add_child(node, op_leaf);

            let term = parse_term(parser)?;
            parser.tree.add_child(node, term);
        } else {
            break;
        }
    }

    Ok(node)
}

/// Term := Factor (('*'|'/'|'%') Factor)*
pub fn parse_term(parser: &mut Parser) -> Result<NodeId, Error> {
    let node = parser.tree.alloc(NodeKind::Term, false);
    let factor = parse_factor(parser)?;
    parser.tree.add_child(node, factor);

    loop {
        let token = parser.current_token()?;
        if token.kind == TokenKind::MathOp
            && (token.value == "*" || token.value == "/" || token.value == "%")
        {
            let op = parser.advance()?;
            let op_leaf = parser.tree.leaf(op);
            parser.tree.add_child(node, op_leaf);

            let factor = parse_factor(parser)?;
            parser.tree.add_child(node, factor);
        } else {
            break;
        }
    }

    Ok(node)
}

/// Factor := Value ('^' Factor)?  (right-associative by construction)
pub fn parse_factor(parser: &mut Parser) -> Result<NodeId, Error> {
    let node = parser.tree.alloc(NodeKind::Factor, false);
    let value = parse_value(parser)?;
    parser.tree.add_child(node, value);

    let token = parser.current_token()?;
    if token.kind == TokenKind::MathOp && token.value == "^" {
        let op = parser.advance()?;
        let op_leaf = parser.tree.leaf(op);
        parser.tree.add_child(node, op_leaf);

        let exponent = parse_factor(parser)?;
        parser.tree.add_child(node, exponent);
    }

    Ok(node)
}

/// Value := ['-'] UnsignedValue
///
/// A sign directly after another arithmetic operator is rejected, so
/// `5+-3` is a syntax error rather than an addition of a negated value.
pub fn parse_value(parser: &mut Parser) -> Result<NodeId, Error> {
    let node = parser.tree.alloc(NodeKind::Value, false);

    let token = parser.current_token()?;
    if token.kind == TokenKind::MathOp && token.value == "-" {
        let previous = parser.previous_token()?;
        if previous.kind == TokenKind::MathOp {
            return Err(
                parser.unexpected_detailed(&token, "a sign cannot follow an arithmetic operator")
            );
        }
        let op = parser.advance()?;
        let op_leaf = parser.tree.leaf(op);
        parser.tree.add_child(node, op_leaf);
    }

    let operand = parse_unsigned_value(parser)?;
    parser.tree.add_child(node, operand);
    Ok(node)
}

/// UnsignedValue := Number | Field | Constant | MethodCall
///                | Identifier
///                | Identifier '(' ArgList ')'
///                | Identifier '[' QualifyingExpr ']' [Field]
///                | '(' Expr ')'
pub fn parse_unsigned_value(parser: &mut Parser) -> Result<NodeId, Error> {
    let node = parser.tree.alloc(NodeKind::UnsignedValue, false);

    let token = parser.current_token()?;
    match token.kind {
        TokenKind::Number
        | TokenKind::Field
        | TokenKind::Constant
        | TokenKind::MethodCall => {
            let token = parser.advance()?;
            let leaf = parser.tree.leaf(token);
            parser.tree.add_child(node, leaf);
        }
        TokenKind::Identifier => {
            let ident = parser.advance()?;
            match parser.current_token_kind()? {
                TokenKind::OpenParen => {
                    let call = parse_function_call(parser, ident)?;
                    parser.tree.add_child(node, call);
                }
                TokenKind::OpenBracket => {
                    let qualified = parse_qualified_field(parser, ident)?;
                    parser.tree.add_child(node, qualified);
                }
                _ => {
                    let leaf = parser.tree.leaf(ident);
                    parser.tree.add_child(node, leaf);
                }
            }
        }
        TokenKind::OpenParen => {
            let group = parse_group(parser)?;
            parser.tree.add_child(node, group);
        }
        _ => return Err(parser.unexpected(&token)),
    }

    Ok(node)
}

/// '(' Expr ')' — the group node is concrete: the parentheses carry
/// meaning and must survive pruning.
fn parse_group(parser: &mut Parser) -> Result<NodeId, Error> {
    let node = parser.tree.alloc(NodeKind::Group, true);
    parser.expect(TokenKind::OpenParen)?;

    let inner = parse_expression(parser)?;
    parser.tree.add_child(node, inner);

    let token = parser.current_token()?;
    let error = parser.unexpected_detailed(&token, "missing closing `)`");
    parser.expect_error(TokenKind::CloseParen, Some(error))?;
    Ok(node)
}

/// Identifier '(' ArgList ')' — shared with the boolean grammar through
/// the framework's argument-list recognizer. The identifier is tagged so
/// the evaluator can tell a function name from a plain symbol.
pub(crate) fn parse_function_call(parser: &mut Parser, mut ident: Token) -> Result<NodeId, Error> {
    ident.tag = Some(String::from("function"));

    let node = parser.tree.alloc(NodeKind::FunctionCall, true);
    let name = parser.tree.leaf(ident);
    parser.tree.add_child(node, name);

    parser.parse_arg_list(node)?;
    Ok(node)
}

/// Identifier '[' QualifyingExpr ']' [Field] — indexed/selector field
/// access like `gruppo[1+2]#campo`. The qualifying expression is any
/// non-text expression, recognized speculatively.
fn parse_qualified_field(parser: &mut Parser, ident: Token) -> Result<NodeId, Error> {
    let node = parser.tree.alloc(NodeKind::QualifiedField, true);
    let name = parser.tree.leaf(ident);
    parser.tree.add_child(node, name);

    parser.expect(TokenKind::OpenBracket)?;

    let qualifier = parser.parse_non_text_operand(&[TokenKind::CloseBracket])?;
    parser.tree.add_child(node, qualifier);

    let token = parser.current_token()?;
    let error = parser.unexpected_detailed(&token, "missing closing `]`");
    parser.expect_error(TokenKind::CloseBracket, Some(error))?;

    if parser.current_token_kind()? == TokenKind::Field {
        let field = parser.advance()?;
        let leaf = parser.tree.leaf(field);
        parser.tree.add_child(node, leaf);
    }

    Ok(node)
}
