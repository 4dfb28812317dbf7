//! Parser framework for the three expression grammars.
//!
//! This module contains the main Parser struct and the shared parsing
//! machinery. A parser is transient: it is built for one source text (or
//! one externally supplied token stream), runs one grammar to completion,
//! and hands back the pruned syntax tree.
//!
//! The framework owns:
//! - The parse lifecycle (open the stream, run the grammar's entry
//!   production, verify the expected end token, prune)
//! - Speculative (trial) sub-parses on private sub-streams, the mechanism
//!   that disambiguates grammars sharing the token vocabulary
//! - The recognizers shared by the arithmetic and boolean grammars:
//!   function-call argument lists and the arithmetic-then-string
//!   non-text operand

use std::fmt::Display;
use std::rc::Rc;

use log::trace;

use crate::{
    ast::tree::{NodeId, SyntaxTree},
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::LexerConfig,
        stream::TokenStream,
        tokens::{Token, TokenKind},
    },
    Position,
};

use super::{arith, boolean, text};

/// The externally selectable expression kinds.
///
/// `Any` is declared by the report schema but has no parser behind it;
/// selecting it is reported as unsupported rather than guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionKind {
    Arithmetic,
    Boolean,
    Text,
    Any,
}

impl Display for ExpressionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The grammars that actually exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    Arithmetic,
    Boolean,
    Text,
}

/// What the cursor must sit on once the entry production returns.
#[derive(Debug, Clone, Copy)]
pub enum EndToken {
    Kind(TokenKind),
    /// Wildcard: any end position is acceptable (used by trial parses,
    /// which check the follow token themselves).
    Any,
}

/// Tokens that may legitimately follow the right side of a relation.
pub(crate) const RELATION_FOLLOW: [TokenKind; 5] = [
    TokenKind::LogicalOp,
    TokenKind::CloseParen,
    TokenKind::CloseBracket,
    TokenKind::Comma,
    TokenKind::EndOfText,
];

/// Single-use parser for one source text under one grammar.
pub struct Parser {
    pub(crate) stream: TokenStream,
    pub(crate) tree: SyntaxTree,
    grammar: Grammar,
    parsed: bool,
    parsed_ok: bool,
    error_desc: Option<String>,
    last_trial_error: Option<Error>,
}

impl Parser {
    pub fn new(
        source: &str,
        source_name: Option<String>,
        config: LexerConfig,
        grammar: Grammar,
    ) -> Parser {
        Parser {
            stream: TokenStream::new(source, source_name, config),
            tree: SyntaxTree::new(),
            grammar,
            parsed: false,
            parsed_ok: false,
            error_desc: None,
            last_trial_error: None,
        }
    }

    /// Builds a parser over an externally supplied (typically sub-) stream.
    pub fn from_stream(stream: TokenStream, grammar: Grammar) -> Parser {
        Parser {
            stream,
            tree: SyntaxTree::new(),
            grammar,
            parsed: false,
            parsed_ok: false,
            error_desc: None,
            last_trial_error: None,
        }
    }

    /// The template method: open (or rewind) the stream, run the grammar's
    /// entry production, verify the end token, run the post-parse hook,
    /// prune, and return the root.
    pub fn parse(&mut self, end: EndToken) -> Result<NodeId, Error> {
        if self.stream.is_open() {
            self.stream.move_to(0)?;
        } else {
            self.stream.open()?;
        }

        self.parsed = true;
        let result = self.run(end);
        match &result {
            Ok(_) => {
                self.parsed_ok = true;
                self.error_desc = None;
            }
            Err(error) => {
                self.parsed_ok = false;
                self.error_desc = Some(error.get_tip().to_string());
            }
        }
        result
    }

    fn run(&mut self, end: EndToken) -> Result<NodeId, Error> {
        let root = match self.grammar {
            Grammar::Arithmetic => arith::parse_expression(self)?,
            Grammar::Boolean => boolean::parse_bool_expression(self)?,
            Grammar::Text => text::parse_text_expression(self)?,
        };

        if let EndToken::Kind(kind) = end {
            let current = self.current_token()?;
            if current.kind != kind {
                return Err(self.unexpected(&current));
            }
        }

        self.post_parse(root)?;

        let root = self.tree.prune(root);
        self.tree.set_root(root);
        Ok(root)
    }

    /// Grammar-specific work between end-token verification and pruning.
    /// None of the current grammars need one.
    fn post_parse(&mut self, _root: NodeId) -> Result<(), Error> {
        match self.grammar {
            Grammar::Arithmetic | Grammar::Boolean | Grammar::Text => Ok(()),
        }
    }

    /// Resets the parser for re-parsing the same stream. A different
    /// source text needs a new parser.
    pub fn restart(&mut self) -> Result<(), Error> {
        if self.stream.is_open() {
            self.stream.move_to(0)?;
        }
        self.tree = SyntaxTree::new();
        self.parsed = false;
        self.parsed_ok = false;
        self.error_desc = None;
        self.last_trial_error = None;
        Ok(())
    }

    pub fn parsed(&self) -> bool {
        self.parsed
    }

    pub fn parsed_ok(&self) -> bool {
        self.parsed_ok
    }

    pub fn error_desc(&self) -> Option<&str> {
        self.error_desc.as_deref()
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn into_tree(self) -> SyntaxTree {
        self.tree
    }

    pub fn source(&self) -> &str {
        self.stream.source()
    }

    // --- token helpers -------------------------------------------------

    pub(crate) fn current_token(&self) -> Result<Token, Error> {
        Ok(self.stream.current_token()?.clone())
    }

    pub(crate) fn current_token_kind(&self) -> Result<TokenKind, Error> {
        self.stream.current_token_kind()
    }

    pub(crate) fn advance(&mut self) -> Result<Token, Error> {
        self.stream.advance()
    }

    pub(crate) fn previous_token(&self) -> Result<Token, Error> {
        self.stream.previous_token()
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub(crate) fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token()?;
        if token.kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(self.unexpected(&token)),
            }
        } else {
            self.advance()
        }
    }

    pub(crate) fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    pub(crate) fn position_of(&self, token: &Token) -> Position {
        Position(token.start(), self.stream.source_name())
    }

    pub(crate) fn unexpected(&self, token: &Token) -> Error {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: display_text(token),
            },
            self.position_of(token),
        )
    }

    pub(crate) fn unexpected_detailed(&self, token: &Token, message: &str) -> Error {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: display_text(token),
                message: message.to_string(),
            },
            self.position_of(token),
        )
    }

    // --- speculative parsing -------------------------------------------

    /// Runs a candidate grammar against a private copy of the remaining
    /// tokens. Commits (grafting the nested tree into this parser's tree
    /// and advancing the real cursor by exactly the tokens consumed) only
    /// if the nested parse succeeds *and* leaves its cursor on one of the
    /// `follow` kinds; any other outcome rolls back without a trace.
    pub(crate) fn try_grammar(&mut self, grammar: Grammar, follow: &[TokenKind]) -> Option<NodeId> {
        let sub = self.stream.sub_stream(self.stream.position()).ok()?;
        let mut nested = Parser::from_stream(sub, grammar);

        trace!(
            "trial: {:?} grammar at token index {}",
            grammar,
            self.stream.position()
        );

        match nested.parse(EndToken::Any) {
            Ok(root) => {
                let kind = nested.stream.current_token_kind().ok()?;
                if follow.contains(&kind) {
                    let consumed = nested.stream.position();
                    let adopted = self.tree.adopt(&nested.tree, root);
                    let target = self.stream.position() + consumed;
                    if self.stream.move_to(target).is_err() {
                        return None;
                    }
                    self.last_trial_error = None;
                    trace!("trial committed: {:?}, {} tokens", grammar, consumed);
                    Some(adopted)
                } else {
                    trace!("trial rolled back: {:?} stopped on {:?}", grammar, kind);
                    None
                }
            }
            Err(error) => {
                trace!("trial rolled back: {:?} failed: {}", grammar, error.get_tip());
                self.last_trial_error = Some(error);
                None
            }
        }
    }

    /// Recognizes a span that must be a non-text expression: arithmetic
    /// first, then a bare string literal immediately followed by one of
    /// the `follow` kinds. Returns None when neither candidate fits.
    pub(crate) fn try_non_text_operand(&mut self, follow: &[TokenKind]) -> Option<NodeId> {
        if let Some(node) = self.try_grammar(Grammar::Arithmetic, follow) {
            return Some(node);
        }

        let token = self.current_token().ok()?;
        if token.kind == TokenKind::String {
            let next_kind = self.stream.next_token().ok()?.kind;
            if follow.contains(&next_kind) {
                self.stream.move_next().ok()?;
                return Some(self.tree.leaf(token));
            }
        }

        None
    }

    /// Like [`Parser::try_non_text_operand`], but exhaustion of the
    /// candidates is a real syntax error at the current position.
    pub(crate) fn parse_non_text_operand(&mut self, follow: &[TokenKind]) -> Result<NodeId, Error> {
        if let Some(node) = self.try_non_text_operand(follow) {
            return Ok(node);
        }

        let token = self.current_token()?;
        let error = ErrorImpl::NoMatchingGrammar {
            token: display_text(&token),
        };
        match self.last_trial_error.take() {
            Some(cause) => Err(Error::with_cause(error, self.position_of(&token), cause)),
            None => Err(Error::new(error, self.position_of(&token))),
        }
    }

    /// `'(' [Arg (',' Arg)*] ')'` — shared by the arithmetic and boolean
    /// function-call productions. Arguments are attached to `call`.
    pub(crate) fn parse_arg_list(&mut self, call: NodeId) -> Result<(), Error> {
        self.expect(TokenKind::OpenParen)?;

        if self.current_token_kind()? == TokenKind::CloseParen {
            self.advance()?;
            return Ok(());
        }

        loop {
            let arg = self.parse_non_text_operand(&[TokenKind::Comma, TokenKind::CloseParen])?;
            self.tree.add_child(call, arg);

            match self.current_token_kind()? {
                TokenKind::Comma => {
                    self.advance()?;
                }
                TokenKind::CloseParen => {
                    self.advance()?;
                    return Ok(());
                }
                _ => {
                    let token = self.current_token()?;
                    return Err(
                        self.unexpected_detailed(&token, "expected `,` or `)` in argument list")
                    );
                }
            }
        }
    }
}

fn display_text(token: &Token) -> String {
    if token.source_text.is_empty() {
        token.kind.to_string()
    } else {
        token.source_text.clone()
    }
}

/// Parses one expression source under the selected kind and returns the
/// pruned syntax tree. This is the factory the report engine calls for
/// attribute values.
pub fn parse_expression(
    kind: ExpressionKind,
    source: &str,
    config: LexerConfig,
) -> Result<SyntaxTree, Error> {
    let grammar = match kind {
        ExpressionKind::Arithmetic => Grammar::Arithmetic,
        ExpressionKind::Boolean => Grammar::Boolean,
        ExpressionKind::Text => Grammar::Text,
        ExpressionKind::Any => {
            return Err(Error::new(
                ErrorImpl::UnsupportedExpressionKind {
                    kind: kind.to_string(),
                },
                Position(0, Rc::new(String::from("<expression>"))),
            ))
        }
    };

    let mut parser = Parser::new(source, None, config, grammar);
    parser.parse(EndToken::Kind(TokenKind::EndOfText))?;
    Ok(parser.into_tree())
}
