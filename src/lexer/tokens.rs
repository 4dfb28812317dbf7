use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display, rc::Rc};

use crate::{Position, Span};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("true", TokenKind::BoolLiteral);
        map.insert("false", TokenKind::BoolLiteral);
        map
    };
}

/// The closed vocabulary shared by the arithmetic, boolean and text
/// grammars. Every token the lexer can emit is one of these kinds.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    String,
    Number,
    BoolLiteral,

    Field,      // #campo, gruppo#campo, #{...}
    Constant,   // $pigreco, ${...}
    MethodCall, // object.method

    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,

    MathOp,       // + - * / % ^
    RelationalOp, // < <= = > >= != <>
    LogicalOp,    // && || !

    Identifier,
    Comma,
    Period,

    StartOfText,
    EndOfText,
    Unknown,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A classified, positioned lexeme.
///
/// `value` is the semantic value (unescaped content for strings, the name
/// without sigils and braces for constants, the literal text otherwise);
/// `source_text` is the exact substring of the input the token was read
/// from. `tag` is a free-form annotation a parser may attach after the
/// fact; the lexer never sets or interprets it.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub source_text: String,
    pub span: Span,
    pub tag: Option<String>,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{ kind: {}, value: {} }}", self.kind, self.value)
    }
}

impl Token {
    /// The start offset of the token in the source, 0-based.
    pub fn start(&self) -> u32 {
        self.span.start.0
    }

    /// The offset of the token's last character, 0-based.
    pub fn end(&self) -> u32 {
        self.span.end.0
    }

    /// The synthetic token returned when looking behind the first token.
    pub fn start_of_text(source_name: Rc<String>) -> Token {
        Token {
            kind: TokenKind::StartOfText,
            value: String::new(),
            source_text: String::new(),
            span: Span {
                start: Position(0, Rc::clone(&source_name)),
                end: Position(0, source_name),
            },
            tag: None,
        }
    }

    /// The sentinel terminating every tokenization pass.
    pub fn end_of_text(pos: u32, source_name: Rc<String>) -> Token {
        Token {
            kind: TokenKind::EndOfText,
            value: String::new(),
            source_text: String::new(),
            span: Span {
                start: Position(pos, Rc::clone(&source_name)),
                end: Position(pos, source_name),
            },
            tag: None,
        }
    }

    fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// Compact single-line rendering used by the tree printer and tests.
    pub fn describe(&self) -> String {
        if self.is_one_of_many(&[
            TokenKind::String,
            TokenKind::Number,
            TokenKind::BoolLiteral,
            TokenKind::Field,
            TokenKind::Constant,
            TokenKind::MethodCall,
            TokenKind::Identifier,
            TokenKind::MathOp,
            TokenKind::RelationalOp,
            TokenKind::LogicalOp,
            TokenKind::Unknown,
        ]) {
            format!("{} ({})", self.kind, self.value)
        } else {
            format!("{} ()", self.kind)
        }
    }
}
