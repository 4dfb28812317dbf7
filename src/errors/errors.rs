use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// An error raised while tokenizing or parsing an expression.
///
/// Carries the offending position and, when a speculative parse chain
/// failed, the error of the last candidate grammar that was attempted.
#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
    cause: Option<Box<Error>>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
            cause: None,
        }
    }

    pub fn with_cause(error_impl: ErrorImpl, position: Position, cause: Error) -> Self {
        Error {
            internal_error: error_impl,
            position,
            cause: Some(Box::new(cause)),
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_cause(&self) -> Option<&Error> {
        self.cause.as_deref()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::InvalidEscape { .. } => "InvalidEscape",
            ErrorImpl::InvalidDelimiterConfig { .. } => "InvalidDelimiterConfig",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NoMatchingGrammar { .. } => "NoMatchingGrammar",
            ErrorImpl::UnsupportedExpressionKind { .. } => "UnsupportedExpressionKind",
            ErrorImpl::StreamNotOpen => "StreamNotOpen",
            ErrorImpl::StreamClosed => "StreamClosed",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::InvalidEscape { found } => ErrorTip::Suggestion(format!(
                "Invalid escape `\\{}`, only the backslash and the string delimiter can be escaped",
                found
            )),
            ErrorImpl::InvalidDelimiterConfig { .. } => ErrorTip::Suggestion(String::from(
                "The double quote cannot delimit both strings and identifiers",
            )),
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NoMatchingGrammar { token } => ErrorTip::Suggestion(format!(
                "No grammar matches the expression starting at `{}`",
                token
            )),
            ErrorImpl::UnsupportedExpressionKind { kind } => ErrorTip::Suggestion(format!(
                "Expression kind `{}` is declared but has no parser",
                kind
            )),
            ErrorImpl::StreamNotOpen => {
                ErrorTip::Suggestion(String::from("The token stream was never opened"))
            }
            ErrorImpl::StreamClosed => {
                ErrorTip::Suggestion(String::from("The token stream has been closed"))
            }
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    #[error("invalid escape sequence: \\{found:?}")]
    InvalidEscape { found: String },
    #[error("invalid delimiter configuration: {message:?}")]
    InvalidDelimiterConfig { message: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("no candidate grammar matches: {token:?}")]
    NoMatchingGrammar { token: String },
    #[error("unsupported expression kind: {kind:?}")]
    UnsupportedExpressionKind { kind: String },
    #[error("token stream is not open")]
    StreamNotOpen,
    #[error("token stream is closed")]
    StreamClosed,
}
