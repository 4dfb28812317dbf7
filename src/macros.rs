//! Utility macros for the expression engine.
//!
//! This module defines helper macros used throughout the lexer:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for fixed-text tokens
//!
//! These macros reduce boilerplate in the lexer implementation.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's semantic value
/// * `$source` - The exact source substring the token was read from
/// * `$span` - The source span (inclusive on both ends)
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, "42".to_string(), "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $source:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            source_text: $source,
            span: $span,
            tag: None,
        }
    };
}

/// Creates a default lexer handler for fixed-text tokens.
///
/// Generates a handler function that creates a token with the given kind
/// and advances the lexer position by the token's length.
///
/// # Example
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new("\\+").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::MathOp, "+"),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| -> Result<(), Error> {
            lexer.push(MK_TOKEN!(
                $kind,
                String::from($value),
                String::from($value),
                Span {
                    start: Position(lexer.pos as u32, Rc::clone(&lexer.source_name)),
                    end: Position(
                        (lexer.pos + $value.len() - 1) as u32,
                        Rc::clone(&lexer.source_name)
                    )
                }
            ));
            lexer.advance_n($value.len());
            Ok(())
        }
    };
}
