#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

pub use parser::parser::{parse_expression, ExpressionKind};

/// A 0-based character offset into an expression source, together with the
/// name of the source (an attribute path, a shell, ...).
#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

/// Inclusive character span: `end` is the offset of the last character of
/// the lexeme, so a one-character token has `start == end`.
#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

pub fn display_error(error: &Error, source: &str) -> String {
    /*
        Error: UnexpectedToken (unexpected token: `-`)
        -> value attribute
           |
           | #qty * + $taxrate
           | -------^
    */

    let position = error.get_position();
    let pos = (position.0 as usize).min(source.len().saturating_sub(1));

    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }
    out.push_str(&format!("-> {}\n", position.1));
    out.push_str("   |\n");
    out.push_str(&format!("   | {}\n", source));

    let arrows = pos + 1;
    out.push_str(&format!("   | {:->arrows$}\n", "^"));

    out
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::errors::errors::{Error, ErrorImpl};
    use crate::Position;

    #[test]
    fn test_display_error_caret_column() {
        let error = Error::new(
            ErrorImpl::UnexpectedToken {
                token: "+".to_string(),
            },
            Position(7, Rc::new("test".to_string())),
        );

        let rendered = super::display_error(&error, "#qty * + $taxrate");
        let caret_line = rendered.lines().last().unwrap();
        assert!(caret_line.ends_with("-------^"));
    }
}
