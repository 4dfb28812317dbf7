use std::rc::Rc;

use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex) -> Result<(), Error>;

#[derive(Clone)]
pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

/// Which quote characters delimit string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringDelimiterMode {
    SingleQuote,
    DoubleQuote,
    Both,
}

/// How identifiers may be quoted, mirroring the SQL dialects consumed by
/// the report data layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierDelimiterMode {
    None,
    DoubleQuote,
    SquareBracket,
}

#[derive(Debug, Clone, Copy)]
pub struct LexerConfig {
    pub string_mode: StringDelimiterMode,
    pub identifier_mode: IdentifierDelimiterMode,
}

impl Default for LexerConfig {
    fn default() -> Self {
        LexerConfig {
            string_mode: StringDelimiterMode::Both,
            identifier_mode: IdentifierDelimiterMode::None,
        }
    }
}

impl LexerConfig {
    fn accepts_string_delimiter(&self, c: char) -> bool {
        match self.string_mode {
            StringDelimiterMode::SingleQuote => c == '\'',
            StringDelimiterMode::DoubleQuote => c == '"',
            StringDelimiterMode::Both => c == '\'' || c == '"',
        }
    }
}

pub struct Lexer {
    patterns: Vec<RegexPattern>,
    tokens: Vec<Token>,
    chars: Vec<char>,
    /// Length of the source before the sentinel space was appended.
    original_len: usize,
    pos: usize,
    source_name: Rc<String>,
}

impl Lexer {
    pub fn new(
        source: &str,
        source_name: Option<String>,
        config: LexerConfig,
    ) -> Result<Lexer, Error> {
        let source_name = Rc::new(source_name.unwrap_or_else(|| String::from("<expression>")));

        if config.identifier_mode == IdentifierDelimiterMode::DoubleQuote
            && config.string_mode != StringDelimiterMode::SingleQuote
        {
            return Err(Error::new(
                ErrorImpl::InvalidDelimiterConfig {
                    message: String::from(
                        "double quote configured for both strings and identifiers",
                    ),
                },
                Position(0, source_name),
            ));
        }

        // Newlines and tabs become plain spaces, and a trailing space is
        // appended so every token can look one character ahead.
        let mut chars: Vec<char> = source
            .chars()
            .map(|c| if c == '\n' || c == '\t' || c == '\r' { ' ' } else { c })
            .collect();
        let original_len = chars.len();
        chars.push(' ');

        let mut patterns = vec![RegexPattern {
            regex: Regex::new("\\s+").unwrap(),
            handler: skip_handler,
        }];

        if config.accepts_string_delimiter('\'') {
            patterns.push(RegexPattern {
                regex: Regex::new("'").unwrap(),
                handler: string_handler,
            });
        }
        if config.accepts_string_delimiter('"') {
            patterns.push(RegexPattern {
                regex: Regex::new("\"").unwrap(),
                handler: string_handler,
            });
        }

        match config.identifier_mode {
            IdentifierDelimiterMode::None => {}
            IdentifierDelimiterMode::DoubleQuote => patterns.push(RegexPattern {
                regex: Regex::new("\"[^\"]*\"").unwrap(),
                handler: delimited_identifier_handler,
            }),
            IdentifierDelimiterMode::SquareBracket => patterns.push(RegexPattern {
                regex: Regex::new("\\[[^\\]]*\\]").unwrap(),
                handler: delimited_identifier_handler,
            }),
        }

        patterns.extend(vec![
            RegexPattern {
                regex: Regex::new("[0-9]+(\\.[0-9]*)?([eE][+-]?[0-9]+)?|\\.[0-9]+([eE][+-]?[0-9]+)?").unwrap(),
                handler: number_handler,
            },
            RegexPattern {
                regex: Regex::new("\\$(\\{[^}]*\\}|[a-zA-Z_][a-zA-Z0-9_]*)").unwrap(),
                handler: constant_handler,
            },
            RegexPattern {
                regex: Regex::new("([a-zA-Z_][a-zA-Z0-9_]*)?#(\\{[^}]*\\}|[a-zA-Z_][a-zA-Z0-9_]*)").unwrap(),
                handler: field_handler,
            },
            RegexPattern {
                regex: Regex::new("[a-zA-Z_][a-zA-Z0-9_]*\\.[a-zA-Z_][a-zA-Z0-9_]*").unwrap(),
                handler: method_call_handler,
            },
            RegexPattern {
                regex: Regex::new("[a-zA-Z_][a-zA-Z0-9_]*").unwrap(),
                handler: symbol_handler,
            },
            RegexPattern { regex: Regex::new("<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::RelationalOp, "<=") },
            RegexPattern { regex: Regex::new("<>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::RelationalOp, "<>") },
            RegexPattern { regex: Regex::new(">=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::RelationalOp, ">=") },
            RegexPattern { regex: Regex::new("!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::RelationalOp, "!=") },
            RegexPattern { regex: Regex::new("<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::RelationalOp, "<") },
            RegexPattern { regex: Regex::new(">").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::RelationalOp, ">") },
            RegexPattern { regex: Regex::new("=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::RelationalOp, "=") },
            RegexPattern { regex: Regex::new("&&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LogicalOp, "&&") },
            RegexPattern { regex: Regex::new("\\|\\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LogicalOp, "||") },
            RegexPattern { regex: Regex::new("!").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LogicalOp, "!") },
            // A lone & or | is not an operator of this language.
            RegexPattern { regex: Regex::new("[&|]").unwrap(), handler: unknown_single_handler },
            RegexPattern { regex: Regex::new("\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
            RegexPattern { regex: Regex::new("\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
            RegexPattern { regex: Regex::new("\\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[") },
            RegexPattern { regex: Regex::new("\\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]") },
            RegexPattern { regex: Regex::new(",").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
            RegexPattern { regex: Regex::new("\\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Period, ".") },
            RegexPattern { regex: Regex::new("\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::MathOp, "+") },
            RegexPattern { regex: Regex::new("-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::MathOp, "-") },
            RegexPattern { regex: Regex::new("\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::MathOp, "*") },
            RegexPattern { regex: Regex::new("/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::MathOp, "/") },
            RegexPattern { regex: Regex::new("%").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::MathOp, "%") },
            RegexPattern { regex: Regex::new("\\^").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::MathOp, "^") },
        ]);

        Ok(Lexer {
            patterns,
            tokens: vec![],
            chars,
            original_len,
            pos: 0,
            source_name,
        })
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn remainder(&self) -> String {
        self.chars[self.pos..].iter().collect()
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn span_at(&self, start: usize, end: usize) -> Span {
        Span {
            start: Position(start as u32, Rc::clone(&self.source_name)),
            end: Position(end as u32, Rc::clone(&self.source_name)),
        }
    }
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let remaining = lexer.remainder();
    let matched = regex.find(&remaining).unwrap().end();
    lexer.advance_n(matched);
    Ok(())
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let remaining = lexer.remainder();
    let matched = regex.find(&remaining).unwrap().as_str().to_string();
    let span = lexer.span_at(lexer.pos, lexer.pos + matched.chars().count() - 1);

    lexer.push(MK_TOKEN!(TokenKind::Number, matched.clone(), matched.clone(), span));
    lexer.advance_n(matched.chars().count());
    Ok(())
}

/// Scans a string literal character by character, starting at the opening
/// delimiter. Inside the literal a backslash may escape only itself or the
/// delimiter; anything else after a backslash is a lexical error. A literal
/// still open when the text ends degrades to an Unknown run, and a literal
/// whose escape sequence is cut off by the end of the text yields the
/// content read so far as a (degenerate) String token.
fn string_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    let start = lexer.pos;
    let delim = lexer.chars[start];
    let mut value = String::new();
    let mut i = start + 1;

    loop {
        if i >= lexer.original_len {
            // Never closed: fall back to an Unknown run.
            return unknown_run(lexer);
        }

        let c = lexer.chars[i];
        if c == '\\' {
            if i + 1 >= lexer.original_len {
                // The escape target is the end of the text.
                let raw: String = lexer.chars[start..=i].iter().collect();
                let span = lexer.span_at(start, i);
                lexer.push(MK_TOKEN!(TokenKind::String, value, raw, span));
                lexer.pos = i + 1;
                return Ok(());
            }
            let next = lexer.chars[i + 1];
            if next == '\\' || next == delim {
                value.push(next);
                i += 2;
                continue;
            }
            return Err(Error::new(
                ErrorImpl::InvalidEscape {
                    found: next.to_string(),
                },
                Position((i + 1) as u32, Rc::clone(&lexer.source_name)),
            ));
        }

        if c == delim {
            let raw: String = lexer.chars[start..=i].iter().collect();
            let span = lexer.span_at(start, i);
            lexer.push(MK_TOKEN!(TokenKind::String, value, raw, span));
            lexer.pos = i + 1;
            return Ok(());
        }

        value.push(c);
        i += 1;
    }
}

fn constant_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let remaining = lexer.remainder();
    let matched = regex.find(&remaining).unwrap().as_str().to_string();
    let name = strip_braces(&matched[1..]);
    let span = lexer.span_at(lexer.pos, lexer.pos + matched.chars().count() - 1);

    lexer.push(MK_TOKEN!(TokenKind::Constant, name, matched.clone(), span));
    lexer.advance_n(matched.chars().count());
    Ok(())
}

fn field_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let remaining = lexer.remainder();
    let matched = regex.find(&remaining).unwrap().as_str().to_string();

    // `gruppo#campo` keeps the group qualifier in the value; a bare
    // `#campo` is just the field name.
    let hash = matched.find('#').unwrap();
    let group = &matched[..hash];
    let name = strip_braces(&matched[hash + 1..]);
    let value = if group.is_empty() {
        name
    } else {
        format!("{}#{}", group, name)
    };

    let span = lexer.span_at(lexer.pos, lexer.pos + matched.chars().count() - 1);
    lexer.push(MK_TOKEN!(TokenKind::Field, value, matched.clone(), span));
    lexer.advance_n(matched.chars().count());
    Ok(())
}

fn method_call_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let remaining = lexer.remainder();
    let matched = regex.find(&remaining).unwrap().as_str().to_string();
    let span = lexer.span_at(lexer.pos, lexer.pos + matched.chars().count() - 1);

    lexer.push(MK_TOKEN!(TokenKind::MethodCall, matched.clone(), matched.clone(), span));
    lexer.advance_n(matched.chars().count());
    Ok(())
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let remaining = lexer.remainder();
    let matched = regex.find(&remaining).unwrap().as_str().to_string();
    let span = lexer.span_at(lexer.pos, lexer.pos + matched.chars().count() - 1);

    let kind = match RESERVED_LOOKUP.get(matched.as_str()) {
        Some(kind) => *kind,
        None => TokenKind::Identifier,
    };

    lexer.push(MK_TOKEN!(kind, matched.clone(), matched.clone(), span));
    lexer.advance_n(matched.chars().count());
    Ok(())
}

fn delimited_identifier_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let remaining = lexer.remainder();
    let matched = regex.find(&remaining).unwrap().as_str().to_string();
    let len = matched.chars().count();
    let value: String = matched.chars().skip(1).take(len - 2).collect();
    let span = lexer.span_at(lexer.pos, lexer.pos + len - 1);

    lexer.push(MK_TOKEN!(TokenKind::Identifier, value, matched, span));
    lexer.advance_n(len);
    Ok(())
}

fn unknown_single_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    let c = lexer.chars[lexer.pos].to_string();
    let span = lexer.span_at(lexer.pos, lexer.pos);
    lexer.push(MK_TOKEN!(TokenKind::Unknown, c.clone(), c, span));
    lexer.advance_n(1);
    Ok(())
}

/// Consumes characters up to the next separator (whitespace or a
/// parenthesis) and emits them as a single Unknown token. Unrecognized
/// text is reported through the token, never through an error.
fn unknown_run(lexer: &mut Lexer) -> Result<(), Error> {
    let start = lexer.pos;
    let mut end = start;
    while end < lexer.original_len {
        let c = lexer.chars[end];
        if c == ' ' || c == '(' || c == ')' {
            break;
        }
        end += 1;
    }

    let run: String = lexer.chars[start..end].iter().collect();
    let span = lexer.span_at(start, end.saturating_sub(1).max(start));
    lexer.push(MK_TOKEN!(TokenKind::Unknown, run.clone(), run, span));
    lexer.pos = end;
    Ok(())
}

pub(crate) fn strip_braces(name: &str) -> String {
    if name.starts_with('{') && name.ends_with('}') && name.len() >= 2 {
        name[1..name.len() - 1].to_string()
    } else {
        name.to_string()
    }
}

/// Tokenizes a whole expression source, appending the end-of-text sentinel.
pub fn tokenize(
    source: &str,
    source_name: Option<String>,
    config: LexerConfig,
) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, source_name, config)?;

    while !lex.at_eof() {
        let mut matched = false;

        for i in 0..lex.patterns.len() {
            let (regex, handler) = {
                let pattern = &lex.patterns[i];
                (pattern.regex.clone(), pattern.handler)
            };
            let remaining = lex.remainder();

            if let Some(found) = regex.find(&remaining) {
                if found.start() == 0 {
                    handler(&mut lex, &regex)?;
                    matched = true;
                    break;
                }
            }
        }

        if !matched {
            unknown_run(&mut lex)?;
        }
    }

    let end_pos = lex.original_len as u32;
    lex.push(Token::end_of_text(end_pos, Rc::clone(&lex.source_name)));
    Ok(lex.tokens)
}
