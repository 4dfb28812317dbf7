use std::rc::Rc;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{
    lexer::{tokenize, LexerConfig},
    tokens::{Token, TokenKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Created,
    Open,
    Closed,
}

/// A materialized, navigable sequence of tokens with a movable cursor.
///
/// `open()` runs the lexer to exhaustion exactly once; all navigation
/// afterwards is index arithmetic. A stream can produce an independent
/// deep copy of its tail (`sub_stream`) for speculative parsing: the copy
/// owns fresh tokens, so advancing it or tagging its tokens is never
/// observable in the parent.
pub struct TokenStream {
    source: String,
    source_name: Rc<String>,
    config: LexerConfig,
    tokens: Vec<Token>,
    pos: usize,
    state: StreamState,
}

impl TokenStream {
    pub fn new(source: &str, source_name: Option<String>, config: LexerConfig) -> TokenStream {
        let source_name = Rc::new(source_name.unwrap_or_else(|| String::from("<expression>")));
        TokenStream {
            source: source.to_string(),
            source_name,
            config,
            tokens: vec![],
            pos: 0,
            state: StreamState::Created,
        }
    }

    /// Tokenizes the source. Harmless when called on an already-open
    /// stream; an error on a closed one.
    pub fn open(&mut self) -> Result<(), Error> {
        match self.state {
            StreamState::Open => Ok(()),
            StreamState::Closed => Err(self.usage_error(ErrorImpl::StreamClosed)),
            StreamState::Created => {
                self.tokens = tokenize(
                    &self.source,
                    Some(self.source_name.as_ref().clone()),
                    self.config,
                )?;
                self.pos = 0;
                self.state = StreamState::Open;
                Ok(())
            }
        }
    }

    /// Releases the token sequence. Any further navigation is a usage
    /// error.
    pub fn close(&mut self) {
        self.tokens.clear();
        self.state = StreamState::Closed;
    }

    pub fn is_open(&self) -> bool {
        self.state == StreamState::Open
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn source_name(&self) -> Rc<String> {
        Rc::clone(&self.source_name)
    }

    /// Number of tokens including the end-of-text sentinel.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn usage_error(&self, error: ErrorImpl) -> Error {
        Error::new(error, Position(0, Rc::clone(&self.source_name)))
    }

    fn ensure_open(&self) -> Result<(), Error> {
        match self.state {
            StreamState::Open => Ok(()),
            StreamState::Created => Err(self.usage_error(ErrorImpl::StreamNotOpen)),
            StreamState::Closed => Err(self.usage_error(ErrorImpl::StreamClosed)),
        }
    }

    /// Moves the cursor to an absolute index.
    pub fn move_to(&mut self, index: usize) -> Result<(), Error> {
        self.ensure_open()?;
        if index >= self.tokens.len() {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: index.to_string(),
                    message: String::from("cursor index out of range"),
                },
                Position(0, Rc::clone(&self.source_name)),
            ));
        }
        self.pos = index;
        Ok(())
    }

    /// Advances the cursor by one token, staying on the end-of-text
    /// sentinel once it is reached. Returns whether the cursor moved.
    pub fn move_next(&mut self) -> Result<bool, Error> {
        self.ensure_open()?;
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Returns the token under the cursor without advancing.
    pub fn current_token(&self) -> Result<&Token, Error> {
        self.ensure_open()?;
        Ok(&self.tokens[self.pos])
    }

    pub fn current_token_kind(&self) -> Result<TokenKind, Error> {
        Ok(self.current_token()?.kind)
    }

    /// One-token lookahead; the end-of-text sentinel repeats at the end.
    pub fn next_token(&self) -> Result<&Token, Error> {
        self.ensure_open()?;
        let index = (self.pos + 1).min(self.tokens.len() - 1);
        Ok(&self.tokens[index])
    }

    /// One-token lookbehind; before any advance this is the start-of-text
    /// sentinel, not an error.
    pub fn previous_token(&self) -> Result<Token, Error> {
        self.ensure_open()?;
        if self.pos == 0 {
            Ok(Token::start_of_text(Rc::clone(&self.source_name)))
        } else {
            Ok(self.tokens[self.pos - 1].clone())
        }
    }

    /// Returns the token under the cursor and advances past it.
    pub fn advance(&mut self) -> Result<Token, Error> {
        self.ensure_open()?;
        let token = self.tokens[self.pos].clone();
        self.move_next()?;
        Ok(token)
    }

    /// Attaches a parser annotation to the token under the cursor.
    pub fn tag_current(&mut self, tag: &str) -> Result<(), Error> {
        self.ensure_open()?;
        self.tokens[self.pos].tag = Some(tag.to_string());
        Ok(())
    }

    /// Deep, independent copy of this stream from `from` to the end. The
    /// copy is already open with its cursor at its own first token;
    /// mutating or advancing it never touches the parent.
    pub fn sub_stream(&self, from: usize) -> Result<TokenStream, Error> {
        self.ensure_open()?;
        let from = from.min(self.tokens.len() - 1);
        Ok(TokenStream {
            source: self.source.clone(),
            source_name: Rc::clone(&self.source_name),
            config: self.config,
            tokens: self.tokens[from..].to_vec(),
            pos: 0,
            state: StreamState::Open,
        })
    }
}
