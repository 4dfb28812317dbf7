use super::lexer::{
    tokenize, IdentifierDelimiterMode, LexerConfig, StringDelimiterMode,
};
use super::stream::TokenStream;
use super::tokens::{Token, TokenKind};

fn lex(source: &str) -> Vec<Token> {
    tokenize(source, Some(String::from("test")), LexerConfig::default()).unwrap()
}

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn test_tokenize_arithmetic() {
    let tokens = lex("#qty * 2 + $taxrate");

    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Field,
            TokenKind::MathOp,
            TokenKind::Number,
            TokenKind::MathOp,
            TokenKind::Constant,
            TokenKind::EndOfText,
        ]
    );
    assert_eq!(tokens[0].value, "qty");
    assert_eq!(tokens[0].source_text, "#qty");
    assert_eq!(tokens[4].value, "taxrate");

    // Spans are inclusive on both ends.
    assert_eq!(tokens[0].start(), 0);
    assert_eq!(tokens[0].end(), 3);
    assert_eq!(tokens[4].start(), 11);
    assert_eq!(tokens[4].end(), 18);
    assert_eq!(tokens[5].start(), 19);
}

#[test]
fn test_tokenize_numbers() {
    let tokens = lex("1.5e-3 .5 5. 12E");

    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Number,
            TokenKind::Number,
            TokenKind::Number,
            TokenKind::Number,
            TokenKind::Identifier,
            TokenKind::EndOfText,
        ]
    );
    assert_eq!(tokens[0].value, "1.5e-3");
    assert_eq!(tokens[1].value, ".5");
    assert_eq!(tokens[2].value, "5.");
    // A malformed exponent truncates at the longest valid prefix.
    assert_eq!(tokens[3].value, "12");
    assert_eq!(tokens[4].value, "E");
}

#[test]
fn test_tokenize_field_forms() {
    let tokens = lex("#campo gruppo#campo #{campo con spazi}");

    assert_eq!(tokens[0].kind, TokenKind::Field);
    assert_eq!(tokens[0].value, "campo");
    assert_eq!(tokens[1].kind, TokenKind::Field);
    assert_eq!(tokens[1].value, "gruppo#campo");
    assert_eq!(tokens[2].kind, TokenKind::Field);
    assert_eq!(tokens[2].value, "campo con spazi");
    assert_eq!(tokens[2].source_text, "#{campo con spazi}");
}

#[test]
fn test_tokenize_constant_forms() {
    let tokens = lex("$pigreco ${pi greco}");

    assert_eq!(tokens[0].kind, TokenKind::Constant);
    assert_eq!(tokens[0].value, "pigreco");
    assert_eq!(tokens[1].kind, TokenKind::Constant);
    assert_eq!(tokens[1].value, "pi greco");
}

#[test]
fn test_tokenize_string_escapes() {
    let tokens = lex("'it\\'s' 'a\\\\b'");

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "it's");
    assert_eq!(tokens[0].source_text, "'it\\'s'");
    assert_eq!(tokens[1].kind, TokenKind::String);
    assert_eq!(tokens[1].value, "a\\b");
}

#[test]
fn test_tokenize_invalid_escape() {
    let error = tokenize("'a\\nb'", None, LexerConfig::default()).unwrap_err();

    assert_eq!(error.get_error_name(), "InvalidEscape");
    assert_eq!(error.get_position().0, 3);
}

#[test]
fn test_tokenize_escape_cut_off_by_end_of_text() {
    // The backslash has no escape target; the content read so far is
    // still delivered as a (degenerate) String token.
    let tokens = lex("'ab\\");

    assert_eq!(kinds(&tokens), vec![TokenKind::String, TokenKind::EndOfText]);
    assert_eq!(tokens[0].value, "ab");
    assert_eq!(tokens[0].source_text, "'ab\\");
}

#[test]
fn test_tokenize_unterminated_string_is_unknown() {
    let tokens = lex("'abc");

    assert_eq!(kinds(&tokens), vec![TokenKind::Unknown, TokenKind::EndOfText]);
    assert_eq!(tokens[0].value, "'abc");
}

#[test]
fn test_tokenize_method_call_vs_period() {
    let tokens = lex("a.b a . b");

    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::MethodCall,
            TokenKind::Identifier,
            TokenKind::Period,
            TokenKind::Identifier,
            TokenKind::EndOfText,
        ]
    );
    assert_eq!(tokens[0].value, "a.b");
}

#[test]
fn test_tokenize_operators() {
    let tokens = lex("< <= <> >= != = && || ! & |");

    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::RelationalOp,
            TokenKind::RelationalOp,
            TokenKind::RelationalOp,
            TokenKind::RelationalOp,
            TokenKind::RelationalOp,
            TokenKind::RelationalOp,
            TokenKind::LogicalOp,
            TokenKind::LogicalOp,
            TokenKind::LogicalOp,
            TokenKind::Unknown,
            TokenKind::Unknown,
            TokenKind::EndOfText,
        ]
    );
    assert_eq!(tokens[9].value, "&");
    assert_eq!(tokens[10].value, "|");
}

#[test]
fn test_tokenize_reserved_words() {
    let tokens = lex("true false vero");

    assert_eq!(tokens[0].kind, TokenKind::BoolLiteral);
    assert_eq!(tokens[1].kind, TokenKind::BoolLiteral);
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
}

#[test]
fn test_tokenize_whitespace_normalized() {
    let tokens = lex("1 +\n2\t* 3");

    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Number,
            TokenKind::MathOp,
            TokenKind::Number,
            TokenKind::MathOp,
            TokenKind::Number,
            TokenKind::EndOfText,
        ]
    );
}

#[test]
fn test_tokenize_unknown_run_stops_at_separator() {
    let tokens = lex("@@@ (1)");

    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Unknown,
            TokenKind::OpenParen,
            TokenKind::Number,
            TokenKind::CloseParen,
            TokenKind::EndOfText,
        ]
    );
    assert_eq!(tokens[0].value, "@@@");
}

#[test]
fn test_tokenize_square_bracket_identifiers() {
    let config = LexerConfig {
        string_mode: StringDelimiterMode::Both,
        identifier_mode: IdentifierDelimiterMode::SquareBracket,
    };
    let tokens = tokenize("[colonna strana] = 1", None, config).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "colonna strana");
    assert_eq!(tokens[1].kind, TokenKind::RelationalOp);
}

#[test]
fn test_tokenize_double_quote_identifiers() {
    let config = LexerConfig {
        string_mode: StringDelimiterMode::SingleQuote,
        identifier_mode: IdentifierDelimiterMode::DoubleQuote,
    };
    let tokens = tokenize("\"col\" = 'x'", None, config).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "col");
    assert_eq!(tokens[2].kind, TokenKind::String);
    assert_eq!(tokens[2].value, "x");
}

#[test]
fn test_invalid_delimiter_config() {
    let config = LexerConfig {
        string_mode: StringDelimiterMode::Both,
        identifier_mode: IdentifierDelimiterMode::DoubleQuote,
    };
    let error = tokenize("1", None, config).unwrap_err();

    assert_eq!(error.get_error_name(), "InvalidDelimiterConfig");
}

#[test]
fn test_stream_must_be_opened() {
    let mut stream = TokenStream::new("1 + 2", None, LexerConfig::default());

    let error = stream.current_token().unwrap_err();
    assert_eq!(error.get_error_name(), "StreamNotOpen");
    let error = stream.move_next().unwrap_err();
    assert_eq!(error.get_error_name(), "StreamNotOpen");
}

#[test]
fn test_stream_closed_is_terminal() {
    let mut stream = TokenStream::new("1 + 2", None, LexerConfig::default());
    stream.open().unwrap();
    assert!(!stream.is_empty());

    stream.close();

    // Closing releases the token sequence.
    assert!(stream.is_empty());
    assert_eq!(
        stream.current_token().unwrap_err().get_error_name(),
        "StreamClosed"
    );
    assert_eq!(
        stream.move_next().unwrap_err().get_error_name(),
        "StreamClosed"
    );
    assert_eq!(stream.open().unwrap_err().get_error_name(), "StreamClosed");
}

#[test]
fn test_stream_sentinels() {
    let mut stream = TokenStream::new("1 + 2", None, LexerConfig::default());
    stream.open().unwrap();

    assert_eq!(stream.len(), 4);
    assert_eq!(stream.previous_token().unwrap().kind, TokenKind::StartOfText);

    let first = stream.advance().unwrap();
    assert_eq!(first.value, "1");
    assert_eq!(stream.next_token().unwrap().value, "2");

    // The cursor stays on the end-of-text sentinel once it is reached,
    // and lookahead repeats it.
    stream.move_to(3).unwrap();
    assert_eq!(stream.current_token_kind().unwrap(), TokenKind::EndOfText);
    assert!(!stream.move_next().unwrap());
    assert_eq!(stream.next_token().unwrap().kind, TokenKind::EndOfText);
}

#[test]
fn test_stream_move_to_out_of_range() {
    let mut stream = TokenStream::new("1", None, LexerConfig::default());
    stream.open().unwrap();

    assert!(stream.move_to(99).is_err());
}

#[test]
fn test_sub_stream_is_isolated() {
    let mut stream = TokenStream::new("1 + 2", None, LexerConfig::default());
    stream.open().unwrap();
    stream.move_to(1).unwrap();

    let mut sub = stream.sub_stream(stream.position()).unwrap();
    assert_eq!(sub.current_token().unwrap().value, "+");

    sub.advance().unwrap();
    sub.tag_current("marked").unwrap();

    // Advancing and tagging the copy is invisible in the parent.
    assert_eq!(stream.position(), 1);
    assert_eq!(stream.current_token().unwrap().value, "+");
    stream.move_to(2).unwrap();
    assert_eq!(stream.current_token().unwrap().tag, None);
}
