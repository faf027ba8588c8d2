//! Lexical analyzer for logic blocks.
//!
//! The logic block is written in the backend language. The compiler never
//! evaluates it, so the lexer only needs enough detail to find statement
//! boundaries reliably: names, numbers, strings (every prefix and quote
//! style, including triple-quoted strings that span lines), comments,
//! operators, brackets and line continuations.
//!
//! The public entry point is [`tokenize`], which performs error-recovering
//! lexical analysis and collects all diagnostics in a single pass.

use winnow::{
    Parser as _,
    combinator::{alt, cut_err, not, opt, preceded, repeat},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{any, literal, none_of, one_of, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    logic::tokens::{PositionedToken, Token},
    span::Span,
};

/// Rich diagnostic information for lexer errors.
///
/// Attached to winnow errors via `.context()` to provide detailed error
/// messages with codes, help text, and precise span information.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    pub code: ErrorCode,
    pub message: &'static str,
    pub help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    pub start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<'a, O> = ModalResult<O, ContextError<LexerDiagnostic>>;

pub(super) fn is_string_prefix(c: char) -> bool {
    matches!(c, 'r' | 'R' | 'b' | 'B' | 'u' | 'U' | 'f' | 'F')
}

/// Parse the rest of a single-line string after its opening quote.
///
/// A backslash escapes any character, including a newline.
fn short_string_body<'a>(input: &mut Input<'a>, quote: char) -> IResult<'a, ()> {
    let escaped = preceded('\\', any).void();
    let plain = none_of([quote, '\\', '\n']).void();
    let () = repeat(0.., alt((escaped, plain))).parse_next(input)?;
    quote.void().parse_next(input)
}

/// Parse the rest of a triple-quoted string after its opening quotes.
fn long_string_body<'a>(input: &mut Input<'a>, quote: &str) -> IResult<'a, ()> {
    let escaped = preceded('\\', any).void();
    let plain = preceded(not(literal(quote)), any).void();
    let () = repeat(0.., alt((escaped, plain))).parse_next(input)?;
    literal(quote).void().parse_next(input)
}

/// Parse the quotes and content of a string literal.
///
/// Commits once the opening quote is seen, so a missing closing quote is
/// reported as E100 with a span starting at `start`.
fn string_body<'a>(input: &mut Input<'a>, start: usize) -> IResult<'a, ()> {
    let quote = alt((r#"""""#, "'''", "\"", "'")).parse_next(input)?;
    let quote_char = if quote.starts_with('"') { '"' } else { '\'' };

    cut_err(move |input: &mut Input<'a>| {
        if quote.len() == 3 {
            long_string_body(input, quote)
        } else {
            short_string_body(input, quote_char)
        }
    })
    .context(LexerDiagnostic {
        code: ErrorCode::E100,
        message: "unterminated string literal",
        help: Some("add the closing quote"),
        start,
    })
    .parse_next(input)
}

/// Parse a string literal with an optional prefix (`r`, `b`, `f`, `rb`, ...).
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start = input.current_token_start();
    (
        take_while(0..=2, is_string_prefix),
        move |input: &mut Input<'a>| string_body(input, start),
    )
        .take()
        .map(Token::String)
        .parse_next(input)
}

/// Parse a comment starting with '#'
fn comment<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    ('#', take_while(0.., |c: char| c != '\n' && c != '\r'))
        .take()
        .map(Token::Comment)
        .parse_next(input)
}

/// Parse identifiers and keywords
fn name<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    (
        one_of(|c: char| c.is_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_alphanumeric() || c == '_'),
    )
        .take()
        .map(Token::Name)
        .parse_next(input)
}

/// Parse numeric literals loosely: digits followed by any number characters.
fn number<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let number_char = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.';
    alt((
        (one_of(|c: char| c.is_ascii_digit()), take_while(0.., number_char)).take(),
        (
            '.',
            take_while(1.., |c: char| c.is_ascii_digit()),
            take_while(0.., number_char),
        )
            .take(),
    ))
    .map(Token::Number)
    .parse_next(input)
}

/// Parse operators and delimiters (longest first)
fn operator<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        alt(("**=", "//=", ">>=", "<<=", "...")),
        alt(("->", ":=", "==", "!=", "<=", ">=", "**", "//", "<<", ">>")),
        alt(("+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "@=")),
        one_of([
            '+', '-', '*', '/', '%', '@', '&', '|', '^', '~', '<', '>', '=', '.', ',', ':', ';',
            '!',
        ])
        .take(),
    ))
    .map(Token::Op)
    .parse_next(input)
}

/// Parse opening and closing brackets
fn bracket<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        one_of(['(', '[', '{']).map(Token::Open),
        one_of([')', ']', '}']).map(Token::Close),
    ))
    .parse_next(input)
}

/// Parse a backslash line continuation
fn continuation<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    ('\\', opt('\r'), '\n')
        .value(Token::Continuation)
        .parse_next(input)
}

/// Parse newline
fn newline<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    (opt('\r'), '\n').value(Token::Newline).parse_next(input)
}

/// Parse whitespace (spaces, tabs and form feeds but not newlines)
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., [' ', '\t', '\x0c'])
        .value(Token::Whitespace)
        .parse_next(input)
}

/// Parse a single token with position tracking
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<'a, PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        comment,        // Must come before operators
        continuation,   // Must come before any single char
        newline,        // Must come before whitespace
        whitespace,     // General whitespace
        string_literal, // Must come before name (string prefixes are letters)
        name,           // Identifiers and keywords
        number,         // Must come before operators ('.5')
        bracket,        // Opening and closing brackets
        operator,       // Operators and delimiters
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    let span = Span::new(start_pos..end_pos);

    Ok(PositionedToken::new(token, span))
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer.
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Tokenize the input, collecting tokens and errors.
    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            let checkpoint = input.checkpoint();
            let token_start = input.current_token_start();

            match positioned_token(&mut input) {
                Ok(token) => {
                    self.tokens.push(token);
                }
                Err(ErrMode::Cut(ctx)) => {
                    let error_pos = input.current_token_start();
                    self.diagnostics.emit(Self::convert_context(&ctx, error_pos));
                    if !input.is_empty() {
                        input.next_token();
                    }
                }
                Err(_) => {
                    // No alternative matched: report the character and skip it.
                    input.reset(&checkpoint);
                    let Some(ch) = input.next_token() else {
                        break;
                    };
                    let span = Span::new(token_start..token_start + ch.len_utf8());
                    self.diagnostics.emit(
                        Diagnostic::error(format!("unexpected character `{ch}`"))
                            .with_code(ErrorCode::E105)
                            .with_label(span, ErrorCode::E105.description()),
                    );
                }
            }
        }
    }

    /// Finish lexing and return tokens or collected errors.
    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|()| self.tokens)
    }

    /// Convert a committed winnow error into a Diagnostic.
    ///
    /// Extracts `LexerDiagnostic` from the error context for rich error info
    /// with code, message, and help.
    fn convert_context(ctx: &ContextError<LexerDiagnostic>, error_pos: usize) -> Diagnostic {
        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = ctx.context().next()
        {
            let span = Span::new(*start..error_pos);

            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(span, code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        let span = Span::new(error_pos..error_pos.saturating_add(1));
        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E105)
            .with_label(span, ErrorCode::E105.description())
    }
}

/// Tokenize a logic block, collecting multiple errors.
///
/// # Returns
///
/// - `Ok(tokens)` - All tokens successfully parsed
/// - `Err(ParseError)` - One or more errors occurred; contains all diagnostics
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let located_input = LocatingSlice::new(input);
    let mut lexer = Lexer::new();
    lexer.tokenize(located_input);
    lexer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_single_token(input: &str, expected: Token<'_>) {
        let mut located_input = LocatingSlice::new(input);
        let result = positioned_token(&mut located_input);
        assert!(result.is_ok(), "Failed to parse: {}", input);
        let positioned = result.unwrap();
        assert_eq!(positioned.token, expected);
        assert_eq!(positioned.span, Span::new(0..input.len()));
    }

    fn significant(input: &str) -> Vec<Token<'_>> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .filter(Token::is_significant)
            .collect()
    }

    fn error_codes(input: &str) -> Vec<ErrorCode> {
        tokenize(input)
            .unwrap_err()
            .diagnostics()
            .iter()
            .filter_map(|d| d.code())
            .collect()
    }

    #[test]
    fn test_names_and_numbers() {
        test_single_token("title", Token::Name("title"));
        test_single_token("_private", Token::Name("_private"));
        test_single_token("ünïcode", Token::Name("ünïcode"));
        test_single_token("42", Token::Number("42"));
        test_single_token("3.14", Token::Number("3.14"));
        test_single_token("0x1F", Token::Number("0x1F"));
        test_single_token(".5", Token::Number(".5"));
    }

    #[test]
    fn test_strings() {
        test_single_token(r#""Nexy""#, Token::String(r#""Nexy""#));
        test_single_token("'single'", Token::String("'single'"));
        test_single_token(r#"f"{name}!""#, Token::String(r#"f"{name}!""#));
        test_single_token(r#"rb'\d+'"#, Token::String(r#"rb'\d+'"#));
        test_single_token(r#""say \"hi\"""#, Token::String(r#""say \"hi\"""#));
        test_single_token(
            "\"\"\"multi\nline \"quoted\"\n\"\"\"",
            Token::String("\"\"\"multi\nline \"quoted\"\n\"\"\""),
        );
        test_single_token("''''''", Token::String("''''''"));
    }

    #[test]
    fn test_operators() {
        test_single_token("**=", Token::Op("**="));
        test_single_token("->", Token::Op("->"));
        test_single_token(":=", Token::Op(":="));
        test_single_token("==", Token::Op("=="));
        test_single_token("=", Token::Op("="));
        test_single_token("...", Token::Op("..."));
        test_single_token("@", Token::Op("@"));
    }

    #[test]
    fn test_comment_and_continuation() {
        test_single_token("# note", Token::Comment("# note"));
        test_single_token("\\\n", Token::Continuation);
        test_single_token("\r\n", Token::Newline);
    }

    #[test]
    fn test_assignment_statement() {
        assert_eq!(
            significant("title: prop[str] = \"Home\"  # heading"),
            vec![
                Token::Name("title"),
                Token::Op(":"),
                Token::Name("prop"),
                Token::Open('['),
                Token::Name("str"),
                Token::Close(']'),
                Token::Op("="),
                Token::String("\"Home\""),
            ]
        );
    }

    #[test]
    fn test_name_followed_by_quote_is_not_prefix() {
        assert_eq!(
            significant("value'x'"),
            vec![Token::Name("value"), Token::String("'x'")]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("x = \"open\ny = 1").unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.labels()[0].span().start(), 4);
    }

    #[test]
    fn test_unterminated_triple_quoted_string() {
        assert_eq!(error_codes("doc = '''never closed\n\nx = 1"), vec![ErrorCode::E100]);
    }

    #[test]
    fn test_unexpected_characters_collected() {
        assert_eq!(
            error_codes("a = $b ? c"),
            vec![ErrorCode::E105, ErrorCode::E105]
        );
    }

    #[test]
    fn test_unexpected_character_span() {
        let err = tokenize("x = `y`").unwrap_err();
        let span = err.diagnostics()[0].labels()[0].span();
        assert_eq!(span, Span::new(4..5));
    }
}
