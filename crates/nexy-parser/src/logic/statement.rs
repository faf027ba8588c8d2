//! Groups logic-block tokens into top-level statements.
//!
//! Only the first level of the block is analysed. Indented lines are attached
//! to the compound statement that owns them and never inspected further.

use std::borrow::Cow;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    logic::{
        lexer, literal,
        tokens::{PositionedToken, Token},
    },
    span::Span,
};

/// Keywords that may start a compound statement.
const BLOCK_KEYWORDS: &[&str] = &[
    "if", "elif", "else", "for", "while", "try", "except", "finally", "with", "def", "class",
    "async", "match",
];

/// Keywords that continue the preceding compound statement.
const CONTINUATION_KEYWORDS: &[&str] = &["elif", "else", "except", "finally"];

/// A top-level statement of the logic block.
#[derive(Debug, Clone)]
pub(crate) struct Statement<'a> {
    tokens: Vec<PositionedToken<'a>>,
    span: Span,
    compound: bool,
    /// String literals that span lines, in source order.
    multiline: Vec<Span>,
}

impl<'a> Statement<'a> {
    /// Significant tokens of the statement's header.
    ///
    /// For simple statements this is the whole statement. For compound
    /// statements it is the first line after any decorators.
    pub fn tokens(&self) -> &[PositionedToken<'a>] {
        &self.tokens
    }

    /// Span of the whole statement, decorators and body included.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn is_compound(&self) -> bool {
        self.compound
    }

    /// The statement's text in `source`.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.range()]
    }

    /// The statement's text with every string literal on a single line.
    pub fn rendered<'s>(&self, source: &'s str) -> Cow<'s, str> {
        let text = self.text(source);
        if self.multiline.is_empty() {
            return Cow::Borrowed(text);
        }

        let base = self.span.start();
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        for span in &self.multiline {
            let range = span.start() - base..span.end() - base;
            out.push_str(&text[cursor..range.start]);
            out.push_str(&literal::single_line(&text[range.clone()]));
            cursor = range.end;
        }
        out.push_str(&text[cursor..]);
        Cow::Owned(out)
    }
}

fn multiline_strings(tokens: &[PositionedToken<'_>]) -> impl Iterator<Item = Span> {
    tokens
        .iter()
        .filter(|token| matches!(token.token, Token::String(text) if text.contains('\n')))
        .map(|token| token.span)
}

/// Significant tokens between two newlines outside of brackets.
#[derive(Debug)]
struct LogicalLine<'a> {
    tokens: Vec<PositionedToken<'a>>,
    indented: bool,
}

impl<'a> LogicalLine<'a> {
    fn span(&self) -> Span {
        match (self.tokens.first(), self.tokens.last()) {
            (Some(first), Some(last)) => first.span.union(last.span),
            _ => Span::default(),
        }
    }

    fn starts_with_any(&self, keywords: &[&str]) -> bool {
        matches!(
            self.tokens.first().map(|t| t.token),
            Some(Token::Name(name)) if keywords.contains(&name)
        )
    }

    fn is_decorator(&self) -> bool {
        self.tokens.first().is_some_and(|t| t.is_op("@"))
    }

    /// A header whose body must follow on the next indented lines.
    fn expects_block(&self) -> bool {
        self.tokens.last().is_some_and(|t| t.is_op(":"))
    }

    fn is_compound(&self) -> bool {
        self.expects_block()
            || (self.starts_with_any(BLOCK_KEYWORDS) && has_top_level_op(&self.tokens, ":"))
    }
}

/// Returns `true` if `op` appears in `tokens` outside of any bracket.
pub(crate) fn has_top_level_op(tokens: &[PositionedToken<'_>], op: &str) -> bool {
    split_top_level(tokens, op).len() > 1
}

/// Split `tokens` at every occurrence of `op` outside of brackets.
///
/// Always returns at least one (possibly empty) part.
pub(crate) fn split_top_level<'t, 'a>(
    tokens: &'t [PositionedToken<'a>],
    op: &str,
) -> Vec<&'t [PositionedToken<'a>]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, token) in tokens.iter().enumerate() {
        match token.token {
            Token::Open(_) => depth += 1,
            Token::Close(_) => depth = depth.saturating_sub(1),
            Token::Op(o) if depth == 0 && o == op => {
                parts.push(&tokens[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&tokens[start..]);
    parts
}

fn closing_bracket(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

fn is_indented(source: &str, offset: usize) -> bool {
    let line_start = source[..offset].rfind('\n').map_or(0, |index| index + 1);
    line_start < offset
}

/// Split the token stream into logical lines, checking bracket balance.
fn logical_lines<'a>(
    source: &str,
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: &mut DiagnosticCollector,
) -> Vec<LogicalLine<'a>> {
    let mut lines = Vec::new();
    let mut current: Vec<PositionedToken<'a>> = Vec::new();
    let mut brackets: Vec<(char, Span)> = Vec::new();

    let mut finish = |current: &mut Vec<PositionedToken<'a>>| {
        if let Some(first) = current.first() {
            let indented = is_indented(source, first.span.start());
            lines.push(LogicalLine {
                tokens: std::mem::take(current),
                indented,
            });
        }
    };

    for token in tokens {
        match token.token {
            Token::Open(open) => {
                brackets.push((open, token.span));
                current.push(token);
            }
            Token::Close(close) => match brackets.pop() {
                Some((open, _)) if closing_bracket(open) == close => current.push(token),
                Some((open, open_span)) => {
                    diagnostics.emit(
                        Diagnostic::error(format!(
                            "closing bracket `{close}` does not match `{open}`"
                        ))
                        .with_code(ErrorCode::E102)
                        .with_label(token.span, ErrorCode::E102.description())
                        .with_secondary_label(open_span, "opened here"),
                    );
                    current.push(token);
                }
                None => {
                    diagnostics.emit(
                        Diagnostic::error(format!("unmatched closing bracket `{close}`"))
                            .with_code(ErrorCode::E102)
                            .with_label(token.span, ErrorCode::E102.description()),
                    );
                }
            },
            Token::Newline if brackets.is_empty() => finish(&mut current),
            _ if token.is_significant() => current.push(token),
            _ => {}
        }
    }

    for (open, span) in brackets {
        diagnostics.emit(
            Diagnostic::error(format!("bracket `{open}` was never closed"))
                .with_code(ErrorCode::E101)
                .with_label(span, ErrorCode::E101.description())
                .with_help(format!("add the closing `{}`", closing_bracket(open))),
        );
    }
    finish(&mut current);

    lines
}

fn missing_block(header: &LogicalLine<'_>) -> Diagnostic {
    let keyword = header
        .tokens
        .first()
        .map(|token| token.token.to_string())
        .unwrap_or_default();
    Diagnostic::error(format!("expected an indented block after `{keyword}`"))
        .with_code(ErrorCode::E104)
        .with_label(header.span(), ErrorCode::E104.description())
        .with_help("indent the body of the statement")
}

/// Groups logical lines into statements while tracking the open compound
/// statement.
#[derive(Default)]
struct Grouper<'a> {
    statements: Vec<Statement<'a>>,
    open: Option<Statement<'a>>,
    awaiting_block: Option<LogicalLine<'a>>,
    decorators: Option<Span>,
    decorator_strings: Vec<Span>,
}

impl<'a> Grouper<'a> {
    fn flush(&mut self) {
        if let Some(statement) = self.open.take() {
            self.statements.push(statement);
        }
    }

    fn line(&mut self, line: LogicalLine<'a>, diagnostics: &mut DiagnosticCollector) {
        if line.indented {
            match self.open.as_mut() {
                Some(statement) => {
                    statement.span = statement.span.union(line.span());
                    statement.multiline.extend(multiline_strings(&line.tokens));
                    self.awaiting_block = None;
                }
                None => diagnostics.emit(
                    Diagnostic::error("unexpected indent")
                        .with_code(ErrorCode::E103)
                        .with_label(line.span(), ErrorCode::E103.description())
                        .with_help("remove the indentation or attach the line to a block"),
                ),
            }
            return;
        }

        if let Some(header) = self.awaiting_block.take() {
            diagnostics.emit(missing_block(&header));
        }

        if line.is_decorator() {
            self.flush();
            let span = line.span();
            self.decorators = Some(self.decorators.map_or(span, |d| d.union(span)));
            self.decorator_strings.extend(multiline_strings(&line.tokens));
            return;
        }

        if line.starts_with_any(CONTINUATION_KEYWORDS) && self.decorators.is_none() {
            if let Some(statement) = self.open.as_mut() {
                statement.span = statement.span.union(line.span());
                statement.multiline.extend(multiline_strings(&line.tokens));
                if line.expects_block() {
                    self.awaiting_block = Some(line);
                }
                return;
            }
        }

        self.flush();
        let decorators = self.decorators.take();
        let with_decorators = |span: Span| decorators.map_or(span, |d| d.union(span));
        let mut decorator_strings = std::mem::take(&mut self.decorator_strings);

        if line.is_compound() {
            decorator_strings.extend(multiline_strings(&line.tokens));
            self.open = Some(Statement {
                tokens: line.tokens.clone(),
                span: with_decorators(line.span()),
                compound: true,
                multiline: decorator_strings,
            });
            if line.expects_block() {
                self.awaiting_block = Some(line);
            }
            return;
        }

        let mut first = true;
        for part in split_top_level(&line.tokens, ";") {
            let (Some(start), Some(end)) = (part.first(), part.last()) else {
                continue;
            };
            let span = start.span.union(end.span);
            let mut multiline = std::mem::take(&mut decorator_strings);
            multiline.extend(multiline_strings(part));
            self.statements.push(Statement {
                tokens: part.to_vec(),
                span: if first { with_decorators(span) } else { span },
                compound: false,
                multiline,
            });
            first = false;
        }
    }

    fn finish(mut self, diagnostics: &mut DiagnosticCollector) -> Vec<Statement<'a>> {
        if let Some(header) = self.awaiting_block.take() {
            diagnostics.emit(missing_block(&header));
        }
        self.flush();
        self.statements
    }
}

/// Tokenize `source` and group it into top-level statements.
///
/// Spans are byte offsets into `source`.
pub(crate) fn statements(source: &str) -> Result<Vec<Statement<'_>>, ParseError> {
    let tokens = lexer::tokenize(source)?;

    let mut diagnostics = DiagnosticCollector::new();
    let lines = logical_lines(source, tokens, &mut diagnostics);

    let mut grouper = Grouper::default();
    for line in lines {
        grouper.line(line, &mut diagnostics);
    }
    let statements = grouper.finish(&mut diagnostics);

    diagnostics.finish().map(|()| statements)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str) -> Vec<&str> {
        statements(source)
            .unwrap()
            .iter()
            .map(|statement| statement.text(source))
            .collect()
    }

    fn error_codes(source: &str) -> Vec<ErrorCode> {
        statements(source)
            .unwrap_err()
            .diagnostics()
            .iter()
            .filter_map(|d| d.code())
            .collect()
    }

    #[test]
    fn test_simple_statements() {
        assert_eq!(
            texts("a = 1\n\n# comment\nb = 2  # trailing"),
            vec!["a = 1", "b = 2"]
        );
    }

    #[test]
    fn test_compound_statement_with_branches() {
        let source = "a = 1\nif a:\n    b = 2\nelif a > 2:\n    b = 3\nelse:\n    b = 4\nc = 5";
        assert_eq!(
            texts(source),
            vec![
                "a = 1",
                "if a:\n    b = 2\nelif a > 2:\n    b = 3\nelse:\n    b = 4",
                "c = 5"
            ]
        );
    }

    #[test]
    fn test_decorated_definition() {
        let source = "@cache\n@trace(level=2)\ndef load():\n    return 1\nx = load()";
        let statements = statements(source).unwrap();

        assert_eq!(statements.len(), 2);
        assert!(statements[0].is_compound());
        assert_eq!(
            statements[0].text(source),
            "@cache\n@trace(level=2)\ndef load():\n    return 1"
        );
        assert!(statements[0].tokens()[0].is_name("def"));
    }

    #[test]
    fn test_semicolons_split_simple_statements() {
        assert_eq!(texts("a = 1; b = 2;"), vec!["a = 1", "b = 2"]);
    }

    #[test]
    fn test_single_line_compound_statement() {
        let statements = statements("if ready: a = 1; b = 2").unwrap();
        assert_eq!(statements.len(), 1);
        assert!(statements[0].is_compound());
    }

    #[test]
    fn test_brackets_and_continuations_join_lines() {
        let source = "items = [\n    1,\n    2,\n]\ntotal = 1 + \\\n    2\ndoc = \"\"\"\nline\n\"\"\"";
        assert_eq!(
            texts(source),
            vec![
                "items = [\n    1,\n    2,\n]",
                "total = 1 + \\\n    2",
                "doc = \"\"\"\nline\n\"\"\""
            ]
        );
    }

    #[test]
    fn test_rendered_puts_strings_on_one_line() {
        let source = "@route(\"\"\"a\nb\"\"\")\ndef page():\n    '''Doc\n    more'''\n    return 1\nx = 1; y = '''p\nq'''";
        let rendered: Vec<String> = statements(source)
            .unwrap()
            .iter()
            .map(|statement| statement.rendered(source).into_owned())
            .collect();

        assert_eq!(
            rendered,
            vec![
                "@route(\"\"\"a\\nb\"\"\")\ndef page():\n    '''Doc\\n    more'''\n    return 1",
                "x = 1",
                "y = '''p\\nq'''",
            ]
        );
    }

    #[test]
    fn test_keyword_named_variable_is_simple() {
        let statements = statements("match = find(x)").unwrap();
        assert!(!statements[0].is_compound());
    }

    #[test]
    fn test_unexpected_indent() {
        assert_eq!(error_codes("a = 1\n    b = 2"), vec![ErrorCode::E103]);
    }

    #[test]
    fn test_missing_block() {
        assert_eq!(error_codes("def f():\nx = 1"), vec![ErrorCode::E104]);
        assert_eq!(error_codes("for item in items:"), vec![ErrorCode::E104]);
    }

    #[test]
    fn test_unclosed_bracket() {
        let err = statements("values = [1, 2\nx = 3").unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E101));
        assert_eq!(diag.labels()[0].span(), Span::new(9..10));
    }

    #[test]
    fn test_unmatched_closing_bracket() {
        assert_eq!(error_codes("x = 1)"), vec![ErrorCode::E102]);
        assert_eq!(error_codes("x = (1]"), vec![ErrorCode::E102]);
    }

    #[test]
    fn test_lexer_errors_reported_first() {
        assert_eq!(error_codes("x = 'open\n    y = 1"), vec![ErrorCode::E100]);
    }
}
