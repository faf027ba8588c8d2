//! Single-line rendering of string literals that span lines.
//!
//! The rendered logic block ends up re-indented inside a function body. A
//! literal whose content continues on later lines would pick up that
//! indentation, so it is rewritten on one line with the same value:
//!
//! - regular strings get `\n` escapes and lose backslash-newline
//!   continuations
//! - raw strings cannot escape, so they become a parenthesized implicit
//!   concatenation with a regular literal for each line break
//!
//! Inside the replacement fields of f-strings a line break is plain
//! whitespace and becomes a space.

use std::{borrow::Cow, iter::Peekable, str::Chars};

use super::lexer::is_string_prefix;

#[derive(Debug, Clone, Copy)]
struct Prefix {
    raw: bool,
    format: bool,
    bytes: bool,
}

impl Prefix {
    fn of(prefix: &str) -> Self {
        let has = |flag: char| prefix.chars().any(|c| c.eq_ignore_ascii_case(&flag));
        Self {
            raw: has('r'),
            format: has('f'),
            bytes: has('b'),
        }
    }
}

/// Rewrite a string literal token, prefix and quotes included, so that it
/// fits on one line. Literals without a line break are returned as is.
pub(super) fn single_line(literal: &str) -> Cow<'_, str> {
    if !literal.contains('\n') {
        return Cow::Borrowed(literal);
    }

    let prefix_len = literal
        .find(|c: char| !is_string_prefix(c))
        .unwrap_or(literal.len());
    let (prefix, rest) = literal.split_at(prefix_len);
    let quote_len = if rest.starts_with("\"\"\"") || rest.starts_with("'''") {
        3
    } else {
        1
    };
    if rest.len() < 2 * quote_len {
        return Cow::Borrowed(literal);
    }
    let quote = &rest[..quote_len];
    let body = rest[quote_len..rest.len() - quote_len].replace("\r\n", "\n");

    let flags = Prefix::of(prefix);
    Cow::Owned(if flags.raw {
        concatenated(prefix, quote, &body, flags)
    } else {
        escaped(prefix, quote, &body, flags)
    })
}

/// Copy a brace of an f-string body, tracking replacement-field nesting.
fn brace(c: char, depth: &mut usize, chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    out.push(c);
    if *depth == 0 && chars.peek() == Some(&c) {
        // `{{` and `}}` are literal braces.
        chars.next();
        out.push(c);
    } else if c == '{' {
        *depth += 1;
    } else {
        *depth = depth.saturating_sub(1);
    }
}

fn escaped(prefix: &str, quote: &str, body: &str, flags: Prefix) -> String {
    let mut out = String::with_capacity(body.len() + 8);
    let mut depth = 0;
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('\n') => {}
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            '\n' if depth == 0 => out.push_str("\\n"),
            '\n' => out.push(' '),
            '{' | '}' if flags.format => brace(c, &mut depth, &mut chars, &mut out),
            _ => out.push(c),
        }
    }

    // A dropped continuation can leave the quote character right before the
    // closing quotes.
    if let Some(quote_char) = quote.chars().next()
        && out.ends_with(quote_char)
    {
        let before = &out[..out.len() - quote_char.len_utf8()];
        let backslashes = before.len() - before.trim_end_matches('\\').len();
        if backslashes % 2 == 0 {
            out.pop();
            out.push('\\');
            out.push(quote_char);
        }
    }

    format!("{prefix}{quote}{out}{quote}")
}

/// Split a raw body at the line breaks outside of replacement fields.
fn raw_lines(body: &str, format: bool) -> Vec<String> {
    let mut lines = vec![String::new()];
    let mut depth = 0;
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' && depth == 0 {
            lines.push(String::new());
            continue;
        }
        let Some(line) = lines.last_mut() else {
            break;
        };
        match c {
            '\n' => line.push(' '),
            '{' | '}' if format => brace(c, &mut depth, &mut chars, line),
            _ => line.push(c),
        }
    }
    lines
}

fn concatenated(prefix: &str, quote: &str, body: &str, flags: Prefix) -> String {
    let quote_char = quote.chars().next().unwrap_or('"');
    let separator_prefix = if flags.bytes { "b" } else { "" };

    let lines = raw_lines(body, flags.format);
    let last = lines.len() - 1;
    let mut parts = Vec::with_capacity(lines.len() * 2);

    for (index, line) in lines.iter().enumerate() {
        if index == last {
            parts.push(format!("{prefix}{quote}{line}{quote}"));
            break;
        }
        // Trailing backslashes and quotes cannot end a raw piece, they move
        // into the escaped separator.
        let kept = line.trim_end_matches(|c| c == '\\' || c == quote_char);
        let moved: String = line[kept.len()..]
            .chars()
            .map(|c| match c {
                '\\' => "\\\\".to_string(),
                '\'' => "\\'".to_string(),
                c => c.to_string(),
            })
            .collect();
        parts.push(format!("{prefix}{quote}{kept}{quote}"));
        parts.push(format!("{separator_prefix}'{moved}\\n'"));
    }

    format!("({})", parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_literal_unchanged() {
        assert!(matches!(single_line("\"Nexy\""), Cow::Borrowed("\"Nexy\"")));
        assert!(matches!(
            single_line("'''one line'''"),
            Cow::Borrowed("'''one line'''")
        ));
    }

    #[test]
    fn test_triple_quoted_lines_escaped() {
        assert_eq!(
            single_line("\"\"\"line one\nline two\n\nline four\"\"\""),
            r#""""line one\nline two\n\nline four""""#
        );
        assert_eq!(single_line("'''a\n   \nb'''"), r"'''a\n   \nb'''");
        assert_eq!(single_line("b'''x\r\ny'''"), r"b'''x\ny'''");
    }

    #[test]
    fn test_continuation_removed() {
        assert_eq!(single_line("'a\\\nb'"), "'ab'");
        assert_eq!(
            single_line("\"\"\"say \"hi\"\\\n\"\"\""),
            r##""""say "hi\"""""##
        );
    }

    #[test]
    fn test_escapes_kept() {
        assert_eq!(single_line("'''tab\\t\nend'''"), r"'''tab\t\nend'''");
        assert_eq!(single_line("'''a\\\\\nb'''"), r"'''a\\\nb'''");
    }

    #[test]
    fn test_format_string_fields() {
        assert_eq!(
            single_line("f\"\"\"{value\n}\ntext\"\"\""),
            r#"f"""{value }\ntext""""#
        );
        assert_eq!(single_line("f'''{{\n}}'''"), r"f'''{{\n}}'''");
    }

    #[test]
    fn test_raw_strings_concatenated() {
        assert_eq!(
            single_line("r'''\\d+\n\\w+'''"),
            r"(r'''\d+''' '\n' r'''\w+''')"
        );
        assert_eq!(
            single_line("r\"\"\"a\\\nb\"\"\""),
            r##"(r"""a""" '\\\n' r"""b""")"##
        );
        assert_eq!(
            single_line("rb'''x\ny'''"),
            r"(rb'''x''' b'\n' rb'''y''')"
        );
    }

    #[test]
    fn test_raw_piece_ending_in_quote() {
        assert_eq!(
            single_line("r'''it'\nok'''"),
            r"(r'''it''' '\'\n' r'''ok''')"
        );
    }
}
