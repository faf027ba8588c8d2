//! Rewrites component tags in the template block into template-engine calls.
//!
//! Tags whose name starts with an upper-case letter are components:
//!
//! ```text
//! <Badge label="new" />              {{ Badge(label="new") }}
//! <Card title="Hi">body</Card>   =>  {% call Card(title="Hi") %}body{% endcall %}
//! ```
//!
//! Lower-case tags are plain markup and pass through untouched. Markup
//! comments are removed.

use std::{collections::HashSet, ops::Range, sync::LazyLock};

use log::trace;
use regex::Regex;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
};

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+)=(?:"([^"]*)"|'([^']*)')"#).expect("attribute pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum TagKind<'m> {
    Open {
        attributes: &'m str,
        self_closing: bool,
    },
    Close,
}

/// A component tag found in the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Tag<'m> {
    name: &'m str,
    kind: TagKind<'m>,
    span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece<'m> {
    Text(&'m str),
    Tag(Tag<'m>),
}

/// Translates component tags, checking that every component is known and
/// that tags are balanced.
#[derive(Debug, Clone, Copy)]
pub struct TemplateParser<'k> {
    known: &'k HashSet<String>,
}

impl<'k> TemplateParser<'k> {
    /// Create a parser that accepts the component names in `known`.
    pub fn new(known: &'k HashSet<String>) -> Self {
        Self { known }
    }

    /// Translate `markup`, the template block found at byte `offset` of the
    /// component file.
    ///
    /// # Errors
    ///
    /// - [`ErrorCode::E300`] for the first component that is not known
    /// - [`ErrorCode::E301`] for closing tags without a matching opening tag
    /// - [`ErrorCode::E302`] for opening tags that are never closed
    /// - [`ErrorCode::E303`] for tags without their closing `>`
    pub fn parse(&self, markup: &str, offset: usize) -> Result<String, ParseError> {
        let to_file = |span: Span| span.shift(offset);
        let mut diagnostics = DiagnosticCollector::new();
        let pieces = lex(markup, &mut diagnostics);

        if let Some(tag) = pieces.iter().find_map(|piece| match piece {
            Piece::Tag(tag @ Tag {
                kind: TagKind::Open { .. },
                ..
            }) if !self.known.contains(tag.name) => Some(tag),
            _ => None,
        }) {
            return Err(unknown_component(tag).map_spans(to_file).into());
        }

        let mut output = String::with_capacity(markup.len());
        let mut open: Vec<&Tag<'_>> = Vec::new();
        for piece in &pieces {
            match piece {
                Piece::Text(text) => output.push_str(text),
                Piece::Tag(tag) => match &tag.kind {
                    TagKind::Open {
                        attributes,
                        self_closing: true,
                    } => {
                        output.push_str(&format!(
                            "{{{{ {}({}) }}}}",
                            tag.name,
                            call_arguments(attributes)
                        ));
                    }
                    TagKind::Open { attributes, .. } => {
                        output.push_str(&format!(
                            "{{% call {}({}) %}}",
                            tag.name,
                            call_arguments(attributes)
                        ));
                        open.push(tag);
                    }
                    TagKind::Close => match open.last() {
                        Some(innermost) if innermost.name == tag.name => {
                            open.pop();
                            output.push_str("{% endcall %}");
                        }
                        Some(innermost) => diagnostics.emit(
                            Diagnostic::error(format!(
                                "closing tag `</{}>` does not match `<{}>`",
                                tag.name, innermost.name
                            ))
                            .with_code(ErrorCode::E301)
                            .with_label(tag.span, "orphan closing tag")
                            .with_secondary_label(innermost.span, "innermost open tag"),
                        ),
                        None => diagnostics.emit(
                            Diagnostic::error(format!(
                                "closing tag `</{}>` has no opening tag",
                                tag.name
                            ))
                            .with_code(ErrorCode::E301)
                            .with_label(tag.span, "orphan closing tag"),
                        ),
                    },
                },
            }
        }

        for tag in open {
            diagnostics.emit(
                Diagnostic::error(format!("component tag `<{}>` is never closed", tag.name))
                    .with_code(ErrorCode::E302)
                    .with_label(tag.span, ErrorCode::E302.description())
                    .with_help(format!(
                        "add `</{}>` or make the tag self-closing with `/>`",
                        tag.name
                    )),
            );
        }

        diagnostics.finish().map_err(|err| err.map_spans(to_file))?;

        trace!(pieces = pieces.len(); "Translated template block");
        Ok(output.trim().to_string())
    }
}

fn unknown_component(tag: &Tag<'_>) -> Diagnostic {
    Diagnostic::error(format!("unknown component `<{}>`", tag.name))
        .with_code(ErrorCode::E300)
        .with_label(tag.span, "not imported or defined")
        .with_help(format!(
            "import `{}` in the logic block or define it there",
            tag.name
        ))
}

/// Render `key="value"` attributes as call arguments, keeping quote style.
///
/// Attributes in any other form are dropped.
fn call_arguments(attributes: &str) -> String {
    ATTRIBUTE
        .captures_iter(attributes)
        .filter_map(|captures| {
            let key = captures.get(1)?.as_str();
            match (captures.get(2), captures.get(3)) {
                (Some(value), _) => Some(format!("{key}=\"{}\"", value.as_str())),
                (_, Some(value)) => Some(format!("{key}='{}'", value.as_str())),
                _ => None,
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Split `markup` into text and component tags, dropping comments.
fn lex<'m>(markup: &'m str, diagnostics: &mut DiagnosticCollector) -> Vec<Piece<'m>> {
    let comments: Vec<Range<usize>> = COMMENT.find_iter(markup).map(|m| m.range()).collect();
    let mut comments = comments.into_iter().peekable();

    let mut pieces = Vec::new();
    let mut text_start = 0;
    let mut index = 0;
    let bytes = markup.as_bytes();

    let push_text = |pieces: &mut Vec<Piece<'m>>, range: Range<usize>| {
        if !range.is_empty() {
            pieces.push(Piece::Text(&markup[range]));
        }
    };

    while index < markup.len() {
        while comments.next_if(|comment| comment.start < index).is_some() {}
        if let Some(comment) = comments.next_if(|comment| comment.start == index) {
            push_text(&mut pieces, text_start..index);
            index = comment.end;
            text_start = index;
            continue;
        }

        if bytes[index] == b'<' {
            match lex_tag(markup, index) {
                Some(Ok(tag)) => {
                    push_text(&mut pieces, text_start..index);
                    index = tag.span.end();
                    text_start = index;
                    pieces.push(Piece::Tag(tag));
                    continue;
                }
                Some(Err(diagnostic)) => diagnostics.emit(diagnostic),
                None => {}
            }
        }
        index += 1;
    }
    push_text(&mut pieces, text_start..markup.len());

    pieces
}

/// Read the component tag starting at `start`, if there is one.
fn lex_tag(markup: &str, start: usize) -> Option<Result<Tag<'_>, Diagnostic>> {
    let closing = markup[start + 1..].starts_with('/');
    let name_start = if closing { start + 2 } else { start + 1 };
    if !markup[name_start..].starts_with(|c: char| c.is_ascii_uppercase()) {
        return None;
    }

    let name_end = markup[name_start..]
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .map_or(markup.len(), |end| name_start + end);
    let name = &markup[name_start..name_end];

    let mut quote = None;
    for (index, c) in markup[name_end..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '<') => break,
            (None, '>') => {
                let end = name_end + index;
                let inner = &markup[name_end..end];
                let span = Span::new(start..end + 1);
                let kind = if closing {
                    if !inner.trim().is_empty() {
                        break;
                    }
                    TagKind::Close
                } else {
                    let trimmed = inner.trim_end();
                    match trimmed.strip_suffix('/') {
                        Some(attributes) => TagKind::Open {
                            attributes,
                            self_closing: true,
                        },
                        None => TagKind::Open {
                            attributes: trimmed,
                            self_closing: false,
                        },
                    }
                };
                return Some(Ok(Tag { name, kind, span }));
            }
            _ => {}
        }
    }

    let tag = if closing {
        format!("</{name}")
    } else {
        format!("<{name}")
    };
    Some(Err(Diagnostic::error(format!(
        "component tag `{tag}` is missing its closing `>`"
    ))
    .with_code(ErrorCode::E303)
    .with_label(Span::new(start..name_end), ErrorCode::E303.description())
    .with_help("close the tag with `>` or `/>`")))
}
