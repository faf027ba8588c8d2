//! A single problem found in a component source.

use std::fmt;

use crate::{error::ErrorCode, span::Span};

/// A message attached to a region of the component source.
///
/// A diagnostic has one primary label, where the problem is, and may carry
/// secondary labels pointing at related code such as the first declaration
/// of a duplicate prop or the tag that is still open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    span: Span,
    message: String,
    primary: bool,
}

impl Label {
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.primary
    }
}

/// A compile error in a component, built up with the `with_*` methods.
///
/// ```
/// # use nexy_parser::{Span, error::{Diagnostic, ErrorCode}};
/// let diag = Diagnostic::error("unknown component `<Crad>`")
///     .with_code(ErrorCode::E300)
///     .with_label(Span::new(0..6), "not imported")
///     .with_help("did you mean `Card`?");
///
/// assert_eq!(diag.to_string(), "TemplateSyntaxError[E300]: unknown component `<Crad>`");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_label(self, span: Span, message: impl Into<String>) -> Self {
        self.label(span, message.into(), true)
    }

    pub fn with_secondary_label(self, span: Span, message: impl Into<String>) -> Self {
        self.label(span, message.into(), false)
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Labels in the order they were added.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Move every label, e.g. from logic-block offsets to file offsets.
    pub fn map_spans(mut self, f: impl Fn(Span) -> Span) -> Self {
        for label in &mut self.labels {
            label.span = f(label.span);
        }
        self
    }

    fn label(mut self, span: Span, message: String, primary: bool) -> Self {
        self.labels.push(Label {
            span,
            message,
            primary,
        });
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{}[{code}]: {}", code.phase(), self.message),
            None => write!(f, "error: {}", self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}
