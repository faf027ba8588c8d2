//! Rendering of [`NexyError`]s with miette.
//!
//! A parse error becomes one [`Report`] per diagnostic, drawn over the
//! component source with its labels. Any other error becomes a single
//! report carrying a `nexy::` code.

use std::{error::Error, fmt};

use miette::{
    Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan, SourceCode, SourceSpan,
};

use nexy::NexyError;
use nexy_parser::{Span, error::Diagnostic};

/// One renderable problem.
#[derive(Debug)]
pub enum Report<'a> {
    /// A parser diagnostic and the component source its spans point into.
    Diagnostic { diag: &'a Diagnostic, src: &'a str },
    /// An error without a source location.
    Error(&'a NexyError),
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Diagnostic { diag, .. } => f.write_str(diag.message()),
            Report::Error(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl Error for Report<'_> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Report::Diagnostic { .. } => None,
            Report::Error(err) => err.source(),
        }
    }
}

impl MietteDiagnostic for Report<'_> {
    fn code<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        let code: Box<dyn fmt::Display + 'b> = match self {
            Report::Diagnostic { diag, .. } => Box::new(diag.code()?),
            Report::Error(err) => Box::new(error_code(err)),
        };
        Some(code)
    }

    fn help<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        let help = match self {
            Report::Diagnostic { diag, .. } => diag.help(),
            Report::Error(err) => error_help(err),
        };
        help.map(|help| Box::new(help) as Box<dyn fmt::Display + 'b>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        match self {
            Report::Diagnostic { src, .. } => Some(src as &dyn SourceCode),
            Report::Error(_) => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let Report::Diagnostic { diag, .. } = self else {
            return None;
        };
        if diag.labels().is_empty() {
            return None;
        }

        Some(Box::new(diag.labels().iter().map(|label| {
            let span = source_span(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

fn error_code(err: &NexyError) -> &'static str {
    match err {
        NexyError::Io(_) => "nexy::io",
        NexyError::Parse { .. } => "nexy::parse",
        NexyError::Generation { .. } => "nexy::generation",
        NexyError::UnsupportedFile(_) => "nexy::unsupported_file",
        NexyError::Route(_) => "nexy::route",
        NexyError::Config(_) => "nexy::config",
        NexyError::Build { .. } => "nexy::build",
    }
}

fn error_help(err: &NexyError) -> Option<&'static str> {
    match err {
        NexyError::UnsupportedFile(_) => Some("only `.nexy` and `.mdx` files can be compiled"),
        NexyError::Route(_) => Some("two route files resolve to the same URL pattern"),
        NexyError::Build { .. } => Some("the failing components are reported above"),
        _ => None,
    }
}

fn source_span(span: Span) -> SourceSpan {
    (span.start(), span.len()).into()
}

/// The reports for `err`: one per diagnostic of a parse error, a single
/// one for anything else.
pub fn reports(err: &NexyError) -> Vec<Report<'_>> {
    match err {
        NexyError::Parse { err, src, .. } => err
            .diagnostics()
            .iter()
            .map(|diag| Report::Diagnostic { diag, src })
            .collect(),
        _ => vec![Report::Error(err)],
    }
}

/// Draw every report of `err` with miette's graphical handler.
pub fn render(err: &NexyError) -> Vec<String> {
    let handler = GraphicalReportHandler::new();
    reports(err)
        .iter()
        .map(|report| {
            let mut out = String::new();
            if handler.render_report(&mut out, report).is_err() {
                out = report.to_string();
            }
            out
        })
        .collect()
}
