//! The error returned by [`crate::parse`] and its stages.

use std::fmt;

use crate::{
    error::{Diagnostic, Phase},
    span::Span,
};

/// Every diagnostic a failing stage found, in the order it found them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Move the spans of every diagnostic.
    pub fn map_spans(self, f: impl Fn(Span) -> Span) -> Self {
        Self {
            diagnostics: self
                .diagnostics
                .into_iter()
                .map(|diagnostic| diagnostic.map_spans(&f))
                .collect(),
        }
    }

    /// The phase of the first coded diagnostic.
    pub fn phase(&self) -> Option<Phase> {
        self.diagnostics
            .iter()
            .find_map(Diagnostic::code)
            .map(|code| code.phase())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.diagnostics.first() else {
            return Ok(());
        };
        write!(f, "{first}")?;
        match self.diagnostics.len() {
            1 => Ok(()),
            n => write!(f, " (+{} more)", n - 1),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        vec![diagnostic].into()
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

/// Gathers the diagnostics of one stage so that a single run reports all
/// of them instead of stopping at the first.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// `Err` with everything emitted, `Ok` if nothing was.
    pub fn finish(self) -> Result<(), ParseError> {
        if self.diagnostics.is_empty() {
            Ok(())
        } else {
            Err(self.diagnostics.into())
        }
    }
}
