//! Error types for Nexy operations.
//!
//! This module provides the main error type [`NexyError`] which wraps the
//! error conditions of compiling components and discovering routes.

use std::{io, path::PathBuf};

use thiserror::Error;

use nexy_parser::error::ParseError;

/// The main error type for Nexy operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries the source text the diagnostics' spans point
/// into, so callers can render snippets.
#[derive(Debug, Error)]
pub enum NexyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse {
        err: ParseError,
        src: String,
        path: String,
    },

    #[error("Failed to write `{}`: {source}", path.display())]
    Generation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{0}` is not a .nexy or .mdx component")]
    UnsupportedFile(String),

    #[error("Route error: {0}")]
    Route(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{failed} of {total} component(s) failed to compile")]
    Build { failed: usize, total: usize },
}

impl NexyError {
    /// Create a new `Parse` error with the associated source code and path.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
            path: path.into(),
        }
    }

    /// The component path of a `Parse` error.
    pub fn source_path(&self) -> Option<&str> {
        match self {
            Self::Parse { path, .. } => Some(path),
            _ => None,
        }
    }
}
