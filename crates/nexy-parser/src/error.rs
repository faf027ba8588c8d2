//! Diagnostics reported while parsing a component.
//!
//! Every stage reports [`Diagnostic`]s with labeled spans into the original
//! component file and returns all of them at once as a [`ParseError`]. Each
//! [`ErrorCode`] belongs to a [`Phase`], which is how callers tell a
//! malformed file apart from a missing import.
//!
//! ```
//! # use nexy_parser::{Span, error::{Diagnostic, ErrorCode, Phase}};
//! let diag = Diagnostic::error("property `title` is declared multiple times")
//!     .with_code(ErrorCode::E106)
//!     .with_label(Span::new(100..120), "duplicate declaration")
//!     .with_secondary_label(Span::new(50..70), "first declared here");
//!
//! assert_eq!(diag.code().map(|code| code.phase()), Some(Phase::LogicParse));
//! ```

mod diagnostic;
mod error_code;
mod parse_error;

pub(crate) use parse_error::DiagnosticCollector;

pub use diagnostic::{Diagnostic, Label};
pub use error_code::{ErrorCode, Phase};
pub use parse_error::ParseError;
