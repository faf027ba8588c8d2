//! Nexy - A compiler for single-file server components.
//!
//! Compiles `.nexy` components (a logic block between `---` lines followed
//! by markup) and their `.mdx` Markdown variant into a render module and a
//! template artifact each, and maps the routes directory onto URL path
//! patterns.
//!
//! # Example
//!
//! ```rust,no_run
//! use nexy::{ProjectBuilder, RouteTable, config::NexyConfig};
//!
//! let config = NexyConfig::default();
//! let report = ProjectBuilder::new(config.clone()).build()?;
//! assert!(report.is_success());
//!
//! for route in RouteTable::discover(&config)?.routes() {
//!     println!("{} -> {}", route.pattern(), route.handler());
//! }
//! # Ok::<(), nexy::NexyError>(())
//! ```

pub mod config;
pub mod generator;
pub mod routes;

mod builder;
mod compiler;
mod discovery;
mod error;

pub use nexy_core::{ComponentType, NexyImport, NexyProp, ParsedComponent, naming};

pub use builder::{BuildReport, ProjectBuilder};
pub use compiler::{CompileOutput, Compiler, is_component_source};
pub use discovery::discover_sources;
pub use error::NexyError;
pub use routes::{RouteKind, RouteTable};
