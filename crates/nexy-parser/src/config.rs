//! Configuration threaded through the parsing pipeline.

use std::path::{Path, PathBuf};

/// Directory and module prefix that compiled components live under.
pub const DEFAULT_NAMESPACE: &str = "__nexy__";

/// Configuration for the parser.
///
/// Holds everything the sanitizer and the import validator need to resolve
/// import paths. The parser reads no global state; callers build one of
/// these from their own settings.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Directory all project-relative paths are resolved against
    pub project_root: PathBuf,
    /// Output namespace for compiled components, e.g. `__nexy__`
    pub namespace: String,
    /// Path alias prefixes and their project-relative replacements
    pub aliases: Vec<(String, String)>,
}

impl ParserConfig {
    /// Create a new ParserConfig
    pub fn new(
        project_root: impl Into<PathBuf>,
        namespace: impl Into<String>,
        aliases: Vec<(String, String)>,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            namespace: namespace.into(),
            aliases,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// The namespace with surrounding slashes removed.
    pub fn namespace(&self) -> &str {
        self.namespace.trim_matches('/')
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new(
            ".",
            DEFAULT_NAMESPACE,
            vec![("@".to_string(), "src/components".to_string())],
        )
    }
}
