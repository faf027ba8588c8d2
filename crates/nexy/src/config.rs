//! Project configuration for the Nexy compiler.
//!
//! All types implement [`serde::Deserialize`] so a project can describe
//! itself in a `nexy.toml` file. Every field has a default, so an empty
//! file (or no file at all) describes the conventional project layout.
//!
//! # Example
//!
//! ```
//! # use nexy::config::NexyConfig;
//! let config = NexyConfig::default();
//! assert_eq!(config.namespace(), "__nexy__");
//! assert_eq!(config.routes_dir(), "src/routes");
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use nexy_parser::{DEFAULT_NAMESPACE, ParserConfig};

/// Directories never searched for component sources.
const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "__pycache__",
    ".git",
    ".venv",
    "node_modules",
    "dist",
    "build",
];

/// Files inside the routes directory that are not routes themselves.
const DEFAULT_ROUTE_FILE_EXCEPTIONS: &[&str] = &["__init__.py", "layout.nexy"];

/// Top-level project configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NexyConfig {
    /// Directory every other path is relative to.
    project_root: PathBuf,

    /// Output directory and module prefix of compiled components.
    namespace: String,

    /// Project-relative directory holding the route tree.
    routes_dir: String,

    /// Import path alias prefixes and the directories they stand for.
    aliases: BTreeMap<String, String>,

    /// Directory names skipped while discovering sources.
    excluded_dirs: Vec<String>,

    /// File names inside the routes directory that are not routes.
    route_file_exceptions: Vec<String>,

    /// Watch mode settings.
    watch: WatchConfig,
}

impl NexyConfig {
    /// Returns a copy of this configuration rooted at `project_root`.
    pub fn with_project_root(mut self, project_root: impl Into<PathBuf>) -> Self {
        self.project_root = project_root.into();
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// The namespace with surrounding slashes removed.
    pub fn namespace(&self) -> &str {
        self.namespace.trim_matches('/')
    }

    /// The routes directory with surrounding slashes removed.
    pub fn routes_dir(&self) -> &str {
        self.routes_dir.trim_matches('/')
    }

    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// Excluded directory names. The namespace is always excluded.
    pub fn excluded_dirs(&self) -> impl Iterator<Item = &str> {
        self.excluded_dirs
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.namespace()))
    }

    /// Returns `true` if `file_name` inside the routes tree is not a route.
    pub fn is_route_exception(&self, file_name: &str) -> bool {
        self.route_file_exceptions
            .iter()
            .any(|exception| exception == file_name)
    }

    pub fn watch(&self) -> &WatchConfig {
        &self.watch
    }

    /// Builds the configuration handed to the parser.
    ///
    /// Longer aliases come first so that `@ui` is tried before `@`.
    pub fn parser_config(&self) -> ParserConfig {
        let mut aliases: Vec<(String, String)> = self
            .aliases
            .iter()
            .map(|(alias, target)| (alias.clone(), target.clone()))
            .collect();
        aliases.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        ParserConfig::new(&self.project_root, self.namespace(), aliases)
    }
}

impl Default for NexyConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            namespace: DEFAULT_NAMESPACE.to_string(),
            routes_dir: "src/routes".to_string(),
            aliases: BTreeMap::from([("@".to_string(), "src/components".to_string())]),
            excluded_dirs: DEFAULT_EXCLUDED_DIRS
                .iter()
                .map(|dir| dir.to_string())
                .collect(),
            route_file_exceptions: DEFAULT_ROUTE_FILE_EXCEPTIONS
                .iter()
                .map(|file| file.to_string())
                .collect(),
            watch: WatchConfig::default(),
        }
    }
}

/// Polling and debouncing intervals of watch mode.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// How often the source tree is polled, in milliseconds.
    poll_interval_ms: u64,

    /// Quiet interval before the same path is compiled again, in milliseconds.
    debounce_ms: u64,
}

impl WatchConfig {
    pub fn new(poll_interval_ms: u64, debounce_ms: u64) -> Self {
        Self {
            poll_interval_ms,
            debounce_ms,
        }
    }

    pub fn poll_interval_ms(&self) -> u64 {
        self.poll_interval_ms
    }

    pub fn debounce_ms(&self) -> u64 {
        self.debounce_ms
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self::new(500, 100)
    }
}
