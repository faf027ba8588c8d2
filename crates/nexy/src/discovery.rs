//! Discovery of component sources in a project tree.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::{compiler::is_component_source, config::NexyConfig, error::NexyError};

/// Find every `.nexy` and `.mdx` source below the project root.
///
/// Directories named in the configuration's exclusion list (and the output
/// namespace) are not entered. Paths are returned sorted.
///
/// # Errors
///
/// Returns [`NexyError::Io`] if the project root is not a readable
/// directory. Unreadable entries below it are skipped with a warning.
pub fn discover_sources(config: &NexyConfig) -> Result<Vec<PathBuf>, NexyError> {
    let root = config.project_root();
    walk(root, config, is_component_source)
}

/// Walks `root`, pruning excluded directories, and collects the files
/// accepted by `accept`.
pub(crate) fn walk(
    root: &Path,
    config: &NexyConfig,
    accept: impl Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>, NexyError> {
    if !root.is_dir() {
        return Err(NexyError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("`{}` is not a directory", root.display()),
        )));
    }

    let excluded: Vec<&str> = config.excluded_dirs().collect();
    let is_excluded = |entry: &DirEntry| {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| excluded.contains(&name))
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(err:% = err; "Skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && accept(entry.path()) {
            files.push(entry.into_path());
        }
    }

    debug!(root:? = root, files = files.len(); "Discovered files");
    Ok(files)
}
