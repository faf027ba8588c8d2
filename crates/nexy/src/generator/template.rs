//! Writes the template artifact of a compiled component.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::trace;

/// Package marker that makes compiled directories importable.
const PACKAGE_MARKER: &str = "__init__.py";

/// Creates the directories of the project-relative `template_path` under
/// `root`, with a package marker in each, and writes `template` verbatim.
///
/// Returns the path of the written file.
pub(crate) fn write_template(root: &Path, template_path: &str, template: &str) -> io::Result<PathBuf> {
    let output = root.join(template_path);
    if let Some((directory, _)) = template_path.rsplit_once('/') {
        create_packages(root, directory)?;
    }
    fs::write(&output, template)?;
    Ok(output)
}

fn create_packages(root: &Path, directory: &str) -> io::Result<()> {
    let mut current = root.to_path_buf();
    for segment in directory.split('/').filter(|segment| !segment.is_empty()) {
        current.push(segment);
        fs::create_dir_all(&current)?;

        let marker = current.join(PACKAGE_MARKER);
        if !marker.exists() {
            trace!(path:? = marker; "Creating package marker");
            fs::write(marker, "")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_template_creates_packages() {
        let root = tempfile::tempdir().unwrap();

        let output =
            write_template(root.path(), "__nexy__/src/routes/index.html", "<h1>{{ title }}</h1>")
                .unwrap();

        assert_eq!(output, root.path().join("__nexy__/src/routes/index.html"));
        assert_eq!(fs::read_to_string(&output).unwrap(), "<h1>{{ title }}</h1>");
        for package in ["__nexy__", "__nexy__/src", "__nexy__/src/routes"] {
            assert!(root.path().join(package).join(PACKAGE_MARKER).is_file());
        }
    }

    #[test]
    fn test_existing_marker_kept() {
        let root = tempfile::tempdir().unwrap();
        let marker = root.path().join("__nexy__").join(PACKAGE_MARKER);
        fs::create_dir_all(marker.parent().unwrap()).unwrap();
        fs::write(&marker, "# package\n").unwrap();

        write_template(root.path(), "__nexy__/docs.md", "# Docs").unwrap();

        assert_eq!(fs::read_to_string(marker).unwrap(), "# package\n");
    }
}
