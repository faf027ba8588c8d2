//! Checks that imported component files exist before anything is generated.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use log::debug;

use nexy_core::NexyImport;

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Spanned,
};

/// Extensions that satisfy an extension-less import.
const MODULE_EXTENSIONS: &[&str] = &["py", "nexy"];

/// Verify that every import resolves to an existing file.
///
/// Absolute paths are checked as they are, paths starting with `./` or
/// `../` are resolved against the directory of `current_file`, and
/// everything else against `project_root`. An import without an extension
/// is satisfied by a `.py` or `.nexy` file or by a package directory.
///
/// # Errors
///
/// Returns an [`ErrorCode::E200`] diagnostic for the first import that
/// cannot be found.
pub fn validate(
    imports: &[Spanned<NexyImport>],
    current_file: &str,
    project_root: &Path,
) -> Result<(), Diagnostic> {
    let current_dir = Path::new(current_file)
        .parent()
        .map_or_else(PathBuf::new, Path::to_path_buf);

    for import in imports {
        let resolved = resolve(import.inner().path(), &current_dir, project_root);
        if exists(&resolved, import.inner().extension().is_empty()) {
            continue;
        }

        debug!(
            specifier = import.inner().specifier(),
            resolved:? = resolved;
            "Import target not found"
        );
        return Err(missing_import(import, &resolved));
    }
    Ok(())
}

fn resolve(path: &str, current_dir: &Path, project_root: &Path) -> PathBuf {
    let import_path = Path::new(path);
    if import_path.is_absolute() {
        return import_path.to_path_buf();
    }
    let relative = matches!(
        import_path.components().next(),
        Some(Component::CurDir | Component::ParentDir)
    );
    if relative {
        project_root.join(current_dir).join(import_path)
    } else {
        project_root.join(import_path)
    }
}

fn exists(path: &Path, extensionless: bool) -> bool {
    if !extensionless {
        return path.is_file();
    }
    path.is_dir()
        || MODULE_EXTENSIONS
            .iter()
            .any(|extension| path.with_extension(extension).is_file())
}

/// Files next to `path` that share its stem.
fn same_stem_files(path: &Path) -> Vec<String> {
    let (Some(parent), Some(stem)) = (path.parent(), path.file_stem()) else {
        return Vec::new();
    };
    let Ok(entries) = fs::read_dir(parent) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|candidate| candidate.is_file() && candidate.file_stem() == Some(stem))
        .filter_map(|candidate| {
            candidate
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .collect();
    names.sort();
    names
}

fn missing_import(import: &Spanned<NexyImport>, resolved: &Path) -> Diagnostic {
    let inner = import.inner();
    let mut message = format!("imported file \"{}\" does not exist", inner.specifier());
    let details: Vec<String> = [("symbol", inner.symbol()), ("alias", inner.alias())]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| format!("{key} `{value}`")))
        .collect();
    if !details.is_empty() {
        message.push_str(&format!(" ({})", details.join(", ")));
    }

    let suggestions = same_stem_files(resolved);
    let help = if suggestions.is_empty() {
        "check the import path and the configured aliases".to_string()
    } else {
        format!("found similarly named files: {}", suggestions.join(", "))
    };

    Diagnostic::error(message)
        .with_code(ErrorCode::E200)
        .with_label(
            import.span(),
            format!("resolved to `{}`", resolved.display()),
        )
        .with_help(help)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use nexy_core::ComponentType;
    use tempfile::TempDir;

    use super::*;
    use crate::span::Span;

    fn project(files: &[&str]) -> TempDir {
        let root = tempfile::tempdir().unwrap();
        for file in files {
            let path = root.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        root
    }

    fn import(path: &str, specifier: &str) -> Spanned<NexyImport> {
        Spanned::new(
            NexyImport::new(
                path,
                specifier,
                Some("Card".to_string()),
                Some("Main".to_string()),
                ComponentType::Nexy,
            ),
            Span::new(4..30),
        )
    }

    #[test]
    fn test_existing_imports() {
        let root = project(&["src/components/Card.nexy", "src/lib/dates.py"]);
        let imports = vec![
            import("src/components/Card.nexy", "@/Card.nexy"),
            import("src/lib/dates", "../lib/dates"),
        ];
        assert!(validate(&imports, "src/routes/index.nexy", root.path()).is_ok());
    }

    #[test]
    fn test_package_directory_satisfies_extensionless_import() {
        let root = project(&["src/lib/__init__.py"]);
        let imports = vec![import("src/lib", "src/lib")];
        assert!(validate(&imports, "src/routes/index.nexy", root.path()).is_ok());
    }

    #[test]
    fn test_relative_path_resolved_against_current_file() {
        let root = project(&["src/routes/Card.nexy"]);
        let imports = vec![import("./Card.nexy", "./Card.nexy")];
        assert!(validate(&imports, "src/routes/index.nexy", root.path()).is_ok());
    }

    #[test]
    fn test_missing_import() {
        let root = project(&["src/routes/index.nexy"]);
        let imports = vec![import("src/routes/Missing.nexy", "./Missing.nexy")];

        let diag = validate(&imports, "src/routes/index.nexy", root.path()).unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E200));
        assert_eq!(
            diag.message(),
            "imported file \"./Missing.nexy\" does not exist (symbol `Card`, alias `Main`)"
        );
        assert_eq!(diag.labels()[0].span(), Span::new(4..30));
        assert!(diag.labels()[0].message().contains("Missing.nexy"));
    }

    #[test]
    fn test_missing_import_suggests_same_stem() {
        let root = project(&["src/components/Card.vue", "src/components/Card.tsx"]);
        let imports = vec![import("src/components/Card.nexy", "@/Card.nexy")];

        let diag = validate(&imports, "src/routes/index.nexy", root.path()).unwrap_err();
        assert_eq!(
            diag.help(),
            Some("found similarly named files: Card.tsx, Card.vue")
        );
    }

    #[test]
    fn test_first_missing_import_reported() {
        let root = project(&["src/components/Card.nexy"]);
        let imports = vec![
            import("src/components/Card.nexy", "@/Card.nexy"),
            import("src/components/First.nexy", "@/First.nexy"),
            import("src/components/Second.nexy", "@/Second.nexy"),
        ];

        let diag = validate(&imports, "src/routes/index.nexy", root.path()).unwrap_err();
        assert!(diag.message().contains("@/First.nexy"));
    }
}
