//! Naming rules shared by the compiler stages.
//!
//! Compiled components are imported as backend-language modules, so every
//! path segment that ends up in a module path must be a valid identifier.
//! Route files use bracket and parenthesis syntax for dynamic segments and
//! groups, which this module maps onto identifier-safe names:
//!
//! | source segment | normalized     |
//! |----------------|----------------|
//! | `[id]`         | `dyn_id`       |
//! | `[...slug]`    | `all_slug`     |
//! | `(marketing)`  | `grp_marketing`|
//! | `my-page`      | `my_page`      |
//! | `404`          | `_404`         |
//!
//! Identifier-safe segments are returned unchanged.

use std::{borrow::Cow, path::Path};

use crate::component::extension_of;

/// Normalizes one path segment (without extension) into an identifier.
///
/// # Examples
///
/// ```
/// use nexy_core::naming::normalize_segment;
///
/// assert_eq!(normalize_segment("index"), "index");
/// assert_eq!(normalize_segment("[id]"), "dyn_id");
/// assert_eq!(normalize_segment("[...slug]"), "all_slug");
/// assert_eq!(normalize_segment("(auth)"), "grp_auth");
/// ```
pub fn normalize_segment(segment: &str) -> Cow<'_, str> {
    if let Some(inner) = segment
        .strip_prefix("[...")
        .and_then(|rest| rest.strip_suffix(']'))
    {
        return Cow::Owned(format!("all_{}", identifier_chars(inner)));
    }
    if let Some(inner) = segment
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        return Cow::Owned(format!("dyn_{}", identifier_chars(inner)));
    }
    if let Some(inner) = segment
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return Cow::Owned(format!("grp_{}", identifier_chars(inner)));
    }

    if is_identifier(segment) {
        return Cow::Borrowed(segment);
    }

    let cleaned = identifier_chars(segment);
    if cleaned.starts_with(|c: char| c.is_ascii_digit()) || cleaned.is_empty() {
        Cow::Owned(format!("_{cleaned}"))
    } else {
        Cow::Owned(cleaned)
    }
}

/// Returns `true` if `name` is a valid identifier in the generated language.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn identifier_chars(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Normalizes every segment of a `/`-separated relative path.
///
/// The extension of the last segment is preserved.
///
/// ```
/// use nexy_core::naming::normalize_path;
///
/// assert_eq!(
///     normalize_path("src/routes/blog/[slug]/index.nexy"),
///     "src/routes/blog/dyn_slug/index.nexy"
/// );
/// ```
pub fn normalize_path(relative: &str) -> String {
    let extension = extension_of(relative);
    let without_extension = &relative[..relative.len() - extension.len()];

    let mut normalized = without_extension
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .map(normalize_segment)
        .collect::<Vec<_>>()
        .join("/");
    normalized.push_str(extension);
    normalized
}

/// Converts a relative file path into a dotted module path.
///
/// The extension is dropped, empty, `.` and `..` segments are skipped and
/// every remaining segment is normalized.
///
/// ```
/// use nexy_core::naming::module_path;
///
/// assert_eq!(module_path("__nexy__/src/components/Card.nexy"), "__nexy__.src.components.Card");
/// assert_eq!(module_path("src/routes/[id]/layout"), "src.routes.dyn_id.layout");
/// ```
pub fn module_path(relative: &str) -> String {
    let extension = extension_of(relative);
    relative[..relative.len() - extension.len()]
        .split('/')
        .filter(|segment| !matches!(*segment, "" | "." | ".."))
        .map(normalize_segment)
        .collect::<Vec<_>>()
        .join(".")
}

/// Derives the render-function name from a template artifact path.
///
/// The normalized file stem with its first character upper-cased.
///
/// ```
/// use std::path::Path;
/// use nexy_core::naming::function_name;
///
/// assert_eq!(function_name(Path::new("__nexy__/src/routes/index.html")), "Index");
/// assert_eq!(function_name(Path::new("docs/getting-started.md")), "Getting_started");
/// ```
pub fn function_name(template_path: &Path) -> String {
    let stem = template_path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    capitalize(&normalize_segment(&stem))
}

/// Upper-cases the first character of `name`.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders a relative path with forward slashes.
pub fn posix_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .filter(|segment| segment != "/")
        .collect::<Vec<_>>()
        .join("/")
}

/// Lexically resolves `.` and `..` segments of a `/`-separated path.
///
/// Leading `..` segments that cannot be resolved are kept.
///
/// ```
/// use nexy_core::naming::clean_path;
///
/// assert_eq!(clean_path("src/routes/../components/./Card.nexy"), "src/components/Card.nexy");
/// assert_eq!(clean_path("../shared/x.py"), "../shared/x.py");
/// ```
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(last) if *last != ".." => {
                    segments.pop();
                }
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }
    segments.join("/")
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    /// Route-like segments: plain names, dynamic, catch-all and groups.
    fn segment_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-zA-Z0-9_-]{1,12}",
            "[a-z]{1,8}".prop_map(|s| format!("[{s}]")),
            "[a-z]{1,8}".prop_map(|s| format!("[...{s}]")),
            "[a-z]{1,8}".prop_map(|s| format!("({s})")),
        ]
    }

    fn check_normalized_segment_is_identifier(segment: &str) -> Result<(), TestCaseError> {
        let normalized = normalize_segment(segment);
        prop_assert!(
            is_identifier(&normalized),
            "`{segment}` normalized to non-identifier `{normalized}`"
        );
        Ok(())
    }

    fn check_module_path_segments_are_identifiers(
        segments: &[String],
    ) -> Result<(), TestCaseError> {
        let path = format!("{}.nexy", segments.join("/"));
        let module = module_path(&path);
        for part in module.split('.') {
            prop_assert!(is_identifier(part), "`{part}` in `{module}`");
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn normalized_segment_is_identifier(segment in segment_strategy()) {
            check_normalized_segment_is_identifier(&segment)?;
        }

        #[test]
        fn module_path_segments_are_identifiers(
            segments in prop::collection::vec(segment_strategy(), 1..5)
        ) {
            check_module_path_segments_are_identifiers(&segments)?;
        }
    }
}
