//! Rewrites quoted-path imports in a logic block into backend-language code.
//!
//! The logic block may import components by file path:
//!
//! ```text
//! from "@/Card.nexy" import Card
//! from "./Counter.tsx" import Counter as Clicker
//! ```
//!
//! Neither form is valid in the backend language, so before the logic block
//! is parsed every such statement is rewritten:
//!
//! - `.nexy`, `.py` and extension-less targets become a dotted
//!   `from <module> import <targets>` statement. `.nexy` modules are prefixed
//!   with the compiled-output namespace.
//! - Any other extension becomes one loader call per target:
//!   `Clicker = __Import(path="src/routes/Counter.tsx", framework="react", symbol="Counter")`.
//!
//! Unquoted imports are left untouched. Every rewrite is recorded as an edit
//! so that spans in the sanitized text can be mapped back to the original.

use std::{collections::HashMap, ops::Range, sync::LazyLock};

use log::debug;
use regex::Regex;

use nexy_core::{
    ComponentType, NexyImport,
    component::extension_of,
    naming::{clean_path, module_path},
};

use crate::{
    config::ParserConfig,
    span::{Span, Spanned},
};

/// Name of the loader function foreign components are imported through.
pub const IMPORT_CALL: &str = "__Import";

static QUOTED_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^([ \t]*)from[ \t]+(?:"([^"\n]+)"|'([^'\n]+)')[ \t]+import\b[ \t]*"#)
        .expect("quoted import pattern is valid")
});

static AS_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+as\s+").expect("alias pattern is valid"));

/// One rewritten region: where it was in the input and where it is now.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    original: Range<usize>,
    rewritten: Range<usize>,
}

/// The result of sanitizing a logic block.
#[derive(Debug, Clone)]
pub struct Sanitized {
    source: String,
    imports: Vec<Spanned<NexyImport>>,
    specifiers: HashMap<String, String>,
    edits: Vec<Edit>,
}

impl Sanitized {
    /// The rewritten logic source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Same-ecosystem imports (`.nexy`, `.py`, extension-less) found while
    /// rewriting, with spans in the original block.
    pub fn imports(&self) -> &[Spanned<NexyImport>] {
        &self.imports
    }

    /// The specifier as written in the source for a path emitted into a
    /// loader call.
    pub fn specifier_for(&self, resolved: &str) -> Option<&str> {
        self.specifiers.get(resolved).map(String::as_str)
    }

    /// Map a span in the sanitized text back to the original block.
    ///
    /// Offsets inside a rewritten region map to the whole original
    /// statement.
    pub fn original_span(&self, span: Span) -> Span {
        let start = self.original_offset(span.start(), |edit| edit.original.start);
        let end = self.original_offset(span.end(), |edit| edit.original.end);
        Span::new(start..end)
    }

    fn original_offset(&self, offset: usize, inside: impl Fn(&Edit) -> usize) -> usize {
        let mut previous: Option<&Edit> = None;
        for edit in &self.edits {
            if offset < edit.rewritten.start {
                break;
            }
            if offset <= edit.rewritten.end {
                return inside(edit);
            }
            previous = Some(edit);
        }
        match previous {
            Some(edit) => edit.original.end + (offset - edit.rewritten.end),
            None => offset,
        }
    }
}

/// A single `name` or `name as alias` entry of an import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    text: String,
    symbol: String,
    alias: Option<String>,
}

impl Target {
    fn parse(raw: &str) -> Option<Self> {
        let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return None;
        }
        let mut parts = AS_KEYWORD.splitn(&text, 2);
        let symbol = parts.next().unwrap_or_default().trim().to_string();
        let alias = parts.next().map(|alias| alias.trim().to_string());
        Some(Self {
            text,
            symbol,
            alias,
        })
    }

    fn binding(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.symbol)
    }
}

/// Rewrites quoted imports according to a [`ParserConfig`].
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer<'c> {
    config: &'c ParserConfig,
}

impl<'c> Sanitizer<'c> {
    pub fn new(config: &'c ParserConfig) -> Self {
        Self { config }
    }

    /// Rewrite every quoted import of `logic`.
    ///
    /// `current_file` is the project-relative, `/`-separated path of the
    /// component being compiled; relative import paths are resolved against
    /// its directory.
    pub fn sanitize(&self, logic: &str, current_file: &str) -> Sanitized {
        let mut source = String::with_capacity(logic.len());
        let mut imports = Vec::new();
        let mut specifiers = HashMap::new();
        let mut edits = Vec::new();
        let mut cursor = 0;

        for captures in QUOTED_IMPORT.captures_iter(logic) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            if whole.start() < cursor {
                continue;
            }
            let indent = captures.get(1).map_or("", |m| m.as_str());
            let Some(specifier) = captures.get(2).or_else(|| captures.get(3)) else {
                continue;
            };
            let Some((targets_text, end)) = targets_region(logic, whole.end()) else {
                continue;
            };
            let targets: Vec<Target> = targets_text.split(',').filter_map(Target::parse).collect();
            if targets.is_empty() {
                continue;
            }

            let statement_start = whole.start() + indent.len();
            let statement_span = Span::new(statement_start..end);
            let resolved = self.resolve_path(specifier.as_str(), current_file);
            debug!(
                specifier = specifier.as_str(),
                resolved = resolved.as_str();
                "Rewriting quoted import"
            );

            let rewritten = match extension_of(&resolved) {
                ".nexy" | ".py" | "" => {
                    for target in &targets {
                        let import = NexyImport::new(
                            resolved.as_str(),
                            specifier.as_str(),
                            Some(target.symbol.clone()),
                            target.alias.clone(),
                            ComponentType::classify(extension_of(&resolved), None),
                        );
                        imports.push(Spanned::new(import, statement_span));
                    }
                    self.module_import(indent, &resolved, &targets)
                }
                extension => {
                    specifiers.insert(resolved.clone(), specifier.as_str().to_string());
                    loader_calls(indent, &resolved, extension, &targets)
                }
            };

            source.push_str(&logic[cursor..statement_start]);
            let rewritten_start = source.len();
            source.push_str(rewritten.trim_start());
            edits.push(Edit {
                original: statement_start..end,
                rewritten: rewritten_start..source.len(),
            });
            cursor = end;
        }
        source.push_str(&logic[cursor..]);

        Sanitized {
            source,
            imports,
            specifiers,
            edits,
        }
    }

    /// Resolve an import specifier to a project-relative path.
    ///
    /// Alias prefixes win over relative markers; anything else is already
    /// project-relative (or absolute) and is returned unchanged.
    pub fn resolve_path(&self, specifier: &str, current_file: &str) -> String {
        let alias = self
            .config
            .aliases
            .iter()
            .filter(|(alias, _)| !alias.is_empty() && specifier.starts_with(alias.as_str()))
            .max_by_key(|(alias, _)| alias.len());

        if let Some((alias, replacement)) = alias {
            let rest = specifier[alias.len()..].trim_start_matches('/');
            return clean_path(&format!("{}/{}", replacement.trim_matches('/'), rest));
        }

        if specifier.starts_with("./") || specifier.starts_with("../") {
            let directory = current_file.rsplit_once('/').map_or("", |(dir, _)| dir);
            return clean_path(&format!("{directory}/{specifier}"));
        }

        specifier.to_string()
    }

    fn module_import(&self, indent: &str, resolved: &str, targets: &[Target]) -> String {
        let module = if extension_of(resolved) == ".nexy" {
            module_path(&format!("{}/{}", self.config.namespace(), resolved))
        } else {
            module_path(resolved)
        };
        let names = targets
            .iter()
            .map(|target| target.text.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{indent}from {module} import {names}")
    }
}

fn loader_calls(indent: &str, resolved: &str, extension: &str, targets: &[Target]) -> String {
    let framework = ComponentType::framework_for_extension(extension);
    targets
        .iter()
        .map(|target| {
            format!(
                r#"{indent}{} = {IMPORT_CALL}(path="{resolved}", framework="{framework}", symbol="{}")"#,
                target.binding(),
                target.symbol
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Find the target list that follows `import`.
///
/// Returns the raw target text and the end offset of the statement, or
/// `None` for a parenthesized list that is never closed.
fn targets_region(logic: &str, start: usize) -> Option<(&str, usize)> {
    let rest = &logic[start..];
    if let Some(inner) = rest.strip_prefix('(') {
        let close = inner.find(')')?;
        return Some((&inner[..close], start + 1 + close + 1));
    }

    let mut end = start;
    loop {
        let line_end = logic[end..].find('\n').map_or(logic.len(), |i| end + i);
        let line = logic[end..line_end].trim_end();
        if line.ends_with('\\') && line_end < logic.len() {
            end = line_end + 1;
            continue;
        }
        end = line_end;
        break;
    }

    let text = &logic[start..end];
    let text = text.split('#').next().unwrap_or(text);
    Some((text, end))
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn check_react_path_verbatim(dir: &str, name: &str) -> Result<(), TestCaseError> {
        let path = format!("{dir}/{name}.tsx");
        let logic = format!("from \"{path}\" import {name}");
        let config = ParserConfig::default();
        let sanitized = Sanitizer::new(&config).sanitize(&logic, "src/routes/index.nexy");

        let expected = format!(
            "{name} = __Import(path=\"{path}\", framework=\"react\", symbol=\"{name}\")"
        );
        prop_assert_eq!(sanitized.source(), expected.as_str());
        Ok(())
    }

    proptest! {
        #[test]
        fn react_path_verbatim(dir in "src(/[a-z]{1,8}){1,3}", name in "[A-Z][a-zA-Z]{0,10}") {
            check_react_path_verbatim(&dir, &name)?;
        }
    }
}
