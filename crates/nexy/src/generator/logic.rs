//! Emits the render-function module of a compiled component.
//!
//! The module defines one function named after the template file. Its
//! parameters are the component's props and its body is the rendered logic
//! block, followed by an explicit render context and the call into the
//! template engine:
//!
//! ```text
//! def Index(title: str = "Home") -> str:
//!     heading = title.upper()
//!     __context = {"heading": heading, "title": title}
//!     __inner = __Template("__nexy__/src/routes/index.html", __context)
//!     return __inner
//! ```

use std::{collections::BTreeSet, path::Path};

use nexy_core::{ParsedComponent, naming};

use super::layout::LayoutChain;

const PRELUDE: &str = "from typing import *\n\
                       from fastapi import *\n\
                       from nexy import Template as __Template, Import as __Import\n";

const LAYOUT_IMPORT: &str = "from importlib import import_module as __import_module\n";

const INDENT: &str = "    ";

/// Names bound by the generated code itself.
const RESERVED_PREFIX: char = '_';

/// Renders the module source for `component`.
///
/// `template_path` is the project-relative path of the template artifact,
/// exactly as the template engine will be asked to load it.
pub(crate) fn render_module(
    template_path: &str,
    component: &ParsedComponent,
    layouts: Option<&LayoutChain>,
) -> String {
    let function = naming::function_name(Path::new(template_path));
    let parameters = component
        .props()
        .iter()
        .map(|prop| prop.to_parameter())
        .collect::<Vec<_>>()
        .join(", ");

    let mut module = String::from(PRELUDE);
    if layouts.is_some() {
        module.push_str(LAYOUT_IMPORT);
    }
    module.push('\n');
    module.push_str(&format!("def {function}({parameters}) -> str:\n"));

    let body = indent(component.frontmatter());
    if !body.is_empty() {
        module.push_str(&body);
        module.push('\n');
    }

    module.push_str(&format!("{INDENT}__context = {{{}}}\n", context_items(component)));
    module.push_str(&format!(
        "{INDENT}__inner = __Template({}, __context)\n",
        quoted(template_path)
    ));

    match layouts {
        Some(chain) => module.push_str(&layout_walk(chain)),
        None => module.push_str(&format!("{INDENT}return __inner\n")),
    }
    module
}

/// Entries of the explicit context: props and top-level bindings, without
/// reserved names, sorted.
fn context_items(component: &ParsedComponent) -> String {
    let names: BTreeSet<&str> = component
        .props()
        .iter()
        .map(|prop| prop.name())
        .chain(component.bindings().iter().map(String::as_str))
        .filter(|name| !name.starts_with(RESERVED_PREFIX))
        .collect();

    names
        .into_iter()
        .map(|name| format!("\"{name}\": {name}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Tries each candidate layout module innermost first and hands the
/// rendered page to the first callable `Layout`.
fn layout_walk(chain: &LayoutChain) -> String {
    let mut candidates = chain
        .candidates()
        .iter()
        .map(String::as_str)
        .map(quoted)
        .collect::<Vec<_>>()
        .join(", ");
    if chain.candidates().len() == 1 {
        candidates.push(',');
    }

    [
        format!("for __module_path in ({candidates}):"),
        "    try:".to_string(),
        "        __module = __import_module(__module_path)".to_string(),
        "    except ImportError:".to_string(),
        "        continue".to_string(),
        "    __layout = getattr(__module, \"Layout\", None)".to_string(),
        "    if callable(__layout):".to_string(),
        "        return __layout(children=__inner)".to_string(),
        "return __inner".to_string(),
    ]
    .iter()
    .map(|line| format!("{INDENT}{line}\n"))
    .collect()
}

fn indent(source: &str) -> String {
    source
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{INDENT}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
