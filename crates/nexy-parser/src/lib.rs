//! # Nexy Parser
//!
//! Parser for the Nexy single-file component format. A component source has
//! a logic block between two `---` lines followed by a template block:
//!
//! ```text
//! ---
//! from "@/Card.nexy" import Card
//! title: prop[str] = "Home"
//! ---
//! <Card title="{{ title }}"><p>Welcome</p></Card>
//! ```
//!
//! ## Usage
//!
//! ```
//! # use nexy_parser::{parse, ParserConfig, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "---\ntitle = \"Nexy\"\n---\n<h1>{{ title }}</h1>";
//!     let component = parse(source, "src/routes/index.nexy", &ParserConfig::default())?;
//!     assert_eq!(component.bindings(), ["title"]);
//!     Ok(())
//! }
//! ```

mod config;
pub mod error;
mod logic;
#[cfg(test)]
mod parser_tests;
mod sanitizer;
mod scanner;
mod span;
mod template;
mod validator;

use std::collections::HashSet;

use log::debug;

use nexy_core::ParsedComponent;

pub use config::{DEFAULT_NAMESPACE, ParserConfig};
pub use error::{Diagnostic, ErrorCode, ParseError, Phase};
pub use logic::{LogicParser, LogicResult};
pub use sanitizer::{IMPORT_CALL, Sanitized, Sanitizer};
pub use scanner::{ScanResult, scan};
pub use span::{Span, Spanned};
pub use template::TemplateParser;
pub use validator::validate;

/// Parse a component source into a [`ParsedComponent`].
///
/// This is the main entry point of the crate. It runs the whole pipeline:
///
/// 1. **Scan** - Split the source into logic and template blocks
/// 2. **Analyse logic** - Rewrite quoted imports, collect props, imports
///    and top-level bindings
/// 3. **Validate imports** - Check every imported file exists
/// 4. **Translate template** - Rewrite component tags into template calls
///
/// # Arguments
///
/// * `source` - The component source text
/// * `current_file` - Project-relative, `/`-separated path of the component
/// * `config` - Project root, output namespace and path aliases
///
/// # Errors
///
/// Returns a [`ParseError`] whose diagnostics are spanned in `source`. Its
/// [`ParseError::phase`] tells which step failed.
pub fn parse(
    source: &str,
    current_file: &str,
    config: &ParserConfig,
) -> Result<ParsedComponent, ParseError> {
    // Step 1: Scan
    let scanned = scanner::scan(source)?;

    // Step 2: Analyse logic
    let logic = LogicParser::new(config).process(
        scanned.logic(),
        scanned.logic_offset(),
        current_file,
    )?;

    // Step 3: Validate imports
    validator::validate(&logic.nexy_imports, current_file, config.project_root())?;

    // Step 4: Translate template
    let known = known_components(&logic);
    let template =
        TemplateParser::new(&known).parse(scanned.template(), scanned.template_offset())?;

    debug!(file = current_file, components = known.len(); "Parsed component");

    let LogicResult {
        nexy_imports,
        props,
        bindings,
        rendered_logic_source,
    } = logic;
    Ok(ParsedComponent::new(
        rendered_logic_source,
        template,
        props,
        bindings,
        nexy_imports.into_iter().map(Spanned::into_inner).collect(),
    ))
}

/// Names usable as component tags: imported names and capitalized
/// top-level bindings.
fn known_components(logic: &LogicResult) -> HashSet<String> {
    let imported = logic
        .nexy_imports
        .iter()
        .filter_map(|import| import.inner().local_name());
    let defined = logic
        .bindings
        .iter()
        .map(String::as_str)
        .filter(|name| name.starts_with(|c: char| c.is_uppercase()));
    imported.chain(defined).map(str::to_string).collect()
}
