//! Splits a component source into its logic block and template block.
//!
//! A component source looks like this:
//!
//! ```text
//! ---
//! title = "Nexy"
//! ---
//! <h1>{{ title }}</h1>
//! ```
//!
//! The first `---` opens the logic block and the next one closes it.
//! Everything after the closing delimiter is template text, including any
//! further `---` sequences (Markdown horizontal rules, for example).

use log::trace;

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
};

const DELIMITER: &str = "---";

/// The two blocks of a component source, borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanResult<'a> {
    logic: &'a str,
    logic_offset: usize,
    template: &'a str,
    template_offset: usize,
}

impl<'a> ScanResult<'a> {
    /// The whitespace-trimmed logic block.
    pub fn logic(&self) -> &'a str {
        self.logic
    }

    /// Byte offset of the logic block in the source.
    pub fn logic_offset(&self) -> usize {
        self.logic_offset
    }

    /// The whitespace-trimmed template block.
    pub fn template(&self) -> &'a str {
        self.template
    }

    /// Byte offset of the template block in the source.
    pub fn template_offset(&self) -> usize {
        self.template_offset
    }
}

/// Split `source` into logic and template blocks.
///
/// # Errors
///
/// Returns an [`ErrorCode::E001`] diagnostic if the source does not start
/// with `---` (after optional whitespace), and [`ErrorCode::E002`] if the
/// logic block is never closed.
pub fn scan(source: &str) -> Result<ScanResult<'_>, Diagnostic> {
    let leading = source.len() - source.trim_start().len();
    if !source[leading..].starts_with(DELIMITER) {
        let line_end = source[leading..]
            .find('\n')
            .map_or(source.len(), |end| leading + end);
        return Err(Diagnostic::error(
            "Nexy format error: frontmatter delimiters '---' are missing",
        )
        .with_code(ErrorCode::E001)
        .with_label(Span::new(leading..line_end), "expected `---` here")
        .with_help("start the file with a `---` line, the logic block, and another `---` line"));
    }

    let body_start = leading + DELIMITER.len();
    let Some(close) = source[body_start..].find(DELIMITER) else {
        return Err(Diagnostic::error(
            "Nexy format error: frontmatter delimiters '---' are missing",
        )
        .with_code(ErrorCode::E002)
        .with_label(Span::new(leading..body_start), "logic block opened here")
        .with_help("close the logic block with a `---` line before the template"));
    };

    let logic_end = body_start + close;
    let (logic, logic_offset) = trim_with_offset(&source[body_start..logic_end], body_start);
    let template_start = logic_end + DELIMITER.len();
    let (template, template_offset) =
        trim_with_offset(&source[template_start..], template_start);

    trace!(logic_offset, template_offset; "Scanned component source");

    Ok(ScanResult {
        logic,
        logic_offset,
        template,
        template_offset,
    })
}

fn trim_with_offset(text: &str, offset: usize) -> (&str, usize) {
    let leading = text.len() - text.trim_start().len();
    (text.trim(), offset + leading)
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    /// Text that never contains a delimiter.
    fn block_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_ =\"'<>/{}\n-]{0,60}".prop_filter("no delimiter", |s| !s.contains(DELIMITER))
    }

    fn check_blocks_round_trip(logic: &str, template: &str) -> Result<(), TestCaseError> {
        let source = format!("---\n{logic}\n---\n{template}");
        let first = scan(&source);
        prop_assert!(first.is_ok(), "scan failed: {first:?}");
        let first = first.unwrap();

        prop_assert_eq!(first.logic(), logic.trim());
        prop_assert_eq!(first.template(), template.trim());

        let second = scan(&source).unwrap();
        prop_assert_eq!(first, second);
        Ok(())
    }

    fn check_missing_delimiters_fail(text: &str) -> Result<(), TestCaseError> {
        let result = scan(text);
        prop_assert!(result.is_err(), "scan unexpectedly succeeded for {text:?}");
        Ok(())
    }

    fn check_template_delimiters_preserved(
        logic: &str,
        before: &str,
        after: &str,
    ) -> Result<(), TestCaseError> {
        let template = format!("{before}\n---\n{after}");
        let source = format!("---\n{logic}\n---\n{template}");
        let scanned = scan(&source).unwrap();
        prop_assert_eq!(scanned.template(), template.trim());
        Ok(())
    }

    proptest! {
        #[test]
        fn blocks_round_trip(logic in block_strategy(), template in block_strategy()) {
            check_blocks_round_trip(&logic, &template)?;
        }

        #[test]
        fn missing_delimiters_fail(text in block_strategy()) {
            check_missing_delimiters_fail(&text)?;
        }

        #[test]
        fn template_delimiters_preserved(
            logic in block_strategy(),
            before in block_strategy(),
            after in block_strategy(),
        ) {
            check_template_delimiters_preserved(&logic, &before, &after)?;
        }
    }
}
