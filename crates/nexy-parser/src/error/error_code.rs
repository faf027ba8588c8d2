//! Error codes for the Nexy diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Format errors (frontmatter delimiters)
//! - `E1xx` - Logic parse errors
//! - `E2xx` - Import validation errors
//! - `E3xx` - Template syntax errors

use std::fmt;

/// The compiler phase a diagnostic was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The source does not have the `--- logic --- template` shape.
    Format,
    /// The logic block is not syntactically valid.
    LogicParse,
    /// An imported file does not exist.
    ImportValidation,
    /// The template uses unknown or unbalanced component tags.
    TemplateSyntax,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Format => "FormatError",
            Phase::LogicParse => "LogicParseError",
            Phase::ImportValidation => "ImportValidationError",
            Phase::TemplateSyntax => "TemplateSyntaxError",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Format Errors (E0xx)
    // =========================================================================
    /// Missing opening delimiter.
    ///
    /// The source must start with a `---` line that opens the logic block.
    E001,

    /// Missing closing delimiter.
    ///
    /// The logic block was opened but no later `---` closes it.
    E002,

    // =========================================================================
    // Logic Parse Errors (E1xx)
    // =========================================================================
    /// Unterminated string literal.
    E100,

    /// Unclosed bracket.
    ///
    /// A `(`, `[` or `{` was opened but never closed.
    E101,

    /// Unmatched closing bracket.
    E102,

    /// Unexpected indent.
    ///
    /// A top-level line is indented but does not belong to a compound
    /// statement.
    E103,

    /// Expected an indented block.
    ///
    /// A compound statement header ending in `:` has no body.
    E104,

    /// Unexpected character.
    E105,

    /// Duplicate property declaration.
    E106,

    /// Property without default follows a property with a default.
    ///
    /// Declarations become function parameters, so the order must be valid
    /// for a parameter list.
    E107,

    /// Invalid property declaration.
    ///
    /// `prop[...]` takes exactly one type argument and can only be
    /// assigned to a plain name.
    E108,

    // =========================================================================
    // Import Validation Errors (E2xx)
    // =========================================================================
    /// Imported file not found.
    E200,

    // =========================================================================
    // Template Syntax Errors (E3xx)
    // =========================================================================
    /// Unknown component tag.
    ///
    /// A capitalized tag is used in the template but is neither imported nor
    /// bound in the logic block.
    E300,

    /// Closing tag without a matching opening tag.
    E301,

    /// Opening tag never closed.
    E302,

    /// Malformed component tag.
    ///
    /// A component tag is missing its closing `>`.
    E303,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Format errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            // Logic parse errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            ErrorCode::E106 => "E106",
            ErrorCode::E107 => "E107",
            ErrorCode::E108 => "E108",
            // Import validation errors
            ErrorCode::E200 => "E200",
            // Template syntax errors
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
            ErrorCode::E303 => "E303",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Format errors
            ErrorCode::E001 => "missing opening delimiter",
            ErrorCode::E002 => "missing closing delimiter",
            // Logic parse errors
            ErrorCode::E100 => "unterminated string literal",
            ErrorCode::E101 => "unclosed bracket",
            ErrorCode::E102 => "unmatched closing bracket",
            ErrorCode::E103 => "unexpected indent",
            ErrorCode::E104 => "expected an indented block",
            ErrorCode::E105 => "unexpected character",
            ErrorCode::E106 => "duplicate property",
            ErrorCode::E107 => "non-default property follows default property",
            ErrorCode::E108 => "invalid property declaration",
            // Import validation errors
            ErrorCode::E200 => "imported file not found",
            // Template syntax errors
            ErrorCode::E300 => "unknown component",
            ErrorCode::E301 => "orphan closing tag",
            ErrorCode::E302 => "unclosed component tag",
            ErrorCode::E303 => "malformed component tag",
        }
    }

    /// Returns the phase this code is reported in.
    pub fn phase(&self) -> Phase {
        match self {
            ErrorCode::E001 | ErrorCode::E002 => Phase::Format,
            ErrorCode::E100
            | ErrorCode::E101
            | ErrorCode::E102
            | ErrorCode::E103
            | ErrorCode::E104
            | ErrorCode::E105
            | ErrorCode::E106
            | ErrorCode::E107
            | ErrorCode::E108 => Phase::LogicParse,
            ErrorCode::E200 => Phase::ImportValidation,
            ErrorCode::E300 | ErrorCode::E301 | ErrorCode::E302 | ErrorCode::E303 => {
                Phase::TemplateSyntax
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E200.to_string(), "E200");
        assert_eq!(ErrorCode::E300.to_string(), "E300");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "missing opening delimiter");
        assert_eq!(ErrorCode::E200.description(), "imported file not found");
        assert_eq!(ErrorCode::E301.description(), "orphan closing tag");
    }

    #[test]
    fn test_error_code_phase() {
        assert_eq!(ErrorCode::E002.phase(), Phase::Format);
        assert_eq!(ErrorCode::E108.phase(), Phase::LogicParse);
        assert_eq!(ErrorCode::E200.phase(), Phase::ImportValidation);
        assert_eq!(ErrorCode::E303.phase(), Phase::TemplateSyntax);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::ImportValidation.to_string(), "ImportValidationError");
        assert_eq!(Phase::TemplateSyntax.to_string(), "TemplateSyntaxError");
    }
}
