//! Error codes for the Polymorph diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Parser errors
//! - `E2xx` - Schema validation errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// A quoted string reached the end of its line without a closing quote.
    E001,

    /// Unexpected character.
    E002,

    /// Unterminated block comment.
    ///
    /// A `/*` comment was never closed with `*/`.
    E003,

    /// Unterminated template literal.
    ///
    /// A backtick template was never closed.
    E004,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    E100,

    /// Incomplete input.
    ///
    /// The input ended before a complete construct was parsed.
    E101,

    /// Unbalanced delimiter.
    ///
    /// A closing delimiter does not match the innermost open delimiter.
    E102,

    // =========================================================================
    // Schema Validation Errors (E2xx)
    // =========================================================================
    /// Undefined super entity.
    ///
    /// A model extends a name that no model declares.
    E200,

    /// Duplicate entity definition.
    E201,

    /// Inheritance cycle.
    ///
    /// A chain of `extends` references leads back to its start.
    E202,

    /// Delegate without concrete subtypes.
    ///
    /// A model marked `@@delegate` is not extended by any model and the
    /// configured policy rejects such delegates.
    E203,

    /// Invalid identifier.
    ///
    /// An entity or field name contains characters that cannot be embedded
    /// in generated type declarations.
    E204,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "unterminated block comment",
            ErrorCode::E004 => "unterminated template literal",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "incomplete input",
            ErrorCode::E102 => "unbalanced delimiter",
            ErrorCode::E200 => "undefined super entity",
            ErrorCode::E201 => "duplicate entity definition",
            ErrorCode::E202 => "inheritance cycle",
            ErrorCode::E203 => "delegate without subtypes",
            ErrorCode::E204 => "invalid identifier",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
