//! Error codes for all rewriter diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E3001`) with the first digit
//! indicating the phase.

use std::fmt;

/// Error codes for all diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E3xxx: Pattern rewrite (structural) errors
/// - E6xxx: Runtime errors raised by generated code
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Pattern Rewrite Errors (E3xxx)
    /// `else` clause is not the last clause of a case statement
    E3001,
    /// Rest marker target is not a variable
    E3002,
    /// Pattern kind not allowed in this position
    E3003,

    // Runtime Errors (E6xxx)
    /// No pattern matched and there is no `else` clause
    E6001,
    /// `deconstruct` / `deconstruct_keys` returned the wrong container shape
    E6002,

    // Internal Errors (E9xxx)
    /// Tree handle does not resolve in its arena
    E9001,
}

impl ErrorCode {
    /// All error codes, in declaration order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E6001,
        ErrorCode::E6002,
        ErrorCode::E9001,
    ];

    /// Get the string representation (e.g., `"E3001"`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Check if this is a pattern rewrite error (E3xxx range).
    pub fn is_rewrite_error(&self) -> bool {
        matches!(self, ErrorCode::E3001 | ErrorCode::E3002 | ErrorCode::E3003)
    }

    /// Check if this is a runtime error (E6xxx range).
    pub fn is_runtime_error(&self) -> bool {
        matches!(self, ErrorCode::E6001 | ErrorCode::E6002)
    }

    /// Check if this is an internal error (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E3001"`. Case-insensitive.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}
