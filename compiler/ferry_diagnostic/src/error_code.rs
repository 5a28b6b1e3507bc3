//! Error codes for all backend and driver diagnostics.
//!
//! Each code is a unique identifier (e.g., `E2001`) whose first digit names
//! the phase that produced it.

use std::fmt;

/// Error codes for all diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E1xxx: Program input (reading the resolved program tree)
/// - E2xxx: Code generation
/// - E3xxx: Driver / target toolchain
/// - E9xxx: Internal backend errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Input Errors (E1xxx)
    /// Program file could not be read
    E1001,
    /// Program tree is malformed
    E1002,

    // Codegen Errors (E2xxx)
    /// Construct not supported by the selected target
    E2001,

    // Driver Errors (E3xxx)
    /// Extern file has the wrong extension
    E3001,
    /// Extern file lacks its module marker line
    E3002,
    /// File system failure while writing or copying output
    E3003,
    /// Target interpreter could not be started
    E3004,
    /// Target interpreter exited with a failure status
    E3005,

    // Internal Errors (E9xxx)
    /// Inconsistent program tree reached the backend
    E9001,
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E2001,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E3004,
        ErrorCode::E3005,
        ErrorCode::E9001,
    ];

    /// Get the numeric code as a string (e.g., "E2001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// One-line description for `--explain`-style listings.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "program file could not be read",
            ErrorCode::E1002 => "program tree is malformed",
            ErrorCode::E2001 => "construct not supported by the target",
            ErrorCode::E3001 => "extern file has an unrecognized extension",
            ErrorCode::E3002 => "extern file lacks a module marker line",
            ErrorCode::E3003 => "file system failure",
            ErrorCode::E3004 => "target interpreter could not be started",
            ErrorCode::E3005 => "target interpreter reported failure",
            ErrorCode::E9001 => "internal backend error",
        }
    }

    pub fn is_codegen_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    pub fn is_driver_error(&self) -> bool {
        self.as_str().starts_with("E3")
    }

    pub fn is_internal(&self) -> bool {
        self.as_str().starts_with("E9")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_as_str() {
        for code in ErrorCode::ALL {
            assert_eq!(code.to_string(), code.as_str());
            assert!(!code.description().is_empty());
        }
    }

    #[test]
    fn phase_predicates_are_exclusive() {
        for code in ErrorCode::ALL {
            let hits = [code.is_codegen_error(), code.is_driver_error(), code.is_internal()]
                .iter()
                .filter(|b| **b)
                .count();
            assert!(hits <= 1, "{code} classified more than once");
        }
        assert!(ErrorCode::E2001.is_codegen_error());
        assert!(ErrorCode::E3002.is_driver_error());
        assert!(ErrorCode::E9001.is_internal());
    }
}
