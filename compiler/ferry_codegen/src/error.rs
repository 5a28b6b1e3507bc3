//! Code generation errors.

use ferry_diagnostic::{Diagnostic, ErrorCode};
use ferry_ir::SourceLoc;
use thiserror::Error;

use crate::Feature;

/// Why a run stopped producing output.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// The program uses a construct the target cannot express.
    #[error("{feature} are not supported by this target {loc}")]
    Unsupported { feature: Feature, loc: SourceLoc },

    /// The program tree is inconsistent (e.g. a dangling declaration reference).
    #[error("internal backend error: {message}")]
    Internal { message: String },
}

impl CodegenError {
    pub fn unsupported(feature: Feature, loc: SourceLoc) -> Self {
        CodegenError::Unsupported { feature, loc }
    }

    #[cold]
    pub fn internal(message: impl Into<String>) -> Self {
        CodegenError::Internal {
            message: message.into(),
        }
    }

    /// Convert to a user-facing diagnostic; `file` is the program's source file.
    pub fn to_diagnostic(&self, file: &str) -> Diagnostic {
        match self {
            CodegenError::Unsupported { feature, loc } => Diagnostic::error(ErrorCode::E2001)
                .with_message(format!("{feature} are not supported by the target"))
                .with_label(Some(file), *loc, "unsupported construct"),
            CodegenError::Internal { message } => Diagnostic::error(ErrorCode::E9001)
                .with_message(message.clone())
                .with_note("the program tree handed to the backend is inconsistent"),
        }
    }
}

/// Result type for code generation.
pub type CodegenResult<T> = Result<T, CodegenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_names_feature_and_location() {
        let err = CodegenError::unsupported(Feature::Multisets, SourceLoc::new(2, 5));
        assert_eq!(err.to_string(), "multisets are not supported by this target (2,5)");
        let diag = err.to_diagnostic("p.dfy");
        assert_eq!(diag.code, ErrorCode::E2001);
        assert_eq!(diag.labels[0].location_text(), "p.dfy(2,5)");
    }
}
