//! Driver errors.
//!
//! Everything that can stop a translate/build/run after the program tree
//! has been handed over. Each variant owns an [`ErrorCode`] and turns into a
//! [`Diagnostic`] naming the file or executable involved.

use std::io;
use std::path::PathBuf;

use ferry_codegen::CodegenError;
use ferry_diagnostic::{Diagnostic, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    /// Generation stopped (unsupported construct or inconsistent tree).
    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error("cannot read program file '{}': {source}", .path.display())]
    ReadProgram {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed program file '{}': {source}", .path.display())]
    MalformedProgram {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unrecognized file as extra input for Python compilation: {}", .path.display())]
    UnrecognizedExternFile { path: PathBuf },

    #[error("unable to determine module name: {}", .path.display())]
    MissingModuleMarker { path: PathBuf },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to start {program} ({source})")]
    SpawnFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {}", exit_status_text(.exit_code))]
    ProcessFailed {
        program: String,
        exit_code: Option<i32>,
    },
}

fn exit_status_text(code: &Option<i32>) -> String {
    match *code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by a signal)".to_string(),
    }
}

impl DriverError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DriverError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DriverError::Codegen(CodegenError::Unsupported { .. }) => ErrorCode::E2001,
            DriverError::Codegen(CodegenError::Internal { .. }) => ErrorCode::E9001,
            DriverError::ReadProgram { .. } => ErrorCode::E1001,
            DriverError::MalformedProgram { .. } => ErrorCode::E1002,
            DriverError::UnrecognizedExternFile { .. } => ErrorCode::E3001,
            DriverError::MissingModuleMarker { .. } => ErrorCode::E3002,
            DriverError::Io { .. } => ErrorCode::E3003,
            DriverError::SpawnFailed { .. } => ErrorCode::E3004,
            DriverError::ProcessFailed { .. } => ErrorCode::E3005,
        }
    }

    /// Convert to a user-facing diagnostic; `source_file` is the program's
    /// source file, used to label code generation errors.
    pub fn to_diagnostic(&self, source_file: &str) -> Diagnostic {
        if let DriverError::Codegen(err) = self {
            return err.to_diagnostic(source_file);
        }
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            DriverError::ReadProgram { path, .. } | DriverError::Io { path, .. } => {
                diag.with_file_label(path.display().to_string(), "here")
            }
            DriverError::MalformedProgram { path, source } => diag.with_label(
                Some(&path.display().to_string()),
                ferry_ir::SourceLoc::new(saturate(source.line()), saturate(source.column())),
                "does not describe a program tree",
            ),
            DriverError::UnrecognizedExternFile { path } => diag
                .with_file_label(path.display().to_string(), "not a .py file")
                .with_note("extra inputs are copied next to the generated modules"),
            DriverError::MissingModuleMarker { path } => diag
                .with_file_label(path.display().to_string(), "no module marker line")
                .with_suggestion("add a line of the form `assert \"ModuleName\" == __name__`"),
            DriverError::SpawnFailed { .. } => {
                diag.with_note("set FERRY_PYTHON or pass --python=<exe> to choose the interpreter")
            }
            DriverError::Codegen(_) | DriverError::ProcessFailed { .. } => diag,
        }
    }
}

fn saturate(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
