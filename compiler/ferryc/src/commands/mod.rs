//! Command implementations for the Ferry CLI.
//!
//! Each handler reports diagnostics itself and returns the process exit
//! code; `main` only parses the command line.

mod build;
mod features;

use std::path::Path;

use ferry_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use ferry_ir::Program;

pub use build::{build_program, run_program, translate_program};
pub use features::list_features;

/// Read the program tree at `path`, reporting failures on stderr.
fn load_program(path: &str, color: ColorMode) -> Option<Program> {
    match crate::read_program(Path::new(path)) {
        Ok(program) => Some(program),
        Err(err) => {
            let mut emitter = TerminalEmitter::stderr(color);
            emitter.emit(&err.to_diagnostic(path));
            emitter.flush();
            None
        }
    }
}
