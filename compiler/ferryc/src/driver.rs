//! Program assembly and execution.
//!
//! `translate` writes the generated files, `compile` additionally places
//! extern files and runs the target's build step, `run` places externs and
//! executes the primary file.

use std::fs;
use std::path::{Path, PathBuf};

use ferry_codegen::{Backend, GeneratedProgram, PythonBackend};
use ferry_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use ferry_diagnostic::Diagnostic;
use ferry_ir::Program;
use tracing::{debug, info, instrument};

use crate::externs::{place_externs, PlacedExtern};
use crate::process::run_interpreter;
use crate::{CompileOptions, DriverError};

const BACKEND: PythonBackend = PythonBackend;

/// Success or failure of a driver operation, with the diagnostics that
/// explain it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct Outcome {
    pub success: bool,
    pub diagnostics: Vec<Diagnostic>,
    /// The program's stdout, when it was run with `capture_stdout`.
    pub stdout: Option<String>,
}

impl Outcome {
    fn succeeded(stdout: Option<String>) -> Self {
        Outcome {
            success: true,
            diagnostics: Vec::new(),
            stdout,
        }
    }

    fn failed(diagnostic: Diagnostic, stdout: Option<String>) -> Self {
        Outcome {
            success: false,
            diagnostics: vec![diagnostic],
            stdout,
        }
    }

    fn from_result(program: &Program, result: Result<Option<String>, DriverError>) -> Self {
        match result {
            Ok(stdout) => Outcome::succeeded(stdout),
            Err(err) => Outcome::failed(err.to_diagnostic(&program.source_file), None),
        }
    }

    /// The diagnostics as uncolored text.
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        {
            let mut emitter = TerminalEmitter::with_color_mode(&mut buf, ColorMode::Never, false);
            emitter.emit_all(&self.diagnostics);
            emitter.flush();
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Report the diagnostics on stderr.
    pub fn emit(&self, mode: ColorMode) {
        if self.diagnostics.is_empty() {
            return;
        }
        let mut emitter = TerminalEmitter::stderr(mode);
        emitter.emit_all(&self.diagnostics);
        let errors = self.diagnostics.iter().filter(|d| d.is_error()).count();
        emitter.emit_summary(errors, self.diagnostics.len() - errors);
        emitter.flush();
    }
}

/// Read a program tree from a JSON file.
pub fn read_program(path: &Path) -> Result<Program, DriverError> {
    let text = fs::read_to_string(path).map_err(|source| DriverError::ReadProgram {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| DriverError::MalformedProgram {
        path: path.to_path_buf(),
        source,
    })
}

/// Produce the target text. Nothing is written.
#[instrument(level = "debug", skip_all, fields(program = %program.name))]
pub fn generate(program: &Program) -> Result<GeneratedProgram, DriverError> {
    Ok(ferry_codegen::generate(&BACKEND, program)?)
}

/// Write every generated file into `dir`, creating it if needed.
/// Returns the path of the primary file.
pub fn write_output(generated: &GeneratedProgram, dir: &Path) -> Result<PathBuf, DriverError> {
    fs::create_dir_all(dir).map_err(|e| DriverError::io(dir, e))?;
    for file in &generated.files {
        let path = dir.join(&file.name);
        fs::write(&path, &file.contents).map_err(|e| DriverError::io(&path, e))?;
        debug!(file = %path.display(), bytes = file.contents.len(), "wrote");
    }
    info!("wrote {} files to {}", generated.files.len(), dir.display());
    Ok(dir.join(&generated.main_file))
}

/// Generate and write the program's files.
#[instrument(level = "debug", skip_all, fields(program = %program.name))]
pub fn translate(program: &Program, out_dir: &Path) -> Outcome {
    let result = generate(program)
        .and_then(|generated| write_output(&generated, out_dir))
        .map(|_| None);
    Outcome::from_result(program, result)
}

/// Generate, write, place externs, then run the target's build step.
#[instrument(level = "debug", skip_all, fields(program = %program.name))]
pub fn compile(program: &Program, options: &CompileOptions, out_dir: &Path) -> Outcome {
    let result = prepare(program, options, out_dir)
        .and_then(|(generated, placed)| build(&generated, &placed, options, out_dir))
        .map(|()| None);
    Outcome::from_result(program, result)
}

/// Generate, write, place externs, then execute the primary file.
///
/// A non-zero exit is a failure; captured stdout is kept either way.
#[instrument(level = "debug", skip_all, fields(program = %program.name))]
pub fn run(program: &Program, options: &CompileOptions, out_dir: &Path) -> Outcome {
    let generated = match prepare(program, options, out_dir) {
        Ok((generated, _)) => generated,
        Err(err) => return Outcome::from_result(program, Err(err)),
    };
    let interpreter = options.interpreter(BACKEND.toolchain().interpreter);
    let args = [generated.main_file.clone()];
    match run_interpreter(interpreter, &args, out_dir, options.capture_stdout) {
        Ok(finished) if finished.success() => Outcome::succeeded(finished.stdout),
        Ok(finished) => {
            let err = DriverError::ProcessFailed {
                program: interpreter.to_string(),
                exit_code: finished.exit_code,
            };
            Outcome::failed(err.to_diagnostic(&program.source_file), finished.stdout)
        }
        Err(err) => Outcome::from_result(program, Err(err)),
    }
}

fn prepare(
    program: &Program,
    options: &CompileOptions,
    out_dir: &Path,
) -> Result<(GeneratedProgram, Vec<PlacedExtern>), DriverError> {
    let generated = generate(program)?;
    write_output(&generated, out_dir)?;
    let placed = place_externs(&BACKEND, &options.externs, out_dir)?;
    Ok((generated, placed))
}

fn build(
    generated: &GeneratedProgram,
    placed: &[PlacedExtern],
    options: &CompileOptions,
    out_dir: &Path,
) -> Result<(), DriverError> {
    let toolchain = BACKEND.toolchain();
    let Some(build_args) = toolchain.build_args else {
        return Ok(());
    };
    let interpreter = options.interpreter(toolchain.interpreter);
    let mut args: Vec<String> = build_args.iter().map(|a| (*a).to_string()).collect();
    args.extend(generated.files.iter().map(|f| f.name.clone()));
    args.extend(
        placed
            .iter()
            .filter_map(|p| p.target.file_name())
            .map(|name| name.to_string_lossy().into_owned()),
    );

    let finished = run_interpreter(interpreter, &args, out_dir, false)?;
    if finished.success() {
        Ok(())
    } else {
        Err(DriverError::ProcessFailed {
            program: interpreter.to_string(),
            exit_code: finished.exit_code,
        })
    }
}

#[cfg(test)]
mod tests;
