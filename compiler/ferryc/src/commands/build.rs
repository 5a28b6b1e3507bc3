//! The `translate`, `build` and `run` commands.

use std::path::Path;

use crate::{CompileOptions, Outcome};

use super::load_program;

/// Write the generated files only.
pub fn translate_program(path: &str, options: &CompileOptions) -> i32 {
    let Some(program) = load_program(path, options.color) else {
        return 1;
    };
    let out_dir = options.output_dir(Path::new(path), &program.name);
    let outcome = crate::translate(&program, &out_dir);
    if outcome.success {
        println!("{}", out_dir.display());
    }
    finish(&outcome, options)
}

/// Write the generated files, place externs and byte-compile everything.
pub fn build_program(path: &str, options: &CompileOptions) -> i32 {
    let Some(program) = load_program(path, options.color) else {
        return 1;
    };
    let out_dir = options.output_dir(Path::new(path), &program.name);
    let outcome = crate::compile(&program, options, &out_dir);
    if outcome.success {
        println!("{}", out_dir.display());
    }
    finish(&outcome, options)
}

/// Build, then execute the primary file with the target interpreter.
pub fn run_program(path: &str, options: &CompileOptions) -> i32 {
    let Some(program) = load_program(path, options.color) else {
        return 1;
    };
    let out_dir = options.output_dir(Path::new(path), &program.name);
    let outcome = crate::run(&program, options, &out_dir);
    if let Some(stdout) = &outcome.stdout {
        print!("{stdout}");
    }
    finish(&outcome, options)
}

fn finish(outcome: &Outcome, options: &CompileOptions) -> i32 {
    outcome.emit(options.color);
    i32::from(!outcome.success)
}
