//! Driver configuration.
//!
//! Options come from the command line and from the environment
//! (`FERRY_PYTHON`); command-line values win.

use std::path::{Path, PathBuf};

use ferry_diagnostic::emitter::ColorMode;

/// Options shared by `translate`, `build` and `run`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Output directory (`-o`). Defaults to `<program>-py` next to the input.
    pub output: Option<PathBuf>,
    /// Interpreter executable (`--python=`).
    pub python: Option<String>,
    pub color: ColorMode,
    pub verbose: bool,
    /// Auxiliary target files placed next to the generated modules.
    pub externs: Vec<PathBuf>,
    /// Capture the program's stdout instead of inheriting it.
    pub capture_stdout: bool,
}

impl CompileOptions {
    /// Options taken from the environment.
    pub fn from_env() -> Self {
        CompileOptions {
            python: std::env::var("FERRY_PYTHON").ok().filter(|s| !s.is_empty()),
            ..CompileOptions::default()
        }
    }

    /// Overlay `other` on top of `self`: set values in `other` replace ours,
    /// extern lists are concatenated.
    pub fn merge(&mut self, other: &CompileOptions) {
        if other.output.is_some() {
            self.output.clone_from(&other.output);
        }
        if other.python.is_some() {
            self.python.clone_from(&other.python);
        }
        if other.color != ColorMode::Auto {
            self.color = other.color;
        }
        self.verbose |= other.verbose;
        self.capture_stdout |= other.capture_stdout;
        self.externs.extend(other.externs.iter().cloned());
    }

    /// The interpreter to invoke, falling back to the backend's default.
    pub fn interpreter<'a>(&'a self, default: &'a str) -> &'a str {
        self.python.as_deref().unwrap_or(default)
    }

    /// Where output files go for a program read from `input`.
    pub fn output_dir(&self, input: &Path, program_name: &str) -> PathBuf {
        match &self.output {
            Some(dir) => dir.clone(),
            None => input
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(format!("{program_name}-py")),
        }
    }
}

/// Parse the arguments that follow the program file.
///
/// Flags: `-o <dir>`, `--output=<dir>`, `--python=<exe>`,
/// `--color=<auto|always|never>`, `-v`/`--verbose`. Anything else not
/// starting with `-` is an extern file.
pub fn parse_compile_options(args: &[String]) -> Result<CompileOptions, String> {
    let mut options = CompileOptions::default();
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if arg == "-o" {
            let Some(dir) = args.get(i + 1) else {
                return Err("-o requires a directory argument".to_string());
            };
            options.output = Some(PathBuf::from(dir));
            i += 2;
            continue;
        }

        if let Some(dir) = arg.strip_prefix("--output=") {
            options.output = Some(PathBuf::from(dir));
        } else if let Some(exe) = arg.strip_prefix("--python=") {
            if exe.is_empty() {
                return Err("--python requires an executable".to_string());
            }
            options.python = Some(exe.to_string());
        } else if let Some(mode) = arg.strip_prefix("--color=") {
            match ColorMode::parse(mode) {
                Some(mode) => options.color = mode,
                None => eprintln!(
                    "warning: unknown color mode '{mode}', using 'auto' (expected auto, always or never)"
                ),
            }
        } else if arg == "-v" || arg == "--verbose" {
            options.verbose = true;
        } else if arg.starts_with('-') {
            return Err(format!("unknown option '{arg}'"));
        } else {
            options.externs.push(PathBuf::from(arg));
        }
        i += 1;
    }
    Ok(options)
}
