//! Target interpreter invocation.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, instrument};

use crate::DriverError;

/// How an interpreter run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finished {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// The program's stdout, when it was captured.
    pub stdout: Option<String>,
}

impl Finished {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Run `program args...` from `cwd` and block until it exits.
///
/// Stdin is closed; stderr is inherited, stdout too unless `capture` is set.
/// There is no timeout.
#[instrument(level = "debug", skip(args, cwd))]
pub fn run_interpreter(
    program: &str,
    args: &[String],
    cwd: &Path,
    capture: bool,
) -> Result<Finished, DriverError> {
    let mut command = Command::new(program);
    command
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit());
    debug!(?args, cwd = %cwd.display(), "spawning");

    let spawn_failed = |source| DriverError::SpawnFailed {
        program: program.to_string(),
        source,
    };
    let finished = if capture {
        let output = command
            .stdout(Stdio::piped())
            .output()
            .map_err(spawn_failed)?;
        Finished {
            exit_code: output.status.code(),
            stdout: Some(String::from_utf8_lossy(&output.stdout).into_owned()),
        }
    } else {
        let status = command
            .stdout(Stdio::inherit())
            .status()
            .map_err(spawn_failed)?;
        Finished {
            exit_code: status.code(),
            stdout: None,
        }
    };
    debug!(exit_code = ?finished.exit_code, "interpreter exited");
    Ok(finished)
}
