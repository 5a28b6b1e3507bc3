//! Ferry Compiler Driver
//!
//! Takes a resolved program tree, hands it to a backend and lays the
//! result out on disk, optionally running the target interpreter on it.
//!
//! # Operations
//!
//! ```text
//! program.json ──► read_program() ──► Program
//!                                       │
//!                                       ▼
//!                                  generate()          (pure text)
//!                                       │
//!              ┌────────────────────────┼──────────────────────┐
//!              ▼                        ▼                      ▼
//!          translate()              compile()               run()
//!        (write files)      (+ externs, py_compile)   (+ externs, execute)
//! ```
//!
//! Every top-level operation returns an [`Outcome`]: success or failure
//! plus the diagnostics explaining it. Nothing here panics or exits on a
//! user error.

pub mod commands;
mod driver;
mod error;
mod externs;
mod options;
mod process;

use std::sync::Once;

pub use driver::{compile, generate, read_program, run, translate, write_output, Outcome};
pub use error::DriverError;
pub use externs::{module_name_of, place_externs, PlacedExtern};
pub use options::{parse_compile_options, CompileOptions};
pub use process::{run_interpreter, Finished};

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber.
///
/// `FERRY_LOG` takes an `EnvFilter` directive (e.g. `ferry_codegen=debug`);
/// without it only warnings are shown, or `info` events when `verbose` is set.
/// `FERRY_LOG_TREE=1` renders spans as an indented tree.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let fallback = if verbose { "info" } else { "warn" };
        let filter =
            EnvFilter::try_from_env("FERRY_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));

        if std::env::var_os("FERRY_LOG_TREE").is_some_and(|v| v == "1") {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .init();
        }
    });
}
