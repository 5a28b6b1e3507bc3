//! Diagnostic system for the Ferry backend and driver.
//!
//! Every user-facing failure becomes a [`Diagnostic`]:
//! - an [`ErrorCode`] for searchability
//! - a message saying what went wrong
//! - labels saying where (source position or file path)
//! - notes and suggestions saying what to do about it
//!
//! Emitters render diagnostics; the CLI uses [`emitter::TerminalEmitter`].

mod diagnostic;
pub mod emitter;
mod error_code;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
