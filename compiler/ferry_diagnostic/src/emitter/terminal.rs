//! Plain-text rendering of diagnostics for a terminal.
//!
//! Each diagnostic becomes a `severity[CODE]: message` header followed by
//! one line per label. A label prints as `--> file(line,col): text`, or as
//! just the file when it has no position (extern files, program inputs).
//! Notes and suggestions follow as `= note:` and `= help:` lines.
//!
//! Escape sequences are only written when [`ColorMode`] resolves to color.

use std::io::{self, Write};

use crate::{Diagnostic, Severity};

use super::DiagnosticEmitter;

/// ANSI styles used by the emitter.
#[derive(Clone, Copy)]
enum Style {
    Error,
    Warning,
    Note,
    Help,
    Strong,
}

impl Style {
    const RESET: &'static str = "\x1b[0m";

    fn ansi(self) -> &'static str {
        match self {
            Style::Error => "\x1b[1;31m",
            Style::Warning => "\x1b[1;33m",
            Style::Note => "\x1b[1;36m",
            Style::Help => "\x1b[1;32m",
            Style::Strong => "\x1b[1m",
        }
    }

    fn of(severity: Severity) -> Style {
        match severity {
            Severity::Error => Style::Error,
            Severity::Warning => Style::Warning,
            Severity::Note => Style::Note,
        }
    }
}

/// When to color diagnostics, as chosen by `--color=`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Color only an interactive terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Whether this mode colors a stream; `is_tty` decides `Auto`.
    pub fn enabled(self, is_tty: bool) -> bool {
        matches!((self, is_tty), (ColorMode::Always, _) | (ColorMode::Auto, true))
    }

    pub fn parse(value: &str) -> Option<ColorMode> {
        match value {
            "auto" => Some(ColorMode::Auto),
            "always" => Some(ColorMode::Always),
            "never" => Some(ColorMode::Never),
            _ => None,
        }
    }
}

/// `1 warning`, `3 warnings`.
fn counted(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Writes diagnostics to any byte sink; tests render into a `Vec<u8>`.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.enabled(is_tty),
        }
    }

    fn styled(&mut self, text: &str, style: Style) {
        if self.colors {
            let _ = write!(self.writer, "{}{text}{}", style.ansi(), Style::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }
}

impl TerminalEmitter<io::Stderr> {
    /// Create a terminal emitter for stderr, detecting whether it is a TTY.
    pub fn stderr(mode: ColorMode) -> Self {
        let is_tty = io::IsTerminal::is_terminal(&io::stderr());
        TerminalEmitter::with_color_mode(io::stderr(), mode, is_tty)
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.styled(&diagnostic.severity.to_string(), Style::of(diagnostic.severity));
        self.styled(&format!("[{}]", diagnostic.code), Style::Strong);
        let _ = writeln!(self.writer, ": {}", diagnostic.message);

        for label in &diagnostic.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            let _ = write!(self.writer, "  {marker} ");
            self.styled(&label.location_text(), Style::Strong);
            if label.message.is_empty() {
                let _ = writeln!(self.writer);
            } else {
                let _ = writeln!(self.writer, ": {}", label.message);
            }
        }

        for note in &diagnostic.notes {
            let _ = write!(self.writer, "  = ");
            self.styled("note", Style::Strong);
            let _ = writeln!(self.writer, ": {note}");
        }

        for suggestion in &diagnostic.suggestions {
            let _ = write!(self.writer, "  = ");
            self.styled("help", Style::Help);
            let _ = writeln!(self.writer, ": {suggestion}");
        }
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        let warnings =
            (warning_count > 0).then(|| format!("{} emitted", counted(warning_count, "warning")));
        if error_count == 0 {
            if let Some(warnings) = warnings {
                self.styled("warning", Style::Warning);
                let _ = writeln!(self.writer, ": {warnings}");
            }
            return;
        }
        let errors = if error_count == 1 {
            "previous error".to_string()
        } else {
            format!("{error_count} previous errors")
        };
        self.styled("error", Style::Error);
        match warnings {
            Some(warnings) => {
                let _ = writeln!(self.writer, ": aborting due to {errors}; {warnings}");
            }
            None => {
                let _ = writeln!(self.writer, ": aborting due to {errors}");
            }
        }
    }
}

#[cfg(test)]
mod tests;
