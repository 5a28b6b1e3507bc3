#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::ErrorCode;
use ferry_ir::SourceLoc;
use pretty_assertions::assert_eq;

fn sample_diagnostic() -> Diagnostic {
    Diagnostic::error(ErrorCode::E2001)
        .with_message("multisets are not supported by the Python target")
        .with_label(Some("prog.dfy"), SourceLoc::new(7, 12), "multiset display")
        .with_note("unsupported constructs abort the whole run")
        .with_suggestion("use a map from elements to counts")
}

fn render(mode: ColorMode, diags: &[Diagnostic]) -> String {
    let mut output = Vec::new();
    let mut emitter = TerminalEmitter::with_color_mode(&mut output, mode, false);
    emitter.emit_all(diags);
    emitter.flush();
    String::from_utf8(output).unwrap()
}

#[test]
fn no_color_output() {
    let text = render(ColorMode::Never, &[sample_diagnostic()]);
    assert!(text.starts_with("error[E2001]: multisets"));
    assert!(text.contains("--> prog.dfy(7,12): multiset display"));
    assert!(text.contains("= note: unsupported constructs"));
    assert!(text.contains("= help: use a map"));
    assert!(!text.contains("\x1b["));
}

#[test]
fn color_output() {
    let text = render(ColorMode::Always, &[sample_diagnostic()]);
    assert!(text.contains("\x1b["));
    assert!(text.contains("E2001"));
}

#[test]
fn auto_follows_tty() {
    assert!(ColorMode::Auto.enabled(true));
    assert!(!ColorMode::Auto.enabled(false));
    assert!(ColorMode::Always.enabled(false));
    assert!(!ColorMode::Never.enabled(true));
    assert_eq!(ColorMode::parse("never"), Some(ColorMode::Never));
    assert_eq!(ColorMode::parse("sometimes"), None);
}

#[test]
fn file_only_label() {
    let diag = Diagnostic::error(ErrorCode::E3002)
        .with_message("unable to determine module name")
        .with_file_label("lib/ext.py", "");
    let text = render(ColorMode::Never, &[diag]);
    assert!(text.contains("--> lib/ext.py\n"));
}

#[test]
fn summary_counts() {
    let mut output = Vec::new();
    let mut emitter = TerminalEmitter::with_color_mode(&mut output, ColorMode::Never, false);
    emitter.emit_summary(2, 1);
    emitter.emit_summary(0, 0);
    emitter.emit_summary(1, 0);
    emitter.emit_summary(0, 3);
    emitter.flush();
    let text = String::from_utf8(output).unwrap();
    assert_eq!(
        text,
        "error: aborting due to 2 previous errors; 1 warning emitted\n\
         error: aborting due to previous error\n\
         warning: 3 warnings emitted\n"
    );
}
