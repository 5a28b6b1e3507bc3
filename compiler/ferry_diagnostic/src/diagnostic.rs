//! Core diagnostic types.

use std::fmt;

use ferry_ir::SourceLoc;

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// Where a diagnostic points: a file, a source position, or both.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub file: Option<String>,
    pub loc: Option<SourceLoc>,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    pub fn at(loc: SourceLoc, message: impl Into<String>) -> Self {
        Label {
            file: None,
            loc: Some(loc),
            message: message.into(),
            is_primary: true,
        }
    }

    pub fn file(path: impl Into<String>, message: impl Into<String>) -> Self {
        Label {
            file: Some(path.into()),
            loc: None,
            message: message.into(),
            is_primary: true,
        }
    }

    /// `file(line,col)` or whichever half is known.
    pub fn location_text(&self) -> String {
        match (&self.file, self.loc) {
            (Some(file), Some(loc)) => format!("{file}{loc}"),
            (Some(file), None) => file.clone(),
            (None, Some(loc)) => loc.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// A structured diagnostic.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add a primary label at a source position in `file`.
    pub fn with_label(mut self, file: Option<&str>, loc: SourceLoc, message: impl Into<String>) -> Self {
        let mut label = Label::at(loc, message);
        label.file = file.map(str::to_string);
        self.labels.push(label);
        self
    }

    /// Add a primary label naming a file.
    pub fn with_file_label(mut self, path: impl Into<String>, message: impl Into<String>) -> Self {
        self.labels.push(Label::file(path, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}
