//! Structured diagnostic messages with severity, codes, and notes.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// A structured diagnostic message.
///
/// Diagnostics are the primary mechanism for reporting errors, warnings, and
/// progress information from the place-and-route stages. Each diagnostic
/// carries a severity level, a unique code, a primary message, and optional
/// explanatory notes (e.g. the members of a constraint chain that failed to
/// legalize).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The unique code identifying the type of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// Explanatory footnotes providing additional context.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic with the given code and message.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Creates a new warning diagnostic with the given code and message.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Creates a new informational note with the given code and message.
    pub fn note(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Note, code, message)
    }

    fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            notes: Vec::new(),
        }
    }

    /// Adds an explanatory note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    #[test]
    fn create_error() {
        let code = DiagnosticCode::new(Category::Placement, 1);
        let diag = Diagnostic::error(code, "failed to place cell 'lut_0'");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "failed to place cell 'lut_0'");
        assert_eq!(format!("{}", diag.code), "P001");
        assert!(diag.notes.is_empty());
    }

    #[test]
    fn create_note() {
        let code = DiagnosticCode::new(Category::Placement, 2);
        let diag = Diagnostic::note(code, "relocated carry chain");
        assert_eq!(diag.severity, Severity::Note);
    }

    #[test]
    fn with_note_appends() {
        let code = DiagnosticCode::new(Category::Placement, 3);
        let diag = Diagnostic::error(code, "unsatisfiable constraint chain")
            .with_note("root 'cc_0' at (3, 1, 0)")
            .with_note("child 'cc_1' unplaced");
        assert_eq!(diag.notes.len(), 2);
        assert_eq!(diag.notes[1], "child 'cc_1' unplaced");
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::new(Category::Timing, 10);
        let diag = Diagnostic::warning(code, "timing not met").with_note("worst slack -1.2 ns");
        let json = serde_json::to_string(&diag).unwrap();
        let restored: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.severity, Severity::Warning);
        assert_eq!(restored.notes.len(), 1);
    }
}
