//! Rendering of diagnostics for user-facing output.

use crate::diagnostic::Diagnostic;

/// Formats diagnostics for a particular output medium.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic to a string.
    fn render(&self, diag: &Diagnostic) -> String;

    /// Renders a batch of diagnostics, one per line.
    fn render_all(&self, diags: &[Diagnostic]) -> String {
        diags
            .iter()
            .map(|d| self.render(d))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Renders diagnostics as plain terminal lines.
///
/// Output format is `severity[CODE]: message`, with each note on a
/// following indented line.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = format!("{}[{}]: {}", diag.severity, diag.code, diag.message);
        for note in &diag.notes {
            out.push_str("\n    note: ");
            out.push_str(note);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};

    #[test]
    fn renders_single_line() {
        let diag = Diagnostic::error(
            DiagnosticCode::new(Category::Placement, 1),
            "failed to place cell 'ff_3'",
        );
        let rendered = TerminalRenderer.render(&diag);
        assert_eq!(rendered, "error[P001]: failed to place cell 'ff_3'");
    }

    #[test]
    fn renders_notes_indented() {
        let diag = Diagnostic::error(
            DiagnosticCode::new(Category::Placement, 3),
            "unsatisfiable constraint chain",
        )
        .with_note("root 'cc_0' at (1, 1, 0)");
        let rendered = TerminalRenderer.render(&diag);
        assert!(rendered.contains("\n    note: root 'cc_0' at (1, 1, 0)"));
    }

    #[test]
    fn renders_batch() {
        let a = Diagnostic::note(DiagnosticCode::new(Category::Placement, 2), "first");
        let b = Diagnostic::note(DiagnosticCode::new(Category::Placement, 2), "second");
        let rendered = TerminalRenderer.render_all(&[a, b]);
        assert_eq!(rendered.lines().count(), 2);
    }
}
