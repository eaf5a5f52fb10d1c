//! Severity levels for placement diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a diagnostic is.
///
/// Variants are declared least-severe first, so the derived ordering can be
/// used directly to filter a batch ("everything at `Warning` or above") or
/// to find the worst outcome of a run with `Iterator::max`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Progress or context reporting; nothing needs attention.
    Note,
    /// Something questionable that the run can tolerate.
    Warning,
    /// A failure; results past this point cannot be trusted.
    Error,
}

impl Severity {
    /// Whether this is the `Error` level.
    pub fn is_error(self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}
