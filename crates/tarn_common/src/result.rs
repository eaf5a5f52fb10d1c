//! Result plumbing for failures that indicate toolchain bugs.

/// Result alias for operations whose only failure mode is [`InternalError`].
///
/// Anything that can fail because of the *design being processed* reports
/// through domain error types or the diagnostics sink instead; this alias is
/// reserved for conditions no input should be able to trigger.
pub type TarnResult<T> = Result<T, InternalError>;

/// A broken invariant inside tarn itself.
///
/// Hitting one of these means a tarn bug, not a problem with the user's
/// design. Callers propagate it straight up and abort the run; the message
/// is what ends up in the bug report.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// What went wrong.
    pub message: String,
}

impl InternalError {
    /// Wraps a description of the broken invariant.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
