//! Collection point for the diagnostics a run produces.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Collects the diagnostics produced while processing a design.
///
/// The placement passes all push into one shared sink as they go; whoever
/// drives the flow drains it at the end for rendering and consults
/// [`has_errors`](Self::has_errors) to decide whether the run may proceed.
/// Per-severity tallies are kept in atomics beside the entry buffer, so that
/// question is answered without taking the buffer lock.
pub struct DiagnosticSink {
    entries: Mutex<Vec<Diagnostic>>,
    errors: AtomicUsize,
    warnings: AtomicUsize,
}

impl DiagnosticSink {
    /// Creates a sink with nothing recorded.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            errors: AtomicUsize::new(0),
            warnings: AtomicUsize::new(0),
        }
    }

    /// Records one diagnostic, bumping the tally for its severity.
    pub fn emit(&self, diag: Diagnostic) {
        match diag.severity {
            Severity::Error => self.errors.fetch_add(1, Ordering::Relaxed),
            Severity::Warning => self.warnings.fetch_add(1, Ordering::Relaxed),
            Severity::Note => 0,
        };
        self.entries.lock().unwrap().push(diag);
    }

    /// Whether any error has been recorded so far.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Number of errors recorded so far.
    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    /// Number of warnings recorded so far.
    pub fn warning_count(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }

    /// Removes and returns every recorded diagnostic.
    ///
    /// The severity tallies are deliberately left alone: they describe the
    /// whole run, not whatever happens to sit in the buffer.
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock().unwrap())
    }

    /// Copies out the recorded diagnostics, leaving the sink intact.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.entries.lock().unwrap().clone()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};

    fn placement_error() -> Diagnostic {
        Diagnostic::error(
            DiagnosticCode::new(Category::Placement, 1),
            "failed to place cell 'ff_3'",
        )
    }

    fn timing_warning() -> Diagnostic {
        Diagnostic::warning(DiagnosticCode::new(Category::Timing, 10), "timing not met")
    }

    fn progress_note() -> Diagnostic {
        Diagnostic::note(
            DiagnosticCode::new(Category::Placement, 2),
            "relocated carry chain",
        )
    }

    #[test]
    fn fresh_sink_is_clean() {
        let sink = DiagnosticSink::new();
        assert!(!sink.has_errors());
        assert_eq!(sink.error_count(), 0);
        assert_eq!(sink.warning_count(), 0);
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn tallies_track_severity() {
        let sink = DiagnosticSink::new();
        sink.emit(progress_note());
        sink.emit(timing_warning());
        sink.emit(placement_error());
        sink.emit(timing_warning());

        assert_eq!(sink.error_count(), 1);
        assert_eq!(sink.warning_count(), 2);
        assert!(sink.has_errors());
        assert_eq!(sink.diagnostics().len(), 4);
    }

    #[test]
    fn notes_alone_keep_the_run_clean() {
        let sink = DiagnosticSink::new();
        sink.emit(progress_note());
        sink.emit(progress_note());
        assert!(!sink.has_errors());
        assert_eq!(sink.warning_count(), 0);
        assert_eq!(sink.diagnostics().len(), 2);
    }

    #[test]
    fn drain_empties_the_buffer_but_not_the_tallies() {
        let sink = DiagnosticSink::new();
        sink.emit(placement_error());
        sink.emit(progress_note());

        assert_eq!(sink.drain().len(), 2);
        assert!(sink.drain().is_empty());
        assert!(sink.has_errors());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn shared_across_threads() {
        use std::sync::Arc;
        use std::thread;

        let sink = Arc::new(DiagnosticSink::new());
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for _ in 0..25 {
                        sink.emit(timing_warning());
                        sink.emit(placement_error());
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(sink.error_count(), 100);
        assert_eq!(sink.warning_count(), 100);
        assert_eq!(sink.diagnostics().len(), 200);
    }
}
