//! Diagnostic creation, severity management, and rendering for the tarn
//! place-and-route flow.
//!
//! This crate provides structured [`Diagnostic`] messages with severity levels
//! and error codes. The thread-safe [`DiagnosticSink`] accumulates diagnostics
//! emitted by the placement and routing stages, and [`DiagnosticRenderer`]
//! implementations format them for output.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
