//! Shared foundational types used across the tarn FPGA toolchain.
//!
//! Currently this is the home of the common result and internal-error types;
//! domain-specific error enums live in the crates that raise them.

#![warn(missing_docs)]

pub mod result;

pub use result::{InternalError, TarnResult};
