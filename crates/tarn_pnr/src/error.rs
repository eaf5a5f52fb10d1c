//! Fatal placement error kinds.

use tarn_arch::CellType;
use thiserror::Error;

/// An unrecoverable placement failure.
///
/// There is no partial-success recovery: any of these aborts the whole
/// place-and-route run. The placement map after a failure is unspecified.
#[derive(Debug, Error)]
pub enum PlaceError {
    /// No bel of matching type is free and no incumbent below `Strong`
    /// strength can be displaced to make room.
    #[error("failed to place cell '{cell}' of type '{cell_type}': no available bel and no ripup candidate")]
    UnplaceableCell {
        /// Name of the cell that could not be placed.
        cell: String,
        /// Type of the cell that could not be placed.
        cell_type: CellType,
    },

    /// The ripup budget was exhausted while displaced cells kept displacing
    /// further cells.
    #[error("failed to place cell '{cell}': ripup iteration limit exceeded")]
    RipupLimitExceeded {
        /// Name of the cell being placed when the budget ran out.
        cell: String,
    },

    /// No candidate root location admits a valid recursive assignment for a
    /// constraint chain.
    #[error("no viable placement found for constraint chain rooted at '{root}'")]
    UnsatisfiableChain {
        /// Name of the chain's root cell.
        root: String,
    },
}
