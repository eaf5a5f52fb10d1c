//! FPGA device database for the tarn placement core.
//!
//! This crate provides the [`Device`] trait that abstracts over FPGA device
//! models, and the concrete [`GridDevice`] rectangular-grid model used by
//! tests and small flows. A device is a universe of bels (basic elements of
//! logic), each with a type tag and a discrete 3-D grid location, plus
//! architecture-specific validity rules and a routing-delay estimate.
//!
//! # Usage
//!
//! ```
//! use tarn_arch::{BelType, Device, GridDevice, Loc};
//!
//! let device = GridDevice::uniform("demo", 4, 4, 2, BelType::Lut);
//! assert_eq!(device.bels().len(), 32);
//! assert!(device.bel_at(Loc::new(3, 3, 1)).is_some());
//! ```

#![warn(missing_docs)]

pub mod grid;
pub mod ids;
pub mod types;

pub use grid::GridDevice;
pub use ids::BelId;
pub use types::{Bel, BelType, CellType, Delay, Loc};

/// The device database consumed by the placement core.
///
/// Implementations must enumerate bels in a stable order; the placement core
/// depends on that for reproducible results.
pub trait Device: std::fmt::Debug {
    /// Returns the device part name.
    fn device_name(&self) -> &str;

    /// Returns all bels in the device, in a stable order.
    fn bels(&self) -> &[Bel];

    /// Returns the bel with the given ID.
    fn bel(&self, id: BelId) -> &Bel;

    /// Returns the bel at the given grid location, if any.
    fn bel_at(&self, loc: Loc) -> Option<BelId>;

    /// Returns the number of grid columns.
    fn grid_dim_x(&self) -> i32;

    /// Returns the number of grid rows.
    fn grid_dim_y(&self) -> i32;

    /// Returns the number of bel slots stacked at grid position `(x, y)`.
    ///
    /// At least 1, even for positions with no bels, so that slot-index
    /// searches always have a non-empty range to clamp into.
    fn tile_dim_z(&self, x: i32, y: i32) -> i32;

    /// Architecture-specific legality of placing a cell of the given type on
    /// `bel`, beyond plain type matching (which the placer checks itself).
    ///
    /// The cell is identified by its type tag rather than a netlist handle to
    /// avoid a circular dependency with downstream crates.
    fn is_valid_bel_for_cell(&self, _cell_type: CellType, _bel: BelId) -> bool {
        true
    }

    /// Estimates the routing delay from the output of `from` to an input of
    /// `to`.
    fn predict_delay(&self, _from: BelId, _to: BelId) -> Delay {
        Delay::ZERO
    }
}
