//! Shared data types for FPGA device database models.
//!
//! This module defines the structural vocabulary of a device as seen by the
//! placement core: grid locations, bel and cell type tags, bels themselves,
//! and timing delays.

use crate::ids::BelId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A discrete location in the device grid.
///
/// `x` and `y` address a tile in the rectangular grid; `z` selects one of the
/// bel slots stacked within that tile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Loc {
    /// Column index (0-based, left to right).
    pub x: i32,
    /// Row index (0-based, bottom to top).
    pub y: i32,
    /// Slot index within the tile.
    pub z: i32,
}

impl Loc {
    /// Creates a location from its three coordinates.
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// The type tag of a netlist cell, determining what physical resource it
/// must be placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    /// A look-up table.
    Lut,
    /// A D flip-flop.
    Dff,
    /// A carry-chain cell for arithmetic operations.
    Carry,
    /// A block RAM.
    Bram,
    /// A DSP multiply-accumulate block.
    Dsp,
    /// An I/O buffer connecting to a package pin.
    Iobuf,
    /// A clock/global-network buffer.
    ClockBuf,
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellType::Lut => write!(f, "lut"),
            CellType::Dff => write!(f, "dff"),
            CellType::Carry => write!(f, "carry"),
            CellType::Bram => write!(f, "bram"),
            CellType::Dsp => write!(f, "dsp"),
            CellType::Iobuf => write!(f, "iobuf"),
            CellType::ClockBuf => write!(f, "clockbuf"),
        }
    }
}

/// The type of a basic element of logic (bel) within a tile.
///
/// Bels are the atomic programmable resources that cells are mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BelType {
    /// A look-up table bel.
    Lut,
    /// A flip-flop bel.
    Ff,
    /// A carry-chain bel.
    Carry,
    /// A block RAM primitive bel.
    BramPrimitive,
    /// A DSP primitive bel.
    DspPrimitive,
    /// An I/O buffer bel connecting to a package pin.
    IoBuf,
    /// A clock buffer bel driving a global network.
    ClockBuf,
}

impl BelType {
    /// Returns the bel type a cell of the given type must be placed on.
    pub fn for_cell(cell_type: CellType) -> Self {
        match cell_type {
            CellType::Lut => BelType::Lut,
            CellType::Dff => BelType::Ff,
            CellType::Carry => BelType::Carry,
            CellType::Bram => BelType::BramPrimitive,
            CellType::Dsp => BelType::DspPrimitive,
            CellType::Iobuf => BelType::IoBuf,
            CellType::ClockBuf => BelType::ClockBuf,
        }
    }
}

/// A basic element of logic (bel) in the device.
///
/// Bels are the smallest addressable placement resources. During placement,
/// each netlist cell is assigned to exactly one bel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bel {
    /// The unique ID of this bel.
    pub id: BelId,
    /// The instance name of this bel (e.g., "LUT_X3Y7Z0").
    pub name: String,
    /// The functional type of this bel.
    pub bel_type: BelType,
    /// The grid location of this bel.
    pub loc: Loc,
    /// Whether this bel drives a global network.
    ///
    /// Nets driven from (or into) global-buffer bels are distributed on
    /// dedicated routing and are excluded from wirelength estimation.
    pub is_global_buf: bool,
}

/// A timing delay with min/typical/max corners.
///
/// Represents the propagation delay through a device element across
/// different process/voltage/temperature corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Delay {
    /// Minimum delay in nanoseconds (fast corner).
    pub min_ns: f64,
    /// Typical delay in nanoseconds (nominal corner).
    pub typ_ns: f64,
    /// Maximum delay in nanoseconds (slow corner).
    pub max_ns: f64,
}

impl Delay {
    /// A zero delay (no propagation time).
    pub const ZERO: Self = Self {
        min_ns: 0.0,
        typ_ns: 0.0,
        max_ns: 0.0,
    };

    /// Creates a new delay with the given min/typ/max values.
    pub fn new(min_ns: f64, typ_ns: f64, max_ns: f64) -> Self {
        Self {
            min_ns,
            typ_ns,
            max_ns,
        }
    }

    /// Creates a delay with all corners equal to the given value.
    pub fn from_ns(ns: f64) -> Self {
        Self::new(ns, ns, ns)
    }

    /// Returns the worst-corner (maximum) delay in nanoseconds.
    ///
    /// Setup-slack budgets are written against the slow corner, so this is
    /// the value placement cost estimation consumes.
    pub fn ns(&self) -> f64 {
        self.max_ns
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loc_display_and_order() {
        let a = Loc::new(1, 2, 0);
        assert_eq!(format!("{a}"), "(1, 2, 0)");
        assert!(Loc::new(0, 5, 5) < Loc::new(1, 0, 0));
        assert!(Loc::new(1, 2, 0) < Loc::new(1, 2, 1));
    }

    #[test]
    fn loc_default_is_origin() {
        assert_eq!(Loc::default(), Loc::new(0, 0, 0));
    }

    #[test]
    fn cell_to_bel_type_mapping() {
        assert_eq!(BelType::for_cell(CellType::Lut), BelType::Lut);
        assert_eq!(BelType::for_cell(CellType::Dff), BelType::Ff);
        assert_eq!(BelType::for_cell(CellType::Carry), BelType::Carry);
        assert_eq!(BelType::for_cell(CellType::Bram), BelType::BramPrimitive);
        assert_eq!(BelType::for_cell(CellType::Dsp), BelType::DspPrimitive);
        assert_eq!(BelType::for_cell(CellType::Iobuf), BelType::IoBuf);
        assert_eq!(BelType::for_cell(CellType::ClockBuf), BelType::ClockBuf);
    }

    #[test]
    fn cell_type_display() {
        assert_eq!(format!("{}", CellType::Lut), "lut");
        assert_eq!(format!("{}", CellType::ClockBuf), "clockbuf");
    }

    #[test]
    fn delay_corners() {
        let d = Delay::new(0.1, 0.2, 0.3);
        assert_eq!(d.ns(), 0.3);
        assert_eq!(Delay::ZERO.ns(), 0.0);
        assert_eq!(Delay::default(), Delay::ZERO);
        assert_eq!(Delay::from_ns(1.5).min_ns, 1.5);
        assert_eq!(Delay::from_ns(1.5).ns(), 1.5);
    }

    #[test]
    fn loc_serde_roundtrip() {
        let loc = Loc::new(3, 4, 1);
        let json = serde_json::to_string(&loc).unwrap();
        let restored: Loc = serde_json::from_str(&json).unwrap();
        assert_eq!(loc, restored);
    }
}
