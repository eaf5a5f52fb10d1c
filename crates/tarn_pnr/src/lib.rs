//! Placement core for the tarn FPGA place-and-route flow.
//!
//! This crate holds the reusable placement primitives the outer placer
//! drivers are built on: estimating placement quality by wirelength,
//! placing an individual cell with bounded ripup, and legalizing relative
//! placement constraints among chained cells. The device database lives in
//! `tarn_arch`; the netlist arena lives here.
//!
//! # Usage
//!
//! ```
//! use tarn_arch::{BelType, GridDevice};
//! use tarn_diagnostics::DiagnosticSink;
//! use tarn_pnr::{place_single_cell, PlacerConfig, PlacerCtx, PnrNetlist};
//!
//! let device = GridDevice::uniform("demo", 4, 4, 1, BelType::Lut);
//! let mut netlist = PnrNetlist::new();
//! // ... populate cells, pins, and nets ...
//! let sink = DiagnosticSink::new();
//! let mut ctx = PlacerCtx::new(&mut netlist, &device, PlacerConfig::default(), &sink);
//! for cell in ctx.netlist.cells_sorted_by_name() {
//!     place_single_cell(&mut ctx, cell, true).unwrap();
//! }
//! ```

#![warn(missing_docs)]

pub mod data;
pub mod error;
pub mod ids;
pub mod placement;

pub use data::{
    BindStrength, NetUser, PnrCell, PnrNet, PnrNetlist, PnrPin, PortDirection, RelConstraint,
};
pub use error::PlaceError;
pub use ids::{PnrCellId, PnrNetId, PnrPinId};
pub use placement::context::{PlacementMap, PlacerConfig, PlacerCtx};
pub use placement::legalizer::{constraints_distance, legalize_relative_constraints};
pub use placement::single::place_single_cell;
pub use placement::wirelength::{cell_metric, cell_metric_at, net_metric, MetricType};
