//! Placement primitives shared by the tarn place-and-route flow.
//!
//! Three layers, leaves first:
//!
//! 1. [`wirelength`]: half-perimeter bounding-box metrics for nets and
//!    cells, optionally slack-weighted when timing-driven.
//! 2. [`single`]: best-fit placement of one cell with bounded ripup of
//!    weaker incumbents.
//! 3. [`legalizer`]: backtracking relocation of relative-constraint chains,
//!    which re-places anything it displaces through the single-cell placer.
//!
//! All binding mutation flows through [`context::PlacerCtx`], which keeps
//! the netlist and the bel occupancy map consistent.

pub mod context;
pub mod legalizer;
pub mod single;
pub mod wirelength;

#[cfg(test)]
pub(crate) mod test;
