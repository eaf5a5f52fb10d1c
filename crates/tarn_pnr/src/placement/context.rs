//! Shared placement state: the bel occupancy map, RNG, and config flags.
//!
//! All placement passes mutate bindings exclusively through [`PlacerCtx`],
//! which keeps the netlist's per-cell `bel` fields and the bel occupancy map
//! in lockstep and enforces the binding invariants (at most one cell per bel,
//! locked cells are never unbound).

use crate::data::{BindStrength, PnrNetlist};
use crate::ids::PnrCellId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use tarn_arch::{BelId, Device, Loc};
use tarn_diagnostics::DiagnosticSink;

/// Knobs for the placement core.
#[derive(Debug, Clone)]
pub struct PlacerConfig {
    /// Weight net costs by predicted slack.
    pub timing_driven: bool,
    /// Emit per-chain progress notes during legalization.
    pub verbose: bool,
    /// RNG seed for cost jitter. Fixed by default so runs are reproducible.
    pub seed: u64,
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            timing_driven: false,
            verbose: false,
            seed: 1,
        }
    }
}

/// Occupancy map from bels to the cells bound on them.
#[derive(Debug, Default)]
pub struct PlacementMap {
    bound: HashMap<BelId, PnrCellId>,
}

impl PlacementMap {
    /// Returns whether `bel` has no cell bound to it.
    pub fn is_avail(&self, bel: BelId) -> bool {
        !self.bound.contains_key(&bel)
    }

    /// Returns the cell bound to `bel`, if any.
    pub fn bound_cell(&self, bel: BelId) -> Option<PnrCellId> {
        self.bound.get(&bel).copied()
    }

    /// Returns the cell that would have to move before `bel` can be bound.
    ///
    /// Every bel in this device model holds at most one cell, so this is the
    /// bound cell itself; architectures with shared-site conflicts would
    /// answer differently.
    pub fn conflicting_cell(&self, bel: BelId) -> Option<PnrCellId> {
        self.bound_cell(bel)
    }

    /// Returns the number of bound bels.
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    /// Returns whether no bels are bound.
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

/// Mutable placement state threaded through the placement core.
pub struct PlacerCtx<'a> {
    /// The netlist being placed.
    pub netlist: &'a mut PnrNetlist,
    /// The device database.
    pub device: &'a dyn Device,
    /// The bel occupancy map, kept in sync with per-cell `bel` fields.
    pub placement: PlacementMap,
    /// Placement knobs.
    pub config: PlacerConfig,
    /// Sink for progress notes and failure reports.
    pub sink: &'a DiagnosticSink,
    rng: StdRng,
}

impl<'a> PlacerCtx<'a> {
    /// Creates a placement context over a netlist and device.
    ///
    /// Bindings already present in the netlist (e.g. from an earlier global
    /// placement) are absorbed into the occupancy map.
    pub fn new(
        netlist: &'a mut PnrNetlist,
        device: &'a dyn Device,
        config: PlacerConfig,
        sink: &'a DiagnosticSink,
    ) -> Self {
        let mut placement = PlacementMap::default();
        for cell in &netlist.cells {
            if let Some(bel) = cell.bel {
                let prev = placement.bound.insert(bel, cell.id);
                assert!(
                    prev.is_none(),
                    "two cells bound to bel {bel} in the input netlist"
                );
            }
        }
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            netlist,
            device,
            placement,
            config,
            sink,
            rng,
        }
    }

    /// Binds `cell` to `bel` with the given strength.
    ///
    /// The bel must be free and the cell unbound; displacing an incumbent is
    /// the caller's job (via [`unbind_bel`](Self::unbind_bel)).
    pub fn bind_bel(&mut self, bel: BelId, cell: PnrCellId, strength: BindStrength) {
        assert!(
            self.placement.is_avail(bel),
            "bind target bel {bel} is already bound"
        );
        let c = self.netlist.cell_mut(cell);
        assert!(
            c.bel.is_none(),
            "cell '{}' is already bound to a bel",
            c.name
        );
        c.bel = Some(bel);
        c.strength = strength;
        self.placement.bound.insert(bel, cell);
    }

    /// Unbinds whatever cell is currently bound to `bel`.
    ///
    /// Locked cells are never unbound; attempting to is a contract violation.
    pub fn unbind_bel(&mut self, bel: BelId) {
        let Some(cell) = self.placement.bound.remove(&bel) else {
            panic!("unbind of unbound bel {bel}");
        };
        let c = self.netlist.cell_mut(cell);
        assert!(
            c.strength < BindStrength::Locked,
            "attempted to unbind locked cell '{}'",
            c.name
        );
        c.bel = None;
        c.strength = BindStrength::None;
    }

    /// Returns whether `bel` has no cell bound to it.
    pub fn check_bel_avail(&self, bel: BelId) -> bool {
        self.placement.is_avail(bel)
    }

    /// Returns the cell bound to `bel`, if any.
    pub fn bound_bel_cell(&self, bel: BelId) -> Option<PnrCellId> {
        self.placement.bound_cell(bel)
    }

    /// Returns the cell that must move before `bel` can be bound, if any.
    pub fn conflicting_bel_cell(&self, bel: BelId) -> Option<PnrCellId> {
        self.placement.conflicting_cell(bel)
    }

    /// Overrides the strength of an existing binding.
    pub fn set_strength(&mut self, cell: PnrCellId, strength: BindStrength) {
        let c = self.netlist.cell_mut(cell);
        assert!(
            c.bel.is_some(),
            "cannot set binding strength of unplaced cell '{}'",
            c.name
        );
        c.strength = strength;
    }

    /// Returns the grid location of the cell's bound bel, if placed.
    pub fn cell_loc(&self, cell: PnrCellId) -> Option<Loc> {
        self.netlist
            .cell(cell)
            .bel
            .map(|bel| self.device.bel(bel).loc)
    }

    /// Returns a uniform random value in `[0, n)`.
    pub fn rng_below(&mut self, n: u64) -> u64 {
        self.rng.gen_range(0..n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::test::{add_cell, empty_netlist, lut_grid};
    use tarn_arch::Loc;

    #[test]
    fn bind_updates_cell_and_map() {
        let device = lut_grid(2, 2, 1);
        let mut nl = empty_netlist();
        let cell = add_cell(&mut nl, "a", tarn_arch::CellType::Lut);
        let sink = DiagnosticSink::new();
        let mut ctx = PlacerCtx::new(&mut nl, &device, PlacerConfig::default(), &sink);

        let bel = ctx.device.bel_at(Loc::new(1, 1, 0)).unwrap();
        ctx.bind_bel(bel, cell, BindStrength::Weak);

        assert_eq!(ctx.netlist.cell(cell).bel, Some(bel));
        assert_eq!(ctx.netlist.cell(cell).strength, BindStrength::Weak);
        assert_eq!(ctx.bound_bel_cell(bel), Some(cell));
        assert!(!ctx.check_bel_avail(bel));
        assert_eq!(ctx.cell_loc(cell), Some(Loc::new(1, 1, 0)));
    }

    #[test]
    fn unbind_clears_cell_and_map() {
        let device = lut_grid(2, 2, 1);
        let mut nl = empty_netlist();
        let cell = add_cell(&mut nl, "a", tarn_arch::CellType::Lut);
        let sink = DiagnosticSink::new();
        let mut ctx = PlacerCtx::new(&mut nl, &device, PlacerConfig::default(), &sink);

        let bel = ctx.device.bel_at(Loc::new(0, 0, 0)).unwrap();
        ctx.bind_bel(bel, cell, BindStrength::Strong);
        ctx.unbind_bel(bel);

        assert_eq!(ctx.netlist.cell(cell).bel, None);
        assert_eq!(ctx.netlist.cell(cell).strength, BindStrength::None);
        assert!(ctx.check_bel_avail(bel));
    }

    #[test]
    #[should_panic(expected = "already bound")]
    fn double_bind_panics() {
        let device = lut_grid(2, 1, 1);
        let mut nl = empty_netlist();
        let a = add_cell(&mut nl, "a", tarn_arch::CellType::Lut);
        let b = add_cell(&mut nl, "b", tarn_arch::CellType::Lut);
        let sink = DiagnosticSink::new();
        let mut ctx = PlacerCtx::new(&mut nl, &device, PlacerConfig::default(), &sink);

        let bel = ctx.device.bel_at(Loc::new(0, 0, 0)).unwrap();
        ctx.bind_bel(bel, a, BindStrength::Weak);
        ctx.bind_bel(bel, b, BindStrength::Weak);
    }

    #[test]
    #[should_panic(expected = "locked cell")]
    fn unbind_locked_panics() {
        let device = lut_grid(2, 1, 1);
        let mut nl = empty_netlist();
        let a = add_cell(&mut nl, "a", tarn_arch::CellType::Lut);
        let sink = DiagnosticSink::new();
        let mut ctx = PlacerCtx::new(&mut nl, &device, PlacerConfig::default(), &sink);

        let bel = ctx.device.bel_at(Loc::new(0, 0, 0)).unwrap();
        ctx.bind_bel(bel, a, BindStrength::Locked);
        ctx.unbind_bel(bel);
    }

    #[test]
    fn absorbs_existing_bindings() {
        let device = lut_grid(2, 1, 1);
        let mut nl = empty_netlist();
        let a = add_cell(&mut nl, "a", tarn_arch::CellType::Lut);
        let bel = device.bel_at(Loc::new(1, 0, 0)).unwrap();
        nl.cell_mut(a).bel = Some(bel);
        nl.cell_mut(a).strength = BindStrength::Weak;

        let sink = DiagnosticSink::new();
        let ctx = PlacerCtx::new(&mut nl, &device, PlacerConfig::default(), &sink);
        assert_eq!(ctx.bound_bel_cell(bel), Some(a));
        assert_eq!(ctx.placement.len(), 1);
    }

    #[test]
    fn rng_is_reproducible() {
        let device = lut_grid(1, 1, 1);
        let mut nl_a = empty_netlist();
        let mut nl_b = empty_netlist();
        let sink = DiagnosticSink::new();

        let mut ctx_a = PlacerCtx::new(&mut nl_a, &device, PlacerConfig::default(), &sink);
        let mut ctx_b = PlacerCtx::new(&mut nl_b, &device, PlacerConfig::default(), &sink);

        let seq_a: Vec<u64> = (0..16).map(|_| ctx_a.rng_below(25)).collect();
        let seq_b: Vec<u64> = (0..16).map(|_| ctx_b.rng_below(25)).collect();
        assert_eq!(seq_a, seq_b);
        assert!(seq_a.iter().all(|&v| v < 25));
    }
}
