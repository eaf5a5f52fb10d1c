//! Single-cell best-fit placement with bounded ripup.
//!
//! Scans every bel of the cell's target type, costs a hypothetical binding
//! on each, and takes the cheapest available one. When nothing is free, the
//! cheapest incumbent below `Strong` strength is displaced instead and
//! becomes the next cell to place, with a decreasing iteration budget
//! bounding the cascade. A small random jitter is mixed into early-iteration
//! costs to break ties and escape local minima.

use crate::data::BindStrength;
use crate::error::PlaceError;
use crate::ids::PnrCellId;
use crate::placement::context::PlacerCtx;
use crate::placement::wirelength::{cell_metric_at, MetricType};
use tarn_arch::{BelType, Device};

/// Ripup budget for one placement request.
const RIPUP_ITERS: i32 = 25;

/// Jitter is applied while at least this much budget remains; the last few
/// iterations run un-jittered so the cascade can settle.
const JITTER_MIN_ITERS: i32 = 4;

/// Exclusive upper bound on the random cost jitter.
const JITTER_RANGE: u64 = 25;

/// Places one cell on the best available bel of matching type, displacing
/// weaker incumbents if necessary.
///
/// With `require_legality` set, bels the device rejects for this cell type
/// are skipped entirely. Displaced cells are re-placed within the same call
/// (under the same legality setting) until everything is bound or the ripup
/// budget runs out.
///
/// # Errors
///
/// [`PlaceError::UnplaceableCell`] when no candidate bel and no ripup victim
/// exists, [`PlaceError::RipupLimitExceeded`] when the displacement cascade
/// outlives its budget. Both are fatal to the run.
pub fn place_single_cell(
    ctx: &mut PlacerCtx,
    cell: PnrCellId,
    require_legality: bool,
) -> Result<(), PlaceError> {
    let mut cell = cell;
    let mut iters = RIPUP_ITERS;
    loop {
        if let Some(bel) = ctx.netlist.cell(cell).bel {
            ctx.unbind_bel(bel);
        }
        let cell_type = ctx.netlist.cell(cell).cell_type;
        let target_type = BelType::for_cell(cell_type);

        let mut best_bel = None;
        let mut best_cost = i64::MAX;
        let mut best_ripup_bel = None;
        let mut best_ripup_cost = i64::MAX;
        let mut ripup_target = None;

        let device = ctx.device;
        for bel in device.bels() {
            if bel.bel_type != target_type {
                continue;
            }
            if require_legality && !device.is_valid_bel_for_cell(cell_type, bel.id) {
                continue;
            }
            let mut cost = cell_metric_at(ctx, cell, bel.id, MetricType::Cost);
            if iters >= JITTER_MIN_ITERS {
                cost += ctx.rng_below(JITTER_RANGE) as i64;
            }
            if ctx.check_bel_avail(bel.id) {
                // `<=` so that later candidates win equal-cost ties.
                if cost <= best_cost {
                    best_cost = cost;
                    best_bel = Some(bel.id);
                }
            } else {
                let incumbent = ctx
                    .bound_bel_cell(bel.id)
                    .expect("occupied bel without a bound cell");
                if ctx.netlist.cell(incumbent).strength < BindStrength::Strong
                    && cost <= best_ripup_cost
                {
                    best_ripup_cost = cost;
                    best_ripup_bel = Some(bel.id);
                    ripup_target = Some(incumbent);
                }
            }
        }

        let (chosen, done) = match best_bel {
            Some(bel) => (bel, true),
            None => {
                let Some(ripup_bel) = best_ripup_bel else {
                    return Err(PlaceError::UnplaceableCell {
                        cell: ctx.netlist.cell(cell).name.clone(),
                        cell_type,
                    });
                };
                if iters == 0 {
                    return Err(PlaceError::RipupLimitExceeded {
                        cell: ctx.netlist.cell(cell).name.clone(),
                    });
                }
                iters -= 1;
                ctx.unbind_bel(ripup_bel);
                (ripup_bel, false)
            }
        };

        ctx.bind_bel(chosen, cell, BindStrength::Weak);
        if done {
            return Ok(());
        }
        // The displaced cell becomes the next one to place.
        cell = ripup_target.expect("ripup path taken without a victim");
    }
}
