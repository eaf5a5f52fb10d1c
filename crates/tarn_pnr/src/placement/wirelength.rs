//! Half-perimeter wirelength and timing-weighted cost estimation.
//!
//! The net metric is the half-perimeter of the bounding box spanned by a
//! net's placed terminals. Nets driven by global buffers are free: they ride
//! dedicated routing and contribute nothing. In timing-driven cost mode the
//! metric is additionally scaled by a worst-slack factor, and the total
//! negative slack encountered is accumulated into a caller-supplied counter.

use crate::ids::{PnrCellId, PnrNetId};
use crate::placement::context::PlacerCtx;
use tarn_arch::{BelId, Device};

/// Which flavor of net metric to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    /// Raw half-perimeter bounding-box wirelength.
    Wirelength,
    /// Wirelength weighted by predicted slack when timing-driven.
    Cost,
}

/// Cap on the timing-driven cost multiplier.
const MAX_TIMING_SCALE: f64 = 5.0;

/// An overriding `(cell, bel)` assignment evaluated in place of the cell's
/// actual binding, so hypothetical placements can be costed without touching
/// any state.
type BelOverride = Option<(PnrCellId, BelId)>;

fn effective_bel(ctx: &PlacerCtx, cell: PnrCellId, ovr: BelOverride) -> Option<BelId> {
    match ovr {
        Some((c, bel)) if c == cell => Some(bel),
        _ => ctx.netlist.cell(cell).bel,
    }
}

fn net_metric_with(
    ctx: &PlacerCtx,
    net: PnrNetId,
    metric: MetricType,
    tns: &mut f64,
    ovr: BelOverride,
) -> i64 {
    let net = ctx.netlist.net(net);
    let Some(driver_pin) = net.driver else {
        return 0;
    };
    let driver_cell = ctx.netlist.pin(driver_pin).cell;
    let Some(driver_bel) = effective_bel(ctx, driver_cell, ovr) else {
        return 0;
    };
    if ctx.device.bel(driver_bel).is_global_buf {
        return 0;
    }

    let driver_loc = ctx.device.bel(driver_bel).loc;
    let (mut xmin, mut xmax) = (driver_loc.x, driver_loc.x);
    let (mut ymin, mut ymax) = (driver_loc.y, driver_loc.y);

    let timing = metric == MetricType::Cost && ctx.config.timing_driven;
    let mut worst_slack_ns = f64::INFINITY;
    let mut negative_slack_ns = 0.0;

    for user in &net.users {
        let user_cell = ctx.netlist.pin(user.pin).cell;
        let Some(user_bel) = effective_bel(ctx, user_cell, ovr) else {
            continue;
        };
        if timing {
            let delay = ctx.device.predict_delay(driver_bel, user_bel);
            let slack = user.budget.ns() - delay.ns();
            if slack < 0.0 {
                negative_slack_ns += slack;
            }
            worst_slack_ns = worst_slack_ns.min(slack);
        }
        // Global-buffer loads still count for timing, but not for geometry.
        if ctx.device.bel(user_bel).is_global_buf {
            continue;
        }
        let loc = ctx.device.bel(user_bel).loc;
        xmin = xmin.min(loc.x);
        xmax = xmax.max(loc.x);
        ymin = ymin.min(loc.y);
        ymax = ymax.max(loc.y);
    }

    let mut wirelength = i64::from(xmax - xmin) + i64::from(ymax - ymin);
    if timing {
        let scale = (1.0 + (-worst_slack_ns / 5.0).exp()).min(MAX_TIMING_SCALE);
        wirelength = (wirelength as f64 * scale) as i64;
    }
    *tns += negative_slack_ns;
    wirelength
}

fn cell_metric_with(ctx: &PlacerCtx, cell: PnrCellId, metric: MetricType, ovr: BelOverride) -> i64 {
    // Distinct nets touched by the cell's pins, ordered by net name so the
    // sum is reproducible across platforms.
    let mut nets: Vec<PnrNetId> = ctx
        .netlist
        .cell(cell)
        .pins
        .iter()
        .filter_map(|&pin| ctx.netlist.pin(pin).net)
        .collect();
    nets.sort_by(|a, b| ctx.netlist.net(*a).name.cmp(&ctx.netlist.net(*b).name));
    nets.dedup_by(|a, b| ctx.netlist.net(*a).name == ctx.netlist.net(*b).name);

    let mut tns = 0.0;
    nets.iter()
        .map(|&net| net_metric_with(ctx, net, metric, &mut tns, ovr))
        .sum()
}

/// Computes the metric of a single net.
///
/// Negative slack encountered in timing-driven cost mode is added (in
/// nanoseconds) to `tns`.
pub fn net_metric(ctx: &PlacerCtx, net: PnrNetId, metric: MetricType, tns: &mut f64) -> i64 {
    net_metric_with(ctx, net, metric, tns, None)
}

/// Computes the summed metric of all distinct nets touched by `cell`.
pub fn cell_metric(ctx: &PlacerCtx, cell: PnrCellId, metric: MetricType) -> i64 {
    cell_metric_with(ctx, cell, metric, None)
}

/// Computes [`cell_metric`] as if `cell` were bound to `bel`.
///
/// Purely hypothetical: neither the cell's actual binding nor the occupancy
/// map is touched.
pub fn cell_metric_at(ctx: &PlacerCtx, cell: PnrCellId, bel: BelId, metric: MetricType) -> i64 {
    cell_metric_with(ctx, cell, metric, Some((cell, bel)))
}
