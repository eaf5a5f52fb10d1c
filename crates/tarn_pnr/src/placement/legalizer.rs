//! Relative-constraint legalization.
//!
//! Cells may be constrained to sit at fixed offsets from a parent cell,
//! forming chains (carry chains, LUT/FF pairs, ...) that must move as a
//! unit. After global placement these constraints are usually violated;
//! this pass walks every chain root in name order and, for each unsatisfied
//! chain, runs a backtracking search over candidate root locations, assigning
//! children at offset-derived or freely-searched locations. A successful
//! search is applied atomically: the chain's old bindings are removed first,
//! then every member is rebound with locked strength. Weak incumbents
//! displaced by the rebinding are re-placed individually afterwards.

use std::collections::{BTreeMap, HashMap, HashSet};
use tarn_arch::{BelType, Device, Loc};
use tarn_diagnostics::{Category, Diagnostic, DiagnosticCode};

use crate::data::{BindStrength, PnrNetlist};
use crate::error::PlaceError;
use crate::ids::PnrCellId;
use crate::placement::context::PlacerCtx;
use crate::placement::single::place_single_cell;

/// Penalty contributed by an unplaced cell in a chain.
const UNPLACED_PENALTY: i64 = 100_000;

/// Returns the total constraint violation of the chain rooted at `cell`.
///
/// Zero means every member of the subtree sits exactly where its constraints
/// demand. Each placed member contributes the Manhattan deviation of its
/// constrained axes (absolute for roots, parent-relative for children, with
/// `abs_z` selecting absolute slot indices); an unplaced member short-circuits
/// its subtree with a large penalty, since offsets below it are undefined.
pub fn constraints_distance(netlist: &PnrNetlist, device: &dyn Device, cell: PnrCellId) -> i64 {
    let c = netlist.cell(cell);
    let Some(bel) = c.bel else {
        return UNPLACED_PENALTY;
    };
    let loc = device.bel(bel).loc;
    let mut dist = 0i64;
    match c.constraint.parent {
        None => {
            if let Some(x) = c.constraint.x {
                dist += i64::from((x - loc.x).abs());
            }
            if let Some(y) = c.constraint.y {
                dist += i64::from((y - loc.y).abs());
            }
            if let Some(z) = c.constraint.z {
                dist += i64::from((z - loc.z).abs());
            }
        }
        Some(parent) => {
            let Some(parent_bel) = netlist.cell(parent).bel else {
                return UNPLACED_PENALTY;
            };
            let parent_loc = device.bel(parent_bel).loc;
            if let Some(x) = c.constraint.x {
                dist += i64::from((x - (loc.x - parent_loc.x)).abs());
            }
            if let Some(y) = c.constraint.y {
                dist += i64::from((y - (loc.y - parent_loc.y)).abs());
            }
            if let Some(z) = c.constraint.z {
                if c.constraint.abs_z {
                    dist += i64::from((z - loc.z).abs());
                } else {
                    dist += i64::from((z - (loc.z - parent_loc.z)).abs());
                }
            }
        }
    }
    for &child in &c.constraint.children {
        dist += constraints_distance(netlist, device, child);
    }
    dist
}

/// Bidirectional diameter-expanding search over one integer axis.
///
/// Emits `start, start+1, start-1, start+2, start-2, ...` restricted to
/// `[min, max]`; offsets whose raw value falls outside the range are skipped
/// so no value is emitted twice. The search ends once the offset magnitude
/// exceeds `max - min`. The single-value form emits its fixed value once.
#[derive(Debug, Clone, Copy)]
struct AxisSearch {
    start: i32,
    min: i32,
    max: i32,
    sign: i32,
    diameter: i32,
}

impl AxisSearch {
    fn new(start: i32, min: i32, max: i32) -> Self {
        let start = start.max(min).min(max);
        Self {
            start,
            min,
            max,
            sign: 0,
            diameter: 0,
        }
    }

    fn fixed(value: i32) -> Self {
        Self::new(value, value, value)
    }

    fn done(&self) -> bool {
        self.diameter > (self.max - self.min)
    }

    fn get(&self) -> i32 {
        let val = self.start + self.sign * self.diameter;
        val.max(self.min).min(self.max)
    }

    fn next(&mut self) {
        loop {
            if self.sign == 0 {
                self.sign = 1;
                self.diameter = 1;
            } else if self.sign < 0 {
                self.sign = 1;
                self.diameter += 1;
            } else {
                self.sign = -1;
            }
            if self.done() {
                break;
            }
            let val = self.start + self.sign * self.diameter;
            if val >= self.min && val <= self.max {
                break;
            }
        }
    }

    fn reset(&mut self) {
        self.sign = 0;
        self.diameter = 0;
    }
}

/// Advances a three-axis nested search one step: z is innermost, then y,
/// then x; an outer axis moves only when the inner one wraps.
fn advance(xs: &mut AxisSearch, ys: &mut AxisSearch, zs: &mut AxisSearch) {
    zs.next();
    if zs.done() {
        zs.reset();
        ys.next();
        if ys.done() {
            ys.reset();
            xs.next();
        }
    }
}

/// Recursively tests whether the chain rooted at `cell` fits with `cell` at
/// `loc`, recording tentative assignments in `solution` and claimed
/// locations in `used`.
///
/// Pure exploration: no bels are bound or unbound. A location is rejected if
/// it holds no bel, a bel of the wrong type, or a binding of `Strong` or
/// stronger. On child-subtree failure the cell's own claim on `loc` is
/// withdrawn before reporting failure; a cell revisited at a new location
/// releases its previously claimed one.
fn valid_loc_for(
    ctx: &PlacerCtx,
    cell: PnrCellId,
    loc: Loc,
    solution: &mut BTreeMap<PnrCellId, Loc>,
    used: &mut HashSet<Loc>,
) -> bool {
    let device = ctx.device;
    let Some(bel) = device.bel_at(loc) else {
        return false;
    };
    let c = ctx.netlist.cell(cell);
    if device.bel(bel).bel_type != BelType::for_cell(c.cell_type) {
        return false;
    }
    if let Some(bound) = ctx.bound_bel_cell(bel) {
        if ctx.netlist.cell(bound).strength >= BindStrength::Strong {
            return false;
        }
    }
    used.insert(loc);
    for &child in &c.constraint.children {
        let constr = &ctx.netlist.cell(child).constraint;
        let mut xs = match constr.x {
            Some(dx) => AxisSearch::fixed(loc.x + dx),
            None => AxisSearch::new(loc.x, 0, device.grid_dim_x() - 1),
        };
        let mut ys = match constr.y {
            Some(dy) => AxisSearch::fixed(loc.y + dy),
            None => AxisSearch::new(loc.y, 0, device.grid_dim_y() - 1),
        };
        let mut zs = match constr.z {
            Some(z) if constr.abs_z => AxisSearch::fixed(z),
            Some(dz) => AxisSearch::fixed(loc.z + dz),
            None => AxisSearch::new(loc.z, 0, device.tile_dim_z(loc.x, loc.y) - 1),
        };
        let mut placed_child = false;
        while !xs.done() {
            let child_loc = Loc::new(xs.get(), ys.get(), zs.get());
            if !used.contains(&child_loc) && valid_loc_for(ctx, child, child_loc, solution, used) {
                placed_child = true;
                break;
            }
            advance(&mut xs, &mut ys, &mut zs);
        }
        if !placed_child {
            used.remove(&loc);
            return false;
        }
    }
    if let Some(prev) = solution.insert(cell, loc) {
        if prev != loc {
            used.remove(&prev);
        }
    }
    true
}

/// Per-invocation legalization state.
struct ChainLegalizer {
    /// Pre-legalization locations, for roots that lose their binding before
    /// their chain is processed.
    old_locations: HashMap<PnrCellId, Loc>,
    /// Weak cells displaced by chain rebinding, to be re-placed at the end.
    ripped: Vec<PnrCellId>,
    relocated_chains: usize,
}

impl ChainLegalizer {
    fn legalize_cell(&mut self, ctx: &mut PlacerCtx, root: PnrCellId) -> Result<(), PlaceError> {
        // Only chain roots drive legalization.
        if ctx.netlist.cell(root).constraint.parent.is_some() {
            return Ok(());
        }
        if constraints_distance(ctx.netlist, ctx.device, root) == 0 {
            if ctx.netlist.cell(root).constraint.is_constrained() {
                lockdown_chain(ctx, root);
            }
            return Ok(());
        }

        let current = ctx
            .cell_loc(root)
            .or_else(|| self.old_locations.get(&root).copied())
            .unwrap_or_default();
        let constr = ctx.netlist.cell(root).constraint.clone();
        let device = ctx.device;
        let mut xs = match constr.x {
            Some(x) => AxisSearch::fixed(x),
            None => AxisSearch::new(current.x, 0, device.grid_dim_x() - 1),
        };
        let mut ys = match constr.y {
            Some(y) => AxisSearch::fixed(y),
            None => AxisSearch::new(current.y, 0, device.grid_dim_y() - 1),
        };
        let mut zs = match constr.z {
            Some(z) => AxisSearch::fixed(z),
            None => AxisSearch::new(current.z, 0, device.tile_dim_z(current.x, current.y) - 1),
        };

        while !xs.done() {
            let root_loc = Loc::new(xs.get(), ys.get(), zs.get());
            let mut solution = BTreeMap::new();
            let mut used = HashSet::new();
            if valid_loc_for(ctx, root, root_loc, &mut solution, &mut used) {
                self.apply_solution(ctx, root, &solution);
                self.relocated_chains += 1;
                if ctx.config.verbose {
                    ctx.sink.emit(Diagnostic::note(
                        DiagnosticCode::new(Category::Placement, 2),
                        format!(
                            "relocated constraint chain rooted at '{}' to {}",
                            ctx.netlist.cell(root).name,
                            root_loc
                        ),
                    ));
                }
                return Ok(());
            }
            advance(&mut xs, &mut ys, &mut zs);
        }

        let name = ctx.netlist.cell(root).name.clone();
        let mut diag = Diagnostic::error(
            DiagnosticCode::new(Category::Placement, 3),
            format!("no viable placement found for constraint chain rooted at '{name}'"),
        );
        let mut notes = Vec::new();
        dump_chain(ctx, root, 0, &mut notes);
        for note in notes {
            diag = diag.with_note(note);
        }
        ctx.sink.emit(diag);
        Err(PlaceError::UnsatisfiableChain { root: name })
    }

    /// Rebinds a found solution: all old chain bindings are removed before
    /// any new one is made, so members can rotate through each other's bels
    /// without tripping occupancy checks.
    fn apply_solution(
        &mut self,
        ctx: &mut PlacerCtx,
        root: PnrCellId,
        solution: &BTreeMap<PnrCellId, Loc>,
    ) {
        for &cell in solution.keys() {
            if let Some(bel) = ctx.netlist.cell(cell).bel {
                ctx.unbind_bel(bel);
            }
        }
        for (&cell, &loc) in solution {
            let bel = ctx
                .device
                .bel_at(loc)
                .expect("solution location lost its bel");
            if let Some(incumbent) = ctx.conflicting_bel_cell(bel) {
                // The search rejects locations held at Strong or above, so
                // anything still here must be displaceable.
                assert!(
                    ctx.netlist.cell(incumbent).strength < BindStrength::Strong,
                    "chain solution collides with non-displaceable cell '{}'",
                    ctx.netlist.cell(incumbent).name
                );
                ctx.unbind_bel(bel);
                self.ripped.push(incumbent);
            }
            ctx.bind_bel(bel, cell, BindStrength::Locked);
        }
        assert_eq!(
            constraints_distance(ctx.netlist, ctx.device, root),
            0,
            "constraint chain rooted at '{}' still unsatisfied after rebinding",
            ctx.netlist.cell(root).name
        );
    }
}

/// Marks every member of the chain rooted at `cell` as locked in place.
fn lockdown_chain(ctx: &mut PlacerCtx, cell: PnrCellId) {
    ctx.set_strength(cell, BindStrength::Locked);
    let children = ctx.netlist.cell(cell).constraint.children.clone();
    for child in children {
        lockdown_chain(ctx, child);
    }
}

/// Appends a textual dump of the chain tree to `notes`, one line per member.
fn dump_chain(ctx: &PlacerCtx, cell: PnrCellId, depth: usize, notes: &mut Vec<String>) {
    let c = ctx.netlist.cell(cell);
    let axis = |v: Option<i32>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
    let placement = match ctx.cell_loc(cell) {
        Some(loc) => format!("at {loc}"),
        None => "unplaced".to_string(),
    };
    notes.push(format!(
        "{}'{}' {} [constr x={} y={} z={}{}]",
        "  ".repeat(depth),
        c.name,
        placement,
        axis(c.constraint.x),
        axis(c.constraint.y),
        axis(c.constraint.z),
        if c.constraint.abs_z { " abs" } else { "" },
    ));
    for &child in &c.constraint.children {
        dump_chain(ctx, child, depth + 1, notes);
    }
}

/// Legalizes every relative-constraint chain in the netlist.
///
/// Walks all cells in name order, snapshotting current locations first, and
/// legalizes each chain root. On success every chain member sits at zero
/// constraint distance with locked strength; weak cells displaced along the
/// way have been re-placed (without legality enforcement, matching the
/// trusted state they were ripped from).
///
/// # Errors
///
/// Any [`PlaceError`] is fatal to the run; the placement map is left in an
/// unspecified state.
pub fn legalize_relative_constraints(ctx: &mut PlacerCtx) -> Result<(), PlaceError> {
    let mut worker = ChainLegalizer {
        old_locations: HashMap::new(),
        ripped: Vec::new(),
        relocated_chains: 0,
    };
    let order = ctx.netlist.cells_sorted_by_name();
    for &cell in &order {
        if let Some(loc) = ctx.cell_loc(cell) {
            worker.old_locations.insert(cell, loc);
        }
    }
    for &cell in &order {
        worker.legalize_cell(ctx, cell)?;
    }
    for &cell in &worker.ripped {
        // A ripped cell may since have been re-bound as a member of a later
        // chain; those stay where the chain put them.
        if ctx.netlist.cell(cell).bel.is_none() {
            if let Err(err) = place_single_cell(ctx, cell, false) {
                ctx.sink.emit(Diagnostic::error(
                    DiagnosticCode::new(Category::Placement, 1),
                    err.to_string(),
                ));
                return Err(err);
            }
        }
    }
    if ctx.config.verbose {
        ctx.sink.emit(Diagnostic::note(
            DiagnosticCode::new(Category::Placement, 2),
            format!(
                "constraint legalization complete: {} chains relocated, {} cells displaced",
                worker.relocated_chains,
                worker.ripped.len()
            ),
        ));
    }
    Ok(())
}
