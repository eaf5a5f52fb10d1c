//! Core PnR netlist data structures.
//!
//! Defines the physical netlist used during placement: cells (with optional
//! bel binding, binding strength, and relative placement constraints), nets
//! (driver + timing-budgeted users), and pins (cell connections to nets).
//! The [`PnrNetlist`] is the central arena that flows through the placement
//! pipeline.

use crate::ids::{PnrCellId, PnrNetId, PnrPinId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tarn_arch::{BelId, CellType, Delay};

/// How firmly a cell is bound to its bel.
///
/// Strengths are totally ordered; a binding may only be displaced by an
/// operation acting on behalf of a stronger need. `Locked` bindings are never
/// undone.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum BindStrength {
    /// Unbound, or bound so loosely that anything may displace it.
    #[default]
    None,
    /// Bound by an optimization pass; eligible for ripup.
    Weak,
    /// Bound deliberately; survives ripup but may be unbound explicitly.
    Strong,
    /// Fixed for the rest of the run; never unbound.
    Locked,
}

/// Relative placement constraint fields of a cell.
///
/// Cells linked through `parent`/`children` form a chain (a tree) that must
/// be placed as a unit: each constrained axis of a child is an offset from
/// its parent's location, except that `z` may instead be an absolute slot
/// index when `abs_z` is set. A root cell's constrained axes are absolute
/// grid coordinates. `None` on an axis leaves it unconstrained.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelConstraint {
    /// Constrained x coordinate (absolute for roots, offset for children).
    pub x: Option<i32>,
    /// Constrained y coordinate (absolute for roots, offset for children).
    pub y: Option<i32>,
    /// Constrained z slot (interpretation controlled by `abs_z`).
    pub z: Option<i32>,
    /// When set, `z` is an absolute slot index instead of a parent offset.
    pub abs_z: bool,
    /// The parent cell in the constraint chain, if any.
    pub parent: Option<PnrCellId>,
    /// Child cells constrained relative to this one, in chain order.
    pub children: Vec<PnrCellId>,
}

impl RelConstraint {
    /// Returns whether any constraint is active on this cell.
    pub fn is_constrained(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.z.is_some() || !self.children.is_empty()
    }
}

/// Direction of a pin relative to its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    /// The pin consumes a signal.
    Input,
    /// The pin drives a signal.
    Output,
}

/// A cell in the PnR netlist.
///
/// Represents a single physical resource instance (LUT, FF, BRAM, ...) that
/// needs to be bound to a device bel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PnrCell {
    /// The unique ID of this cell.
    pub id: PnrCellId,
    /// Human-readable cell name (e.g., "lut_0", "ff_clk_d").
    pub name: String,
    /// The physical cell type.
    pub cell_type: CellType,
    /// The bel this cell is bound to (`None` = unplaced).
    pub bel: Option<BelId>,
    /// How firmly the current binding holds.
    pub strength: BindStrength,
    /// The pins belonging to this cell.
    pub pins: Vec<PnrPinId>,
    /// Relative placement constraints, if any.
    pub constraint: RelConstraint,
}

/// One sink endpoint of a net, with its timing budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetUser {
    /// The sink pin.
    pub pin: PnrPinId,
    /// The routing-delay budget assigned to this endpoint.
    pub budget: Delay,
}

/// A net in the PnR netlist.
///
/// Represents a signal connecting one driver pin to zero or more sink pins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PnrNet {
    /// The unique ID of this net.
    pub id: PnrNetId,
    /// Human-readable net name (e.g., "clk", "data_bus[3]").
    pub name: String,
    /// The driver pin of this net (`None` = undriven).
    pub driver: Option<PnrPinId>,
    /// The sink endpoints of this net, in connection order.
    pub users: Vec<NetUser>,
}

/// A pin on a cell in the PnR netlist.
///
/// Pins connect cells to nets. Each pin belongs to exactly one cell and is
/// optionally connected to one net.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PnrPin {
    /// The unique ID of this pin.
    pub id: PnrPinId,
    /// Human-readable pin name (e.g., "I0", "O", "D", "Q").
    pub name: String,
    /// Direction of the pin relative to the cell.
    pub direction: PortDirection,
    /// The cell that owns this pin.
    pub cell: PnrCellId,
    /// The net this pin is connected to (`None` = unconnected).
    pub net: Option<PnrNetId>,
}

/// The physical netlist for placement.
///
/// Contains all cells, nets, and pins in the design. Cells and nets are owned
/// here; the placement core only mutates their bindings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PnrNetlist {
    /// All cells in the netlist.
    pub cells: Vec<PnrCell>,
    /// All nets in the netlist.
    pub nets: Vec<PnrNet>,
    /// All pins in the netlist.
    pub pins: Vec<PnrPin>,
    /// Auxiliary index: cell name to ID (rebuilt on deserialization).
    #[serde(skip)]
    pub cell_by_name: HashMap<String, PnrCellId>,
    /// Auxiliary index: net name to ID (rebuilt on deserialization).
    #[serde(skip)]
    pub net_by_name: HashMap<String, PnrNetId>,
}

impl PnrNetlist {
    /// Creates an empty PnR netlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cell and returns its ID.
    pub fn add_cell(&mut self, mut cell: PnrCell) -> PnrCellId {
        let id = PnrCellId::from_raw(self.cells.len() as u32);
        cell.id = id;
        self.cell_by_name.insert(cell.name.clone(), id);
        self.cells.push(cell);
        id
    }

    /// Adds a net and returns its ID.
    pub fn add_net(&mut self, mut net: PnrNet) -> PnrNetId {
        let id = PnrNetId::from_raw(self.nets.len() as u32);
        net.id = id;
        self.net_by_name.insert(net.name.clone(), id);
        self.nets.push(net);
        id
    }

    /// Adds a pin, registers it on its owning cell, and returns its ID.
    pub fn add_pin(&mut self, mut pin: PnrPin) -> PnrPinId {
        let id = PnrPinId::from_raw(self.pins.len() as u32);
        pin.id = id;
        let cell = pin.cell;
        self.pins.push(pin);
        self.cells[cell.as_raw() as usize].pins.push(id);
        id
    }

    /// Connects `pin` as the driver of `net`.
    pub fn set_driver(&mut self, net: PnrNetId, pin: PnrPinId) {
        self.nets[net.as_raw() as usize].driver = Some(pin);
        self.pins[pin.as_raw() as usize].net = Some(net);
    }

    /// Connects `pin` as a sink of `net` with the given timing budget.
    pub fn add_user(&mut self, net: PnrNetId, pin: PnrPinId, budget: Delay) {
        self.nets[net.as_raw() as usize]
            .users
            .push(NetUser { pin, budget });
        self.pins[pin.as_raw() as usize].net = Some(net);
    }

    /// Returns the cell with the given ID.
    pub fn cell(&self, id: PnrCellId) -> &PnrCell {
        &self.cells[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the cell with the given ID.
    pub fn cell_mut(&mut self, id: PnrCellId) -> &mut PnrCell {
        &mut self.cells[id.as_raw() as usize]
    }

    /// Returns the net with the given ID.
    pub fn net(&self, id: PnrNetId) -> &PnrNet {
        &self.nets[id.as_raw() as usize]
    }

    /// Returns the pin with the given ID.
    pub fn pin(&self, id: PnrPinId) -> &PnrPin {
        &self.pins[id.as_raw() as usize]
    }

    /// Returns the number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns the number of nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Returns all cell IDs ordered by cell name.
    ///
    /// Several placement passes iterate cells in this order so that results
    /// are reproducible across platforms.
    pub fn cells_sorted_by_name(&self) -> Vec<PnrCellId> {
        let mut ids: Vec<PnrCellId> = self.cells.iter().map(|c| c.id).collect();
        ids.sort_by(|a, b| self.cell(*a).name.cmp(&self.cell(*b).name));
        ids
    }

    /// Rebuilds auxiliary indices after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.cell_by_name.clear();
        for (i, cell) in self.cells.iter().enumerate() {
            self.cell_by_name
                .insert(cell.name.clone(), PnrCellId::from_raw(i as u32));
        }
        self.net_by_name.clear();
        for (i, net) in self.nets.iter().enumerate() {
            self.net_by_name
                .insert(net.name.clone(), PnrNetId::from_raw(i as u32));
        }
    }

    /// Returns whether all cells are bound to a bel.
    pub fn is_fully_placed(&self) -> bool {
        self.cells.iter().all(|c| c.bel.is_some())
    }
}
