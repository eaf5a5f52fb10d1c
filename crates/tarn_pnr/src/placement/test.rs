//! Test utilities for building small devices and netlists.
//!
//! Shared by the unit tests of the placement modules so each test reads as
//! the scenario it exercises rather than arena plumbing.

use crate::data::{BindStrength, PnrCell, PnrNet, PnrNetlist, PnrPin, PortDirection, RelConstraint};
use crate::ids::{PnrCellId, PnrNetId, PnrPinId};
use tarn_arch::{BelType, CellType, Delay, GridDevice};

/// A uniform grid of LUT bels, one tile deep unless `dim_z` says otherwise.
pub(crate) fn lut_grid(dim_x: i32, dim_y: i32, dim_z: i32) -> GridDevice {
    GridDevice::uniform("testdev", dim_x, dim_y, dim_z, BelType::Lut)
}

pub(crate) fn empty_netlist() -> PnrNetlist {
    PnrNetlist::new()
}

/// Adds an unplaced, unconstrained cell of the given type.
pub(crate) fn add_cell(nl: &mut PnrNetlist, name: &str, cell_type: CellType) -> PnrCellId {
    nl.add_cell(PnrCell {
        id: PnrCellId::from_raw(0),
        name: name.into(),
        cell_type,
        bel: None,
        strength: BindStrength::None,
        pins: Vec::new(),
        constraint: RelConstraint::default(),
    })
}

/// Creates a net driven by `driver` with one budgeted sink pin per entry of
/// `users`.
pub(crate) fn connect(
    nl: &mut PnrNetlist,
    net_name: &str,
    driver: PnrCellId,
    users: &[(PnrCellId, Delay)],
) -> PnrNetId {
    let out = nl.add_pin(PnrPin {
        id: PnrPinId::from_raw(0),
        name: "O".into(),
        direction: PortDirection::Output,
        cell: driver,
        net: None,
    });
    let net = nl.add_net(PnrNet {
        id: PnrNetId::from_raw(0),
        name: net_name.into(),
        driver: None,
        users: Vec::new(),
    });
    nl.set_driver(net, out);
    for (i, (cell, budget)) in users.iter().enumerate() {
        let pin = nl.add_pin(PnrPin {
            id: PnrPinId::from_raw(0),
            name: format!("I{i}"),
            direction: PortDirection::Input,
            cell: *cell,
            net: None,
        });
        nl.add_user(net, pin, *budget);
    }
    net
}

/// Links `child` into `parent`'s constraint chain at the given offsets.
pub(crate) fn chain_child(
    nl: &mut PnrNetlist,
    parent: PnrCellId,
    child: PnrCellId,
    dx: i32,
    dy: i32,
    dz: i32,
) {
    let c = nl.cell_mut(child);
    c.constraint.x = Some(dx);
    c.constraint.y = Some(dy);
    c.constraint.z = Some(dz);
    c.constraint.parent = Some(parent);
    nl.cell_mut(parent).constraint.children.push(child);
}
