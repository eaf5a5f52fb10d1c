//! Rectangular-grid device model.
//!
//! [`GridDevice`] is a concrete [`Device`] backed by an explicit bel table
//! over an `(x, y, z)` grid. It can be filled uniformly (every slot holds a
//! bel of one type) or built up bel by bel for irregular layouts. Routing
//! delay is estimated as Manhattan distance times a per-unit delay.

use crate::ids::BelId;
use crate::types::{Bel, BelType, CellType, Delay, Loc};
use crate::Device;
use std::collections::{HashMap, HashSet};
use tarn_common::{InternalError, TarnResult};

/// A device model over a rectangular grid of bels.
#[derive(Debug)]
pub struct GridDevice {
    name: String,
    dim_x: i32,
    dim_y: i32,
    bels: Vec<Bel>,
    by_loc: HashMap<Loc, BelId>,
    tile_depth: HashMap<(i32, i32), i32>,
    invalid: HashSet<BelId>,
    delay_ns_per_unit: f64,
}

impl GridDevice {
    /// Creates an empty device with the given grid dimensions.
    pub fn new(name: impl Into<String>, dim_x: i32, dim_y: i32) -> Self {
        Self {
            name: name.into(),
            dim_x,
            dim_y,
            bels: Vec::new(),
            by_loc: HashMap::new(),
            tile_depth: HashMap::new(),
            invalid: HashSet::new(),
            delay_ns_per_unit: 0.0,
        }
    }

    /// Creates a device with every grid slot filled by a bel of `bel_type`.
    ///
    /// Bels are enumerated x-major, then y, then z, which fixes the stable
    /// order exposed through [`Device::bels`].
    pub fn uniform(
        name: impl Into<String>,
        dim_x: i32,
        dim_y: i32,
        dim_z: i32,
        bel_type: BelType,
    ) -> Self {
        let mut device = Self::new(name, dim_x, dim_y);
        for x in 0..dim_x {
            for y in 0..dim_y {
                for z in 0..dim_z {
                    let loc = Loc::new(x, y, z);
                    let bel_name = format!("{:?}_X{}Y{}Z{}", bel_type, x, y, z).to_uppercase();
                    device
                        .add_bel(bel_name, bel_type, loc)
                        .expect("uniform fill cannot collide");
                }
            }
        }
        device
    }

    /// Adds a bel at the given location and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the location lies outside the grid or is already
    /// occupied by another bel.
    pub fn add_bel(
        &mut self,
        name: impl Into<String>,
        bel_type: BelType,
        loc: Loc,
    ) -> TarnResult<BelId> {
        self.add_bel_inner(name.into(), bel_type, loc, false)
    }

    /// Adds a global-buffer bel (excluded from wirelength estimation) at the
    /// given location and returns its ID.
    pub fn add_global_buf(&mut self, name: impl Into<String>, loc: Loc) -> TarnResult<BelId> {
        self.add_bel_inner(name.into(), BelType::ClockBuf, loc, true)
    }

    fn add_bel_inner(
        &mut self,
        name: String,
        bel_type: BelType,
        loc: Loc,
        is_global_buf: bool,
    ) -> TarnResult<BelId> {
        if loc.x < 0 || loc.x >= self.dim_x || loc.y < 0 || loc.y >= self.dim_y || loc.z < 0 {
            return Err(InternalError::new(format!(
                "bel location {loc} outside {}x{} grid",
                self.dim_x, self.dim_y
            )));
        }
        if self.by_loc.contains_key(&loc) {
            return Err(InternalError::new(format!(
                "duplicate bel at location {loc}"
            )));
        }
        let id = BelId::from_raw(self.bels.len() as u32);
        self.bels.push(Bel {
            id,
            name,
            bel_type,
            loc,
            is_global_buf,
        });
        self.by_loc.insert(loc, id);
        let depth = self.tile_depth.entry((loc.x, loc.y)).or_insert(0);
        *depth = (*depth).max(loc.z + 1);
        Ok(id)
    }

    /// Marks a bel as architecturally invalid for cell placement.
    ///
    /// The placer skips such bels when legality enforcement is requested.
    pub fn mark_invalid(&mut self, bel: BelId) {
        self.invalid.insert(bel);
    }

    /// Sets the per-grid-unit routing delay used by [`Device::predict_delay`].
    pub fn set_delay_per_unit(&mut self, ns: f64) {
        self.delay_ns_per_unit = ns;
    }
}

impl Device for GridDevice {
    fn device_name(&self) -> &str {
        &self.name
    }

    fn bels(&self) -> &[Bel] {
        &self.bels
    }

    fn bel(&self, id: BelId) -> &Bel {
        &self.bels[id.as_raw() as usize]
    }

    fn bel_at(&self, loc: Loc) -> Option<BelId> {
        self.by_loc.get(&loc).copied()
    }

    fn grid_dim_x(&self) -> i32 {
        self.dim_x
    }

    fn grid_dim_y(&self) -> i32 {
        self.dim_y
    }

    fn tile_dim_z(&self, x: i32, y: i32) -> i32 {
        self.tile_depth.get(&(x, y)).copied().unwrap_or(0).max(1)
    }

    fn is_valid_bel_for_cell(&self, _cell_type: CellType, bel: BelId) -> bool {
        !self.invalid.contains(&bel)
    }

    fn predict_delay(&self, from: BelId, to: BelId) -> Delay {
        let a = self.bel(from).loc;
        let b = self.bel(to).loc;
        let dist = (a.x - b.x).abs() + (a.y - b.y).abs();
        Delay::from_ns(dist as f64 * self.delay_ns_per_unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_fill() {
        let device = GridDevice::uniform("t", 3, 2, 2, BelType::Lut);
        assert_eq!(device.bels().len(), 12);
        assert_eq!(device.grid_dim_x(), 3);
        assert_eq!(device.grid_dim_y(), 2);
        assert_eq!(device.tile_dim_z(0, 0), 2);
        for bel in device.bels() {
            assert_eq!(bel.bel_type, BelType::Lut);
            assert!(!bel.is_global_buf);
        }
    }

    #[test]
    fn bel_lookup_by_location() {
        let device = GridDevice::uniform("t", 4, 4, 1, BelType::Ff);
        let id = device.bel_at(Loc::new(2, 3, 0)).unwrap();
        assert_eq!(device.bel(id).loc, Loc::new(2, 3, 0));
        assert!(device.bel_at(Loc::new(4, 0, 0)).is_none());
        assert!(device.bel_at(Loc::new(0, 0, 1)).is_none());
    }

    #[test]
    fn add_bel_rejects_out_of_grid() {
        let mut device = GridDevice::new("t", 2, 2);
        let err = device
            .add_bel("BAD", BelType::Lut, Loc::new(2, 0, 0))
            .unwrap_err();
        assert!(err.message.contains("outside"));
    }

    #[test]
    fn add_bel_rejects_duplicate_location() {
        let mut device = GridDevice::new("t", 2, 2);
        device.add_bel("A", BelType::Lut, Loc::new(0, 0, 0)).unwrap();
        let err = device
            .add_bel("B", BelType::Lut, Loc::new(0, 0, 0))
            .unwrap_err();
        assert!(err.message.contains("duplicate"));
    }

    #[test]
    fn tile_depth_tracks_max_slot() {
        let mut device = GridDevice::new("t", 2, 2);
        device.add_bel("A", BelType::Lut, Loc::new(0, 0, 0)).unwrap();
        device.add_bel("B", BelType::Lut, Loc::new(0, 0, 3)).unwrap();
        assert_eq!(device.tile_dim_z(0, 0), 4);
        // Empty tiles still report a single slot.
        assert_eq!(device.tile_dim_z(1, 1), 1);
    }

    #[test]
    fn global_buf_flag() {
        let mut device = GridDevice::new("t", 2, 2);
        let gb = device.add_global_buf("GB0", Loc::new(0, 0, 0)).unwrap();
        assert!(device.bel(gb).is_global_buf);
        assert_eq!(device.bel(gb).bel_type, BelType::ClockBuf);
    }

    #[test]
    fn validity_marking() {
        let mut device = GridDevice::uniform("t", 2, 1, 1, BelType::Lut);
        let bel = device.bel_at(Loc::new(1, 0, 0)).unwrap();
        assert!(device.is_valid_bel_for_cell(CellType::Lut, bel));
        device.mark_invalid(bel);
        assert!(!device.is_valid_bel_for_cell(CellType::Lut, bel));
    }

    #[test]
    fn manhattan_delay() {
        let mut device = GridDevice::uniform("t", 8, 8, 1, BelType::Lut);
        device.set_delay_per_unit(0.5);
        let a = device.bel_at(Loc::new(0, 0, 0)).unwrap();
        let b = device.bel_at(Loc::new(3, 4, 0)).unwrap();
        assert_eq!(device.predict_delay(a, b).ns(), 3.5);
        assert_eq!(device.predict_delay(a, a), Delay::ZERO);
    }

    #[test]
    fn stable_enumeration_order() {
        let a = GridDevice::uniform("t", 3, 3, 2, BelType::Lut);
        let b = GridDevice::uniform("t", 3, 3, 2, BelType::Lut);
        let locs_a: Vec<Loc> = a.bels().iter().map(|bel| bel.loc).collect();
        let locs_b: Vec<Loc> = b.bels().iter().map(|bel| bel.loc).collect();
        assert_eq!(locs_a, locs_b);
    }
}
