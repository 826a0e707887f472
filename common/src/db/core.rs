use crate::db::indices::*;
use crate::geom::coord::{Delta, GridPosition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Directed wire-to-wire connection between two tiles: `source` lives on the
/// tile the record is written from, `dest` on its neighbor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WirePair {
    pub source: String,
    pub dest: String,
}

impl WirePair {
    pub fn new(source: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }

    pub fn swapped(&self) -> WirePair {
        WirePair {
            source: self.dest.clone(),
            dest: self.source.clone(),
        }
    }
}

/// A tile of type `from` has a tile of type `to` at `delta` relative to it,
/// wired together by `wire_pairs`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectivityRecord {
    pub from: TileTypeId,
    pub to: TileTypeId,
    pub delta: Delta,
    pub wire_pairs: Vec<WirePair>,
}

#[derive(Clone, Debug, Default)]
pub struct TileTypeTable {
    names: Vec<String>,
    name_map: HashMap<String, TileTypeId>,
}

impl TileTypeTable {
    pub fn intern(&mut self, name: &str) -> TileTypeId {
        if let Some(&id) = self.name_map.get(name) {
            return id;
        }
        let id = TileTypeId::new(self.names.len());
        self.names.push(name.to_string());
        self.name_map.insert(name.to_string(), id);
        id
    }

    pub fn lookup(&self, name: &str) -> Option<TileTypeId> {
        self.name_map.get(name).copied()
    }

    pub fn name(&self, id: TileTypeId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Name for diagnostics; falls back to the raw id.
    pub fn display_name(&self, id: TileTypeId) -> String {
        match self.name(id) {
            Some(name) => name.to_string(),
            None => format!("<tile type #{}>", id.0),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Dense row-major `width x height` tile map. Slots without a tile stay `None`.
#[derive(Clone, Debug, Default)]
pub struct Grid {
    width: u32,
    height: u32,
    tiles: Vec<Option<TileTypeId>>,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![None; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn num_positions(&self) -> usize {
        self.tiles.len()
    }

    #[inline(always)]
    fn index(&self, pos: GridPosition) -> usize {
        (pos.y as usize) * (self.width as usize) + (pos.x as usize)
    }

    #[inline]
    pub fn contains(&self, pos: GridPosition) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn get(&self, pos: GridPosition) -> Option<TileTypeId> {
        if !self.contains(pos) {
            return None;
        }
        self.tiles[self.index(pos)]
    }

    /// Places `tile` at `pos`, returning whatever was there before.
    ///
    /// Panics if `pos` is outside the grid.
    pub fn set(&mut self, pos: GridPosition, tile: TileTypeId) -> Option<TileTypeId> {
        assert!(self.contains(pos), "position {} outside grid", pos);
        let idx = self.index(pos);
        self.tiles[idx].replace(tile)
    }

    /// Row-major: `y` outer, `x` inner.
    pub fn positions(&self) -> impl Iterator<Item = GridPosition> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| GridPosition::new(x, y)))
    }

    pub fn num_placed(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_some()).count()
    }
}

pub struct DeviceDB {
    pub tile_types: TileTypeTable,
    pub grid: Grid,
    pub connections: Vec<ConnectivityRecord>,
}

impl DeviceDB {
    pub fn new() -> Self {
        Self {
            tile_types: TileTypeTable::default(),
            grid: Grid::new(0, 0),
            connections: Vec::with_capacity(256),
        }
    }

    pub fn with_grid(width: u32, height: u32) -> Self {
        let mut db = Self::new();
        db.grid = Grid::new(width, height);
        db
    }

    pub fn place_tile(&mut self, pos: GridPosition, tile_type: &str) -> Option<TileTypeId> {
        let id = self.tile_types.intern(tile_type);
        self.grid.set(pos, id)
    }

    pub fn add_connection(
        &mut self,
        from: &str,
        to: &str,
        delta: Delta,
        wire_pairs: Vec<WirePair>,
    ) {
        let from = self.tile_types.intern(from);
        let to = self.tile_types.intern(to);
        self.connections.push(ConnectivityRecord {
            from,
            to,
            delta,
            wire_pairs,
        });
    }
}

impl Default for DeviceDB {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swapping_twice_is_identity() {
        let pair = WirePair::new("A_OUT", "B_IN");
        assert_eq!(pair.swapped(), WirePair::new("B_IN", "A_OUT"));
        assert_eq!(pair.swapped().swapped(), pair);
    }

    #[test]
    fn tile_types_are_interned_once() {
        let mut table = TileTypeTable::default();
        let clb = table.intern("CLB");
        let io = table.intern("IO");
        assert_eq!(table.intern("CLB"), clb);
        assert_ne!(clb, io);
        assert_eq!(table.len(), 2);
        assert_eq!(table.name(io), Some("IO"));
        assert_eq!(table.lookup("BRAM"), None);
        assert_eq!(table.display_name(TileTypeId::new(9)), "<tile type #9>");
    }

    #[test]
    fn grid_is_row_major_and_bounded() {
        let mut db = DeviceDB::with_grid(3, 2);
        assert_eq!(db.place_tile(GridPosition::new(2, 1), "CLB"), None);
        let io = db.tile_types.intern("IO");
        assert_eq!(db.place_tile(GridPosition::new(2, 1), "IO"), db.tile_types.lookup("CLB"));
        assert_eq!(db.grid.get(GridPosition::new(2, 1)), Some(io));
        assert_eq!(db.grid.get(GridPosition::new(3, 0)), None);
        assert_eq!(db.grid.num_placed(), 1);

        let order: Vec<_> = db.grid.positions().map(|p| (p.x, p.y)).collect();
        assert_eq!(order, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    #[should_panic(expected = "outside grid")]
    fn placing_outside_the_grid_panics() {
        let mut db = DeviceDB::with_grid(1, 1);
        db.place_tile(GridPosition::new(1, 0), "CLB");
    }
}
