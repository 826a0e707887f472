//! Relative-offset connectivity lookup.
//!
//! Raw records say "a tile of type A has a tile of type B at delta d". The
//! index stores each record twice, once as supplied and once mirrored
//! (B, -d, A with every wire pair swapped), so the grid walk can look up any
//! neighbor from either side.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tileconn_common::db::core::{ConnectivityRecord, TileTypeTable, WirePair};
use tileconn_common::db::indices::TileTypeId;
use tileconn_common::error::BuildError;
use tileconn_common::geom::coord::Delta;

/// Whether an entry was inserted as supplied or synthesized as a mirror.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Forward,
    Reverse,
}

impl Orientation {
    pub fn flipped(self) -> Orientation {
        match self {
            Orientation::Forward => Orientation::Reverse,
            Orientation::Reverse => Orientation::Forward,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub wire_pairs: Vec<WirePair>,
    pub orientation: Orientation,
}

impl Connection {
    fn mirrored(&self) -> Connection {
        Connection {
            wire_pairs: self.wire_pairs.iter().map(WirePair::swapped).collect(),
            orientation: self.orientation.flipped(),
        }
    }
}

pub type NeighborMap = BTreeMap<TileTypeId, Connection>;

#[derive(Clone, Debug, Default)]
pub struct ConnectivityIndex {
    relative_to: BTreeMap<TileTypeId, BTreeMap<Delta, NeighborMap>>,
    entries: usize,
}

impl ConnectivityIndex {
    pub fn build(
        records: &[ConnectivityRecord],
        tile_types: &TileTypeTable,
    ) -> Result<Self, BuildError> {
        let mut index = Self::default();

        for record in records {
            let from_name = tile_types
                .name(record.from)
                .ok_or(BuildError::UnknownTileType { id: record.from.0 })?;
            tile_types
                .name(record.to)
                .ok_or(BuildError::UnknownTileType { id: record.to.0 })?;

            if !record.delta.is_cardinal() {
                return Err(BuildError::UnsupportedDelta {
                    tile: from_name.to_string(),
                    delta: record.delta,
                });
            }

            let forward = Connection {
                wire_pairs: record.wire_pairs.clone(),
                orientation: Orientation::Forward,
            };
            let reverse = forward.mirrored();
            index.insert(tile_types, record.from, record.delta, record.to, forward)?;
            index.insert(tile_types, record.to, -record.delta, record.from, reverse)?;
        }

        log::debug!(
            "Connectivity index: {} records -> {} entries over {} tile types",
            records.len(),
            index.entries,
            index.relative_to.len()
        );
        Ok(index)
    }

    fn insert(
        &mut self,
        tile_types: &TileTypeTable,
        from: TileTypeId,
        delta: Delta,
        to: TileTypeId,
        connection: Connection,
    ) -> Result<(), BuildError> {
        let neighbors = self
            .relative_to
            .entry(from)
            .or_default()
            .entry(delta)
            .or_default();

        match neighbors.entry(to) {
            Entry::Vacant(slot) => {
                slot.insert(connection);
                self.entries += 1;
                Ok(())
            }
            Entry::Occupied(slot) if slot.get().wire_pairs == connection.wire_pairs => {
                log::warn!(
                    "Ignoring repeated connectivity {} -> {} at {}",
                    tile_types.display_name(from),
                    tile_types.display_name(to),
                    delta
                );
                Ok(())
            }
            Entry::Occupied(_) => Err(BuildError::DuplicateConnectivity {
                from: tile_types.display_name(from),
                delta,
                to: tile_types.display_name(to),
            }),
        }
    }

    /// Deltas known for `tile`, in ascending order, each with its neighbor map.
    pub fn deltas(&self, tile: TileTypeId) -> impl Iterator<Item = (Delta, &NeighborMap)> + '_ {
        self.relative_to
            .get(&tile)
            .into_iter()
            .flat_map(|by_delta| by_delta.iter().map(|(delta, neighbors)| (*delta, neighbors)))
    }

    pub fn get(&self, from: TileTypeId, delta: Delta, to: TileTypeId) -> Option<&Connection> {
        self.relative_to.get(&from)?.get(&delta)?.get(&to)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileTypeId, Delta, TileTypeId, &Connection)> + '_ {
        self.relative_to.iter().flat_map(|(&from, by_delta)| {
            by_delta.iter().flat_map(move |(&delta, neighbors)| {
                neighbors
                    .iter()
                    .map(move |(&to, connection)| (from, delta, to, connection))
            })
        })
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileconn_common::db::core::DeviceDB;

    fn pairs(list: &[(&str, &str)]) -> Vec<WirePair> {
        list.iter().map(|(a, b)| WirePair::new(*a, *b)).collect()
    }

    fn build(db: &DeviceDB) -> Result<ConnectivityIndex, BuildError> {
        ConnectivityIndex::build(&db.connections, &db.tile_types)
    }

    #[test]
    fn records_are_inserted_in_both_directions() {
        let mut db = DeviceDB::new();
        db.add_connection("TileA", "TileB", Delta::EAST, pairs(&[("A_OUT", "B_IN")]));
        let index = build(&db).unwrap();
        let a = db.tile_types.lookup("TileA").unwrap();
        let b = db.tile_types.lookup("TileB").unwrap();

        assert_eq!(index.len(), 2);
        let forward = index.get(a, Delta::EAST, b).unwrap();
        assert_eq!(forward.wire_pairs, pairs(&[("A_OUT", "B_IN")]));
        assert_eq!(forward.orientation, Orientation::Forward);

        let reverse = index.get(b, Delta::WEST, a).unwrap();
        assert_eq!(reverse.wire_pairs, pairs(&[("B_IN", "A_OUT")]));
        assert_eq!(reverse.orientation, Orientation::Reverse);

        assert!(index.get(a, Delta::WEST, b).is_none());
    }

    #[test]
    fn every_entry_has_a_swapped_mirror() {
        let mut db = DeviceDB::new();
        db.add_connection("CLB", "CLB", Delta::EAST, pairs(&[("E0", "W0"), ("E1", "W1")]));
        db.add_connection("CLB", "IO", Delta::NORTH, pairs(&[("N0", "S0")]));
        db.add_connection("IO", "CLB", Delta::EAST, pairs(&[("X", "Y"), ("X", "Z")]));
        let index = build(&db).unwrap();

        assert_eq!(index.len(), 6);
        for (from, delta, to, connection) in index.iter() {
            let mirror = index.get(to, -delta, from).unwrap();
            let swapped: Vec<_> = connection.wire_pairs.iter().map(WirePair::swapped).collect();
            assert_eq!(mirror.wire_pairs, swapped);
            assert_eq!(mirror.orientation, connection.orientation.flipped());
        }
    }

    #[test]
    fn deltas_are_reported_in_sorted_order() {
        let mut db = DeviceDB::new();
        db.add_connection("CLB", "CLB", Delta::NORTH, pairs(&[("N", "S")]));
        db.add_connection("CLB", "CLB", Delta::EAST, pairs(&[("E", "W")]));
        let index = build(&db).unwrap();
        let clb = db.tile_types.lookup("CLB").unwrap();

        let deltas: Vec<_> = index.deltas(clb).map(|(d, _)| d).collect();
        assert_eq!(
            deltas,
            vec![Delta::WEST, Delta::SOUTH, Delta::NORTH, Delta::EAST]
        );
        assert_eq!(index.deltas(TileTypeId::new(42)).count(), 0);
    }

    #[test]
    fn diagonal_delta_is_rejected() {
        let mut db = DeviceDB::new();
        db.add_connection("CLB", "IO", Delta::new(1, 1), pairs(&[("A", "B")]));
        match build(&db) {
            Err(BuildError::UnsupportedDelta { tile, delta }) => {
                assert_eq!(tile, "CLB");
                assert_eq!(delta, Delta::new(1, 1));
            }
            other => panic!("expected UnsupportedDelta, got {:?}", other),
        }
    }

    #[test]
    fn multi_step_and_zero_deltas_are_rejected() {
        for delta in [Delta::new(2, 0), Delta::new(0, -3), Delta::new(0, 0)] {
            let mut db = DeviceDB::new();
            db.add_connection("CLB", "IO", delta, pairs(&[("A", "B")]));
            assert!(matches!(
                build(&db),
                Err(BuildError::UnsupportedDelta { .. })
            ));
        }
    }

    #[test]
    fn conflicting_duplicate_is_rejected() {
        let mut db = DeviceDB::new();
        db.add_connection("CLB", "IO", Delta::EAST, pairs(&[("A", "B")]));
        db.add_connection("CLB", "IO", Delta::EAST, pairs(&[("A", "C")]));
        match build(&db) {
            Err(BuildError::DuplicateConnectivity { from, delta, to }) => {
                assert_eq!(from, "CLB");
                assert_eq!(to, "IO");
                assert_eq!(delta, Delta::EAST);
            }
            other => panic!("expected DuplicateConnectivity, got {:?}", other),
        }
    }

    #[test]
    fn conflicting_mirror_is_rejected() {
        let mut db = DeviceDB::new();
        db.add_connection("CLB", "IO", Delta::EAST, pairs(&[("A", "B")]));
        db.add_connection("IO", "CLB", Delta::WEST, pairs(&[("B", "X")]));
        assert!(matches!(
            build(&db),
            Err(BuildError::DuplicateConnectivity { .. })
        ));
    }

    #[test]
    fn identical_duplicates_and_mirrors_are_idempotent() {
        let mut db = DeviceDB::new();
        db.add_connection("CLB", "IO", Delta::EAST, pairs(&[("A", "B")]));
        db.add_connection("CLB", "IO", Delta::EAST, pairs(&[("A", "B")]));
        db.add_connection("IO", "CLB", Delta::WEST, pairs(&[("B", "A")]));
        let index = build(&db).unwrap();
        let clb = db.tile_types.lookup("CLB").unwrap();
        let io = db.tile_types.lookup("IO").unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(
            index.get(clb, Delta::EAST, io).unwrap().orientation,
            Orientation::Forward
        );
        assert_eq!(
            index.get(io, Delta::WEST, clb).unwrap().orientation,
            Orientation::Reverse
        );
    }

    #[test]
    fn self_connection_keeps_both_directions_apart() {
        let mut db = DeviceDB::new();
        db.add_connection("CLB", "CLB", Delta::EAST, pairs(&[("E0", "W0")]));
        let index = build(&db).unwrap();
        let clb = db.tile_types.lookup("CLB").unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(
            index.get(clb, Delta::WEST, clb).unwrap().wire_pairs,
            pairs(&[("W0", "E0")])
        );
    }

    #[test]
    fn unknown_tile_type_is_rejected() {
        let db = DeviceDB::new();
        let records = vec![ConnectivityRecord {
            from: TileTypeId::new(0),
            to: TileTypeId::new(1),
            delta: Delta::EAST,
            wire_pairs: Vec::new(),
        }];
        assert!(matches!(
            ConnectivityIndex::build(&records, &db.tile_types),
            Err(BuildError::UnknownTileType { id: 0 })
        ));
    }
}
