use crate::walker::ChannelPlan;
use std::collections::{BTreeMap, HashMap};
use tileconn_common::db::indices::RrNodeId;
use tileconn_common::db::rrgraph::{RrNode, RrNodeKind};
use tileconn_common::error::BuildError;
use tileconn_common::geom::coord::{Axis, GridPosition};

/// Tracks used along one row (X) or column (Y).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Channel {
    pub axis: Axis,
    /// Row for X channels, column for Y channels.
    pub index: u32,
    occupancy: BTreeMap<u32, u32>,
}

impl Channel {
    fn new(axis: Axis, index: u32) -> Self {
        Self {
            axis,
            index,
            occupancy: BTreeMap::new(),
        }
    }

    fn record(&mut self, along: u32, tracks: u32) {
        self.occupancy.insert(along, tracks);
    }

    /// Tracks used at coordinate `along` (x for X channels, y for Y channels).
    pub fn tracks_at(&self, along: u32) -> u32 {
        self.occupancy.get(&along).copied().unwrap_or(0)
    }

    pub fn width(&self) -> u32 {
        self.occupancy.values().copied().max().unwrap_or(0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackSlot {
    pub pos: GridPosition,
    pub axis: Axis,
    pub track: u32,
}

/// Node ids handed out by [`allocate`].
///
/// Ids are dense and assigned in this order:
/// 1. channel wires, positions row-major, X tracks then Y tracks;
/// 2. pins, positions row-major, each distinct local wire name in the order
///    it is first referenced (X list before Y list).
#[derive(Clone, Debug)]
pub struct NodeAssignment {
    pub channel_width_x: u32,
    pub channel_width_y: u32,
    pub x_channels: BTreeMap<u32, Channel>,
    pub y_channels: BTreeMap<u32, Channel>,
    pub nodes: Vec<RrNode>,
    pub num_channel_nodes: usize,
    slots: HashMap<TrackSlot, RrNodeId>,
    pins: HashMap<GridPosition, HashMap<String, RrNodeId>>,
}

impl NodeAssignment {
    pub fn channel_width(&self, axis: Axis) -> u32 {
        match axis {
            Axis::X => self.channel_width_x,
            Axis::Y => self.channel_width_y,
        }
    }

    pub fn channel_node(&self, pos: GridPosition, axis: Axis, track: u32) -> Option<RrNodeId> {
        self.slots.get(&TrackSlot { pos, axis, track }).copied()
    }

    pub fn pin_node(&self, pos: GridPosition, wire: &str) -> Option<RrNodeId> {
        self.pins.get(&pos)?.get(wire).copied()
    }

    pub fn num_pin_nodes(&self) -> usize {
        self.nodes.len() - self.num_channel_nodes
    }
}

pub fn allocate(plan: &ChannelPlan) -> Result<NodeAssignment, BuildError> {
    if let Some(untyped) = plan.positions.iter().find(|p| p.tile.is_none()) {
        return Err(BuildError::UngriddedPosition {
            x: untyped.pos.x,
            y: untyped.pos.y,
        });
    }

    let mut x_channels: BTreeMap<u32, Channel> = BTreeMap::new();
    let mut y_channels: BTreeMap<u32, Channel> = BTreeMap::new();
    for conns in &plan.positions {
        let pos = conns.pos;
        if !conns.x.is_empty() {
            x_channels
                .entry(pos.y)
                .or_insert_with(|| Channel::new(Axis::X, pos.y))
                .record(pos.x, conns.x.len() as u32);
        }
        if !conns.y.is_empty() {
            y_channels
                .entry(pos.x)
                .or_insert_with(|| Channel::new(Axis::Y, pos.x))
                .record(pos.y, conns.y.len() as u32);
        }
    }

    let channel_width_x = x_channels.values().map(Channel::width).max().unwrap_or(0);
    let channel_width_y = y_channels.values().map(Channel::width).max().unwrap_or(0);

    let mut nodes = Vec::with_capacity(plan.num_conns() * 2);
    let mut slots = HashMap::with_capacity(plan.num_conns());
    for conns in &plan.positions {
        for axis in Axis::ALL {
            for track in 0..conns.list(axis).len() as u32 {
                let id = RrNodeId::new(nodes.len());
                nodes.push(RrNode {
                    id,
                    pos: conns.pos,
                    kind: RrNodeKind::ChannelWire { axis, track },
                });
                slots.insert(
                    TrackSlot {
                        pos: conns.pos,
                        axis,
                        track,
                    },
                    id,
                );
            }
        }
    }
    let num_channel_nodes = nodes.len();

    let mut pins: HashMap<GridPosition, HashMap<String, RrNodeId>> = HashMap::new();
    for conns in &plan.positions {
        for conn in conns.x.iter().chain(conns.y.iter()) {
            let local = pins.entry(conns.pos).or_default();
            if local.contains_key(&conn.pair.source) {
                continue;
            }
            let id = RrNodeId::new(nodes.len());
            nodes.push(RrNode {
                id,
                pos: conns.pos,
                kind: RrNodeKind::Pin {
                    name: conn.pair.source.clone(),
                },
            });
            local.insert(conn.pair.source.clone(), id);
        }
    }

    log::info!(
        "Channel widths: X = {} ({} rows), Y = {} ({} columns)",
        channel_width_x,
        x_channels.len(),
        channel_width_y,
        y_channels.len()
    );
    log::info!(
        "Allocated {} nodes ({} channel wires, {} pins)",
        nodes.len(),
        num_channel_nodes,
        nodes.len() - num_channel_nodes
    );

    Ok(NodeAssignment {
        channel_width_x,
        channel_width_y,
        x_channels,
        y_channels,
        nodes,
        num_channel_nodes,
        slots,
        pins,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ConnectivityIndex;
    use crate::walker::walk;
    use tileconn_common::db::core::{DeviceDB, WirePair};
    use tileconn_common::geom::coord::Delta;

    fn plan_for(db: &DeviceDB) -> ChannelPlan {
        let index = ConnectivityIndex::build(&db.connections, &db.tile_types).unwrap();
        walk(&db.grid, &index, &db.tile_types).unwrap()
    }

    fn row_of(tiles: &[&str]) -> DeviceDB {
        let mut db = DeviceDB::with_grid(tiles.len() as u32, 1);
        for (x, tile) in tiles.iter().enumerate() {
            db.place_tile(GridPosition::new(x as u32, 0), tile);
        }
        db
    }

    #[test]
    fn two_tile_example_allocates_two_wires_and_two_pins() {
        let mut db = row_of(&["TileA", "TileB"]);
        db.add_connection("TileA", "TileB", Delta::EAST, vec![WirePair::new("A_OUT", "B_IN")]);
        let assignment = allocate(&plan_for(&db)).unwrap();

        assert_eq!(assignment.channel_width_x, 1);
        assert_eq!(assignment.channel_width_y, 0);
        assert_eq!(assignment.num_channel_nodes, 2);
        assert_eq!(assignment.num_pin_nodes(), 2);

        let left = GridPosition::new(0, 0);
        let right = GridPosition::new(1, 0);
        assert_eq!(assignment.channel_node(left, Axis::X, 0), Some(RrNodeId::new(0)));
        assert_eq!(assignment.channel_node(right, Axis::X, 0), Some(RrNodeId::new(1)));
        assert_eq!(assignment.pin_node(left, "A_OUT"), Some(RrNodeId::new(2)));
        assert_eq!(assignment.pin_node(right, "B_IN"), Some(RrNodeId::new(3)));
        assert_eq!(assignment.pin_node(left, "B_IN"), None);
        assert_eq!(assignment.channel_node(left, Axis::Y, 0), None);
    }

    #[test]
    fn width_is_the_widest_position_and_short_lists_leave_tracks_unused() {
        let mut db = row_of(&["CLB", "CLB", "IO"]);
        db.add_connection(
            "CLB",
            "CLB",
            Delta::EAST,
            vec![WirePair::new("E0", "W0"), WirePair::new("E1", "W1")],
        );
        db.add_connection("CLB", "IO", Delta::EAST, vec![WirePair::new("E0", "PAD")]);
        let plan = plan_for(&db);
        let assignment = allocate(&plan).unwrap();

        // Middle CLB sees two pairs from the west and one toward the IO.
        assert_eq!(assignment.channel_width_x, 3);
        let row = &assignment.x_channels[&0];
        assert_eq!(row.tracks_at(0), 2);
        assert_eq!(row.tracks_at(1), 3);
        assert_eq!(row.tracks_at(2), 1);
        for conns in &plan.positions {
            assert!(assignment.channel_width_x as usize >= conns.x.len());
            assert!(assignment.channel_width_y as usize >= conns.y.len());
        }
        assert_eq!(assignment.channel_node(GridPosition::new(2, 0), Axis::X, 1), None);
    }

    #[test]
    fn repeated_local_wire_gets_one_pin() {
        let mut db = row_of(&["CLB", "IO"]);
        db.add_connection(
            "CLB",
            "IO",
            Delta::EAST,
            vec![WirePair::new("OUT", "PAD0"), WirePair::new("OUT", "PAD1")],
        );
        let assignment = allocate(&plan_for(&db)).unwrap();

        assert_eq!(assignment.num_channel_nodes, 4);
        // CLB: OUT; IO: PAD0, PAD1.
        assert_eq!(assignment.num_pin_nodes(), 3);
        assert_eq!(
            assignment.pin_node(GridPosition::new(0, 0), "OUT"),
            Some(RrNodeId::new(4))
        );
        assert_eq!(
            assignment.pin_node(GridPosition::new(1, 0), "PAD1"),
            Some(RrNodeId::new(6))
        );
    }

    #[test]
    fn ids_are_dense_and_follow_documented_order() {
        let mut db = DeviceDB::with_grid(2, 2);
        for y in 0..2 {
            for x in 0..2 {
                db.place_tile(GridPosition::new(x, y), "CLB");
            }
        }
        db.add_connection("CLB", "CLB", Delta::EAST, vec![WirePair::new("E", "W")]);
        db.add_connection("CLB", "CLB", Delta::NORTH, vec![WirePair::new("N", "S")]);
        let assignment = allocate(&plan_for(&db)).unwrap();

        for (i, node) in assignment.nodes.iter().enumerate() {
            assert_eq!(node.id.index(), i);
        }
        let kinds: Vec<_> = assignment.nodes[..assignment.num_channel_nodes]
            .iter()
            .map(|n| (n.pos.x, n.pos.y, n.axis()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (0, 0, Some(Axis::X)),
                (0, 0, Some(Axis::Y)),
                (1, 0, Some(Axis::X)),
                (1, 0, Some(Axis::Y)),
                (0, 1, Some(Axis::X)),
                (0, 1, Some(Axis::Y)),
                (1, 1, Some(Axis::X)),
                (1, 1, Some(Axis::Y)),
            ]
        );
        assert!(assignment.nodes[assignment.num_channel_nodes..].iter().all(|n| n.is_pin()));
    }

    #[test]
    fn untyped_position_fails_before_allocation() {
        let mut db = DeviceDB::with_grid(3, 2);
        for x in 0..3 {
            db.place_tile(GridPosition::new(x, 0), "CLB");
        }
        db.place_tile(GridPosition::new(0, 1), "CLB");
        db.add_connection("CLB", "CLB", Delta::EAST, vec![WirePair::new("E", "W")]);

        match allocate(&plan_for(&db)) {
            Err(BuildError::UngriddedPosition { x, y }) => assert_eq!((x, y), (1, 1)),
            other => panic!("expected UngriddedPosition, got {:?}", other),
        }
    }
}
