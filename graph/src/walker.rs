use crate::index::{ConnectivityIndex, Orientation};
use rayon::prelude::*;
use tileconn_common::db::core::{Grid, TileTypeTable, WirePair};
use tileconn_common::db::indices::TileTypeId;
use tileconn_common::error::BuildError;
use tileconn_common::geom::coord::{Axis, Delta, GridPosition};

/// One wire pair landing in a position's channel slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelConn {
    pub delta: Delta,
    pub neighbor: GridPosition,
    /// Index of `pair` within its connection's wire-pair list. The mirrored
    /// conn at `neighbor` carries the same index.
    pub pair_index: usize,
    pub pair: WirePair,
    pub orientation: Orientation,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PositionConns {
    pub pos: GridPosition,
    pub tile: Option<TileTypeId>,
    pub x: Vec<ChannelConn>,
    pub y: Vec<ChannelConn>,
}

impl PositionConns {
    pub fn list(&self, axis: Axis) -> &[ChannelConn] {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    fn list_mut(&mut self, axis: Axis) -> &mut Vec<ChannelConn> {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }
}

/// Per-position wire-pair lists for the whole grid, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelPlan {
    pub width: u32,
    pub height: u32,
    pub positions: Vec<PositionConns>,
}

impl ChannelPlan {
    pub fn at(&self, pos: GridPosition) -> Option<&PositionConns> {
        if pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        self.positions
            .get((pos.y as usize) * (self.width as usize) + pos.x as usize)
    }

    pub fn num_conns(&self) -> usize {
        self.positions.iter().map(|p| p.x.len() + p.y.len()).sum()
    }
}

pub fn walk(
    grid: &Grid,
    index: &ConnectivityIndex,
    tile_types: &TileTypeTable,
) -> Result<ChannelPlan, BuildError> {
    let positions: Vec<GridPosition> = grid.positions().collect();

    // Collected in position order, so the first error reported is the
    // first one in row-major order regardless of scheduling.
    let walked: Vec<Result<PositionConns, BuildError>> = positions
        .par_iter()
        .map(|&pos| walk_position(grid, index, tile_types, pos))
        .collect();

    let positions = walked.into_iter().collect::<Result<Vec<_>, _>>()?;
    Ok(ChannelPlan {
        width: grid.width(),
        height: grid.height(),
        positions,
    })
}

fn walk_position(
    grid: &Grid,
    index: &ConnectivityIndex,
    tile_types: &TileTypeTable,
    pos: GridPosition,
) -> Result<PositionConns, BuildError> {
    let mut conns = PositionConns {
        pos,
        tile: grid.get(pos),
        ..Default::default()
    };
    let Some(tile) = conns.tile else {
        return Ok(conns);
    };

    for (delta, neighbors) in index.deltas(tile) {
        let axis = Axis::of(delta).ok_or_else(|| BuildError::UnsupportedDelta {
            tile: tile_types.display_name(tile),
            delta,
        })?;

        let Some(neighbor) = pos.offset(delta).filter(|q| grid.contains(*q)) else {
            continue;
        };
        let Some(connection) = grid.get(neighbor).and_then(|t| neighbors.get(&t)) else {
            continue;
        };

        conns
            .list_mut(axis)
            .extend(connection.wire_pairs.iter().enumerate().map(|(pair_index, pair)| {
                ChannelConn {
                    delta,
                    neighbor,
                    pair_index,
                    pair: pair.clone(),
                    orientation: connection.orientation,
                }
            }));
    }

    Ok(conns)
}
