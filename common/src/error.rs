//! Errors raised while turning tile connectivity into a routing-resource graph.
//!
//! Every variant is fatal to the current build: the pipeline never returns a
//! partially built graph.

use crate::db::indices::RrNodeId;
use crate::geom::coord::Delta;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The same (tile type, delta, tile type) triple was supplied twice with
    /// different wire pairs.
    #[error("duplicate connectivity {from} -> {to} at delta {delta} with conflicting wire pairs")]
    DuplicateConnectivity {
        from: String,
        delta: Delta,
        to: String,
    },

    /// Only single-step N/E/S/W deltas map onto a channel.
    #[error("tile type {tile} uses unsupported delta {delta}; only single-step N/E/S/W deltas are supported")]
    UnsupportedDelta { tile: String, delta: Delta },

    /// A grid position has no tile type assigned.
    #[error("grid position ({x}, {y}) has no tile type")]
    UngriddedPosition { x: u32, y: u32 },

    /// A node was allocated but no edge touches it.
    #[error("node {node} ({description}) has no edges")]
    OrphanNode { node: RrNodeId, description: String },

    /// A forward connection has no mirrored connection at its neighbor.
    #[error("connection at ({x}, {y}) with delta {delta}, wire pair #{pair_index} has no mirror at its neighbor")]
    MissingMirror {
        x: u32,
        y: u32,
        delta: Delta,
        pair_index: usize,
    },

    /// An edge endpoint was requested for a slot the allocator never assigned.
    #[error("no node allocated for {description}")]
    MissingNode { description: String },

    /// A record or grid cell refers to a tile type id outside the table.
    #[error("unknown tile type id {id}")]
    UnknownTileType { id: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_connectivity_names_both_tiles_and_delta() {
        let err = BuildError::DuplicateConnectivity {
            from: "CLB".to_string(),
            delta: Delta::new(1, 0),
            to: "IO".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("CLB -> IO"));
        assert!(msg.contains("(1, 0)"));
    }

    #[test]
    fn unsupported_delta_names_tile_and_delta() {
        let err = BuildError::UnsupportedDelta {
            tile: "CLB".to_string(),
            delta: Delta::new(1, 1),
        };
        let msg = err.to_string();
        assert!(msg.contains("CLB"));
        assert!(msg.contains("(1, 1)"));
    }

    #[test]
    fn ungridded_position_names_coordinates() {
        let err = BuildError::UngriddedPosition { x: 4, y: 7 };
        assert_eq!(err.to_string(), "grid position (4, 7) has no tile type");
    }

    #[test]
    fn orphan_node_names_node() {
        let err = BuildError::OrphanNode {
            node: RrNodeId::new(12),
            description: "PIN (0, 0) A_OUT".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("node 12"));
        assert!(msg.contains("A_OUT"));
    }
}
