use crate::allocator::NodeAssignment;
use crate::index::Orientation;
use crate::walker::{ChannelPlan, PositionConns};
use rayon::prelude::*;
use tileconn_common::db::indices::RrNodeId;
use tileconn_common::db::rrgraph::{EdgeKind, RrEdge, RrGraph};
use tileconn_common::error::BuildError;
use tileconn_common::geom::coord::{Axis, GridPosition};
use tileconn_common::util::check;

pub fn emit(assignment: &NodeAssignment, plan: &ChannelPlan) -> Result<RrGraph, BuildError> {
    let shorts: Vec<Result<Vec<RrEdge>, BuildError>> = plan
        .positions
        .par_iter()
        .map(|conns| emit_shorts(assignment, conns))
        .collect();
    let pips: Vec<Result<Vec<RrEdge>, BuildError>> = plan
        .positions
        .par_iter()
        .map(|conns| emit_pips(assignment, plan, conns))
        .collect();

    let mut edges = Vec::with_capacity(assignment.nodes.len() * 2);
    for per_position in shorts.into_iter().chain(pips) {
        edges.extend(per_position?);
    }

    let graph = RrGraph {
        width: plan.width,
        height: plan.height,
        channel_width_x: assignment.channel_width_x,
        channel_width_y: assignment.channel_width_y,
        nodes: assignment.nodes.clone(),
        edges,
    };

    if let Some(&node) = check::orphan_nodes(&graph).first() {
        return Err(BuildError::OrphanNode {
            node,
            description: graph.nodes[node.index()].describe(),
        });
    }

    Ok(graph)
}

/// One short per conn, from the channel wire at its slot to the local pin.
fn emit_shorts(
    assignment: &NodeAssignment,
    conns: &PositionConns,
) -> Result<Vec<RrEdge>, BuildError> {
    let mut edges = Vec::with_capacity(conns.x.len() + conns.y.len());
    for axis in Axis::ALL {
        for (track, conn) in conns.list(axis).iter().enumerate() {
            let src = channel_node(assignment, conns.pos, axis, track)?;
            let dst = assignment
                .pin_node(conns.pos, &conn.pair.source)
                .ok_or_else(|| BuildError::MissingNode {
                    description: format!("PIN {} {}", conns.pos, conn.pair.source),
                })?;
            edges.push(RrEdge {
                src,
                dst,
                kind: EdgeKind::Short,
            });
        }
    }
    Ok(edges)
}

/// One pip per forward conn, from its channel wire to the channel wire that
/// carries the mirrored conn at the neighbor. Reverse conns are the far end
/// of some forward conn and emit nothing, so every crossing wire pair is
/// counted exactly once.
fn emit_pips(
    assignment: &NodeAssignment,
    plan: &ChannelPlan,
    conns: &PositionConns,
) -> Result<Vec<RrEdge>, BuildError> {
    let mut edges = Vec::new();
    for axis in Axis::ALL {
        for (track, conn) in conns.list(axis).iter().enumerate() {
            if conn.orientation != Orientation::Forward {
                continue;
            }
            let missing_mirror = || BuildError::MissingMirror {
                x: conns.pos.x,
                y: conns.pos.y,
                delta: conn.delta,
                pair_index: conn.pair_index,
            };

            let far = plan.at(conn.neighbor).ok_or_else(missing_mirror)?;
            let far_track = far
                .list(axis)
                .iter()
                .position(|m| m.delta == -conn.delta && m.pair_index == conn.pair_index)
                .ok_or_else(missing_mirror)?;

            edges.push(RrEdge {
                src: channel_node(assignment, conns.pos, axis, track)?,
                dst: channel_node(assignment, conn.neighbor, axis, far_track)?,
                kind: EdgeKind::Pip,
            });
        }
    }
    Ok(edges)
}

fn channel_node(
    assignment: &NodeAssignment,
    pos: GridPosition,
    axis: Axis,
    track: usize,
) -> Result<RrNodeId, BuildError> {
    assignment
        .channel_node(pos, axis, track as u32)
        .ok_or_else(|| BuildError::MissingNode {
            description: format!("{} {} track {}", axis, pos, track),
        })
}
