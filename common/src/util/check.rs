use crate::db::indices::RrNodeId;
use crate::db::rrgraph::{EdgeKind, RrEdge, RrGraph, RrNode, RrNodeKind};
use crate::geom::coord::Axis;
use rayon::prelude::*;

/// Nodes that no edge touches, in id order.
pub fn orphan_nodes(graph: &RrGraph) -> Vec<RrNodeId> {
    let mut degree = vec![0u32; graph.num_nodes()];
    for edge in &graph.edges {
        for id in [edge.src, edge.dst] {
            if let Some(d) = degree.get_mut(id.index()) {
                *d += 1;
            }
        }
    }
    degree
        .iter()
        .enumerate()
        .filter(|&(_, &d)| d == 0)
        .map(|(i, _)| RrNodeId::new(i))
        .collect()
}

pub fn run(graph: &RrGraph) -> Result<(), String> {
    log::info!(
        "Starting Graph Verification ({} nodes, {} edges)",
        graph.num_nodes(),
        graph.num_edges()
    );

    let mut msgs: Vec<String> = graph
        .nodes
        .par_iter()
        .enumerate()
        .filter(|(i, node)| node.id.index() != *i)
        .map(|(i, node)| format!("node at slot {} carries id {}", i, node.id))
        .collect();

    if msgs.is_empty() {
        log::info!("\x1b[32mPASS\x1b[0m: Node ids are dense.");
    } else {
        log::error!("\x1b[31mFAIL\x1b[0m: Node ids are not dense");
    }

    let edge_msgs: Vec<String> = graph
        .edges
        .par_iter()
        .enumerate()
        .filter_map(|(i, edge)| check_edge(graph, edge).err().map(|e| format!("edge {}: {}", i, e)))
        .collect();

    if edge_msgs.is_empty() {
        log::info!("\x1b[32mPASS\x1b[0m: All shorts and pips join valid endpoints.");
    } else {
        log::error!("\x1b[31mFAIL\x1b[0m: {} malformed edges", edge_msgs.len());
    }
    msgs.extend(edge_msgs);

    let orphans = orphan_nodes(graph);
    if orphans.is_empty() {
        log::info!("\x1b[32mPASS\x1b[0m: Every node has at least one edge.");
    } else {
        log::error!("\x1b[31mFAIL\x1b[0m: {} orphan nodes", orphans.len());
        msgs.extend(orphans.iter().map(|&id| match graph.node(id) {
            Some(node) => format!("orphan node {} ({})", id, node.describe()),
            None => format!("orphan node {}", id),
        }));
    }

    for msg in &msgs {
        log::error!("{}", msg);
    }

    if msgs.is_empty() {
        log::info!("\x1b[32mSUCCESS\x1b[0m: VALID GRAPH");
        Ok(())
    } else {
        log::error!(
            "\x1b[31mFAILURE\x1b[0m: INVALID GRAPH ({} Errors)",
            msgs.len()
        );
        Err(msgs.join("; "))
    }
}

fn check_edge(graph: &RrGraph, edge: &RrEdge) -> Result<(), String> {
    let src = endpoint(graph, edge.src)?;
    let dst = endpoint(graph, edge.dst)?;

    match edge.kind {
        EdgeKind::Short => {
            if src.is_pin() || !dst.is_pin() {
                return Err(format!(
                    "short must run channel wire -> pin, got {} -> {}",
                    src.describe(),
                    dst.describe()
                ));
            }
            if src.pos != dst.pos {
                return Err(format!(
                    "short spans positions: {} -> {}",
                    src.describe(),
                    dst.describe()
                ));
            }
        }
        EdgeKind::Pip => {
            let (
                RrNodeKind::ChannelWire { axis: src_axis, .. },
                RrNodeKind::ChannelWire { axis: dst_axis, .. },
            ) = (&src.kind, &dst.kind)
            else {
                return Err(format!(
                    "pip must join two channel wires, got {} -> {}",
                    src.describe(),
                    dst.describe()
                ));
            };
            if src_axis != dst_axis {
                return Err(format!(
                    "pip crosses axes: {} -> {}",
                    src.describe(),
                    dst.describe()
                ));
            }
            if !adjacent_along(src, dst) {
                return Err(format!(
                    "pip joins non-adjacent positions: {} -> {}",
                    src.describe(),
                    dst.describe()
                ));
            }
        }
    }
    Ok(())
}

fn endpoint(graph: &RrGraph, id: RrNodeId) -> Result<&RrNode, String> {
    graph
        .node(id)
        .ok_or_else(|| format!("endpoint {} out of range ({} nodes)", id, graph.num_nodes()))
}

fn adjacent_along(a: &RrNode, b: &RrNode) -> bool {
    let dx = a.pos.x.abs_diff(b.pos.x);
    let dy = a.pos.y.abs_diff(b.pos.y);
    match a.axis() {
        Some(Axis::X) => dx == 1 && dy == 0,
        Some(Axis::Y) => dx == 0 && dy == 1,
        None => false,
    }
}
