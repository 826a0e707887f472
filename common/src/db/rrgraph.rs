use crate::db::indices::RrNodeId;
use crate::geom::coord::{Axis, GridPosition};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Fixed tie, e.g. a channel wire to the pin it terminates at.
    Short,
    /// Programmable interconnect point between channel wires.
    Pip,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RrNodeKind {
    ChannelWire { axis: Axis, track: u32 },
    Pin { name: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RrNode {
    pub id: RrNodeId,
    pub pos: GridPosition,
    pub kind: RrNodeKind,
}

impl RrNode {
    pub fn is_pin(&self) -> bool {
        matches!(self.kind, RrNodeKind::Pin { .. })
    }

    pub fn axis(&self) -> Option<Axis> {
        match self.kind {
            RrNodeKind::ChannelWire { axis, .. } => Some(axis),
            RrNodeKind::Pin { .. } => None,
        }
    }

    pub fn describe(&self) -> String {
        match &self.kind {
            RrNodeKind::ChannelWire { axis, track } => {
                format!("{} {} track {}", axis, self.pos, track)
            }
            RrNodeKind::Pin { name } => format!("PIN {} {}", self.pos, name),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RrEdge {
    pub src: RrNodeId,
    pub dst: RrNodeId,
    pub kind: EdgeKind,
}

/// Final routing-resource graph. `nodes[i].id == i` for every node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RrGraph {
    pub width: u32,
    pub height: u32,
    pub channel_width_x: u32,
    pub channel_width_y: u32,
    pub nodes: Vec<RrNode>,
    pub edges: Vec<RrEdge>,
}

impl RrGraph {
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: RrNodeId) -> Option<&RrNode> {
        self.nodes.get(id.index())
    }

    pub fn channel_width(&self, axis: Axis) -> u32 {
        match axis {
            Axis::X => self.channel_width_x,
            Axis::Y => self.channel_width_y,
        }
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &RrEdge> + '_ {
        self.edges.iter().filter(move |e| e.kind == kind)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphStats {
    pub channel_nodes: usize,
    pub pin_nodes: usize,
    pub short_edges: usize,
    pub pip_edges: usize,
    pub channel_width_x: u32,
    pub channel_width_y: u32,
    pub memory_bytes: usize,
}

impl GraphStats {
    pub fn of(graph: &RrGraph) -> Self {
        let pin_nodes = graph.nodes.iter().filter(|n| n.is_pin()).count();
        let short_edges = graph.edges_of_kind(EdgeKind::Short).count();
        let memory_bytes = std::mem::size_of::<RrNode>() * graph.num_nodes()
            + std::mem::size_of::<RrEdge>() * graph.num_edges();

        Self {
            channel_nodes: graph.num_nodes() - pin_nodes,
            pin_nodes,
            short_edges,
            pip_edges: graph.num_edges() - short_edges,
            channel_width_x: graph.channel_width_x,
            channel_width_y: graph.channel_width_y,
            memory_bytes,
        }
    }
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Channel widths:      X = {}, Y = {}",
            self.channel_width_x, self.channel_width_y
        )?;
        writeln!(
            f,
            "Nodes:               {} ({} channel wires, {} pins)",
            self.channel_nodes + self.pin_nodes,
            self.channel_nodes,
            self.pin_nodes
        )?;
        writeln!(
            f,
            "Edges:               {} ({} shorts, {} pips)",
            self.short_edges + self.pip_edges,
            self.short_edges,
            self.pip_edges
        )?;
        write!(
            f,
            "Estimated memory:    {:.1} KiB",
            self.memory_bytes as f64 / 1024.0
        )
    }
}
