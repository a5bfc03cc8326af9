//! Read-only query views for inspecting simulation state.
//!
//! All types are owned copies -- no references into engine storage.
//! This is the entire contract a rendering or layout layer needs, and it
//! offers no path to mutate the graph.

use crate::Fixed64;
use crate::id::NodeId;

/// An aggregated, read-only view of a single node.
#[derive(Debug, Clone)]
pub struct NodeSnapshot {
    /// The node's id in the registry.
    pub id: NodeId,
    /// The node's label from the edge list.
    pub name: String,
    /// Nodes with an edge into this node.
    pub predecessors: Vec<NodeId>,
    /// Nodes this node has an edge to.
    pub successors: Vec<NodeId>,
    /// Item positions, head to tail.
    pub queue: Vec<Fixed64>,
}
