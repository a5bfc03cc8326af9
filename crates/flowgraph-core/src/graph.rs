//! The flow graph: nodes parsed from a textual edge list, with mirrored
//! predecessor/successor adjacency and a read-only registry surface.
//!
//! Construction is two-pass: the first pass creates one node per distinct
//! label (first occurrence wins the identity), the second resolves every
//! line into a mirrored edge. The graph is never mutated incrementally
//! during simulation; it is only replaced wholesale via [`FlowGraph::rebuild_from`],
//! which retires every previous [`NodeId`].

use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised at the registry query boundary.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),
}

/// Errors raised while parsing an edge list in strict mode.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed edge line {line}: {content:?}")]
    MalformedLine { line: usize, content: String },
}

// ---------------------------------------------------------------------------
// Parse configuration and report
// ---------------------------------------------------------------------------

/// Options for one parse. The arrow token is configurable but fixed per
/// build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseOptions {
    /// The edge separator token, e.g. `" -> "` in `SRC -> DST`.
    pub arrow: String,
    /// When true, the first malformed line aborts the whole parse.
    /// When false (default), malformed lines are skipped and reported.
    pub strict: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            arrow: " -> ".to_string(),
            strict: false,
        }
    }
}

/// A line skipped during a lenient parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the source text.
    pub line: usize,
    /// The offending line, untrimmed.
    pub content: String,
}

/// Result of a lenient parse: which lines were skipped as malformed.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub skipped: Vec<SkippedLine>,
}

// ---------------------------------------------------------------------------
// Core data structures
// ---------------------------------------------------------------------------

/// Per-node data stored in the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeData {
    /// Label from the edge list. Deduplicated at parse time, so unique
    /// within one build.
    pub name: String,
}

/// Adjacency for a single node. Set semantics: no duplicates, order of
/// first insertion preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct NodeLinks {
    /// Nodes with an edge into this node.
    inputs: Vec<NodeId>,
    /// Nodes this node has an edge to.
    outputs: Vec<NodeId>,
}

// ---------------------------------------------------------------------------
// FlowGraph
// ---------------------------------------------------------------------------

/// The node registry: an arena of nodes with mirrored adjacency.
///
/// Adjacency is stored in a `SecondaryMap` keyed by `NodeId`, guaranteeing
/// key synchronization with the primary `nodes` SlotMap. Invariant: for any
/// materialized edge A -> B, B is in A's outputs and A is in B's inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowGraph {
    nodes: SlotMap<NodeId, NodeData>,
    links: SecondaryMap<NodeId, NodeLinks>,
}

impl FlowGraph {
    /// Create a new, empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an edge list with default options (arrow `" -> "`, lenient).
    pub fn parse(text: &str) -> Result<(Self, ParseReport), ParseError> {
        Self::parse_with(text, &ParseOptions::default())
    }

    /// Parse an edge list into a fresh graph.
    ///
    /// Empty input is valid and yields an empty graph.
    pub fn parse_with(text: &str, options: &ParseOptions) -> Result<(Self, ParseReport), ParseError> {
        let mut graph = Self::new();
        let report = graph.rebuild_from(text, options)?;
        Ok((graph, report))
    }

    /// Replace this graph's contents wholesale from an edge list.
    ///
    /// Every previous `NodeId` is retired: the underlying slots are
    /// removed before reinsertion, so stale keys fail lookups rather than
    /// aliasing a new node. On a strict-mode parse error the graph is left
    /// untouched.
    pub fn rebuild_from(
        &mut self,
        text: &str,
        options: &ParseOptions,
    ) -> Result<ParseReport, ParseError> {
        let arrow = options.arrow.as_str();
        let mut edges: Vec<(&str, &str)> = Vec::new();
        let mut report = ParseReport::default();

        // Validate every line before touching the graph, so strict-mode
        // failures are atomic.
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            match split_edge(line, arrow) {
                Some(edge) => edges.push(edge),
                None if options.strict => {
                    return Err(ParseError::MalformedLine {
                        line: idx + 1,
                        content: raw.to_string(),
                    });
                }
                None => report.skipped.push(SkippedLine {
                    line: idx + 1,
                    content: raw.to_string(),
                }),
            }
        }

        // Retire every existing node. Removing (rather than recreating the
        // arena) bumps slot generations, which is what invalidates old keys.
        let stale: Vec<NodeId> = self.nodes.keys().collect();
        for id in stale {
            self.nodes.remove(id);
        }
        self.links.clear();

        // Pass 1: one node per distinct label, first occurrence wins.
        let mut by_label: HashMap<&str, NodeId> = HashMap::new();
        for &(src, dst) in &edges {
            for label in [src, dst] {
                if !by_label.contains_key(label) {
                    let id = self.nodes.insert(NodeData {
                        name: label.to_string(),
                    });
                    self.links.insert(id, NodeLinks::default());
                    by_label.insert(label, id);
                }
            }
        }

        // Pass 2: resolve each line into a mirrored edge.
        for &(src, dst) in &edges {
            self.connect(by_label[src], by_label[dst]);
        }

        Ok(report)
    }

    /// Record the edge `from -> to` in both adjacency lists. Re-adding an
    /// existing edge is a no-op.
    fn connect(&mut self, from: NodeId, to: NodeId) {
        if let Some(links) = self.links.get_mut(from)
            && !links.outputs.contains(&to)
        {
            links.outputs.push(to);
        }
        if let Some(links) = self.links.get_mut(to)
            && !links.inputs.contains(&from)
        {
            links.inputs.push(from);
        }
    }

    // -----------------------------------------------------------------------
    // Registry query surface (read-only; the whole visualizer contract)
    // -----------------------------------------------------------------------

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.links.values().map(|l| l.outputs.len()).sum()
    }

    /// Returns true if the id refers to a live node in this build.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// The node's label, if the id is live.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).map(|d| d.name.as_str())
    }

    /// Look a node up by its label.
    pub fn node_by_name(&self, label: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, data)| data.name == label)
            .map(|(id, _)| id)
    }

    /// Iterate over all node ids in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys()
    }

    /// All nodes as `(id, label)` pairs in creation order.
    pub fn list_nodes(&self) -> Vec<(NodeId, &str)> {
        self.nodes
            .iter()
            .map(|(id, data)| (id, data.name.as_str()))
            .collect()
    }

    /// Nodes with an edge into `id`. Empty for unknown ids.
    pub fn predecessors(&self, id: NodeId) -> &[NodeId] {
        self.links
            .get(id)
            .map(|l| l.inputs.as_slice())
            .unwrap_or(&[])
    }

    /// Nodes `id` has an edge to. Empty for unknown ids.
    pub fn successors(&self, id: NodeId) -> &[NodeId] {
        self.links
            .get(id)
            .map(|l| l.outputs.as_slice())
            .unwrap_or(&[])
    }

    /// Checked relation query: `(predecessors, successors)`, or
    /// [`GraphError::NodeNotFound`] for a stale or foreign id.
    pub fn relations(&self, id: NodeId) -> Result<(&[NodeId], &[NodeId]), GraphError> {
        if !self.nodes.contains_key(id) {
            return Err(GraphError::NodeNotFound(id));
        }
        Ok((self.predecessors(id), self.successors(id)))
    }
}

/// Split one trimmed, non-empty line into `(src, dst)` labels.
///
/// Returns `None` for a malformed line: no arrow, an empty label, or a
/// label that still contains the arrow token.
fn split_edge<'a>(line: &'a str, arrow: &str) -> Option<(&'a str, &'a str)> {
    let (lhs, rhs) = line.split_once(arrow)?;
    let src = lhs.trim();
    let dst = rhs.trim();
    if src.is_empty() || dst.is_empty() || dst.contains(arrow) {
        return None;
    }
    Some((src, dst))
}
