//! Cycle-tolerant topological ordering, sinks first.
//!
//! Kahn's algorithm run per region, peeling on successor degree: nodes
//! with no outgoing edges come first, and a node is emitted once every
//! node it points to has been emitted. Cycles are diagnostic, never fatal:
//! a region with no sink yields an empty order with a reason, and a cycle
//! reachable from a sink leaves a shorter-than-region partial order.

use crate::graph::FlowGraph;
use crate::guard::{IterationGuard, SORT_BUDGET};
use crate::id::NodeId;
use crate::region::{Region, RegionSet};
use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;
use std::collections::VecDeque;

/// How a sort attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOutcome {
    /// Every node in the region was ordered.
    Complete,
    /// The region has no zero-out-degree node to peel from (a pure
    /// cycle). The order is empty; the region is not.
    NoSink,
    /// Peeling stalled before covering the region: a cycle remains. The
    /// partial order is still valid for the nodes it contains.
    Partial,
    /// The iteration budget ran out; the order is a prefix.
    Truncated,
}

/// A sinks-first ordering of one region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topology {
    pub order: Vec<NodeId>,
    pub outcome: SortOutcome,
}

impl Topology {
    pub fn is_complete(&self) -> bool {
        self.outcome == SortOutcome::Complete
    }
}

/// A region paired with its sort result.
#[derive(Debug, Clone)]
pub struct RegionTopology {
    pub region: Region,
    pub topology: Topology,
}

/// Sort one region with the default iteration budget.
pub fn sort(region: &Region, graph: &FlowGraph) -> Topology {
    sort_with_budget(region, graph, IterationGuard::new(SORT_BUDGET))
}

/// Sort one region, sinks first.
///
/// Out-degree is the successor count as stored; successors only ever
/// reference graph-internal nodes, and every neighbor of a region member
/// lies in the same region, so no in-region restriction is needed.
pub fn sort_with_budget(region: &Region, graph: &FlowGraph, mut guard: IterationGuard) -> Topology {
    if region.is_empty() {
        return Topology {
            order: Vec::new(),
            outcome: SortOutcome::Complete,
        };
    }

    let mut degree: SecondaryMap<NodeId, usize> = SecondaryMap::new();
    for &id in &region.nodes {
        degree.insert(id, graph.successors(id).len());
    }

    let mut frontier: VecDeque<NodeId> = VecDeque::new();
    for &id in &region.nodes {
        if degree[id] == 0 {
            frontier.push_back(id);
        }
    }
    if frontier.is_empty() {
        return Topology {
            order: Vec::new(),
            outcome: SortOutcome::NoSink,
        };
    }

    let mut order: Vec<NodeId> = Vec::with_capacity(region.len());
    while let Some(node) = frontier.pop_front() {
        if !guard.tick() {
            break;
        }
        order.push(node);
        for &pred in graph.predecessors(node) {
            if let Some(deg) = degree.get_mut(pred) {
                *deg -= 1;
                if *deg == 0 {
                    frontier.push_back(pred);
                }
            }
        }
    }

    let outcome = if guard.exceeded() {
        SortOutcome::Truncated
    } else if order.len() < region.len() {
        SortOutcome::Partial
    } else {
        SortOutcome::Complete
    };

    Topology { order, outcome }
}

/// Sort every region of a set, pairing each with its result.
pub fn sort_all(set: &RegionSet, graph: &FlowGraph) -> Vec<RegionTopology> {
    set.regions
        .iter()
        .map(|region| RegionTopology {
            region: region.clone(),
            topology: sort(region, graph),
        })
        .collect()
}
