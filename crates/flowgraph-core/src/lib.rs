//! Flowgraph Core -- a steppable item-flow simulation over directed graphs
//! built from textual edge lists.
//!
//! The crate is a pure in-memory model: it does not render, lay out, or
//! perform I/O. A host application builds a graph from `SRC -> DST` lines,
//! drives the simulation with its own loop, and reads state back through
//! owned snapshot views.
//!
//! # Three-Phase Tick
//!
//! Each call to [`engine::Engine::step`] visits every node once and runs
//! three phases per node, in order, against queue state as already mutated
//! that tick:
//!
//! 1. **Head transfer** -- the queue head advances along the node, or
//!    crosses into a successor chosen round-robin, subject to minimum
//!    spacing against the successor's tail.
//! 2. **Internal slide** -- trailing items advance behind their in-queue
//!    leader under the spacing predicate.
//! 3. **Upstream acceptance** -- the node admits at most one boundary-
//!    crossing head from a predecessor chosen round-robin.
//!
//! # Analysis
//!
//! Region detection ([`region::regions`]) and cycle-tolerant sinks-first
//! topological ordering ([`topo::sort`]) are on-demand derived views. Both
//! are wrapped in [`guard::IterationGuard`] budgets so ad hoc graph text
//! can never hang the process; exhausting a budget yields a flagged
//! partial result, not an error.
//!
//! # Key Types
//!
//! - [`engine::Engine`] -- owns everything, orchestrates ticking.
//! - [`graph::FlowGraph`] -- node registry with mirrored adjacency.
//! - [`flow::FlowSim`] -- per-node item queues and round-robin cursors.
//! - [`region::RegionSet`] / [`topo::Topology`] -- analysis results.
//! - [`sim::StateHash`] -- deterministic FNV-1a state fingerprint.
//! - [`serialize`] -- versioned snapshots via bitcode.

pub mod engine;
pub mod flow;
pub mod graph;
pub mod guard;
pub mod id;
pub mod query;
pub mod region;
pub mod serialize;
pub mod sim;
pub mod topo;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

/// Q32.32 fixed-point. Every position, speed, spacing, and time delta in
/// the simulation uses this type; `f64` belongs only at construction and
/// display boundaries.
pub type Fixed64 = fixed::types::I32F32;
