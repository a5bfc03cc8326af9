//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these are
//! available to in-crate tests directly and to downstream test crates via
//! the `test-utils` feature.

use crate::Fixed64;
use crate::engine::Engine;
use crate::flow::FlowConfig;
use crate::graph::FlowGraph;
use crate::id::NodeId;
use crate::sim::SimulationStrategy;

/// Fixed-point shorthand for test literals.
pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Parse an edge list, panicking on any malformed line.
pub fn graph_from(text: &str) -> FlowGraph {
    let (graph, report) = FlowGraph::parse(text).expect("edge list should parse");
    assert!(
        report.skipped.is_empty(),
        "unexpected skipped lines: {:?}",
        report.skipped
    );
    graph
}

/// Look up a node by label, panicking when absent.
pub fn node(graph: &FlowGraph, label: &str) -> NodeId {
    graph
        .node_by_name(label)
        .unwrap_or_else(|| panic!("no node labelled {label:?}"))
}

/// Build a tick-strategy engine with default flow config.
pub fn engine_from(text: &str) -> Engine {
    engine_with(text, FlowConfig::default())
}

/// Build a tick-strategy engine with an explicit flow config.
pub fn engine_with(text: &str, config: FlowConfig) -> Engine {
    let (engine, report) =
        Engine::from_edge_list(text, config, SimulationStrategy::Tick)
            .expect("edge list should parse");
    assert!(
        report.skipped.is_empty(),
        "unexpected skipped lines: {:?}",
        report.skipped
    );
    engine
}

/// A flow config with explicit speed and spacing, default epsilon.
pub fn spacing_config(speed: f64, min_spacing: f64) -> FlowConfig {
    FlowConfig {
        speed: fixed(speed),
        min_spacing: fixed(min_spacing),
        ..FlowConfig::default()
    }
}
