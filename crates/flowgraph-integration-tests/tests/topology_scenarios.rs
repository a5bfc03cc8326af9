//! End-to-end analysis scenarios: build a graph from edge text, detect
//! regions, and order them, checking the documented whole-pipeline
//! outcomes rather than individual component behavior.

use flowgraph_core::region::regions;
use flowgraph_core::test_utils::*;
use flowgraph_core::topo::{SortOutcome, sort, sort_all};

// ============================================================================
// Scenario 1: a six-node loop
// ============================================================================

/// A chain that closes back on itself: every node has out-degree 1, so
/// there is no sink to peel from. The build succeeds, the whole graph is
/// one region, and the sort reports the region unsortable -- explicitly,
/// not as an empty-region ambiguity.
#[test]
fn six_node_cycle_is_one_unsortable_region() {
    let text = "start -> 0\n0 -> 1\n1 -> A\nA -> B\nB -> C\nC -> 0";
    let graph = graph_from(text);
    assert_eq!(graph.node_count(), 6);

    let set = regions(&graph);
    assert!(set.complete);
    assert_eq!(set.regions.len(), 1);
    assert_eq!(set.regions[0].len(), 6);

    let topo = sort(&set.regions[0], &graph);
    assert_eq!(topo.outcome, SortOutcome::NoSink);
    assert!(topo.order.is_empty());
}

// ============================================================================
// Scenario 2: a pure DAG
// ============================================================================

/// An acyclic fan with a single sink. The order must start at the sink
/// (C, the only node with no outgoing edges) and place the source A
/// strictly after both of its fan-out targets B and D.
#[test]
fn dag_sorts_completely_sink_first() {
    let text = "A -> B\nA -> C\nA -> D\nD -> B\nB -> C";
    let graph = graph_from(text);
    assert_eq!(graph.node_count(), 4);

    let set = regions(&graph);
    assert_eq!(set.regions.len(), 1);
    assert_eq!(set.regions[0].len(), 4);

    let topo = sort(&set.regions[0], &graph);
    assert_eq!(topo.outcome, SortOutcome::Complete);
    assert_eq!(topo.order.len(), 4);
    assert_eq!(topo.order[0], node(&graph, "C"));

    let pos = |label: &str| {
        let id = node(&graph, label);
        topo.order.iter().position(|&n| n == id).unwrap()
    };
    assert!(pos("A") > pos("B"));
    assert!(pos("A") > pos("D"));
}

// ============================================================================
// Scenario 3: mixed graph, partial order
// ============================================================================

/// A loop with a drain: the sink and its feed peel off, the loop itself
/// remains unordered. The caller recognizes incompleteness by comparing
/// the order's length against the region's.
#[test]
fn loop_with_drain_yields_partial_order() {
    let text = "A -> B\nB -> C\nC -> A\nC -> out";
    let graph = graph_from(text);

    let set = regions(&graph);
    assert_eq!(set.regions.len(), 1);

    let topo = sort(&set.regions[0], &graph);
    assert_eq!(topo.outcome, SortOutcome::Partial);
    assert!(topo.order.len() < set.regions[0].len());
    assert_eq!(topo.order[0], node(&graph, "out"));
}

// ============================================================================
// Scenario 4: several independent subsystems
// ============================================================================

/// Disconnected subgraphs analyze independently: each gets its own
/// region and its own verdict.
#[test]
fn independent_components_get_independent_verdicts() {
    let text = "a1 -> a2\na2 -> a3\nb1 -> b2\nb2 -> b1\nc1 -> c2";
    let graph = graph_from(text);

    let set = regions(&graph);
    assert!(set.complete);
    assert_eq!(set.regions.len(), 3);
    assert_eq!(set.total_nodes(), 7);

    let results = sort_all(&set, &graph);
    let outcome_of = |label: &str| {
        let id = node(&graph, label);
        &results
            .iter()
            .find(|r| r.region.contains(id))
            .unwrap()
            .topology
    };

    assert_eq!(outcome_of("a1").outcome, SortOutcome::Complete);
    assert_eq!(outcome_of("b1").outcome, SortOutcome::NoSink);
    assert_eq!(outcome_of("c1").outcome, SortOutcome::Complete);
}

// ============================================================================
// Scenario 5: malformed input survives the whole pipeline
// ============================================================================

/// Lenient parsing drops garbage lines and the analysis still runs over
/// what remains.
#[test]
fn garbage_lines_do_not_poison_analysis() {
    let text = "A -> B\n<<noise>>\nB -> C\nnot an edge at all";
    let (graph, report) = flowgraph_core::graph::FlowGraph::parse(text).unwrap();
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(graph.node_count(), 3);

    let set = regions(&graph);
    assert_eq!(set.regions.len(), 1);
    let topo = sort(&set.regions[0], &graph);
    assert_eq!(topo.outcome, SortOutcome::Complete);
}
