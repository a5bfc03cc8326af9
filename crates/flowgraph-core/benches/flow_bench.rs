//! Criterion benchmarks for the flow simulation.
//!
//! Two benchmark groups:
//! - `chain`: one long pipeline, items in steady flow -- measures the
//!   per-node tick cost with minimal fan-out.
//! - `fan`: many sources feeding shared sinks -- measures the round-robin
//!   scan cost under contention.

use criterion::{Criterion, criterion_group, criterion_main};
use flowgraph_core::Fixed64;
use flowgraph_core::engine::Engine;
use flowgraph_core::flow::FlowConfig;
use flowgraph_core::id::NodeId;
use flowgraph_core::sim::SimulationStrategy;
use flowgraph_core::test_utils::fixed;

/// Build a single chain of `len` nodes with an item seeded every fourth
/// node.
fn build_chain(len: usize) -> Engine {
    let text: String = (0..len - 1)
        .map(|i| format!("n{i} -> n{}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    let (mut engine, _) =
        Engine::from_edge_list(&text, FlowConfig::default(), SimulationStrategy::Tick).unwrap();

    let ids: Vec<NodeId> = engine.graph().node_ids().collect();
    for id in ids.iter().step_by(4) {
        engine.seed(*id, fixed(0.5)).unwrap();
    }
    // Warm up so queues are in steady flow.
    for _ in 0..8 {
        engine.step(Fixed64::ONE);
    }
    engine
}

/// Build `sources` chains of length 3 all converging on a pair of sinks.
fn build_fan(sources: usize) -> Engine {
    let mut lines = Vec::new();
    for i in 0..sources {
        lines.push(format!("src{i} -> mid{i}"));
        lines.push(format!("mid{i} -> sinkA"));
        lines.push(format!("mid{i} -> sinkB"));
    }
    let text = lines.join("\n");
    let (mut engine, _) =
        Engine::from_edge_list(&text, FlowConfig::default(), SimulationStrategy::Tick).unwrap();

    let ids: Vec<NodeId> = engine.graph().node_ids().collect();
    for id in ids {
        engine.seed(id, fixed(0.75)).unwrap();
    }
    engine
}

fn bench_chain(c: &mut Criterion) {
    let mut engine = build_chain(1000);
    c.bench_function("chain_1000_step", |b| {
        b.iter(|| engine.step(fixed(0.1)));
    });
}

fn bench_fan(c: &mut Criterion) {
    let mut engine = build_fan(200);
    c.bench_function("fan_200_step", |b| {
        b.iter(|| engine.step(fixed(0.1)));
    });
}

fn bench_analysis(c: &mut Criterion) {
    let engine = build_chain(1000);
    c.bench_function("chain_1000_regions_and_topology", |b| {
        b.iter(|| engine.topology());
    });
}

criterion_group!(benches, bench_chain, bench_fan, bench_analysis);
criterion_main!(benches);
