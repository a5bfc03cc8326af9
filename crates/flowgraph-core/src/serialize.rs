//! Versioned engine snapshots.
//!
//! A snapshot is an in-memory byte buffer; where it goes (disk, network,
//! nowhere) is the caller's business. The envelope carries a version field
//! checked on restore, so a stale buffer fails loudly instead of decoding
//! into nonsense.

use crate::engine::Engine;
use crate::flow::FlowSim;
use crate::graph::FlowGraph;
use crate::sim::{SimState, SimulationStrategy};
use serde::{Deserialize, Serialize};

/// Current snapshot format version. Bump on any envelope layout change.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors at the snapshot boundary.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot encode failed: {0}")]
    Encode(bitcode::Error),
    #[error("snapshot decode failed: {0}")]
    Decode(bitcode::Error),
    #[error("snapshot version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    graph: FlowGraph,
    flow: FlowSim,
    strategy: SimulationStrategy,
    sim_state: SimState,
    paused: bool,
}

/// Serialize the engine's full state.
pub fn snapshot(engine: &Engine) -> Result<Vec<u8>, SnapshotError> {
    let envelope = Envelope {
        version: SNAPSHOT_VERSION,
        graph: engine.graph.clone(),
        flow: engine.flow.clone(),
        strategy: engine.strategy.clone(),
        sim_state: engine.sim_state.clone(),
        paused: engine.paused,
    };
    bitcode::serialize(&envelope).map_err(SnapshotError::Encode)
}

/// Rebuild an engine from snapshot bytes. The state hash is recomputed,
/// so a round-trip preserves it.
pub fn restore(bytes: &[u8]) -> Result<Engine, SnapshotError> {
    let envelope: Envelope = bitcode::deserialize(bytes).map_err(SnapshotError::Decode)?;
    if envelope.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::VersionMismatch {
            found: envelope.version,
            expected: SNAPSHOT_VERSION,
        });
    }
    Ok(Engine::from_snapshot_parts(
        envelope.graph,
        envelope.flow,
        envelope.strategy,
        envelope.sim_state,
        envelope.paused,
    ))
}
