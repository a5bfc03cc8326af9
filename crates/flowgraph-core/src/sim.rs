//! Simulation time, advance strategy, and state hashing.

use crate::Fixed64;
use serde::{Deserialize, Serialize};

/// Ticks are the atomic unit of simulation time.
pub type Ticks = u64;

// ---------------------------------------------------------------------------
// Advance strategy
// ---------------------------------------------------------------------------

/// How the engine advances time. Chosen at engine construction.
///
/// The simulation itself is cadence-agnostic: the host application owns the
/// loop and calls `advance` with whatever `dt` it has. The strategy only
/// controls how that `dt` maps onto ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SimulationStrategy {
    /// One tick per `advance` call, with `dt` passed straight through.
    Tick,

    /// Real-time mode: elapsed time accumulates and fixed-size ticks run
    /// while it lasts, carrying the remainder forward. Decouples the
    /// simulation cadence from the host's frame rate.
    Delta {
        /// Duration of one fixed tick. Must be positive; a non-positive
        /// value degrades to `Tick` behavior.
        fixed_timestep: Fixed64,
    },
}

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

/// Mutable simulation state tracked by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    /// Current tick counter. Incremented by 1 per tick.
    pub tick: Ticks,

    /// Accumulated time remainder for delta mode. Unused in tick mode.
    pub accumulator: Fixed64,
}

impl SimState {
    pub fn new() -> Self {
        Self {
            tick: 0,
            accumulator: Fixed64::ZERO,
        }
    }
}

impl Default for SimState {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

/// A deterministic hash of simulation state for regression and desync
/// detection. FNV-1a (64-bit); not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    /// Start a new hash.
    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    /// Feed bytes into the hash.
    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    /// Feed a u64 into the hash.
    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    /// Feed a fixed-point value into the hash via its bit pattern.
    pub fn write_fixed64(&mut self, v: Fixed64) {
        self.write(&v.to_bits().to_le_bytes());
    }

    /// Finalize and return the hash value.
    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}
