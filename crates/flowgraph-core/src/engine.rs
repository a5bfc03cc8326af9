//! The engine: owns the graph, the flow simulator, and simulation state,
//! and orchestrates ticking, analysis, and queries.
//!
//! # Architecture
//!
//! The `Engine` owns:
//! - A [`FlowGraph`] (the node registry, built from an edge list)
//! - A [`FlowSim`] (per-node queues and round-robin cursors)
//! - A [`SimState`] (tick counter, delta accumulator)
//! - A [`SimulationStrategy`] (tick vs. delta)
//!
//! Each tick runs the simulator's three flow phases over every node, then
//! bookkeeping: increment the tick counter and recompute the state hash.
//! Region detection and topological ordering are on-demand analysis views,
//! invoked out-of-band from ticking; they read the same registry the tick
//! loop does but never run as part of it.

use crate::Fixed64;
use crate::flow::{FlowConfig, FlowSim};
use crate::graph::{FlowGraph, GraphError, ParseError, ParseOptions, ParseReport};
use crate::id::NodeId;
use crate::query::NodeSnapshot;
use crate::region::{self, RegionSet};
use crate::sim::{SimState, SimulationStrategy, StateHash, Ticks};
use crate::topo::{self, RegionTopology};

/// The simulation engine.
#[derive(Debug, Clone)]
pub struct Engine {
    pub(crate) graph: FlowGraph,
    pub(crate) flow: FlowSim,
    pub(crate) strategy: SimulationStrategy,
    pub(crate) sim_state: SimState,
    pub(crate) paused: bool,
    pub(crate) last_state_hash: u64,
}

impl Engine {
    /// Build an engine from an edge list with default parse options.
    pub fn from_edge_list(
        text: &str,
        config: FlowConfig,
        strategy: SimulationStrategy,
    ) -> Result<(Self, ParseReport), ParseError> {
        Self::from_edge_list_with(text, &ParseOptions::default(), config, strategy)
    }

    /// Build an engine from an edge list.
    pub fn from_edge_list_with(
        text: &str,
        options: &ParseOptions,
        config: FlowConfig,
        strategy: SimulationStrategy,
    ) -> Result<(Self, ParseReport), ParseError> {
        let (graph, report) = FlowGraph::parse_with(text, options)?;
        Ok((Self::from_parts(graph, config, strategy), report))
    }

    /// Assemble an engine around an already-built graph.
    pub fn from_parts(
        graph: FlowGraph,
        config: FlowConfig,
        strategy: SimulationStrategy,
    ) -> Self {
        let mut flow = FlowSim::new(config);
        flow.reset(&graph);
        let mut engine = Self {
            graph,
            flow,
            strategy,
            sim_state: SimState::new(),
            paused: false,
            last_state_hash: 0,
        };
        engine.last_state_hash = engine.compute_state_hash();
        engine
    }

    /// Reassemble an engine from snapshot parts, recomputing the hash.
    pub(crate) fn from_snapshot_parts(
        graph: FlowGraph,
        flow: FlowSim,
        strategy: SimulationStrategy,
        sim_state: SimState,
        paused: bool,
    ) -> Self {
        let mut engine = Self {
            graph,
            flow,
            strategy,
            sim_state,
            paused,
            last_state_hash: 0,
        };
        engine.last_state_hash = engine.compute_state_hash();
        engine
    }

    // -----------------------------------------------------------------------
    // Ticking
    // -----------------------------------------------------------------------

    /// Advance the simulation by one tick of duration `dt`.
    ///
    /// `dt` is a non-negative duration; negative input is treated as zero.
    /// A paused engine holds state.
    pub fn step(&mut self, dt: Fixed64) {
        if self.paused {
            return;
        }
        self.flow.step(&self.graph, dt);
        self.sim_state.tick += 1;
        self.last_state_hash = self.compute_state_hash();
    }

    /// Advance by elapsed time according to the strategy. Returns the
    /// number of ticks run.
    pub fn advance(&mut self, dt: Fixed64) -> u64 {
        if self.paused {
            return 0;
        }
        match self.strategy.clone() {
            SimulationStrategy::Tick => {
                self.step(dt);
                1
            }
            SimulationStrategy::Delta { fixed_timestep } => {
                if fixed_timestep <= Fixed64::ZERO {
                    self.step(dt);
                    return 1;
                }
                self.sim_state.accumulator += dt.max(Fixed64::ZERO);
                let mut steps = 0;
                while self.sim_state.accumulator >= fixed_timestep {
                    self.sim_state.accumulator -= fixed_timestep;
                    self.step(fixed_timestep);
                    steps += 1;
                }
                steps
            }
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // -----------------------------------------------------------------------
    // Graph lifecycle
    // -----------------------------------------------------------------------

    /// Replace the graph wholesale from a new edge list.
    ///
    /// Queues and cursors are dropped and re-created; previous `NodeId`s
    /// go stale and fail lookups. The tick counter is preserved -- time
    /// does not restart with the graph. On a strict-mode parse error the
    /// engine is left untouched.
    pub fn rebuild(&mut self, text: &str) -> Result<ParseReport, ParseError> {
        self.rebuild_with(text, &ParseOptions::default())
    }

    /// Replace the graph wholesale, with explicit parse options.
    pub fn rebuild_with(
        &mut self,
        text: &str,
        options: &ParseOptions,
    ) -> Result<ParseReport, ParseError> {
        let report = self.graph.rebuild_from(text, options)?;
        self.flow.reset(&self.graph);
        self.last_state_hash = self.compute_state_hash();
        Ok(report)
    }

    /// Inject an item into a node's queue.
    pub fn seed(&mut self, node: NodeId, dist: Fixed64) -> Result<(), GraphError> {
        self.flow.seed(node, dist)?;
        self.last_state_hash = self.compute_state_hash();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Analysis (on demand, never per tick)
    // -----------------------------------------------------------------------

    /// Partition the graph into weakly-connected regions.
    pub fn regions(&self) -> RegionSet {
        region::regions(&self.graph)
    }

    /// Regions paired with their sinks-first topological orders.
    pub fn topology(&self) -> Vec<RegionTopology> {
        topo::sort_all(&self.regions(), &self.graph)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The node registry.
    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    /// The flow simulator (queues and config).
    pub fn flow(&self) -> &FlowSim {
        &self.flow
    }

    /// All nodes as `(id, label)` pairs in creation order.
    pub fn list_nodes(&self) -> Vec<(NodeId, &str)> {
        self.graph.list_nodes()
    }

    /// An owned, aggregated view of one node.
    pub fn node_snapshot(&self, id: NodeId) -> Result<NodeSnapshot, GraphError> {
        let (predecessors, successors) = self.graph.relations(id)?;
        Ok(NodeSnapshot {
            id,
            name: self.graph.name(id).unwrap_or_default().to_string(),
            predecessors: predecessors.to_vec(),
            successors: successors.to_vec(),
            queue: self.flow.positions(id),
        })
    }

    /// Current tick counter.
    pub fn tick(&self) -> Ticks {
        self.sim_state.tick
    }

    /// The most recently computed state hash.
    pub fn state_hash(&self) -> u64 {
        self.last_state_hash
    }

    fn compute_state_hash(&self) -> u64 {
        let mut hash = StateHash::new();
        hash.write_u64(self.sim_state.tick);
        self.flow.write_state(&self.graph, &mut hash);
        hash.finish()
    }
}
