//! Simulation configuration and execution.

use std::path::Path;

use crate::config::Config;
use crate::controller::SchedulingController;
use crate::engine::{Engine, SimulationEngine};
use crate::error::{ConfigError, Result};
use crate::graph::TaskGraph;
use crate::placement::{default_placement_resolver, PlacementPolicy};
use crate::stats::RunStats;
use crate::trace::TraceIngester;
use crate::unit::{build_pool, ExecutionUnit};

/// Provides a convenient API for configuring and running simulations of task graph execution.
pub struct WorkflowSimulation {
    engine: Engine,
    controller: SchedulingController,
}

impl WorkflowSimulation {
    /// Creates simulation of the graph on the unit pool and placement policy described by the config.
    pub fn new(config: &Config, graph: TaskGraph) -> std::result::Result<Self, ConfigError> {
        let units = build_pool(&config.units);
        let placement = default_placement_resolver(&config.placement, units.len())
            .ok_or_else(|| ConfigError::UnknownPlacement(config.placement.clone()))?;
        Ok(Self::with_placement(units, graph, placement))
    }

    /// Creates simulation with a custom placement policy.
    ///
    /// The policy must track the same number of units as the pool.
    pub fn with_placement(units: Vec<ExecutionUnit>, graph: TaskGraph, placement: Box<dyn PlacementPolicy>) -> Self {
        assert_eq!(
            placement.unit_count(),
            units.len(),
            "placement policy and unit pool sizes differ"
        );
        let mut engine = Engine::new(units);
        engine.provision();
        Self {
            engine,
            controller: SchedulingController::new(graph, placement),
        }
    }

    /// Creates simulation of independent tasks read from the invocation trace.
    pub fn from_trace<P: AsRef<Path>>(config: &Config, path: P) -> Result<Self> {
        let graph = TraceIngester::new(path, config.ingestion())?.into_graph()?;
        Ok(Self::new(config, graph)?)
    }

    /// Delivers the next pending event.
    ///
    /// Returns `false` if there are no pending events.
    pub fn step(&mut self) -> bool {
        match self.engine.next_event() {
            Some(event) => {
                self.controller.on(event, &mut self.engine);
                true
            }
            None => false,
        }
    }

    /// Performs the specified number of steps through the simulation.
    ///
    /// Returns `true` if there could be more pending events and `false` otherwise.
    pub fn steps(&mut self, step_count: u64) -> bool {
        for _ in 0..step_count {
            if !self.step() {
                return false;
            }
        }
        true
    }

    /// Steps through the simulation until there are no pending events left.
    pub fn step_until_no_events(&mut self) {
        while self.step() {}
    }

    /// Steps through the simulation with duration limit.
    ///
    /// Returns `true` if there could be more pending events and `false` otherwise.
    pub fn step_for_duration(&mut self, duration: f64) -> bool {
        let end_time = self.engine.time() + duration;
        loop {
            match self.engine.peek_time() {
                Some(time) if time > end_time => return true,
                Some(_) => {
                    self.step();
                }
                None => return false,
            }
        }
    }

    /// Returns the current simulation time.
    pub fn time(&self) -> f64 {
        self.engine.time()
    }

    /// Returns the total number of created events.
    pub fn event_count(&self) -> u64 {
        self.engine.event_count()
    }

    pub fn controller(&self) -> &SchedulingController {
        &self.controller
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn stats(&self) -> RunStats {
        self.engine.stats()
    }
}
