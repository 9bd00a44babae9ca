//! Scheduling loop.

use enum_iterator::IntoEnumIterator;

use crate::engine::{EngineEvent, SimulationEngine};
use crate::error::Error;
use crate::graph::TaskGraph;
use crate::placement::PlacementPolicy;
use crate::resolver::DependencyResolver;
use crate::task::{Execution, TaskId, TaskState};
use crate::unit::UnitId;
use crate::{log_debug, log_error, log_info, log_warn};

/// Drives task graph execution against a simulation engine.
///
/// Receives every engine event through [`on`](SchedulingController::on). Pool readiness and task completions
/// are intercepted to release and place tasks, all events are also passed to the engine's default handling.
///
/// A fatal error (malformed graph, empty unit pool) halts the controller: no more tasks are submitted and the
/// error is available via [`error`](SchedulingController::error).
pub struct SchedulingController {
    name: String,
    graph: Option<TaskGraph>,
    resolver: DependencyResolver,
    placement: Box<dyn PlacementPolicy>,
    drained: bool,
    error: Option<Error>,
}

impl SchedulingController {
    pub fn new(graph: TaskGraph, placement: Box<dyn PlacementPolicy>) -> Self {
        Self {
            name: "controller".to_string(),
            graph: Some(graph),
            resolver: DependencyResolver::new(),
            placement,
            drained: false,
            error: None,
        }
    }

    /// Processes a single engine event.
    pub fn on<E: SimulationEngine>(&mut self, event: EngineEvent, engine: &mut E) {
        match event {
            EngineEvent::UnitsReady => {
                engine.handle_default(EngineEvent::UnitsReady);
                self.on_units_ready(engine);
            }
            EngineEvent::TaskCompleted { task_id, unit } => {
                engine.handle_default(EngineEvent::TaskCompleted { task_id, unit });
                self.on_task_completed(task_id, engine);
            }
            other => engine.handle_default(other),
        }
    }

    fn on_units_ready<E: SimulationEngine>(&mut self, engine: &mut E) {
        if self.is_halted() {
            return;
        }
        if let Some(graph) = self.graph.take() {
            let task_count = graph.len();
            if let Err(e) = self.resolver.initialize(graph) {
                log_error!(engine.time(), self.name.as_str(), "failed to initialize task graph: {}", e);
                self.error = Some(e.into());
                return;
            }
            log_info!(
                engine.time(),
                self.name.as_str(),
                "started DAG with {} tasks on {} units",
                task_count,
                self.placement.unit_count()
            );
        }
        self.submit_ready(engine);
        self.check_drained(engine.time());
    }

    fn on_task_completed<E: SimulationEngine>(&mut self, task_id: TaskId, engine: &mut E) {
        if self.is_halted() || !self.resolver.is_initialized() {
            log_warn!(
                engine.time(),
                self.name.as_str(),
                "completion of task {} is ignored, scheduling is not running",
                task_id
            );
            return;
        }
        // only the first completion of a submitted task releases its unit
        if self.resolver.state(task_id) == Some(TaskState::Submitted) {
            if let Some(execution) = self.resolver.task(task_id).and_then(|task| task.execution()) {
                self.placement.release(execution.unit);
            }
        }
        let released = self.resolver.on_completion(task_id);
        log_debug!(
            engine.time(),
            self.name.as_str(),
            "task {} completed, {} tasks became ready",
            task_id,
            released.len()
        );
        self.submit_ready(engine);
        self.check_drained(engine.time());
    }

    fn submit_ready<E: SimulationEngine>(&mut self, engine: &mut E) {
        while let Some(task) = self.resolver.peek_ready() {
            let unit = match self.placement.assign(task) {
                Ok(unit) => unit,
                Err(e) => {
                    log_error!(engine.time(), self.name.as_str(), "failed to place task {}: {}", task.id, e);
                    self.error = Some(e.into());
                    return;
                }
            };
            let time = engine.time();
            if let Some(task) = self.resolver.next_ready() {
                task.set_execution(Execution {
                    unit,
                    submitted_at: time,
                });
                log_debug!(time, self.name.as_str(), "submitted task {} to unit {}", task.id, unit);
                engine.submit(task.descriptor(), unit);
            }
        }
    }

    fn check_drained(&mut self, time: f64) {
        if !self.drained && self.resolver.is_drained() {
            self.drained = true;
            log_info!(time, self.name.as_str(), "finished DAG");
        }
    }

    /// Returns true once every task of the graph is completed.
    pub fn is_drained(&self) -> bool {
        self.drained
    }

    pub fn is_halted(&self) -> bool {
        self.error.is_some()
    }

    /// Returns the fatal error that halted the controller, if any.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Returns a copy of the current per-unit load.
    pub fn loads(&self) -> Vec<u64> {
        self.placement.loads()
    }

    pub fn placement_name(&self) -> String {
        self.placement.get_name()
    }

    pub fn unit_of(&self, task_id: TaskId) -> Option<UnitId> {
        self.resolver
            .task(task_id)
            .and_then(|task| task.execution())
            .map(|execution| execution.unit)
    }

    pub fn resolver(&self) -> &DependencyResolver {
        &self.resolver
    }

    /// Logs an error with the number of tasks in each state if the graph is not completed.
    pub fn validate_completed(&self, time: f64) {
        if !self.is_drained() {
            let mut states: Vec<String> = Vec::new();
            for task_state in TaskState::into_enum_iter() {
                let cnt = self.resolver.count_in_state(task_state);
                if cnt != 0 {
                    states.push(format!("{} {:?}", cnt, task_state));
                }
            }
            log_error!(time, self.name.as_str(), "DAG is not completed, currently {} tasks", states.join(", "));
        }
    }
}
