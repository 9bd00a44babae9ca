//! Simulation engine.
//!
//! A discrete-event kernel that provisions execution units, runs submitted tasks on them and reports completions.
//! The scheduling core talks to it only through the [`SimulationEngine`] trait.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use log::Level::Trace;
use log::log_enabled;
use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::json;

use crate::stats::RunStats;
use crate::task::{TaskDescriptor, TaskId};
use crate::unit::{ExecutionUnit, UnitId};
use crate::{log_debug, log_error, log_info, log_trace};

pub type EventId = u64;

/// Engine lifecycle events.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum EngineEvent {
    /// The unit is provisioned and can run tasks.
    UnitProvisioned { unit: UnitId },
    /// All units are provisioned.
    UnitsReady,
    /// The submitted task reached its unit (not earlier than its submission offset).
    TaskArrived { task: TaskDescriptor, unit: UnitId },
    /// The task has finished on the unit.
    TaskCompleted { task_id: TaskId, unit: UnitId },
}

/// Engine interface consumed by the scheduling controller.
pub trait SimulationEngine {
    /// Returns the current simulation time.
    fn time(&self) -> f64;

    /// Hands the task to the engine for execution on the unit.
    fn submit(&mut self, task: TaskDescriptor, unit: UnitId);

    /// Applies the engine's own processing of the event.
    fn handle_default(&mut self, event: EngineEvent);
}

pub struct ScheduledEvent {
    pub id: EventId,
    pub time: f64,
    pub event: EngineEvent,
}

impl Eq for ScheduledEvent {}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        other.time.total_cmp(&self.time).then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Execution record of a submitted task.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct TaskRecord {
    pub task_id: TaskId,
    pub unit: UnitId,
    /// Number of unit cores held by the task while running.
    pub cores: u32,
    pub arrived: f64,
    pub started: Option<f64>,
    pub finished: Option<f64>,
}

struct UnitState {
    unit: ExecutionUnit,
    free_cores: u32,
    queue: VecDeque<TaskDescriptor>,
}

impl UnitState {
    fn cores_needed(&self, task: &TaskDescriptor) -> u32 {
        task.cores.max(1).min(self.unit.cores.max(1))
    }

    fn duration(&self, task: &TaskDescriptor) -> f64 {
        task.length as f64 / self.unit.speed.max(1) as f64
    }
}

/// Event-driven engine running tasks on a fixed pool of units.
///
/// Each unit runs tasks concurrently as long as it has free cores and queues the rest in FIFO order.
/// Task duration is `length / speed` of the unit.
pub struct Engine {
    name: String,
    clock: f64,
    events: BinaryHeap<ScheduledEvent>,
    event_count: u64,
    units: Vec<UnitState>,
    provisioned: usize,
    records: FxHashMap<TaskId, TaskRecord>,
}

impl Engine {
    pub fn new(units: Vec<ExecutionUnit>) -> Self {
        let units = units
            .into_iter()
            .map(|unit| UnitState {
                free_cores: unit.cores,
                unit,
                queue: VecDeque::new(),
            })
            .collect();
        Self {
            name: "engine".to_string(),
            clock: 0.,
            events: BinaryHeap::new(),
            event_count: 0,
            units,
            provisioned: 0,
            records: FxHashMap::default(),
        }
    }

    /// Starts provisioning of all units. `UnitsReady` follows the last provisioned unit.
    pub fn provision(&mut self) {
        if self.units.is_empty() {
            self.emit(EngineEvent::UnitsReady, 0.);
            return;
        }
        for unit in 0..self.units.len() {
            self.emit(EngineEvent::UnitProvisioned { unit }, 0.);
        }
    }

    pub fn emit(&mut self, event: EngineEvent, delay: f64) -> EventId {
        let id = self.event_count;
        self.events.push(ScheduledEvent {
            id,
            time: self.clock + delay,
            event,
        });
        self.event_count += 1;
        id
    }

    /// Removes the earliest event from the queue and advances the clock to its time.
    pub fn next_event(&mut self) -> Option<EngineEvent> {
        let next = self.events.pop()?;
        self.clock = next.time;
        if log_enabled!(Trace) {
            log_trace!(self.clock, self.name.as_str(), json!(&next.event));
        }
        Some(next.event)
    }

    pub fn peek_time(&self) -> Option<f64> {
        self.events.peek().map(|e| e.time)
    }

    /// Returns the total number of created events.
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn unit(&self, id: UnitId) -> Option<&ExecutionUnit> {
        self.units.get(id).map(|state| &state.unit)
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn record(&self, task_id: TaskId) -> Option<&TaskRecord> {
        self.records.get(&task_id)
    }

    pub fn records(&self) -> impl Iterator<Item = &TaskRecord> + '_ {
        self.records.values()
    }

    pub fn stats(&self) -> RunStats {
        let mut stats = RunStats {
            tasks_per_unit: vec![0; self.units.len()],
            ..Default::default()
        };
        for record in self.records.values() {
            if let (Some(started), Some(finished)) = (record.started, record.finished) {
                stats.completed_tasks += 1;
                stats.makespan = stats.makespan.max(finished);
                stats.execution_time.add(finished - started);
                stats.waiting_time.add(started - record.arrived);
                stats.tasks_per_unit[record.unit] += 1;
            }
        }
        stats
    }

    fn on_unit_provisioned(&mut self, unit: UnitId) {
        self.provisioned += 1;
        log_debug!(
            self.clock,
            self.name.as_str(),
            "provisioned unit {} ({}/{})",
            unit,
            self.provisioned,
            self.units.len()
        );
        if self.provisioned == self.units.len() {
            self.emit(EngineEvent::UnitsReady, 0.);
        }
    }

    fn on_task_arrived(&mut self, task: TaskDescriptor, unit: UnitId) {
        self.records.insert(
            task.task_id,
            TaskRecord {
                task_id: task.task_id,
                unit,
                cores: 0,
                arrived: self.clock,
                started: None,
                finished: None,
            },
        );
        self.units[unit].queue.push_back(task);
        self.start_queued(unit);
    }

    fn start_queued(&mut self, unit: UnitId) {
        let mut started = Vec::new();
        {
            let state = &mut self.units[unit];
            while let Some(task) = state.queue.front() {
                let cores = state.cores_needed(task);
                if state.free_cores < cores {
                    break;
                }
                state.free_cores -= cores;
                let duration = state.duration(task);
                started.push((task.task_id, duration, cores));
                state.queue.pop_front();
            }
        }
        for (task_id, duration, cores) in started {
            if let Some(record) = self.records.get_mut(&task_id) {
                record.started = Some(self.clock);
                record.cores = cores;
            }
            log_debug!(
                self.clock,
                self.name.as_str(),
                "started task {} on unit {} for {:.3}",
                task_id,
                unit,
                duration
            );
            self.emit(EngineEvent::TaskCompleted { task_id, unit }, duration);
        }
    }

    fn on_task_completed(&mut self, task_id: TaskId, unit: UnitId) {
        let cores = match self.records.get_mut(&task_id) {
            Some(record) if record.started.is_some() && record.finished.is_none() => {
                record.finished = Some(self.clock);
                record.cores
            }
            _ => {
                log_error!(self.clock, self.name.as_str(), "unexpected completion of task {}", task_id);
                return;
            }
        };
        self.units[unit].free_cores += cores;
        self.start_queued(unit);
    }
}

impl SimulationEngine for Engine {
    fn time(&self) -> f64 {
        self.clock
    }

    fn submit(&mut self, task: TaskDescriptor, unit: UnitId) {
        if unit >= self.units.len() {
            log_error!(
                self.clock,
                self.name.as_str(),
                "task {} is submitted to unknown unit {}",
                task.task_id,
                unit
            );
            return;
        }
        let delay = (task.submission_offset - self.clock).max(0.);
        self.emit(EngineEvent::TaskArrived { task, unit }, delay);
    }

    fn handle_default(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::UnitProvisioned { unit } => self.on_unit_provisioned(unit),
            EngineEvent::UnitsReady => {
                log_info!(self.clock, self.name.as_str(), "all {} units are ready", self.units.len());
            }
            EngineEvent::TaskArrived { task, unit } => self.on_task_arrived(task, unit),
            EngineEvent::TaskCompleted { task_id, unit } => self.on_task_completed(task_id, unit),
        }
    }
}
