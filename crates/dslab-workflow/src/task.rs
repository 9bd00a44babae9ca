//! Workflow task.

use enum_iterator::IntoEnumIterator;
use serde::Serialize;

use crate::unit::UnitId;

pub type TaskId = usize;

/// Represents a task lifecycle state.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Serialize, IntoEnumIterator)]
pub enum TaskState {
    /// Waiting for its predecessors to complete.
    Blocked,
    /// All predecessors are completed, waiting for placement.
    Ready,
    /// Task is placed on a unit and handed to the engine.
    Submitted,
    /// Task is completed.
    Completed,
}

/// Resource demands of a task derived by a cost model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskCost {
    /// Estimated runtime in time units.
    pub runtime: u64,
    /// Memory demand in MB.
    pub memory: u64,
    /// Number of execution slots (cores) used by the task.
    pub cores: u32,
    /// The amount of computations, i.e. runtime multiplied by the reference rating.
    pub length: u64,
}

impl TaskCost {
    /// Creates a single-slot cost with length computed as `runtime * rating`.
    pub fn single_slot(runtime: u64, memory: u64, rating: u64) -> Self {
        Self {
            runtime,
            memory,
            cores: 1,
            length: runtime.saturating_mul(rating),
        }
    }
}

/// Records where and when a task was submitted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Execution {
    pub unit: UnitId,
    pub submitted_at: f64,
}

/// Immutable copy of task attributes handed to the simulation engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TaskDescriptor {
    pub task_id: TaskId,
    pub length: u64,
    pub cores: u32,
    pub memory: u64,
    pub submission_offset: f64,
}

/// Represents a workflow task.
///
/// Tasks are created by trace ingestion or by a generator and are never removed during a run.
/// Dependencies between tasks are stored by [`TaskGraph`](crate::graph::TaskGraph), not by the task itself.
#[derive(Clone, Debug)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    /// Input (complexity) parameter.
    pub input: u64,
    pub runtime: u64,
    pub memory: u64,
    pub cores: u32,
    pub length: u64,
    /// The earliest time the task may start executing.
    pub submission_offset: f64,
    execution: Option<Execution>,
    completed: bool,
}

impl Task {
    /// Creates new task.
    pub fn new(id: TaskId, name: &str, input: u64, cost: TaskCost) -> Self {
        Self {
            id,
            name: name.to_string(),
            input,
            runtime: cost.runtime,
            memory: cost.memory,
            cores: cost.cores,
            length: cost.length,
            submission_offset: 0.,
            execution: None,
            completed: false,
        }
    }

    pub fn with_submission_offset(mut self, offset: f64) -> Self {
        self.submission_offset = offset;
        self
    }

    pub fn is_multi_slot(&self) -> bool {
        self.cores > 1
    }

    pub fn execution(&self) -> Option<&Execution> {
        self.execution.as_ref()
    }

    pub(crate) fn set_execution(&mut self, execution: Execution) {
        self.execution = Some(execution);
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub(crate) fn mark_completed(&mut self) {
        self.completed = true;
    }

    pub fn descriptor(&self) -> TaskDescriptor {
        TaskDescriptor {
            task_id: self.id,
            length: self.length,
            cores: self.cores,
            memory: self.memory,
            submission_offset: self.submission_offset,
        }
    }
}
