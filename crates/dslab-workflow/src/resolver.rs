//! Dependency tracking.

use std::collections::VecDeque;

use log::warn;

use crate::error::DependencyError;
use crate::graph::TaskGraph;
use crate::task::{Task, TaskId, TaskState};

/// Tracks the number of uncompleted predecessors of each task and releases tasks into a FIFO ready queue.
///
/// Per-task state is stored in arrays indexed by the task position in the graph. A task moves through
/// `Blocked -> Ready -> Submitted -> Completed`; it is enqueued exactly once, at the moment its pending
/// predecessor count reaches zero.
#[derive(Default)]
pub struct DependencyResolver {
    graph: TaskGraph,
    states: Vec<TaskState>,
    pending: Vec<usize>,
    children: Vec<Vec<usize>>,
    ready: VecDeque<usize>,
    submitted: usize,
    completed: usize,
    initialized: bool,
}

impl DependencyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of the graph, computes pending predecessor counts and enqueues tasks without
    /// predecessors in graph traversal order.
    ///
    /// Fails if an edge references a task missing from the graph; the resolver stays uninitialized then.
    pub fn initialize(&mut self, graph: TaskGraph) -> Result<(), DependencyError> {
        if self.initialized {
            return Err(DependencyError::AlreadyInitialized);
        }
        let mut children = vec![Vec::new(); graph.len()];
        let mut pending = vec![0; graph.len()];
        for (parent, edges) in graph.edges() {
            let parent_idx = graph
                .index_of(parent)
                .ok_or(DependencyError::UnknownParent { parent })?;
            for &child in edges {
                let child_idx = graph
                    .index_of(child)
                    .ok_or(DependencyError::UnknownChild { parent, child })?;
                children[parent_idx].push(child_idx);
                pending[child_idx] += 1;
            }
        }

        let mut states = vec![TaskState::Blocked; graph.len()];
        let mut ready = VecDeque::new();
        let mut seen = vec![false; graph.len()];
        for id in graph.traverse() {
            if let Some(idx) = graph.index_of(id) {
                seen[idx] = true;
                if pending[idx] == 0 {
                    states[idx] = TaskState::Ready;
                    ready.push_back(idx);
                }
            }
        }
        // tasks unreachable from the traversal start (e.g. the root has siblings) keep insertion order
        for idx in 0..graph.len() {
            if !seen[idx] && pending[idx] == 0 {
                states[idx] = TaskState::Ready;
                ready.push_back(idx);
            }
        }

        self.graph = graph;
        self.states = states;
        self.pending = pending;
        self.children = children;
        self.ready = ready;
        self.submitted = 0;
        self.completed = 0;
        self.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the next ready task without dequeuing it.
    pub fn peek_ready(&self) -> Option<&Task> {
        self.ready.front().map(|&idx| self.graph.task_at(idx))
    }

    /// Dequeues the next ready task and marks it as submitted.
    ///
    /// An empty result does not mean the graph is completed: submitted tasks may still release new ones.
    pub fn next_ready(&mut self) -> Option<&mut Task> {
        let idx = self.ready.pop_front()?;
        self.states[idx] = TaskState::Submitted;
        self.submitted += 1;
        Some(self.graph.task_at_mut(idx))
    }

    /// Marks a submitted task as completed and returns the children that became ready, in enqueue order.
    ///
    /// Duplicate completions and completions of tasks that were never submitted are logged and ignored.
    pub fn on_completion(&mut self, task_id: TaskId) -> Vec<TaskId> {
        let idx = match self.graph.index_of(task_id) {
            Some(idx) => idx,
            None => {
                warn!(target: "resolver", "completion of unknown task {} is ignored", task_id);
                return Vec::new();
            }
        };
        match self.states[idx] {
            TaskState::Submitted => {}
            TaskState::Completed => {
                warn!(target: "resolver", "duplicate completion of task {} is ignored", task_id);
                return Vec::new();
            }
            state => {
                warn!(
                    target: "resolver",
                    "completion of task {} in state {:?} is ignored",
                    task_id,
                    state
                );
                return Vec::new();
            }
        }

        self.states[idx] = TaskState::Completed;
        self.graph.task_at_mut(idx).mark_completed();
        self.submitted -= 1;
        self.completed += 1;

        let mut released = Vec::new();
        for &child in self.children[idx].iter() {
            self.pending[child] -= 1;
            if self.pending[child] == 0 {
                self.states[child] = TaskState::Ready;
                self.ready.push_back(child);
                released.push(self.graph.task_at(child).id);
            }
        }
        released
    }

    /// Returns true when every task is completed, so no ready or submitted task remains.
    pub fn is_drained(&self) -> bool {
        self.initialized && self.completed == self.graph.len()
    }

    pub fn state(&self, task_id: TaskId) -> Option<TaskState> {
        self.graph.index_of(task_id).map(|idx| self.states[idx])
    }

    pub fn pending_count(&self, task_id: TaskId) -> Option<usize> {
        self.graph.index_of(task_id).map(|idx| self.pending[idx])
    }

    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.graph.get_task(task_id)
    }

    pub fn ready_count(&self) -> usize {
        self.ready.len()
    }

    pub fn submitted_count(&self) -> usize {
        self.submitted
    }

    pub fn completed_count(&self) -> usize {
        self.completed
    }

    /// Returns the number of tasks in the given state.
    pub fn count_in_state(&self, state: TaskState) -> usize {
        self.states.iter().filter(|&&s| s == state).count()
    }

    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }
}
