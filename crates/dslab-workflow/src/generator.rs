//! Synthetic workflow generators.

use crate::graph::TaskGraph;
use crate::task::{Task, TaskCost, TaskId};

/// Derives the resource demands of a task from its input parameter.
pub trait CostModel {
    fn cost(&self, input: u64) -> TaskCost;
}

impl<F> CostModel for F
where
    F: Fn(u64) -> TaskCost,
{
    fn cost(&self, input: u64) -> TaskCost {
        self(input)
    }
}

/// Runtime grows as `base_runtime * 2^input`, which models naive exponential-time recursive algorithms.
#[derive(Clone, Copy, Debug)]
pub struct ExponentialCost {
    pub base_runtime: u64,
    pub memory: u64,
    pub rating: u64,
}

impl ExponentialCost {
    pub fn new(rating: u64) -> Self {
        Self {
            base_runtime: 10,
            memory: 128,
            rating,
        }
    }
}

impl CostModel for ExponentialCost {
    fn cost(&self, input: u64) -> TaskCost {
        let factor = 2u64.checked_pow(input.min(63) as u32).unwrap_or(u64::MAX);
        TaskCost::single_slot(self.base_runtime.saturating_mul(factor), self.memory, self.rating)
    }
}

/// Builds workflows by recursive binary decomposition.
///
/// The root gets the initial input. Every node with input above the threshold gets exactly two children whose
/// inputs are produced by the split rule. The split rule must strictly decrease the input, otherwise the
/// generation does not terminate.
pub struct RecursiveGenerator {
    name: String,
    threshold: u64,
    split: Box<dyn Fn(u64) -> (u64, u64)>,
    cost: Box<dyn CostModel>,
}

impl RecursiveGenerator {
    pub fn new<S, C>(name: &str, threshold: u64, split: S, cost: C) -> Self
    where
        S: Fn(u64) -> (u64, u64) + 'static,
        C: CostModel + 'static,
    {
        Self {
            name: name.to_string(),
            threshold,
            split: Box::new(split),
            cost: Box::new(cost),
        }
    }

    /// Call tree of the naive recursive Fibonacci: `fib(n)` calls `fib(n - 1)` and `fib(n - 2)` for `n > 1`.
    pub fn fibonacci<C: CostModel + 'static>(cost: C) -> Self {
        Self::new("fib", 1, |n| (n.saturating_sub(1), n.saturating_sub(2)), cost)
    }

    /// Generates a workflow for the given input. Task ids are assigned sequentially starting from 0.
    pub fn generate(&self, input: u64) -> TaskGraph {
        let mut graph = TaskGraph::new();
        let root = graph.set_root(self.make_task(0, input));
        self.expand(&mut graph, root, input);
        graph
    }

    fn expand(&self, graph: &mut TaskGraph, parent: TaskId, input: u64) {
        if input <= self.threshold {
            return;
        }
        let (left_input, right_input) = (self.split)(input);
        let left = graph.add_task(self.make_task(graph.len(), left_input));
        let right = graph.add_task(self.make_task(graph.len(), right_input));
        graph.add_edge(parent, left);
        graph.add_edge(parent, right);
        self.expand(graph, left, left_input);
        self.expand(graph, right, right_input);
    }

    fn make_task(&self, id: TaskId, input: u64) -> Task {
        Task::new(id, &self.name, input, self.cost.cost(input))
    }
}
