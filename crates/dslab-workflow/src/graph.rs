//! Task graph.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::task::{Task, TaskId};

/// A set of tasks with parent -> children edges.
///
/// Tasks are kept in insertion order. Forward edges are owned by the parent and added explicitly with
/// [`add_edge`](TaskGraph::add_edge); predecessor counts are derived from them by the dependency resolver.
/// The graph must be acyclic, cycles are not detected.
#[derive(Clone, Debug, Default)]
pub struct TaskGraph {
    root: Option<TaskId>,
    tasks: IndexMap<TaskId, Task>,
    children: IndexMap<TaskId, Vec<TaskId>>,
    edges: FxHashSet<(TaskId, TaskId)>,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the task and makes it the graph root.
    pub fn set_root(&mut self, task: Task) -> TaskId {
        let id = self.add_task(task);
        self.root = Some(id);
        id
    }

    /// Adds the task to the graph.
    ///
    /// Panics if a task with the same id was already added.
    pub fn add_task(&mut self, task: Task) -> TaskId {
        let id = task.id;
        if self.tasks.contains_key(&id) {
            panic!("Error: task {} is added to the graph twice", id);
        }
        self.tasks.insert(id, task);
        id
    }

    /// Adds a dependency: `child` can start only after `parent` is completed.
    ///
    /// Repeated edges are ignored. Tasks are not required to be added before the edge,
    /// the graph consistency is checked on resolver initialization.
    pub fn add_edge(&mut self, parent: TaskId, child: TaskId) {
        if self.edges.insert((parent, child)) {
            self.children.entry(parent).or_default().push(child);
        }
    }

    pub fn root(&self) -> Option<&Task> {
        self.root.and_then(|id| self.tasks.get(&id))
    }

    pub fn get_task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// Returns all tasks in insertion order.
    pub fn get_all(&self) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.values()
    }

    pub fn children(&self, id: TaskId) -> &[TaskId] {
        self.children.get(&id).map(|c| c.as_slice()).unwrap_or(&[])
    }

    pub fn parents_of(&self, id: TaskId) -> Vec<TaskId> {
        self.children
            .iter()
            .filter(|(_, children)| children.contains(&id))
            .map(|(&parent, _)| parent)
            .collect()
    }

    /// Returns all edges grouped by parent, in the order parents got their first edge.
    pub fn edges(&self) -> impl Iterator<Item = (TaskId, &[TaskId])> + '_ {
        self.children.iter().map(|(&parent, children)| (parent, children.as_slice()))
    }

    /// Returns tasks without parents in insertion order.
    pub fn roots(&self) -> Vec<TaskId> {
        let mut has_parent = vec![false; self.tasks.len()];
        for children in self.children.values() {
            for child in children {
                if let Some(idx) = self.tasks.get_index_of(child) {
                    has_parent[idx] = true;
                }
            }
        }
        self.tasks
            .keys()
            .enumerate()
            .filter(|(idx, _)| !has_parent[*idx])
            .map(|(_, &id)| id)
            .collect()
    }

    /// Visits tasks in depth-first preorder starting from the root,
    /// or from every parentless task if the root is not set. Each task is visited once.
    pub fn traverse(&self) -> Vec<TaskId> {
        let starts = match self.root {
            Some(root) => vec![root],
            None => self.roots(),
        };
        let mut visited = vec![false; self.tasks.len()];
        let mut order = Vec::with_capacity(self.tasks.len());
        let mut stack: Vec<TaskId> = starts.into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            let idx = match self.tasks.get_index_of(&id) {
                Some(idx) => idx,
                None => continue,
            };
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            order.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        order
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub(crate) fn index_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.get_index_of(&id)
    }

    pub(crate) fn task_at(&self, idx: usize) -> &Task {
        self.tasks.get_index(idx).map(|(_, task)| task).unwrap()
    }

    pub(crate) fn task_at_mut(&mut self, idx: usize) -> &mut Task {
        self.tasks.get_index_mut(idx).map(|(_, task)| task).unwrap()
    }
}
