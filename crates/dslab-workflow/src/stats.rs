use serde::Serialize;

#[derive(Clone, Debug, Default, Serialize)]
pub struct SampleMetric {
    data: Vec<f64>,
}

impl SampleMetric {
    pub fn add(&mut self, x: f64) {
        self.data.push(x);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Returns `None` for an empty sample.
    pub fn mean(&self) -> Option<f64> {
        if self.data.is_empty() {
            return None;
        }
        Some(self.sum() / (self.data.len() as f64))
    }

    pub fn min(&self) -> Option<f64> {
        self.data.iter().copied().min_by(|a, b| a.total_cmp(b))
    }

    pub fn max(&self) -> Option<f64> {
        self.data.iter().copied().max_by(|a, b| a.total_cmp(b))
    }
}

/// Summary of a simulation run collected by the engine.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunStats {
    pub completed_tasks: u64,
    /// Finish time of the last completed task.
    pub makespan: f64,
    /// Time from task start to task finish.
    pub execution_time: SampleMetric,
    /// Time from task arrival at the unit to task start.
    pub waiting_time: SampleMetric,
    /// Number of completed tasks per unit, indexed by unit id.
    pub tasks_per_unit: Vec<u64>,
}
