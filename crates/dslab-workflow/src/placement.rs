//! Placement policies.

use log::{error, warn};

use crate::error::PlacementError;
use crate::task::Task;
use crate::unit::UnitId;

/*
 * Placement policy chooses an execution unit
 * for each ready task and tracks the number of
 * assigned but not yet completed tasks per unit.
 */
pub trait PlacementPolicy {
    /// Chooses a unit for the task and increments its load.
    fn assign(&mut self, task: &Task) -> Result<UnitId, PlacementError>;

    /// Decrements the unit load, which never drops below zero.
    fn release(&mut self, unit: UnitId);

    /// Returns a copy of the current per-unit load.
    fn loads(&self) -> Vec<u64>;

    fn unit_count(&self) -> usize;

    fn get_name(&self) -> String {
        "STUB PLACEMENT POLICY NAME".to_string()
    }
}

/// Per-unit load counters indexed by unit id.
#[derive(Clone, Debug, Default)]
pub struct LoadTable {
    loads: Vec<u64>,
}

impl LoadTable {
    pub fn new(unit_count: usize) -> Self {
        Self {
            loads: vec![0; unit_count],
        }
    }

    pub fn get(&self, unit: UnitId) -> u64 {
        self.loads[unit]
    }

    pub fn len(&self) -> usize {
        self.loads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    pub fn increment(&mut self, unit: UnitId) {
        self.loads[unit] += 1;
    }

    pub fn release(&mut self, unit: UnitId) {
        match self.loads.get_mut(unit) {
            Some(load) if *load > 0 => *load -= 1,
            Some(_) => warn!(target: "placement", "release of unit {} with zero load is ignored", unit),
            None => error!(target: "placement", "release of unknown unit {} is ignored", unit),
        }
    }

    pub fn snapshot(&self) -> Vec<u64> {
        self.loads.clone()
    }
}

/* LeastLoadedPolicy chooses the unit
 * with the smallest number of assigned tasks,
 * ties are broken in favor of the lowest unit id.
 */
pub struct LeastLoadedPolicy {
    loads: LoadTable,
}

impl LeastLoadedPolicy {
    pub fn new(unit_count: usize) -> Self {
        Self {
            loads: LoadTable::new(unit_count),
        }
    }
}

impl PlacementPolicy for LeastLoadedPolicy {
    fn assign(&mut self, _task: &Task) -> Result<UnitId, PlacementError> {
        let unit = (0..self.loads.len())
            .min_by_key(|&unit| (self.loads.get(unit), unit))
            .ok_or(PlacementError::EmptyPool)?;
        self.loads.increment(unit);
        Ok(unit)
    }

    fn release(&mut self, unit: UnitId) {
        self.loads.release(unit);
    }

    fn loads(&self) -> Vec<u64> {
        self.loads.snapshot()
    }

    fn unit_count(&self) -> usize {
        self.loads.len()
    }

    fn get_name(&self) -> String {
        "LeastLoaded".to_string()
    }
}

/* RoundRobinPolicy cycles through units
 * in id order regardless of their load.
 */
pub struct RoundRobinPolicy {
    loads: LoadTable,
    next: UnitId,
}

impl RoundRobinPolicy {
    pub fn new(unit_count: usize) -> Self {
        Self {
            loads: LoadTable::new(unit_count),
            next: 0,
        }
    }
}

impl PlacementPolicy for RoundRobinPolicy {
    fn assign(&mut self, _task: &Task) -> Result<UnitId, PlacementError> {
        if self.loads.is_empty() {
            return Err(PlacementError::EmptyPool);
        }
        let unit = self.next;
        self.next = (self.next + 1) % self.loads.len();
        self.loads.increment(unit);
        Ok(unit)
    }

    fn release(&mut self, unit: UnitId) {
        self.loads.release(unit);
    }

    fn loads(&self) -> Vec<u64> {
        self.loads.snapshot()
    }

    fn unit_count(&self) -> usize {
        self.loads.len()
    }

    fn get_name(&self) -> String {
        "RoundRobin".to_string()
    }
}

pub fn default_placement_resolver(name: &str, unit_count: usize) -> Option<Box<dyn PlacementPolicy>> {
    match name {
        "LeastLoaded" => Some(Box::new(LeastLoadedPolicy::new(unit_count))),
        "RoundRobin" => Some(Box::new(RoundRobinPolicy::new(unit_count))),
        _ => None,
    }
}
