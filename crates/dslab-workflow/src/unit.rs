//! Execution units.

use serde::{Deserialize, Serialize};

pub type UnitId = usize;

/// Represents an execution unit (for example, a VM) that tasks are placed on.
///
/// Units are stored in an arena and referenced by their index everywhere else, so `id` equals the position of the
/// unit in the pool. Capacity attributes are static; the unit load is tracked by the placement policy.
#[derive(Clone, Debug, Serialize)]
pub struct ExecutionUnit {
    pub id: UnitId,
    pub name: String,
    /// Processing speed in MIPS (length units per time unit).
    pub speed: u64,
    pub cores: u32,
    /// Memory capacity in MB.
    pub memory: u64,
}

fn default_one() -> u32 {
    1
}

/// YAML-serializable unit description. `count` identical units are created from a single entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnitConfig {
    pub name: String,
    pub speed: u64,
    #[serde(default = "default_one")]
    pub cores: u32,
    #[serde(default)]
    pub memory: u64,
    #[serde(default = "default_one")]
    pub count: u32,
}

impl UnitConfig {
    pub fn new(name: &str, speed: u64, cores: u32, memory: u64) -> Self {
        Self {
            name: name.to_string(),
            speed,
            cores,
            memory,
            count: 1,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }
}

/// Expands unit configs into the unit pool, assigning sequential ids.
///
/// Units created from an entry with `count > 1` get names suffixed with their index within the entry.
pub fn build_pool(configs: &[UnitConfig]) -> Vec<ExecutionUnit> {
    let mut units = Vec::new();
    for config in configs {
        for i in 0..config.count {
            let name = if config.count == 1 {
                config.name.clone()
            } else {
                format!("{}-{}", config.name, i)
            };
            units.push(ExecutionUnit {
                id: units.len(),
                name,
                speed: config.speed,
                cores: config.cores,
                memory: config.memory,
            });
        }
    }
    units
}
