//! Ingestion of Azure Functions invocation traces.
//!
//! The trace is a CSV file with a header row and rows of the form
//! `HashOwner,HashApp,HashFunction,Trigger,1,2,...,1440`, where the last 1440 columns hold the number of
//! invocations of the function in each minute of a day.
//! Trace description: https://github.com/Azure/AzurePublicDataset/blob/master/AzureFunctionsDataset2019.md

use std::hash::{Hash, Hasher};
use std::num::IntErrorKind;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use log::warn;
use rustc_hash::FxHasher;

use crate::error::TraceError;
use crate::graph::TaskGraph;
use crate::task::{Task, TaskCost};

pub const MINUTES_PER_DAY: usize = 1440;
/// Owner, app, function and trigger columns precede the per-minute counts.
pub const LEADING_COLUMNS: usize = 4;
pub const TRACE_COLUMNS: usize = LEADING_COLUMNS + MINUTES_PER_DAY;
const FUNCTION_COLUMN: usize = 2;

#[derive(Clone, Copy, Debug)]
pub struct IngestionConfig {
    /// Length units per time unit of task runtime.
    pub rating: u64,
    /// Per-minute invocation counts are clamped to this value.
    pub max_invocations_per_minute: u64,
    /// Maximum number of data rows to read.
    pub max_records: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            rating: 1000,
            max_invocations_per_minute: 1000,
            max_records: 1000,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestionStats {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub invalid_values: usize,
    pub clamped_minutes: usize,
    pub tasks: usize,
}

/// Deterministic hash of the function identity used to derive resource demands.
///
/// `FxHasher` works on `usize` words, so the values (and the demands derived from them) are stable across runs
/// on targets of the same pointer width; the reference values are those of 64-bit targets.
pub fn function_hash(function: &str) -> u64 {
    let mut hasher = FxHasher::default();
    function.hash(&mut hasher);
    hasher.finish()
}

/// Resource demands of every invocation of the function: runtime in `[10, 100]`, memory in `[128, 512]` MB.
pub fn function_cost(function: &str, rating: u64) -> TaskCost {
    let hash = function_hash(function);
    TaskCost::single_slot(10 + hash % 91, 128 + hash % 385, rating)
}

/// Turns an invocation trace into tasks, one task per invocation.
///
/// The trace is read once, on the first call to [`ingest`](TraceIngester::ingest); later calls return the
/// already built tasks.
pub struct TraceIngester {
    path: PathBuf,
    config: IngestionConfig,
    tasks: Option<Vec<Task>>,
    stats: IngestionStats,
}

impl TraceIngester {
    /// Fails with [`TraceError::SourceNotFound`] if the trace file does not exist.
    pub fn new<P: AsRef<Path>>(path: P, config: IngestionConfig) -> Result<Self, TraceError> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(TraceError::SourceNotFound(path));
        }
        Ok(Self {
            path,
            config,
            tasks: None,
            stats: IngestionStats::default(),
        })
    }

    pub fn ingest(&mut self) -> Result<&[Task], TraceError> {
        if self.tasks.is_none() {
            let (tasks, stats) = self.read_trace()?;
            self.stats = stats;
            self.tasks = Some(tasks);
        }
        Ok(self.tasks.as_deref().unwrap_or_default())
    }

    pub fn stats(&self) -> IngestionStats {
        self.stats
    }

    /// Builds a graph of independent tasks from the trace.
    pub fn into_graph(mut self) -> Result<TaskGraph, TraceError> {
        self.ingest()?;
        let mut graph = TaskGraph::new();
        for task in self.tasks.take().unwrap_or_default() {
            graph.add_task(task);
        }
        Ok(graph)
    }

    fn read_trace(&self) -> Result<(Vec<Task>, IngestionStats), TraceError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_path(&self.path)?;
        let mut tasks = Vec::new();
        let mut stats = IngestionStats::default();
        for result in reader.records() {
            if stats.rows_read >= self.config.max_records {
                break;
            }
            stats.rows_read += 1;
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!(target: "trace", "skipping row {}: {}", stats.rows_read, e);
                    stats.rows_skipped += 1;
                    continue;
                }
            };
            if record.len() < TRACE_COLUMNS {
                warn!(
                    target: "trace",
                    "skipping row {}: expected {} columns, got {}",
                    stats.rows_read,
                    TRACE_COLUMNS,
                    record.len()
                );
                stats.rows_skipped += 1;
                continue;
            }
            let function = &record[FUNCTION_COLUMN];
            let cost = function_cost(function, self.config.rating);
            for minute in 0..MINUTES_PER_DAY {
                let value = &record[LEADING_COLUMNS + minute];
                let mut count = match value.parse::<u64>() {
                    Ok(count) => count,
                    Err(e) if *e.kind() == IntErrorKind::PosOverflow => u64::MAX,
                    Err(_) => {
                        warn!(
                            target: "trace",
                            "row {}: invalid invocation count {:?} at minute {} of function {}",
                            stats.rows_read,
                            value,
                            minute,
                            function
                        );
                        stats.invalid_values += 1;
                        0
                    }
                };
                if count > self.config.max_invocations_per_minute {
                    count = self.config.max_invocations_per_minute;
                    stats.clamped_minutes += 1;
                }
                for _ in 0..count {
                    let task = Task::new(tasks.len(), function, minute as u64, cost)
                        .with_submission_offset((minute * 60) as f64);
                    tasks.push(task);
                }
            }
        }
        stats.tasks = tasks.len();
        Ok((tasks, stats))
    }
}
