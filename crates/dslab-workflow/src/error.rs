//! Error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::task::TaskId;

/// Errors raised while reading an invocation trace.
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("trace source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised when a task graph is inconsistent.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DependencyError {
    #[error("task {parent} references child {child} which is not part of the graph")]
    UnknownChild { parent: TaskId, child: TaskId },

    #[error("edge source {parent} is not part of the graph")]
    UnknownParent { parent: TaskId },

    #[error("dependency resolver is already initialized")]
    AlreadyInitialized,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlacementError {
    #[error("execution unit pool is empty")]
    EmptyPool,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("unknown placement policy: {0}")]
    UnknownPlacement(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Dependency(#[from] DependencyError),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
