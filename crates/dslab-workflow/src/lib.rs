//! A library for simulating the execution of serverless function workflows.
//!
//! Tasks come either from an invocation trace (see [`trace`]) or from a synthetic generator (see [`generator`]),
//! are organized into a [`graph::TaskGraph`], released by [`resolver::DependencyResolver`] once their
//! predecessors complete and placed onto execution units by a [`placement::PlacementPolicy`].
//! [`controller::SchedulingController`] drives this loop against a [`engine::SimulationEngine`].
//!
//! ## Demos
//!
//! - `demos/workflow-fibonacci`: runs a recursive Fibonacci workflow on a pool of units.
//! - `demos/serverless-trace`: ingests an Azure Functions invocation trace and schedules it.

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod generator;
pub mod graph;
pub mod log;
pub mod placement;
pub mod resolver;
pub mod simulation;
pub mod stats;
pub mod task;
pub mod trace;
pub mod unit;
