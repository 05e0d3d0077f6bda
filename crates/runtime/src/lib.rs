//! Headless host for the skirmish combat rules.
//!
//! The core crate leaves time, ownership of entities and routing between them to a
//! host. This crate is that host for tests and the `skirmish-sim` harness:
//! - [`simulation`] runs the fixed-timestep loop and routes commands by id
//! - [`config`] reads host settings from the environment
//! - [`logging`] installs the `tracing` subscriber
pub mod config;
pub mod error;
pub mod logging;
pub mod simulation;

pub use config::RuntimeConfig;
pub use error::{Result, SimulationError};
pub use logging::setup_logging;
pub use simulation::{BulletId, Simulation};
