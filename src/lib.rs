//! `sigma-schedules` library crate.
//!
//! Noise-level (sigma) schedules for diffusion samplers, looked up by name.
//! The binary (`sigmas`) is a thin wrapper around this library so that:
//!
//! - generators are testable without spawning processes
//! - sampler integrations can link the registry directly and supply their own
//!   `host::HostModel`

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod host;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod schedules;

pub use domain::{ModelFamily, ScheduleConfig, SigmaRange, Sigmas};
pub use error::{Result, ScheduleError};
pub use host::{DiscreteHostModel, HostModel};
pub use schedules::{Generator, Registry, ScheduleDescriptor, registry, resolve};
