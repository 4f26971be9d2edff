//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the schedule vector type and its validated sigma bounds (`Sigmas`, `SigmaRange`)
//! - model family selection (`ModelFamily`)
//! - tunable generator parameters (`ScheduleConfig`)

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
