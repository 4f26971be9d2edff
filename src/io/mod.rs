//! Input/output helpers.
//!
//! - config JSON read (`config`)
//! - schedule CSV export (`export`)

pub mod config;
pub mod export;

pub use config::*;
pub use export::*;
