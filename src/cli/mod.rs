//! Command-line parsing for the `sigmas` binary.
//!
//! Parsing lives here and dispatch lives in `app`, so the schedule code never
//! depends on clap types beyond `ModelFamily`'s `ValueEnum` derive.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::ModelFamily;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sigmas", version, about = "Inspect diffusion sampler sigma schedules")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every registered schedule with its kind, default rho and aliases.
    List,
    /// Generate one schedule against the reference SD host model.
    Show(ShowArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Schedule id, display label or alias (e.g. `karras`, `Karras`, `SGMUniform`).
    pub key: String,

    /// Number of sampling steps.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub steps: usize,

    /// Lowest noise level; defaults to the host table minimum.
    #[arg(long)]
    pub sigma_min: Option<f64>,

    /// Highest noise level; defaults to the host table maximum.
    #[arg(long)]
    pub sigma_max: Option<f64>,

    /// Checkpoint family for the align-your-steps tables.
    #[arg(long, value_enum)]
    pub family: Option<ModelFamily>,

    /// JSON file with `ScheduleConfig` fields; missing fields keep defaults.
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Print the schedule as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Render an ASCII plot of sigma against step.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 15)]
    pub height: usize,

    /// Export the schedule to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}
