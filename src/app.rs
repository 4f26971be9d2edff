//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - layers the schedule config (JSON file, environment, flags)
//! - runs the requested schedule against the reference host model
//! - prints tables, JSON or plots and writes optional exports

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, ShowArgs};
use crate::domain::{ScheduleConfig, SigmaRange};
use crate::error::Result;
use crate::host::DiscreteHostModel;
use crate::schedules::{registry, resolve};

/// Install the stderr `tracing` subscriber; `RUST_LOG` overrides the `warn` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber set by an embedding process wins.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Entry point for the `sigmas` binary.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::List => {
            print!("{}", crate::report::format_schedule_list(registry().iter()));
            Ok(())
        }
        Command::Show(args) => handle_show(&args),
    }
}

fn handle_show(args: &ShowArgs) -> Result<()> {
    let config = config_from_args(args)?;
    let host = DiscreteHostModel::stable_diffusion();
    let range = SigmaRange::new(
        args.sigma_min.unwrap_or_else(|| host.sigma_min()),
        args.sigma_max.unwrap_or_else(|| host.sigma_max()),
    )?;

    let descriptor = resolve(&args.key)?;
    let sigmas = descriptor.generate(args.steps, &range, &config, Some(&host))?;
    info!(schedule = descriptor.id, entries = sigmas.len(), "schedule generated");

    if args.json {
        let report = crate::report::ScheduleReport::new(
            descriptor,
            args.steps,
            &range,
            config.model_family,
            &sigmas,
        );
        println!("{}", report.to_json()?);
    } else {
        print!(
            "{}",
            crate::report::format_schedule_table(descriptor, &range, config.model_family, &sigmas)
        );
    }

    if args.plot {
        println!();
        print!("{}", crate::plot::render_schedule_plot(&sigmas, args.width, args.height));
    }

    if let Some(path) = &args.export {
        crate::io::write_schedule_csv(path, descriptor, &sigmas)?;
        info!(path = %path.display(), "schedule exported");
    }

    Ok(())
}

/// Defaults, then the JSON file, then `SIGMAS_*` variables, then flags.
pub fn config_from_args(args: &ShowArgs) -> Result<ScheduleConfig> {
    let mut config = match &args.config {
        Some(path) => crate::io::read_config_json(path)?,
        None => ScheduleConfig::default(),
    };
    config.apply_env()?;
    if let Some(family) = args.family {
        config.model_family = family;
    }
    config.validate()?;
    Ok(config)
}
