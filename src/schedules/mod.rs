//! Sigma schedule generators and their registry.
//!
//! Responsibilities:
//!
//! - closed-form schedules (`analytic`)
//! - schedules that read the host model's table (`host_based`)
//! - align-your-steps table resampling (`ays`)
//! - descriptors + lookup by id / label / alias (`registry`)

use std::fmt;

use tracing::debug;

use crate::domain::{ScheduleConfig, SigmaRange, Sigmas};
use crate::error::{Result, ScheduleError};
use crate::host::HostModel;

pub mod analytic;
pub mod ays;
pub mod host_based;
pub mod registry;

pub use registry::*;

/// Self-contained generator: the schedule depends only on its arguments.
pub type AnalyticFn = fn(usize, &SigmaRange, &ScheduleConfig) -> Result<Sigmas>;

/// Generator that needs the host model's conversions or native table.
pub type HostFn = fn(usize, &SigmaRange, &ScheduleConfig, &dyn HostModel) -> Result<Sigmas>;

/// How a schedule is computed.
#[derive(Clone, Copy)]
pub enum Generator {
    /// No computation; the sampler picks its own schedule.
    Automatic,
    Analytic(AnalyticFn),
    Host(HostFn),
}

impl Generator {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Generator::Automatic => "automatic",
            Generator::Analytic(_) => "analytic",
            Generator::Host(_) => "host",
        }
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind_name())
    }
}

/// A named schedule and its metadata.
#[derive(Debug, Clone)]
pub struct ScheduleDescriptor {
    /// Stable key.
    pub id: &'static str,
    /// Display name; also accepted by lookup.
    pub label: &'static str,
    pub generator: Generator,
    /// Default curvature exponent, where the schedule has one.
    pub default_rho: Option<f64>,
    /// Extra lookup keys.
    pub aliases: &'static [&'static str],
}

impl ScheduleDescriptor {
    pub fn new(id: &'static str, label: &'static str, generator: Generator) -> Self {
        Self {
            id,
            label,
            generator,
            default_rho: None,
            aliases: &[],
        }
    }

    pub fn with_default_rho(mut self, rho: f64) -> Self {
        self.default_rho = Some(rho);
        self
    }

    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn needs_host_model(&self) -> bool {
        matches!(self.generator, Generator::Host(_))
    }

    /// Every key this descriptor answers to: id, label, then aliases.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        [self.id, self.label].into_iter().chain(self.aliases.iter().copied())
    }

    /// Run the generator.
    ///
    /// `host` is only consulted by host-dependent schedules; passing `None` to
    /// one of them is a caller error reported as `MissingHostModel`.
    pub fn generate(
        &self,
        steps: usize,
        range: &SigmaRange,
        config: &ScheduleConfig,
        host: Option<&dyn HostModel>,
    ) -> Result<Sigmas> {
        config.validate()?;
        debug!(
            schedule = self.id,
            kind = self.generator.kind_name(),
            steps,
            sigma_min = range.min(),
            sigma_max = range.max(),
            "generating sigmas"
        );

        match self.generator {
            Generator::Automatic => Err(ScheduleError::Automatic),
            Generator::Analytic(generate) => generate(steps, range, config),
            Generator::Host(generate) => {
                let host = host.ok_or_else(|| ScheduleError::MissingHostModel {
                    id: self.id.to_string(),
                })?;
                generate(steps, range, config, host)
            }
        }
    }
}
