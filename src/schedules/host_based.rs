//! Schedules that resample or re-index the host model's sigma table.

use statrs::distribution::{Beta, ContinuousCDF};

use crate::domain::{ScheduleConfig, SigmaRange, Sigmas, terminated};
use crate::error::{Result, ScheduleError};
use crate::host::HostModel;
use crate::math::linspace;

/// Timestep resolution assumed by `turbo`.
const TURBO_TIMESTEPS: f64 = 1000.0;

/// Bisection rounds for Beta quantiles; enough to resolve a double on `[0, 1]`.
const QUANTILE_ITERS: usize = 64;

fn native_table(host: &dyn HostModel) -> Result<&[f64]> {
    let table = host.native_sigma_table();
    if table.is_empty() {
        return Err(ScheduleError::EmptyHostTable);
    }
    Ok(table)
}

/// The host's own schedule, already terminated.
pub fn uniform(
    steps: usize,
    _range: &SigmaRange,
    _config: &ScheduleConfig,
    host: &dyn HostModel,
) -> Result<Sigmas> {
    let len = native_table(host)?.len();
    if steps > len {
        return Err(ScheduleError::StepsExceedTable { steps, len });
    }
    Ok(host.get_sigmas(steps))
}

/// Timesteps spaced evenly between the converted bounds, mapped back to sigmas.
///
/// In `sgm` mode `steps + 1` timesteps are generated and the last one dropped,
/// so the schedule never reaches `sigma_min` before the terminal zero.
pub fn normal_with_mode(
    steps: usize,
    range: &SigmaRange,
    host: &dyn HostModel,
    sgm: bool,
) -> Result<Sigmas> {
    native_table(host)?;
    let start = host.sigma_to_t(range.max());
    let end = host.sigma_to_t(range.min());

    let timesteps = if sgm {
        let mut t = linspace(start, end, steps + 1);
        t.pop();
        t
    } else {
        linspace(start, end, steps)
    };

    let sigmas: Vec<f64> = timesteps.iter().map(|&t| host.t_to_sigma(t)).collect();
    Ok(terminated(&sigmas))
}

pub fn normal(
    steps: usize,
    range: &SigmaRange,
    _config: &ScheduleConfig,
    host: &dyn HostModel,
) -> Result<Sigmas> {
    normal_with_mode(steps, range, host, false)
}

pub fn sgm_uniform(
    steps: usize,
    range: &SigmaRange,
    _config: &ScheduleConfig,
    host: &dyn HostModel,
) -> Result<Sigmas> {
    normal_with_mode(steps, range, host, true)
}

/// Every `len / steps`-th table entry, walking down from the noisiest timestep.
pub fn simple(
    steps: usize,
    _range: &SigmaRange,
    _config: &ScheduleConfig,
    host: &dyn HostModel,
) -> Result<Sigmas> {
    let table = native_table(host)?;
    if steps == 0 {
        return Ok(terminated(&[]));
    }
    let last = table.len() - 1;
    let stride = table.len() as f64 / steps as f64;
    let sigmas: Vec<f64> = (0..steps)
        .map(|x| {
            let offset = ((x as f64 * stride) as usize).min(last);
            table[last - offset]
        })
        .collect();
    Ok(terminated(&sigmas))
}

/// Integer stride through the table starting at timestep 1, noisiest first.
///
/// Because the stride is `max(len / steps, 1)` the schedule can hold a few more
/// entries than `steps` when `len` is not a multiple of it.
pub fn ddim(
    steps: usize,
    _range: &SigmaRange,
    _config: &ScheduleConfig,
    host: &dyn HostModel,
) -> Result<Sigmas> {
    let table = native_table(host)?;
    if steps == 0 {
        return Ok(terminated(&[]));
    }
    let stride = (table.len() / steps).max(1);
    let mut sigmas: Vec<f64> = table.iter().skip(1).step_by(stride).copied().collect();
    sigmas.reverse();
    Ok(terminated(&sigmas))
}

/// Beta-distribution spacing over timesteps ("Beta Sampling is All You Need", Lee et al. 2024).
///
/// Quantiles at `1 - i/steps` are rounded to table indices; consecutive
/// duplicates are dropped, so the schedule may be shorter than `steps + 1`.
pub fn beta(
    steps: usize,
    _range: &SigmaRange,
    config: &ScheduleConfig,
    host: &dyn HostModel,
) -> Result<Sigmas> {
    let table = native_table(host)?;
    let (alpha, beta) = (config.beta_dist_alpha, config.beta_dist_beta);
    let dist = Beta::new(alpha, beta)
        .map_err(|e| ScheduleError::Distribution(format!("beta({alpha}, {beta}): {e}")))?;

    let total = (table.len() - 1) as f64;
    let mut sigmas = Vec::with_capacity(steps);
    let mut last_t = None;
    for i in 0..steps {
        let q = 1.0 - i as f64 / steps as f64;
        let t = (beta_quantile(&dist, q) * total).round_ties_even().clamp(0.0, total);
        if last_t != Some(t) {
            sigmas.push(table[t as usize]);
        }
        last_t = Some(t);
    }
    Ok(terminated(&sigmas))
}

fn beta_quantile(dist: &Beta, q: f64) -> f64 {
    if q <= 0.0 {
        return 0.0;
    }
    if q >= 1.0 {
        return 1.0;
    }
    let (mut low, mut high) = (0.0, 1.0);
    for _ in 0..QUANTILE_ITERS {
        let mid = 0.5 * (low + high);
        if dist.cdf(mid) >= q {
            high = mid;
        } else {
            low = mid;
        }
    }
    0.5 * (low + high)
}

/// Evenly spaced integer timesteps in `[0, 999]`, noisiest first.
pub fn turbo(
    steps: usize,
    _range: &SigmaRange,
    _config: &ScheduleConfig,
    host: &dyn HostModel,
) -> Result<Sigmas> {
    native_table(host)?;
    if steps == 0 {
        return Ok(terminated(&[]));
    }
    let spacing = TURBO_TIMESTEPS / steps as f64;
    let sigmas: Vec<f64> = (1..=steps)
        .rev()
        .map(|i| {
            let t = (i as f64 * spacing - 1.0)
                .round_ties_even()
                .clamp(0.0, TURBO_TIMESTEPS - 1.0);
            host.timestep_to_sigma(t as usize)
        })
        .collect();
    Ok(terminated(&sigmas))
}
