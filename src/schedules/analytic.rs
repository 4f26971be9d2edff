//! Self-contained schedules.
//!
//! Each function maps `(steps, range, config)` to a terminated schedule using a
//! closed-form curve. None of them touch a host model.
//!
//! Shared conventions:
//!
//! - `x` is `linspace(0, 1, steps)` unless stated otherwise
//! - the curve is evaluated for `steps` points and a terminal `0.0` is appended
//! - `steps == 0` yields `[0.0]`

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use nalgebra::DVector;

use crate::domain::{ScheduleConfig, SigmaRange, Sigmas, append_zero, terminated};
use crate::error::Result;
use crate::math::linspace;

/// Keeps `ln` finite at the Laplace quantile endpoints.
const LAPLACE_EPS: f64 = 1e-5;

fn ramp(start: f64, end: f64, steps: usize) -> DVector<f64> {
    DVector::from_vec(linspace(start, end, steps))
}

/// Karras et al. (2022) power-law ramp.
pub fn karras(steps: usize, range: &SigmaRange, config: &ScheduleConfig) -> Result<Sigmas> {
    Ok(karras_with_rho(steps, range, config.karras_rho))
}

pub fn karras_with_rho(steps: usize, range: &SigmaRange, rho: f64) -> Sigmas {
    let min_inv_rho = range.min().powf(1.0 / rho);
    let max_inv_rho = range.max().powf(1.0 / rho);
    let sigmas =
        ramp(0.0, 1.0, steps).map(|t| (max_inv_rho + t * (min_inv_rho - max_inv_rho)).powf(rho));
    append_zero(&sigmas)
}

/// Log-linear ramp, optionally bent by `exp(shrink · x)`.
pub fn exponential(steps: usize, range: &SigmaRange, config: &ScheduleConfig) -> Result<Sigmas> {
    let shrink = config.exponential_shrink_factor;
    let log_linear = ramp(range.max().ln(), range.min().ln(), steps).map(f64::exp);
    let bend = ramp(0.0, 1.0, steps).map(|x| (shrink * x).exp());
    Ok(append_zero(&log_linear.component_mul(&bend)))
}

/// Log-linear ramp with the position warped by a power law.
pub fn polyexponential(
    steps: usize,
    range: &SigmaRange,
    config: &ScheduleConfig,
) -> Result<Sigmas> {
    let rho = config.polyexponential_rho;
    let ln_min = range.min().ln();
    let ln_max = range.max().ln();
    let sigmas = ramp(1.0, 0.0, steps).map(|r| (r.powf(rho) * (ln_max - ln_min) + ln_min).exp());
    Ok(append_zero(&sigmas))
}

/// Shape `curve(x) ∈ [min, max]` as `max · (curve(x) / max)^exponent(x)`.
fn scaled_power<C, E>(steps: usize, range: &SigmaRange, curve: C, exponent: E) -> Sigmas
where
    C: Fn(f64) -> f64,
    E: Fn(f64) -> f64,
{
    let (min, max) = (range.min(), range.max());
    let sigmas = ramp(0.0, 1.0, steps).map(|x| {
        let base = (min + (max - min) * curve(x)) / max;
        base.powf(exponent(x)) * max
    });
    append_zero(&sigmas)
}

pub fn sinusoidal_sf(steps: usize, range: &SigmaRange, config: &ScheduleConfig) -> Result<Sigmas> {
    let sf = config.sinusoidal_sf_factor;
    Ok(scaled_power(steps, range, |x| 1.0 - (FRAC_PI_2 * x).sin(), |_| sf))
}

pub fn invcosinusoidal_sf(
    steps: usize,
    range: &SigmaRange,
    config: &ScheduleConfig,
) -> Result<Sigmas> {
    let sf = config.invcosinusoidal_sf_factor;
    Ok(scaled_power(steps, range, |x| 0.5 * ((x * PI).cos() + 1.0), |_| sf))
}

/// Quarter-cosine curve whose exponent grows linearly from 0 to `sf`.
///
/// Not monotone for every `sf`: early steps stay close to `max` while the
/// exponent is small.
pub fn react_cosinusoidal_dynsf(
    steps: usize,
    range: &SigmaRange,
    config: &ScheduleConfig,
) -> Result<Sigmas> {
    let sf = config.react_cosinusoidal_dynsf_factor;
    Ok(scaled_power(steps, range, |x| (x * FRAC_PI_2).cos(), |x| sf * x))
}

/// Kullback-Leibler optimal spacing: linear in `atan(σ)`.
pub fn kl_optimal(steps: usize, range: &SigmaRange, _config: &ScheduleConfig) -> Result<Sigmas> {
    if steps == 0 {
        return Ok(terminated(&[]));
    }
    let alpha_min = range.min().atan();
    let alpha_max = range.max().atan();
    let n = steps as f64;
    let sigmas = DVector::from_iterator(
        steps + 1,
        (0..=steps).map(|step| {
            if step == steps {
                return 0.0;
            }
            let w = step as f64 / n;
            (w * alpha_min + (1.0 - w) * alpha_max).tan()
        }),
    );
    Ok(sigmas)
}

/// Half-cosine easing from `max` (p = 0) to `min` (p = 1), with `√p` pacing.
fn cosine_ease(range: &SigmaRange, p: f64) -> f64 {
    let (min, max) = (range.min(), range.max());
    min + 0.5 * (max - min) * (1.0 - (PI * (1.0 - p.sqrt())).cos())
}

/// Evaluate `f(x, p)` for `p = x / (steps - 1)`; a single step collapses to `√max`.
fn per_step<F>(steps: usize, range: &SigmaRange, mut f: F) -> Sigmas
where
    F: FnMut(usize, f64) -> f64,
{
    match steps {
        0 => terminated(&[]),
        1 => terminated(&[range.max().sqrt()]),
        _ => {
            let last = (steps - 1) as f64;
            let values: Vec<f64> = (0..steps).map(|x| f(x, x as f64 / last)).collect();
            terminated(&values)
        }
    }
}

pub fn cosine(steps: usize, range: &SigmaRange, config: &ScheduleConfig) -> Result<Sigmas> {
    let sf = config.cosine_sf_factor;
    Ok(per_step(steps, range, |_, p| cosine_ease(range, p) * sf))
}

/// Cosine easing pulled toward an exponentially decaying envelope as `p → 1`.
pub fn cosine_exponential_blend(
    steps: usize,
    range: &SigmaRange,
    config: &ScheduleConfig,
) -> Result<Sigmas> {
    let decay_per_step = if steps > 1 {
        config.cosexpblend_exp_decay.powf(1.0 / (steps - 1) as f64)
    } else {
        1.0
    };
    let mut envelope = range.max();
    Ok(per_step(steps, range, |_, p| {
        let c = cosine_ease(range, p);
        let sigma = c + p * (envelope - c);
        envelope *= decay_per_step;
        sigma
    }))
}

/// Power-law descent with exponent `φ^power` (φ = golden ratio).
pub fn phi(steps: usize, range: &SigmaRange, config: &ScheduleConfig) -> Result<Sigmas> {
    let golden = (1.0 + 5f64.sqrt()) / 2.0;
    let exponent = golden.powf(config.phi_power);
    let (min, max) = (range.min(), range.max());
    Ok(per_step(steps, range, |_, p| min + (max - min) * (1.0 - p).powf(exponent)))
}

/// Sign with `sign(0) = 0`, unlike `f64::signum`.
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Laplace-distribution quantiles of `ln σ`, clamped to the range.
pub fn laplace(steps: usize, range: &SigmaRange, config: &ScheduleConfig) -> Result<Sigmas> {
    let (mu, beta) = (config.laplace_mu, config.laplace_beta);
    let sigmas = ramp(0.0, 1.0, steps).map(|x| {
        let d = 0.5 - x;
        let lambda = mu - beta * sign(d) * (1.0 - 2.0 * d.abs() + LAPLACE_EPS).ln();
        lambda.exp().clamp(range.min(), range.max())
    });
    Ok(append_zero(&sigmas))
}

/// Karras ramp whose exponent oscillates as `ρ + 2·cos(2π i / steps)`.
///
/// Not monotone by construction, and the first value is `max^((ρ + 2)/ρ)`
/// rather than `max`.
pub fn karras_dynamic(steps: usize, range: &SigmaRange, config: &ScheduleConfig) -> Result<Sigmas> {
    let rho = config.karras_dynamic_rho;
    let min_inv_rho = range.min().powf(1.0 / rho);
    let max_inv_rho = range.max().powf(1.0 / rho);
    let n = steps as f64;
    let values: Vec<f64> = linspace(0.0, 1.0, steps)
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let exponent = (i as f64 * TAU / n).cos() * 2.0 + rho;
            (max_inv_rho + r * (min_inv_rho - max_inv_rho)).powf(exponent)
        })
        .collect();
    Ok(terminated(&values))
}
