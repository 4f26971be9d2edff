//! Discrete-timestep host model.
//!
//! A reference `HostModel` for epsilon-prediction checkpoints trained on a
//! fixed number of timesteps:
//!
//! - `σ_t = sqrt((1 - ᾱ_t) / ᾱ_t)` from the cumulative product of `1 - β_t`
//! - sigma ↔ timestep conversion interpolates linearly in `ln σ`
//!
//! Used by the `sigmas` binary and the tests; real integrations implement
//! `HostModel` on their own model wrapper.

use crate::error::{Result, ScheduleError};
use crate::host::HostModel;
use crate::math::linspace;

/// Training timesteps of the Stable Diffusion family.
pub const TRAIN_TIMESTEPS: usize = 1000;
/// Scaled-linear beta schedule bounds of the Stable Diffusion family.
pub const BETA_START: f64 = 0.00085;
pub const BETA_END: f64 = 0.012;

#[derive(Debug, Clone)]
pub struct DiscreteHostModel {
    sigmas: Vec<f64>,
    log_sigmas: Vec<f64>,
}

impl DiscreteHostModel {
    /// The Stable Diffusion training schedule (1000 scaled-linear steps).
    pub fn stable_diffusion() -> Self {
        Self::from_parts(scaled_linear_sigmas(TRAIN_TIMESTEPS, BETA_START, BETA_END))
    }

    /// Build from a scaled-linear beta schedule: `β = linspace(√start, √end, n)²`.
    ///
    /// Needs at least two timesteps and `0 < beta_start <= beta_end < 1`.
    pub fn scaled_linear(timesteps: usize, beta_start: f64, beta_end: f64) -> Result<Self> {
        if timesteps < 2 {
            return Err(ScheduleError::Config(format!(
                "Scaled-linear host needs at least two timesteps, got {timesteps}."
            )));
        }
        let valid = beta_start.is_finite()
            && beta_end.is_finite()
            && beta_start > 0.0
            && beta_start <= beta_end
            && beta_end < 1.0;
        if !valid {
            return Err(ScheduleError::Config(format!(
                "Invalid beta bounds: start={beta_start}, end={beta_end} (need 0<start<=end<1)."
            )));
        }
        Self::from_sigmas(scaled_linear_sigmas(timesteps, beta_start, beta_end))
    }

    /// Build from an explicit table (ascending, positive, at least two entries).
    pub fn from_sigmas(sigmas: Vec<f64>) -> Result<Self> {
        if sigmas.len() < 2 {
            return Err(ScheduleError::Config(
                "Host sigma table needs at least two entries.".to_string(),
            ));
        }
        if !sigmas.iter().all(|s| s.is_finite() && *s > 0.0) {
            return Err(ScheduleError::Config(
                "Host sigma table must be finite and positive.".to_string(),
            ));
        }
        if !sigmas.windows(2).all(|w| w[0] <= w[1]) {
            return Err(ScheduleError::Config(
                "Host sigma table must ascend with the timestep index.".to_string(),
            ));
        }
        Ok(Self::from_parts(sigmas))
    }

    fn from_parts(sigmas: Vec<f64>) -> Self {
        let log_sigmas = sigmas.iter().map(|s| s.ln()).collect();
        Self { sigmas, log_sigmas }
    }

    pub fn sigma_min(&self) -> f64 {
        self.sigmas.first().copied().unwrap_or(0.0)
    }

    pub fn sigma_max(&self) -> f64 {
        self.sigmas.last().copied().unwrap_or(0.0)
    }
}

impl HostModel for DiscreteHostModel {
    fn sigma_to_t(&self, sigma: f64) -> f64 {
        let len = self.log_sigmas.len();
        if len < 2 {
            return 0.0;
        }
        let log_sigma = sigma.ln();

        // Last index whose log-sigma is <= the query, kept one short of the end.
        let below = self.log_sigmas.partition_point(|&ls| ls <= log_sigma);
        let low_idx = below.saturating_sub(1).min(len - 2);
        let high_idx = low_idx + 1;

        let low = self.log_sigmas[low_idx];
        let high = self.log_sigmas[high_idx];
        let w = if low == high {
            0.0
        } else {
            ((low - log_sigma) / (low - high)).clamp(0.0, 1.0)
        };
        (1.0 - w) * low_idx as f64 + w * high_idx as f64
    }

    fn t_to_sigma(&self, t: f64) -> f64 {
        let last = self.log_sigmas.len().saturating_sub(1);
        let t = t.clamp(0.0, last as f64);
        let low_idx = t.floor() as usize;
        let high_idx = (t.ceil() as usize).min(last);
        let w = t - t.floor();
        ((1.0 - w) * self.log_sigmas[low_idx] + w * self.log_sigmas[high_idx]).exp()
    }

    fn native_sigma_table(&self) -> &[f64] {
        &self.sigmas
    }
}

fn scaled_linear_sigmas(timesteps: usize, beta_start: f64, beta_end: f64) -> Vec<f64> {
    let mut alpha_cumprod = 1.0;
    linspace(beta_start.sqrt(), beta_end.sqrt(), timesteps)
        .into_iter()
        .map(|b| {
            alpha_cumprod *= 1.0 - b * b;
            ((1.0 - alpha_cumprod) / alpha_cumprod).sqrt()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_diffusion_table_bounds() {
        let host = DiscreteHostModel::stable_diffusion();
        assert_eq!(host.native_sigma_table().len(), TRAIN_TIMESTEPS);
        assert!((host.sigma_min() - 0.0292).abs() < 1e-3, "min={}", host.sigma_min());
        assert!((host.sigma_max() - 14.6146).abs() < 1e-2, "max={}", host.sigma_max());
        assert!(host.native_sigma_table().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn conversions_round_trip_inside_table() {
        let host = DiscreteHostModel::stable_diffusion();
        for &sigma in &[0.05, 0.3, 1.0, 4.2, 12.0] {
            let t = host.sigma_to_t(sigma);
            let back = host.t_to_sigma(t);
            assert!((back - sigma).abs() / sigma < 1e-9, "{sigma} -> {t} -> {back}");
        }
    }

    #[test]
    fn integer_timesteps_hit_table_entries() {
        let host = DiscreteHostModel::stable_diffusion();
        let table = host.native_sigma_table();
        for t in [0usize, 1, 500, 999] {
            assert!((host.timestep_to_sigma(t) - table[t]).abs() < 1e-12);
        }
        assert!((host.sigma_to_t(table[250]) - 250.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_queries_clamp() {
        let host = DiscreteHostModel::stable_diffusion();
        assert_eq!(host.sigma_to_t(1e-6), 0.0);
        assert_eq!(host.sigma_to_t(1e6), 999.0);
        assert!((host.t_to_sigma(5000.0) - host.sigma_max()).abs() < 1e-12);
    }

    #[test]
    fn get_sigmas_spans_table_and_terminates() {
        let host = DiscreteHostModel::stable_diffusion();
        let sigmas = host.get_sigmas(10);
        assert_eq!(sigmas.len(), 11);
        assert!((sigmas[0] - host.sigma_max()).abs() < 1e-12);
        assert!((sigmas[9] - host.sigma_min()).abs() < 1e-12);
        assert_eq!(sigmas[10], 0.0);
    }

    #[test]
    fn from_sigmas_rejects_descending_tables() {
        assert!(DiscreteHostModel::from_sigmas(vec![3.0, 2.0, 1.0]).is_err());
        assert!(DiscreteHostModel::from_sigmas(vec![1.0]).is_err());
        assert!(DiscreteHostModel::from_sigmas(vec![0.1, 1.0, 2.0]).is_ok());
    }

    #[test]
    fn scaled_linear_rejects_degenerate_schedules() {
        for timesteps in [0, 1] {
            let err =
                DiscreteHostModel::scaled_linear(timesteps, BETA_START, BETA_END).unwrap_err();
            assert!(matches!(err, ScheduleError::Config(_)), "{timesteps}: {err:?}");
        }
        assert!(DiscreteHostModel::scaled_linear(10, 0.0, BETA_END).is_err());
        assert!(DiscreteHostModel::scaled_linear(10, BETA_END, BETA_START).is_err());
        assert!(DiscreteHostModel::scaled_linear(10, BETA_START, 1.0).is_err());
    }

    #[test]
    fn scaled_linear_matches_the_stable_diffusion_table() {
        let custom =
            DiscreteHostModel::scaled_linear(TRAIN_TIMESTEPS, BETA_START, BETA_END).unwrap();
        let reference = DiscreteHostModel::stable_diffusion();
        assert_eq!(custom.native_sigma_table(), reference.native_sigma_table());

        let short = DiscreteHostModel::scaled_linear(2, BETA_START, BETA_END).unwrap();
        assert_eq!(short.native_sigma_table().len(), 2);
    }
}
