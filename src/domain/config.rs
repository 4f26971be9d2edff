//! Tunable schedule parameters.
//!
//! Every generator reads its knobs from a `ScheduleConfig` passed at call time.
//! Values come from (lowest to highest precedence):
//!
//! - built-in defaults
//! - an optional JSON file (`io::read_config_json`)
//! - `SIGMAS_*` environment variables (a `.env` file is honored)
//! - CLI flags

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::ModelFamily;
use crate::error::{Result, ScheduleError};

/// Default list for `align_your_steps_custom` (the SDXL AYS table).
pub const DEFAULT_AYS_CUSTOM_SIGMAS: &str =
    "[14.615, 6.315, 3.771, 2.181, 1.342, 0.862, 0.555, 0.380, 0.234, 0.113, 0.029]";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Curvature exponent for `karras`.
    pub karras_rho: f64,
    /// Exponential growth applied on top of the log-linear ramp.
    pub exponential_shrink_factor: f64,
    /// Warp exponent for `polyexponential`.
    pub polyexponential_rho: f64,
    pub sinusoidal_sf_factor: f64,
    pub invcosinusoidal_sf_factor: f64,
    pub react_cosinusoidal_dynsf_factor: f64,
    pub cosine_sf_factor: f64,
    /// Total decay of the exponential leg in `cosine-exponential blend`.
    pub cosexpblend_exp_decay: f64,
    /// `phi` raises the golden ratio to this power to get its exponent.
    pub phi_power: f64,
    pub laplace_mu: f64,
    pub laplace_beta: f64,
    pub karras_dynamic_rho: f64,
    pub beta_dist_alpha: f64,
    pub beta_dist_beta: f64,
    /// Comma-separated sigma list, optionally wrapped in brackets.
    pub ays_custom_sigmas: String,
    /// Which empirical tables the align-your-steps family uses.
    pub model_family: ModelFamily,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            karras_rho: 7.0,
            exponential_shrink_factor: 0.0,
            polyexponential_rho: 1.0,
            sinusoidal_sf_factor: 3.5,
            invcosinusoidal_sf_factor: 3.5,
            react_cosinusoidal_dynsf_factor: 2.15,
            cosine_sf_factor: 1.0,
            cosexpblend_exp_decay: 0.9,
            phi_power: 2.0,
            laplace_mu: 0.0,
            laplace_beta: 0.5,
            karras_dynamic_rho: 7.0,
            beta_dist_alpha: 0.6,
            beta_dist_beta: 0.6,
            ays_custom_sigmas: DEFAULT_AYS_CUSTOM_SIGMAS.to_string(),
            model_family: ModelFamily::Sd15,
        }
    }
}

impl ScheduleConfig {
    /// Reject parameter values that would make some generator emit NaN/Inf.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.numeric_fields() {
            if !value.is_finite() {
                return Err(ScheduleError::Config(format!("{name} must be finite, got {value}.")));
            }
        }

        let positive = [
            ("karras_rho", self.karras_rho),
            ("polyexponential_rho", self.polyexponential_rho),
            ("karras_dynamic_rho", self.karras_dynamic_rho),
            ("cosexpblend_exp_decay", self.cosexpblend_exp_decay),
            ("beta_dist_alpha", self.beta_dist_alpha),
            ("beta_dist_beta", self.beta_dist_beta),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(ScheduleError::Config(format!("{name} must be > 0, got {value}.")));
            }
        }

        if self.laplace_beta < 0.0 {
            return Err(ScheduleError::Config(format!(
                "laplace_beta must be >= 0, got {}.",
                self.laplace_beta
            )));
        }

        Ok(())
    }

    /// Load `.env` (if present) and apply `SIGMAS_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        dotenvy::dotenv().ok();
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Keys are the field names upper-cased and prefixed with `SIGMAS_`
    /// (e.g. `SIGMAS_KARRAS_RHO`). Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        for (name, slot) in self.numeric_fields_mut() {
            let key = format!("SIGMAS_{}", name.to_uppercase());
            if let Some(raw) = read(&key) {
                *slot = raw
                    .parse::<f64>()
                    .map_err(|e| ScheduleError::Config(format!("{key}='{raw}': {e}")))?;
            }
        }

        if let Some(raw) = read("SIGMAS_AYS_CUSTOM_SIGMAS") {
            self.ays_custom_sigmas = raw;
        }
        if let Some(raw) = read("SIGMAS_MODEL_FAMILY") {
            self.model_family = ModelFamily::from_str(&raw, true)
                .map_err(|e| ScheduleError::Config(format!("SIGMAS_MODEL_FAMILY='{raw}': {e}")))?;
        }

        Ok(())
    }

    fn numeric_fields(&self) -> [(&'static str, f64); 14] {
        [
            ("karras_rho", self.karras_rho),
            ("exponential_shrink_factor", self.exponential_shrink_factor),
            ("polyexponential_rho", self.polyexponential_rho),
            ("sinusoidal_sf_factor", self.sinusoidal_sf_factor),
            ("invcosinusoidal_sf_factor", self.invcosinusoidal_sf_factor),
            ("react_cosinusoidal_dynsf_factor", self.react_cosinusoidal_dynsf_factor),
            ("cosine_sf_factor", self.cosine_sf_factor),
            ("cosexpblend_exp_decay", self.cosexpblend_exp_decay),
            ("phi_power", self.phi_power),
            ("laplace_mu", self.laplace_mu),
            ("laplace_beta", self.laplace_beta),
            ("karras_dynamic_rho", self.karras_dynamic_rho),
            ("beta_dist_alpha", self.beta_dist_alpha),
            ("beta_dist_beta", self.beta_dist_beta),
        ]
    }

    fn numeric_fields_mut(&mut self) -> [(&'static str, &mut f64); 14] {
        [
            ("karras_rho", &mut self.karras_rho),
            ("exponential_shrink_factor", &mut self.exponential_shrink_factor),
            ("polyexponential_rho", &mut self.polyexponential_rho),
            ("sinusoidal_sf_factor", &mut self.sinusoidal_sf_factor),
            ("invcosinusoidal_sf_factor", &mut self.invcosinusoidal_sf_factor),
            ("react_cosinusoidal_dynsf_factor", &mut self.react_cosinusoidal_dynsf_factor),
            ("cosine_sf_factor", &mut self.cosine_sf_factor),
            ("cosexpblend_exp_decay", &mut self.cosexpblend_exp_decay),
            ("phi_power", &mut self.phi_power),
            ("laplace_mu", &mut self.laplace_mu),
            ("laplace_beta", &mut self.laplace_beta),
            ("karras_dynamic_rho", &mut self.karras_dynamic_rho),
            ("beta_dist_alpha", &mut self.beta_dist_alpha),
            ("beta_dist_beta", &mut self.beta_dist_beta),
        ]
    }
}
