//! Host model capability.
//!
//! Some schedules re-index or resample the sigma table of the model being
//! sampled instead of deriving sigmas analytically. They only ever see the model
//! through this trait.

use nalgebra::DVector;

use crate::domain::{Sigmas, append_zero};
use crate::math::linspace;

pub mod discrete;

pub use discrete::*;

pub trait HostModel {
    /// Map a noise level to the model's (continuous) timestep.
    fn sigma_to_t(&self, sigma: f64) -> f64;

    /// Map a (continuous) timestep back to a noise level.
    fn t_to_sigma(&self, t: f64) -> f64;

    /// The model's native sigma table, indexed by training timestep.
    ///
    /// Index 0 is the least noisy timestep, so values ascend with the index.
    fn native_sigma_table(&self) -> &[f64];

    /// Sigma at an integer training timestep.
    fn timestep_to_sigma(&self, timestep: usize) -> f64 {
        self.t_to_sigma(timestep as f64)
    }

    /// The host's own uniform schedule: `n` timesteps from the last table index
    /// down to 0, converted to sigmas and terminated with `0.0`.
    fn get_sigmas(&self, n: usize) -> Sigmas {
        let t_max = self.native_sigma_table().len().saturating_sub(1) as f64;
        let timesteps = linspace(t_max, 0.0, n);
        let sigmas = DVector::from_iterator(
            timesteps.len(),
            timesteps.iter().map(|&t| self.t_to_sigma(t)),
        );
        append_zero(&sigmas)
    }
}
