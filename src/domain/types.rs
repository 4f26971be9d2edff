//! Shared domain types.
//!
//! These types are intentionally small:
//!
//! - `Sigmas` is the vector every generator returns
//! - `SigmaRange` is the validated `(sigma_min, sigma_max)` pair
//! - `ModelFamily` selects between checkpoint-specific empirical tables

use clap::ValueEnum;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// An ordered sequence of noise levels, normally ending in a terminal `0.0`.
pub type Sigmas = DVector<f64>;

/// Append the terminal `0.0` to a schedule.
pub fn append_zero(sigmas: &DVector<f64>) -> Sigmas {
    DVector::from_iterator(
        sigmas.len() + 1,
        sigmas.iter().copied().chain(std::iter::once(0.0)),
    )
}

/// Build a terminated schedule from plain values.
pub fn terminated(values: &[f64]) -> Sigmas {
    append_zero(&DVector::from_row_slice(values))
}

/// Validated sigma bounds.
///
/// Both bounds are finite and strictly positive with `min <= max`, so log-space
/// generators never see `ln(0)` and the clamping generators never see an
/// inverted interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SigmaRange {
    min: f64,
    max: f64,
}

impl SigmaRange {
    pub fn new(sigma_min: f64, sigma_max: f64) -> Result<Self> {
        let valid = sigma_min.is_finite()
            && sigma_max.is_finite()
            && sigma_min > 0.0
            && sigma_max >= sigma_min;
        if !valid {
            return Err(ScheduleError::InvalidRange { sigma_min, sigma_max });
        }
        Ok(Self {
            min: sigma_min,
            max: sigma_max,
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

/// Checkpoint family, used to pick the align-your-steps tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamily {
    /// SD 1.x style checkpoints (also the fallback for unknown models).
    #[default]
    Sd15,
    /// SDXL-class checkpoints.
    Sdxl,
}

impl ModelFamily {
    pub fn display_name(self) -> &'static str {
        match self {
            ModelFamily::Sd15 => "SD 1.5",
            ModelFamily::Sdxl => "SDXL",
        }
    }
}
