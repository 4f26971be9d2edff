//! Align-your-steps family: empirically tuned tables resampled to the step count.
//!
//! Tables come from NVIDIA's "Align Your Steps" (Sabour et al. 2024) and the
//! GITS search results, one per checkpoint family. A table is used verbatim
//! when its length equals the step count, otherwise it is resampled with
//! `math::loglinear_interp`.

use thiserror::Error;
use tracing::warn;

use crate::domain::{ModelFamily, ScheduleConfig, SigmaRange, Sigmas, terminated};
use crate::error::Result;
use crate::math::loglinear_interp;

/// Per-family sigma tables, noisiest first.
#[derive(Debug, Clone, Copy)]
pub struct FamilyTables {
    pub sd15: &'static [f64],
    pub sdxl: &'static [f64],
}

impl FamilyTables {
    pub fn for_family(&self, family: ModelFamily) -> &'static [f64] {
        match family {
            ModelFamily::Sd15 => self.sd15,
            ModelFamily::Sdxl => self.sdxl,
        }
    }
}

pub const AYS_11: FamilyTables = FamilyTables {
    sd15: &[14.615, 6.475, 3.861, 2.697, 1.886, 1.396, 0.963, 0.652, 0.399, 0.152, 0.029],
    sdxl: &[14.615, 6.315, 3.771, 2.181, 1.342, 0.862, 0.555, 0.380, 0.234, 0.113, 0.029],
};

pub const GITS: FamilyTables = FamilyTables {
    sd15: &[14.615, 4.617, 2.507, 1.236, 0.702, 0.402, 0.240, 0.156, 0.104, 0.094, 0.029],
    sdxl: &[14.615, 4.734, 2.567, 1.529, 0.987, 0.652, 0.418, 0.268, 0.179, 0.127, 0.029],
};

pub const AYS_32: FamilyTables = FamilyTables {
    sd15: &[
        14.615, 11.23951352, 8.64363081, 6.64729424, 5.57250862, 4.71648546, 3.99196065,
        3.5195609, 3.13490466, 2.79228788, 2.48773628, 2.21663865, 1.97508351, 1.7793172,
        1.61475335, 1.46540953, 1.314849, 1.16642497, 1.03475547, 0.91573744, 0.80748169,
        0.71202361, 0.621739, 0.53065202, 0.4529096, 0.37491455, 0.27461819, 0.2011529,
        0.14105873, 0.06682881, 0.03166121, 0.015,
    ],
    sdxl: &[
        14.615, 11.1491618, 8.50522127, 6.48827151, 5.43707402, 4.60398619, 3.89854704,
        3.27407457, 2.74396527, 2.29968659, 1.95448514, 1.67108715, 1.42878152, 1.23181009,
        1.06789649, 0.92579443, 0.80290886, 0.69660121, 0.60436903, 0.52852552, 0.46773344,
        0.41393379, 0.36258186, 0.31008517, 0.26518925, 0.22326461, 0.17653877, 0.13959192,
        0.10587381, 0.05519369, 0.02877334, 0.015,
    ],
};

/// Use `table` as-is when it already has `steps` entries, else resample it.
pub fn resample_table(table: &[f64], steps: usize) -> Sigmas {
    if steps == table.len() {
        terminated(table)
    } else {
        terminated(&loglinear_interp(table, steps))
    }
}

pub fn align_your_steps(
    steps: usize,
    _range: &SigmaRange,
    config: &ScheduleConfig,
) -> Result<Sigmas> {
    Ok(resample_table(AYS_11.for_family(config.model_family), steps))
}

pub fn align_your_steps_gits(
    steps: usize,
    _range: &SigmaRange,
    config: &ScheduleConfig,
) -> Result<Sigmas> {
    Ok(resample_table(GITS.for_family(config.model_family), steps))
}

pub fn align_your_steps_32(
    steps: usize,
    _range: &SigmaRange,
    config: &ScheduleConfig,
) -> Result<Sigmas> {
    Ok(resample_table(AYS_32.for_family(config.model_family), steps))
}

/// Why a custom sigma list was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CustomSigmaError {
    #[error("custom sigma list is empty")]
    Empty,
    #[error("'{token}' is not a number")]
    NotANumber { token: String },
    #[error("{value} is not a positive finite sigma")]
    OutOfDomain { value: f64 },
}

/// Parse `"[a, b, c]"` / `"a, b, c"` into a sigma table.
pub fn parse_sigma_list(raw: &str) -> std::result::Result<Vec<f64>, CustomSigmaError> {
    let body = raw.trim().trim_matches(|c: char| c == '[' || c == ']').trim();
    if body.is_empty() {
        return Err(CustomSigmaError::Empty);
    }

    body.split(',')
        .map(|token| {
            let token = token.trim();
            let value: f64 = token.parse().map_err(|_| CustomSigmaError::NotANumber {
                token: token.to_string(),
            })?;
            if !(value.is_finite() && value > 0.0) {
                return Err(CustomSigmaError::OutOfDomain { value });
            }
            Ok(value)
        })
        .collect()
}

/// User-supplied table from `ays_custom_sigmas`.
///
/// Never fails on bad input: a list that does not parse is logged and replaced
/// by the `align_your_steps` table for the same step count.
pub fn align_your_steps_custom(
    steps: usize,
    range: &SigmaRange,
    config: &ScheduleConfig,
) -> Result<Sigmas> {
    match parse_sigma_list(&config.ays_custom_sigmas) {
        Ok(table) => Ok(resample_table(&table, steps)),
        Err(reason) => {
            warn!(
                %reason,
                raw = %config.ays_custom_sigmas,
                "invalid custom sigmas, falling back to align_your_steps"
            );
            align_your_steps(steps, range, config)
        }
    }
}
