//! Reporting: terminal tables and the JSON form of a generated schedule.

use serde::Serialize;

use crate::domain::{ModelFamily, SigmaRange, Sigmas};
use crate::error::{Result, ScheduleError};
use crate::schedules::ScheduleDescriptor;

pub mod format;

pub use format::*;

/// Everything `sigmas show --json` prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleReport {
    pub id: String,
    pub label: String,
    pub kind: String,
    pub steps: usize,
    pub sigma_min: f64,
    pub sigma_max: f64,
    pub model_family: ModelFamily,
    pub sigmas: Vec<f64>,
}

impl ScheduleReport {
    pub fn new(
        descriptor: &ScheduleDescriptor,
        steps: usize,
        range: &SigmaRange,
        family: ModelFamily,
        sigmas: &Sigmas,
    ) -> Self {
        Self {
            id: descriptor.id.to_string(),
            label: descriptor.label.to_string(),
            kind: descriptor.generator.kind_name().to_string(),
            steps,
            sigma_min: range.min(),
            sigma_max: range.max(),
            model_family: family,
            sigmas: sigmas.iter().copied().collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ScheduleError::Io(format!("Failed to serialize schedule report: {e}")))
    }
}
