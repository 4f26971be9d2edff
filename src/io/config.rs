//! Read `ScheduleConfig` from a JSON file.
//!
//! The file may name any subset of fields; the rest keep their defaults.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::domain::ScheduleConfig;
use crate::error::{Result, ScheduleError};

pub fn read_config_json(path: &Path) -> Result<ScheduleConfig> {
    let file = File::open(path).map_err(|e| {
        ScheduleError::Io(format!("Failed to open config JSON '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        ScheduleError::Config(format!("Invalid config JSON '{}': {e}", path.display()))
    })
}
