//! Export a generated schedule to CSV.
//!
//! One row per entry, terminal zero included, so the file can be fed straight
//! into spreadsheets or a sampler that takes explicit sigmas.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::Sigmas;
use crate::error::{Result, ScheduleError};
use crate::schedules::ScheduleDescriptor;

/// Write `step,sigma,schedule` rows to `path`.
pub fn write_schedule_csv(
    path: &Path,
    descriptor: &ScheduleDescriptor,
    sigmas: &Sigmas,
) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        ScheduleError::Io(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;
    let mut out = BufWriter::new(file);
    write_schedule_rows(&mut out, descriptor, sigmas)?;
    out.flush()
        .map_err(|e| ScheduleError::Io(format!("Failed to flush export CSV: {e}")))
}

fn write_schedule_rows<W: Write>(
    out: &mut W,
    descriptor: &ScheduleDescriptor,
    sigmas: &Sigmas,
) -> Result<()> {
    writeln!(out, "step,sigma,schedule")
        .map_err(|e| ScheduleError::Io(format!("Failed to write export CSV header: {e}")))?;
    for (step, sigma) in sigmas.iter().enumerate() {
        writeln!(out, "{step},{sigma:.10},{}", descriptor.id)
            .map_err(|e| ScheduleError::Io(format!("Failed to write export CSV row: {e}")))?;
    }
    Ok(())
}
