use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors surfaced by schedule lookup and generation.
///
/// Each variant maps to a process exit code so the `sigmas` binary can report
/// failures the same way regardless of where they originate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("Unknown schedule '{key}'.")]
    UnknownSchedule { key: String },

    #[error("The automatic schedule defers to the sampler and has no generator.")]
    Automatic,

    #[error("Schedule '{id}' requires a host model but none was provided.")]
    MissingHostModel { id: String },

    #[error(
        "Invalid sigma range: min={sigma_min}, max={sigma_max} (must be finite, >0, and min<=max)."
    )]
    InvalidRange { sigma_min: f64, sigma_max: f64 },

    #[error("Requested {steps} steps but the host sigma table only has {len} entries.")]
    StepsExceedTable { steps: usize, len: usize },

    #[error("Host model exposes an empty sigma table.")]
    EmptyHostTable,

    #[error("Distribution error: {0}")]
    Distribution(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl ScheduleError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ScheduleError::UnknownSchedule { .. }
            | ScheduleError::Automatic
            | ScheduleError::InvalidRange { .. }
            | ScheduleError::Distribution(_)
            | ScheduleError::Config(_) => 2,
            ScheduleError::MissingHostModel { .. }
            | ScheduleError::StepsExceedTable { .. }
            | ScheduleError::EmptyHostTable => 3,
            ScheduleError::Io(_) => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_category() {
        let unknown = ScheduleError::UnknownSchedule { key: "nope".to_string() };
        assert_eq!(unknown.exit_code(), 2);
        let missing = ScheduleError::MissingHostModel { id: "ddim".to_string() };
        assert_eq!(missing.exit_code(), 3);
        assert_eq!(ScheduleError::Io("disk full".to_string()).exit_code(), 4);
    }

    #[test]
    fn messages_name_the_offending_key() {
        let err = ScheduleError::UnknownSchedule { key: "foo".to_string() };
        assert_eq!(err.to_string(), "Unknown schedule 'foo'.");
    }
}
