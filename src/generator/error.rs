//! Error types for the generator module

use thiserror::Error;

/// Result type for generator operations
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Generator-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneratorError {
    /// A configured bound is inconsistent
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    /// Wall-clock input is not `HH:MM`
    #[error("Invalid time '{input}': expected HH:MM")]
    InvalidTime { input: String },

    /// Date outside the calendar
    #[error("Invalid date {year}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// The month has fewer eligible weekdays than the minimum workday count
    #[error("At least {requested} workdays requested but only {available} eligible days exist")]
    InsufficientEligibleDays { requested: u32, available: usize },

    /// The attempt budget ran out before the monthly minimum was reached
    #[error(
        "No valid schedule found after {attempts} attempts \
         (best total {best_total:.2}h, minimum {min_hours:.2}h)"
    )]
    Unsatisfiable {
        attempts: u32,
        best_total: f64,
        min_hours: f64,
    },
}

impl GeneratorError {
    /// Create an invalid configuration error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid date error
    pub fn invalid_date(year: i32, month: u32, day: u32) -> Self {
        Self::InvalidDate { year, month, day }
    }

    /// Only an exhausted attempt budget is worth a fresh generation
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Unsatisfiable { .. })
    }

    /// Errors caused by the input bounds rather than by chance
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. }
                | Self::InvalidTime { .. }
                | Self::InsufficientEligibleDays { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsatisfiable_message() {
        let err = GeneratorError::Unsatisfiable {
            attempts: 1000,
            best_total: 12.5,
            min_hours: 100.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("1000 attempts"));
        assert!(msg.contains("12.50h"));
        assert!(msg.contains("100.00h"));
    }

    #[test]
    fn test_insufficient_days_message() {
        let err = GeneratorError::InsufficientEligibleDays {
            requested: 25,
            available: 21,
        };
        assert!(err.to_string().contains("25"));
        assert!(err.to_string().contains("21"));
    }

    #[test]
    fn test_is_recoverable() {
        let unsatisfiable = GeneratorError::Unsatisfiable {
            attempts: 10,
            best_total: 0.0,
            min_hours: 1.0,
        };
        assert!(unsatisfiable.is_recoverable());
        assert!(!unsatisfiable.is_config_error());

        let insufficient = GeneratorError::InsufficientEligibleDays {
            requested: 5,
            available: 2,
        };
        assert!(!insufficient.is_recoverable());
        assert!(insufficient.is_config_error());

        assert!(!GeneratorError::invalid_date(2024, 2, 30).is_config_error());
    }
}
