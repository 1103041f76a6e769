//! Unified error handling for the stundenzettel crate
//!
//! Domain errors are folded into a single [`Error`] enum so that the month
//! processor and the binary can decide uniformly whether a failure is worth
//! another generation.
//!
//! - [`TimesheetErrorTrait`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub use crate::generator::error::GeneratorError;

/// Common trait for all stundenzettel error types
pub trait TimesheetErrorTrait: std::error::Error {
    /// Check if this error is recoverable (another generation may succeed)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Inconsistent bounds or unusable input
    Config,
    /// Calendar data unavailable
    Calendar,
    /// Sampling did not converge
    Generation,
    /// Writing export files
    Storage,
    /// Rendering export formats
    Export,
}

impl ErrorCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config => "configuration error",
            Self::Calendar => "calendar error",
            Self::Generation => "generation error",
            Self::Storage => "storage error",
            Self::Export => "export error",
        }
    }
}

impl TimesheetErrorTrait for GeneratorError {
    fn is_recoverable(&self) -> bool {
        GeneratorError::is_recoverable(self)
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfig { .. }
            | Self::InvalidTime { .. }
            | Self::InsufficientEligibleDays { .. } => ErrorCategory::Config,
            Self::InvalidDate { .. } => ErrorCategory::Calendar,
            Self::Unsatisfiable { .. } => ErrorCategory::Generation,
        }
    }
}

/// Unified error type for the stundenzettel crate
#[derive(Error, Debug)]
pub enum Error {
    /// Schedule generation errors
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// Filesystem errors with the affected path
    #[error("I/O error on {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Template registration errors
    #[error("Template error: {0}")]
    TemplateSyntax(#[from] handlebars::TemplateError),

    /// Template rendering errors
    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),
}

impl TimesheetErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Generator(e) => e.is_recoverable(),
            Self::Storage { .. } => false,
            Self::Json(_) => false,
            Self::TemplateSyntax(_) => false,
            Self::Template(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Generator(e) => TimesheetErrorTrait::category(e),
            Self::Storage { .. } => ErrorCategory::Storage,
            Self::Json(_) | Self::TemplateSyntax(_) | Self::Template(_) => ErrorCategory::Export,
        }
    }
}

impl Error {
    /// Create a filesystem error for `path`
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn unsatisfiable() -> GeneratorError {
        GeneratorError::Unsatisfiable {
            attempts: 1000,
            best_total: 9.5,
            min_hours: 15.0,
        }
    }

    #[test]
    fn test_error_category() {
        let err = Error::Generator(unsatisfiable());
        assert_eq!(err.category(), ErrorCategory::Generation);

        let err = Error::Generator(GeneratorError::InsufficientEligibleDays {
            requested: 25,
            available: 21,
        });
        assert_eq!(err.category(), ErrorCategory::Config);

        let err = Error::Generator(GeneratorError::invalid_date(2024, 13, 1));
        assert_eq!(err.category(), ErrorCategory::Calendar);

        let err = Error::storage("out.csv", io::Error::new(io::ErrorKind::Other, "disk"));
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.category().label(), "storage error");
    }

    #[test]
    fn test_is_recoverable() {
        assert!(Error::Generator(unsatisfiable()).is_recoverable());
        assert!(!Error::storage("x", io::Error::new(io::ErrorKind::Other, "disk")).is_recoverable());
    }

    #[test]
    fn test_error_conversion() {
        let unified: Error = unsatisfiable().into();
        assert!(matches!(unified, Error::Generator(_)));
        assert!(unified.to_string().contains("1000 attempts"));
    }

    #[test]
    fn test_storage_error_names_path() {
        let err = Error::storage(
            "Stundenzettel 2024/Stundenzettel_2024_02.csv",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("Stundenzettel_2024_02.csv"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_template_syntax_is_export_error() {
        let mut handlebars = handlebars::Handlebars::new();
        let err: Error = handlebars
            .register_template_string("broken", "{{#each rows}}")
            .unwrap_err()
            .into();
        assert_eq!(err.category(), ErrorCategory::Export);
        assert!(!err.is_recoverable());
    }
}
