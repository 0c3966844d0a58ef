//! Unified error hierarchy for BrainRS
//!
//! The calculators themselves are total over numeric input; these errors come
//! from the opt-in validation entry points, timestamp parsing, data sources
//! and exports.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all BrainRS operations
#[derive(Debug, Error)]
pub enum BrainRsError {
    /// Schedule or workout validation errors
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Timestamp and clock parsing errors
    #[error("Time error: {0}")]
    Time(#[from] TimeError),

    /// Timeline data source errors
    #[error("Data source error: {0}")]
    Source(#[from] SourceError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid schedule or workout input, raised only by the checked entry points
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// An hour value is NaN or infinite
    #[error("Non-finite {field}: {value}")]
    NonFinite { field: &'static str, value: f64 },

    /// An hour value lies outside the 0-24 clock range
    #[error("{field} out of range [0, 24]: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    /// Wake time is not strictly before sleep time
    #[error("Wake hour {wake_hour} must be before sleep hour {sleep_hour}")]
    WakeNotBeforeSleep { wake_hour: f64, sleep_hour: f64 },

    /// Workout duration is negative
    #[error("Negative workout duration: {minutes} minutes")]
    NegativeDuration { minutes: f64 },

    /// Workout could not be parsed from its text form
    #[error("Invalid workout '{input}': {reason}")]
    InvalidWorkout { input: String, reason: String },
}

/// Timestamp and hour parsing errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimeError {
    /// Timestamp not in RFC 3339 or ISO-8601 naive form
    #[error("Invalid timestamp '{input}'")]
    InvalidTimestamp { input: String },

    /// Hour not a decimal number or HH:MM clock time
    #[error("Invalid hour '{input}'")]
    InvalidHour { input: String },
}

/// Timeline data source errors
#[derive(Debug, Error)]
pub enum SourceError {
    /// Source file does not exist
    #[error("Timeline file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Source file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source file is not a valid timeline document
    #[error("Malformed timeline document {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    /// Source has no data of the requested kind
    #[error("No {kind} available from {source_name}")]
    Missing {
        kind: &'static str,
        source_name: String,
    },
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// Unsupported export format
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// Serialization failure
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Chart rendering failure
    #[error("Chart rendering failed: {0}")]
    Render(String),

    /// IO failure while writing the export
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for BrainRS operations
pub type Result<T> = std::result::Result<T, BrainRsError>;

impl BrainRsError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BrainRsError::Source(SourceError::Read { .. }) | BrainRsError::Io(_)
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BrainRsError::Schedule(_) => ErrorSeverity::Warning,
            BrainRsError::Time(_) => ErrorSeverity::Warning,
            BrainRsError::Source(SourceError::FileNotFound { .. }) => ErrorSeverity::Warning,
            BrainRsError::Source(SourceError::Missing { .. }) => ErrorSeverity::Info,
            BrainRsError::Source(_) => ErrorSeverity::Error,
            BrainRsError::Io(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            BrainRsError::Schedule(ScheduleError::WakeNotBeforeSleep {
                wake_hour,
                sleep_hour,
            }) => {
                format!(
                    "Your wake time ({}) must come before your bedtime ({}).",
                    wake_hour, sleep_hour
                )
            }
            BrainRsError::Source(SourceError::FileNotFound { path }) => {
                format!("Could not find timeline file: {}", path.display())
            }
            BrainRsError::Time(TimeError::InvalidHour { input }) => {
                format!("'{}' is not a time of day. Use 6.5 or 06:30.", input)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical error requiring immediate attention
    Critical,
    /// Error that prevents the operation
    Error,
    /// Warning that doesn't prevent operation
    Warning,
    /// Informational message
    Info,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Info => tracing::Level::INFO,
        }
    }
}
