//! Application-wide error types.

use thiserror::Error;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Batch input is malformed.
    #[error("Invalid input: {0}")]
    Input(String),

    /// A report row could not be produced.
    #[error("Report error: {0}")]
    Report(String),

    /// The report destination could not be written.
    #[error("Sink error: {0}")]
    Sink(String),
}

impl AppError {
    /// Returns the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 78,
            Self::Input(_) => 65,
            Self::Report(_) => 70,
            Self::Sink(_) => 74,
        }
    }

    /// Returns the error code used in log records.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Input(_) => "INPUT_ERROR",
            Self::Report(_) => "REPORT_ERROR",
            Self::Sink(_) => "SINK_ERROR",
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
