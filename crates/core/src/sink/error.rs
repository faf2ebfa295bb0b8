//! Report sink error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The report template does not exist.
    #[error("Report template not found: {}", .0.display())]
    TemplateMissing(PathBuf),

    /// The report target cannot be parsed.
    #[error("Invalid report target: '{0}'")]
    InvalidTarget(String),

    /// A file operation failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File concerned.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Writing a CSV record failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SinkError {
    /// Create an I/O error for `path`.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the error code used in log records.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TemplateMissing(_) => "TEMPLATE_MISSING",
            Self::InvalidTarget(_) => "INVALID_TARGET",
            Self::Io { .. } => "SINK_IO",
            Self::Csv(_) => "SINK_CSV",
        }
    }
}
