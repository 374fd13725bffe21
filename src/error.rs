use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading uploads, running the ticket pipeline or
/// rendering charts.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("{file}: unsupported file type, expected .xls or .xlsx")]
    UnsupportedFile { file: String },

    #[error("{file}: could not read workbook: {source}")]
    Workbook {
        file: String,
        #[source]
        source: calamine::Error,
    },

    #[error("{file}: no sheet named '{sheet}'")]
    MissingSheet { file: String, sheet: String },

    #[error("{file}: sheet has no header row")]
    MissingHeader { file: String },

    #[error("Missing column: {column}")]
    MissingColumn { column: String },

    #[error("Invalid timestamp in '{column}' for reference '{reference}': '{value}'")]
    InvalidTimestamp {
        column: String,
        reference: String,
        value: String,
    },

    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Plotting error: {0}")]
    Plot(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl DashboardError {
    /// Whether this error is a failure to parse the uploaded data, as opposed
    /// to an environment or rendering problem.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            DashboardError::UnsupportedFile { .. }
                | DashboardError::Workbook { .. }
                | DashboardError::MissingSheet { .. }
                | DashboardError::MissingHeader { .. }
                | DashboardError::InvalidTimestamp { .. }
        )
    }
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;
