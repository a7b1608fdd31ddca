use analytics::AnalyticsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No production records found to export")]
    NoRecords,

    #[error("Export file name '{0}' must be a plain file name without directories")]
    InvalidFileName(String),

    #[error("Export format '{0}' is not a valid chrono format")]
    InvalidFormat(String),

    #[error("I/O error while writing export: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Could not move the finished export into place: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Aggregation failed: {0}")]
    Analytics(#[from] AnalyticsError),
}
