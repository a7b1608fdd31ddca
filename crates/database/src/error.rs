use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Failed to connect to the database: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Rejected invalid record: {0}")]
    Validation(#[from] CoreError),

    #[error("Stored row {id} is corrupt: {reason}")]
    CorruptRow { id: i64, reason: String },

    #[error("No production record with id {0}.")]
    NotFound(i64),
}
