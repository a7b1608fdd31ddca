use crate::error::DbError;
use async_trait::async_trait;
use core_types::{NewProductionRecord, ProductionPatch, ProductionRecord, SearchFilter};

/// The contract every production-record store fulfils.
///
/// Listing operations return records newest first. Failures are reported as
/// they happen; no operation is retried and a failed write leaves nothing
/// behind.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Validates and inserts a record, returning the id the store assigned.
    async fn create(&self, record: NewProductionRecord) -> Result<i64, DbError>;

    /// Fetches every record.
    async fn read_all(&self) -> Result<Vec<ProductionRecord>, DbError>;

    /// Fetches one record, or `DbError::NotFound`.
    async fn read_by_id(&self, id: i64) -> Result<ProductionRecord, DbError>;

    /// Applies a partial update and returns the record as stored afterwards.
    async fn update(&self, id: i64, patch: &ProductionPatch) -> Result<ProductionRecord, DbError>;

    /// Removes a record, or reports `DbError::NotFound`.
    async fn delete(&self, id: i64) -> Result<(), DbError>;

    /// Fetches the records matching every criterion in `filter`.
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<ProductionRecord>, DbError>;

    /// Number of stored records.
    async fn count(&self) -> Result<i64, DbError>;
}
