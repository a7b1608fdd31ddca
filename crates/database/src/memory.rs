use crate::error::DbError;
use crate::store::RecordStore;
use async_trait::async_trait;
use chrono::Utc;
use core_types::{NewProductionRecord, ProductionPatch, ProductionRecord, SearchFilter};
use tokio::sync::RwLock;

/// A `RecordStore` kept entirely in process memory.
///
/// Ids start at 1 and are never reused. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    records: Vec<ProductionRecord>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first, matching the SQL ordering `created_at DESC, id DESC`.
fn newest_first(records: &mut [ProductionRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl RecordStore for MemoryRepository {
    async fn create(&self, record: NewProductionRecord) -> Result<i64, DbError> {
        record.validate()?;
        let mut state = self.state.write().await;
        state.last_id += 1;
        let id = state.last_id;
        state
            .records
            .push(ProductionRecord::from_new(id, record, Utc::now()));
        tracing::debug!(id, "Created in-memory production record.");
        Ok(id)
    }

    async fn read_all(&self) -> Result<Vec<ProductionRecord>, DbError> {
        let mut records = self.state.read().await.records.clone();
        newest_first(&mut records);
        Ok(records)
    }

    async fn read_by_id(&self, id: i64) -> Result<ProductionRecord, DbError> {
        self.state
            .read()
            .await
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(DbError::NotFound(id))
    }

    async fn update(&self, id: i64, patch: &ProductionPatch) -> Result<ProductionRecord, DbError> {
        patch.validate()?;
        let mut state = self.state.write().await;
        let stored = state
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(DbError::NotFound(id))?;

        // Validate a merged copy so a rejected patch leaves the record untouched.
        let mut merged = stored.clone();
        merged.apply(patch, Utc::now());
        merged.validate()?;
        *stored = merged.clone();
        Ok(merged)
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let mut state = self.state.write().await;
        let before = state.records.len();
        state.records.retain(|r| r.id != id);
        if state.records.len() == before {
            tracing::warn!(id, "Delete requested for unknown production record.");
            return Err(DbError::NotFound(id));
        }
        Ok(())
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<ProductionRecord>, DbError> {
        let mut records: Vec<ProductionRecord> = self
            .state
            .read()
            .await
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        newest_first(&mut records);
        Ok(records)
    }

    async fn count(&self) -> Result<i64, DbError> {
        Ok(self.state.read().await.records.len() as i64)
    }
}
