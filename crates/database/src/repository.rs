use crate::error::DbError;
use crate::store::RecordStore;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{
    CoreError, DateValue, NewProductionRecord, ProductionPatch, ProductionRecord, ProductionStatus,
    SearchFilter,
};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgRow, Postgres};
use sqlx::{QueryBuilder, Row};

/// Column list shared by every query that materialises a `ProductionRecord`.
const RECORD_COLUMNS: &str = "id, product_name, quantity, sale_price, cost_price, \
     planting_date, harvest_date, production_status, created_at, updated_at";

/// The `DbRepository` provides a high-level, application-specific interface
/// to the `agricultural_production` table. It encapsulates all SQL queries.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for DbRepository {
    async fn create(&self, record: NewProductionRecord) -> Result<i64, DbError> {
        record.validate()?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO agricultural_production
                (product_name, quantity, sale_price, cost_price, planting_date, harvest_date, production_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(record.product_name.trim())
        .bind(record.quantity)
        .bind(record.sale_price)
        .bind(record.cost_price)
        .bind(record.planting_date)
        .bind(record.harvest_date)
        .bind(record.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(id, product = %record.product_name, "Created production record.");
        Ok(id)
    }

    async fn read_all(&self) -> Result<Vec<ProductionRecord>, DbError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM agricultural_production ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(record_from_row).collect()
    }

    async fn read_by_id(&self, id: i64) -> Result<ProductionRecord, DbError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM agricultural_production WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound(id))?;
        record_from_row(&row)
    }

    async fn update(&self, id: i64, patch: &ProductionPatch) -> Result<ProductionRecord, DbError> {
        patch.validate()?;

        let mut tx = self.pool.begin().await?;

        // Lock the row so the merged validation sees what the UPDATE will change.
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM agricultural_production WHERE id = $1 FOR UPDATE"
        );
        let current = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::NotFound(id))?;

        let now = Utc::now();
        let mut merged = record_from_row(&current)?;
        merged.apply(patch, now);
        merged.validate()?;

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE agricultural_production SET ");
        {
            let mut set = builder.separated(", ");
            if let Some(name) = &patch.product_name {
                set.push("product_name = ").push_bind_unseparated(name.trim().to_string());
            }
            if let Some(quantity) = patch.quantity {
                set.push("quantity = ").push_bind_unseparated(quantity);
            }
            if let Some(sale_price) = patch.sale_price {
                set.push("sale_price = ").push_bind_unseparated(sale_price);
            }
            if let Some(cost_price) = patch.cost_price {
                set.push("cost_price = ").push_bind_unseparated(cost_price);
            }
            if let Some(planting) = patch.planting_date {
                set.push("planting_date = ").push_bind_unseparated(planting);
            }
            if let Some(harvest) = patch.harvest_date {
                set.push("harvest_date = ").push_bind_unseparated(harvest);
            }
            if let Some(status) = patch.status {
                set.push("production_status = ").push_bind_unseparated(status.as_str());
            }
            set.push("updated_at = ").push_bind_unseparated(now);
        }

        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING ").push(RECORD_COLUMNS);

        let row = builder.build().fetch_one(&mut *tx).await?;
        tx.commit().await?;

        tracing::info!(id, "Updated production record.");
        record_from_row(&row)
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM agricultural_production WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::warn!(id, "Delete requested for unknown production record.");
            return Err(DbError::NotFound(id));
        }
        tracing::info!(id, "Deleted production record.");
        Ok(())
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<ProductionRecord>, DbError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        builder.push(RECORD_COLUMNS);
        builder.push(" FROM agricultural_production WHERE TRUE");

        if let Some(fragment) = &filter.product_name {
            // strpos instead of LIKE so that '%' and '_' in the fragment match literally.
            builder
                .push(" AND strpos(lower(product_name), lower(")
                .push_bind(fragment.clone())
                .push(")) > 0");
        }
        if let Some(status) = filter.status {
            builder.push(" AND production_status = ").push_bind(status.as_str());
        }
        builder.push(" ORDER BY created_at DESC, id DESC");

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(record_from_row).collect()
    }

    async fn count(&self) -> Result<i64, DbError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM agricultural_production")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Maps one `agricultural_production` row onto the domain struct.
fn record_from_row(row: &PgRow) -> Result<ProductionRecord, DbError> {
    let id: i64 = row.try_get("id")?;
    let status: String = row.try_get("production_status")?;
    let status = status
        .parse::<ProductionStatus>()
        .map_err(|e: CoreError| DbError::CorruptRow {
            id,
            reason: e.to_string(),
        })?;

    let planting_date: Option<NaiveDate> = row.try_get("planting_date")?;
    let harvest_date: Option<NaiveDate> = row.try_get("harvest_date")?;
    let quantity: Decimal = row.try_get("quantity")?;
    let sale_price: Decimal = row.try_get("sale_price")?;
    let cost_price: Decimal = row.try_get("cost_price")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(ProductionRecord {
        id,
        product_name: row.try_get("product_name")?,
        quantity,
        cost_price,
        sale_price,
        planting_date: planting_date.map(DateValue::Parsed),
        harvest_date: harvest_date.map(DateValue::Parsed),
        status,
        created_at,
        updated_at,
    })
}
