//! Quotation database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::quote::model::{Quotation, QuotationListing, StoredQuotation};
use crate::store::{page_offset, QuotationStore, StoreError};

#[derive(sqlx::FromRow)]
struct QuotationRow {
    id: Uuid,
    data: Json<Quotation>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<QuotationRow> for StoredQuotation {
    fn from(row: QuotationRow) -> Self {
        Self {
            id: row.id,
            quotation: row.data.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgQuotationStore {
    pool: PgPool,
}

impl PgQuotationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuotationStore for PgQuotationStore {
    async fn create(&self, quotation: Quotation) -> Result<StoredQuotation, StoreError> {
        let row = sqlx::query_as::<_, QuotationRow>(
            r#"
            INSERT INTO quotations (id, data)
            VALUES ($1, $2)
            RETURNING id, data, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(Json(&quotation))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list(&self, page: u32, page_size: u32) -> Result<QuotationListing, StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotations")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, QuotationRow>(
            r#"
            SELECT id, data, created_at, updated_at
            FROM quotations
            ORDER BY created_at DESC, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page_size as i64)
        .bind(page_offset(page, page_size) as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(QuotationListing {
            items: rows.into_iter().map(StoredQuotation::from).collect(),
            total: total.max(0) as u64,
        })
    }

    async fn get(&self, id: Uuid) -> Result<StoredQuotation, StoreError> {
        let row = sqlx::query_as::<_, QuotationRow>(
            "SELECT id, data, created_at, updated_at FROM quotations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(StoredQuotation::from).ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM quotations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
