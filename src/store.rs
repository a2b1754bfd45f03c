//! Persistence boundaries.
//!
//! Handlers only ever see these traits; `db` provides the PostgreSQL and
//! in-memory implementations.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::model::{NewUser, User};
use crate::quote::model::{Quotation, QuotationListing, StoredQuotation};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("invalid record: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage unavailable: {0}")]
    Transient(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(db.message().to_string())
            }
            sqlx::Error::Database(db) if db.is_check_violation() || db.is_foreign_key_violation() => {
                StoreError::Validation(db.message().to_string())
            }
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23502") => {
                // not_null_violation
                StoreError::Validation(db.message().to_string())
            }
            sqlx::Error::Decode(e) | sqlx::Error::ColumnDecode { source: e, .. } => {
                StoreError::Validation(e.to_string())
            }
            other => StoreError::Transient(other.to_string()),
        }
    }
}

#[async_trait]
pub trait QuotationStore: Send + Sync {
    /// Persist a new quotation, assigning its id and timestamps.
    async fn create(&self, quotation: Quotation) -> Result<StoredQuotation, StoreError>;

    /// Newest first. `page` starts at 1.
    async fn list(&self, page: u32, page_size: u32) -> Result<QuotationListing, StoreError>;

    async fn get(&self, id: Uuid) -> Result<StoredQuotation, StoreError>;

    /// Fails with [`StoreError::NotFound`] when nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::Conflict`] if the email is taken.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn count_admins(&self) -> Result<i64, StoreError>;
}

/// Number of rows to skip for a 1-based page.
pub fn page_offset(page: u32, page_size: u32) -> u64 {
    (page.max(1) as u64 - 1) * page_size as u64
}
