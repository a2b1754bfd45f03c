//! Database module - AppState and store implementations
//!
//! - `init` - one-time schema creation run at startup
//! - `quote` - PostgreSQL quotation store
//! - `user` - PostgreSQL user store
//! - `memory` - in-memory stores for tests and database-less runs

pub mod init;
pub mod memory;
pub mod quote;
pub mod user;

use std::sync::Arc;

use crate::config::{AppConfig, SessionConfig};
use crate::document::{QuotationPdfGenerator, StaticPageLayout};
use crate::quote::model::CompanyDetails;
use crate::store::{QuotationStore, UserStore};

pub use memory::{InMemoryQuotationStore, InMemoryUserStore};
pub use quote::PgQuotationStore;
pub use user::PgUserStore;

#[derive(Clone)]
pub struct AppState {
    pub quotes: Arc<dyn QuotationStore>,
    pub users: Arc<dyn UserStore>,
    pub pdf: QuotationPdfGenerator,
    pub session: SessionConfig,
    pub company: CompanyDetails,
}

impl AppState {
    /// Connect to PostgreSQL when a database URL is configured, creating the
    /// schema if needed; otherwise fall back to in-memory stores.
    pub async fn from_config(config: &AppConfig) -> Result<Self, sqlx::Error> {
        let Some(database_url) = config.database_url.as_deref() else {
            log::warn!("DATABASE_URL not set, quotations will be kept in memory only");
            return Ok(Self::in_memory(
                config.session.clone(),
                config.static_pages.clone(),
                config.company.clone(),
            ));
        };

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .idle_timeout(std::time::Duration::from_secs(900))
            .max_lifetime(std::time::Duration::from_secs(1800))
            .connect(database_url)
            .await?;

        init::ensure_schema(&pool).await?;

        Ok(Self::new_with_stores(
            Arc::new(PgQuotationStore::new(pool.clone())),
            Arc::new(PgUserStore::new(pool)),
            config.session.clone(),
            config.static_pages.clone(),
            config.company.clone(),
        ))
    }

    pub fn new_with_stores(
        quotes: Arc<dyn QuotationStore>,
        users: Arc<dyn UserStore>,
        session: SessionConfig,
        static_pages: StaticPageLayout,
        company: CompanyDetails,
    ) -> Self {
        Self {
            quotes,
            users,
            pdf: QuotationPdfGenerator::new(static_pages),
            session,
            company,
        }
    }

    pub fn in_memory(
        session: SessionConfig,
        static_pages: StaticPageLayout,
        company: CompanyDetails,
    ) -> Self {
        Self::new_with_stores(
            Arc::new(InMemoryQuotationStore::new()),
            Arc::new(InMemoryUserStore::new()),
            session,
            static_pages,
            company,
        )
    }
}
