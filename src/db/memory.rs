//! In-memory stores used by tests and when no database is configured.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::auth::model::{NewUser, Role, User};
use crate::quote::model::{Quotation, QuotationListing, StoredQuotation};
use crate::store::{page_offset, QuotationStore, StoreError, UserStore};

/// Quotations kept in insertion order; listing walks it backwards.
#[derive(Default)]
pub struct InMemoryQuotationStore {
    records: RwLock<Vec<StoredQuotation>>,
}

impl InMemoryQuotationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuotationStore for InMemoryQuotationStore {
    async fn create(&self, quotation: Quotation) -> Result<StoredQuotation, StoreError> {
        let now = Utc::now();
        let stored = StoredQuotation {
            id: Uuid::new_v4(),
            quotation,
            created_at: now,
            updated_at: now,
        };
        self.records.write().push(stored.clone());
        Ok(stored)
    }

    async fn list(&self, page: u32, page_size: u32) -> Result<QuotationListing, StoreError> {
        let records = self.records.read();
        let items = records
            .iter()
            .rev()
            .skip(page_offset(page, page_size) as usize)
            .take(page_size as usize)
            .cloned()
            .collect();

        Ok(QuotationListing {
            items,
            total: records.len() as u64,
        })
    }

    async fn get(&self, id: Uuid) -> Result<StoredQuotation, StoreError> {
        self.records
            .read()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write();
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!(
                "user '{}' already exists",
                user.email
            )));
        }
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.read().clone())
    }

    async fn count_admins(&self) -> Result<i64, StoreError> {
        Ok(self
            .users
            .read()
            .iter()
            .filter(|u| u.role == Role::Admin)
            .count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::template::sample_quotation;

    fn numbered(n: usize) -> Quotation {
        let mut q = sample_quotation();
        q.quote_details.quote_number = n.to_string();
        q
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_paged() {
        let store = InMemoryQuotationStore::new();
        for n in 1..=5 {
            store.create(numbered(n)).await.unwrap();
        }

        let first = store.list(1, 2).await.unwrap();
        assert_eq!(first.total, 5);
        let numbers: Vec<_> = first
            .items
            .iter()
            .map(|s| s.quotation.quote_details.quote_number.as_str())
            .collect();
        assert_eq!(numbers, vec!["5", "4"]);

        let last = store.list(3, 2).await.unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].quotation.quote_details.quote_number, "1");

        assert!(store.list(4, 2).await.unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let store = InMemoryQuotationStore::new();
        let stored = store.create(sample_quotation()).await.unwrap();
        assert_eq!(stored.created_at, stored.updated_at);

        let fetched = store.get(stored.id).await.unwrap();
        assert_eq!(fetched, stored);

        store.delete(stored.id).await.unwrap();
        assert!(matches!(store.get(stored.id).await, Err(StoreError::NotFound)));
        assert!(matches!(store.delete(stored.id).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = InMemoryUserStore::new();
        let new_user = NewUser {
            email: "admin@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Admin,
        };
        store.create(new_user.clone()).await.unwrap();
        assert!(matches!(
            store.create(new_user).await,
            Err(StoreError::Conflict(_))
        ));
        assert_eq!(store.count_admins().await.unwrap(), 1);
        assert!(store
            .find_by_email("admin@example.com")
            .await
            .unwrap()
            .is_some());
    }
}
