//! In-memory [`AccountStore`] for tests and local development.
//!
//! Behaviorally equivalent to the PostgreSQL store, including the
//! `uq_accounts_username` unique violation on duplicate usernames, so
//! service tests exercise the same error translation paths.

use std::collections::HashMap;
use std::sync::Arc;

use accountd_core::error::StoreError;
use accountd_core::pagination::Page;
use accountd_core::types::DbId;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::AccountStore;
use crate::models::{Account, AccountChanges, AccountView, ListOrder, NewAccount};

/// Constraint name reported on duplicate usernames, matching the
/// PostgreSQL index name.
const USERNAME_CONSTRAINT: &str = "uq_accounts_username";

#[derive(Debug, Default)]
struct Inner {
    rows: HashMap<DbId, Account>,
    next_id: DbId,
}

/// Thread-safe in-memory account store.
#[derive(Debug, Default, Clone)]
pub struct MemoryAccountStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_rows(rows: &mut [Account], order: ListOrder) {
    match order {
        ListOrder::CreatedAtDesc => {
            rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)))
        }
        ListOrder::CreatedAtAsc => {
            rows.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)))
        }
        ListOrder::UsernameAsc => rows.sort_by(|a, b| a.username.cmp(&b.username)),
        ListOrder::UsernameDesc => rows.sort_by(|a, b| b.username.cmp(&a.username)),
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.values().find(|a| a.username == username).cloned())
    }

    async fn save(&self, input: NewAccount) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.rows.values().any(|a| a.username == input.username) {
            return Err(StoreError::UniqueViolation {
                constraint: USERNAME_CONSTRAINT.to_string(),
            });
        }

        inner.next_id += 1;
        let now = Utc::now();
        let account = Account {
            id: inner.next_id,
            username: input.username,
            password_hash: input.password_hash,
            role: input.role,
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(account.id, account.clone());

        tracing::debug!(id = account.id, "stored account");
        Ok(account)
    }

    async fn update(
        &self,
        id: DbId,
        changes: AccountChanges,
    ) -> Result<Option<Account>, StoreError> {
        let mut inner = self.inner.write().await;

        // Existence first, then uniqueness, matching the order PostgreSQL
        // evaluates an UPDATE against a missing row.
        if !inner.rows.contains_key(&id) {
            return Ok(None);
        }

        if let Some(new_username) = &changes.username {
            let taken = inner
                .rows
                .values()
                .any(|a| a.id != id && &a.username == new_username);
            if taken {
                return Err(StoreError::UniqueViolation {
                    constraint: USERNAME_CONSTRAINT.to_string(),
                });
            }
        }

        let Some(account) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(username) = changes.username {
            account.username = username;
        }
        if let Some(password_hash) = changes.password_hash {
            account.password_hash = password_hash;
        }
        if let Some(role) = changes.role {
            account.role = role;
        }
        account.updated_at = Utc::now();
        Ok(Some(account.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.rows.remove(&id).is_some())
    }

    async fn paginate(
        &self,
        page: i64,
        limit: i64,
        order: ListOrder,
    ) -> Result<Page<AccountView>, StoreError> {
        let inner = self.inner.read().await;

        let mut rows: Vec<Account> = inner.rows.values().cloned().collect();
        sort_rows(&mut rows, order);

        let total = rows.len() as i64;
        // Saturate so an absurd page number yields an empty page, not an
        // arithmetic overflow.
        let offset = (page - 1).saturating_mul(limit) as usize;
        let items: Vec<AccountView> = rows
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .map(AccountView::from)
            .collect();

        Ok(Page::new(items, page, limit, total))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
