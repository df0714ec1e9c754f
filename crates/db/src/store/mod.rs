//! The [`AccountStore`] contract and its implementations.

use accountd_core::error::StoreError;
use accountd_core::pagination::Page;
use accountd_core::types::DbId;
use async_trait::async_trait;

use crate::models::{Account, AccountChanges, AccountView, ListOrder, NewAccount};

pub mod memory;
pub mod postgres;

pub use memory::MemoryAccountStore;
pub use postgres::PgAccountStore;

/// Persistence contract consumed by the account service.
///
/// Implementations are shared across request tasks and must be
/// internally synchronized. Uniqueness of `username` is ultimately this
/// layer's responsibility: a write that would duplicate a username must
/// fail with [`StoreError::UniqueViolation`] naming the
/// `uq_accounts_username` constraint.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Find an account by internal id.
    async fn find_by_id(&self, id: DbId) -> Result<Option<Account>, StoreError>;

    /// Find an account by username (case-sensitive).
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    /// Insert a new account, returning the stored row with assigned id
    /// and timestamps.
    async fn save(&self, input: NewAccount) -> Result<Account, StoreError>;

    /// Apply the non-`None` fields of `changes` and refresh
    /// `updated_at`. Returns `None` if no row with the given id exists.
    async fn update(&self, id: DbId, changes: AccountChanges)
        -> Result<Option<Account>, StoreError>;

    /// Delete an account. Returns `true` if a row was removed.
    async fn delete(&self, id: DbId) -> Result<bool, StoreError>;

    /// One page of hash-free account projections in the given order.
    /// `page` is 1-based; both `page` and `limit` must already be
    /// clamped by the caller.
    async fn paginate(
        &self,
        page: i64,
        limit: i64,
        order: ListOrder,
    ) -> Result<Page<AccountView>, StoreError>;
}
