//! Account entity model and DTOs.

use accountd_core::roles::Role;
use accountd_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full account row from the `accounts` table.
///
/// Contains the password hash -- NEVER serialize this to external
/// output. Use [`AccountView`] for anything caller-facing; this type
/// deliberately does not implement `Serialize`.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe account representation (no password hash), by construction.
///
/// List queries select this projection directly so the hash never
/// transits memory on read-only paths.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AccountView {
    pub id: DbId,
    pub username: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            role: account.role,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            role: account.role,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// DTO for inserting a new account. Timestamps and id are assigned by
/// the store.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// DTO for updating an existing account. Only `Some` fields are
/// applied; every applied update also refreshes `updated_at`.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

/// Sort directive for paginated listings.
///
/// Opaque to the service layer; each store maps it to its own ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListOrder {
    #[default]
    CreatedAtDesc,
    CreatedAtAsc,
    UsernameAsc,
    UsernameDesc,
}

impl ListOrder {
    /// The `ORDER BY` fragment used by the PostgreSQL store.
    pub fn as_sql(&self) -> &'static str {
        match self {
            ListOrder::CreatedAtDesc => "created_at DESC, id DESC",
            ListOrder::CreatedAtAsc => "created_at ASC, id ASC",
            ListOrder::UsernameAsc => "username ASC",
            ListOrder::UsernameDesc => "username DESC",
        }
    }
}
