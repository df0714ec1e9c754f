//! PostgreSQL-backed [`AccountStore`].
//!
//! Expects an `accounts` table with a unique index named
//! `uq_accounts_username` on `username`; that index is the
//! authoritative uniqueness guarantee backing the service layer's
//! advisory check-then-write.

use accountd_core::error::StoreError;
use accountd_core::pagination::Page;
use accountd_core::types::DbId;
use async_trait::async_trait;
use sqlx::PgPool;

use super::AccountStore;
use crate::models::{Account, AccountChanges, AccountView, ListOrder, NewAccount};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, password_hash, role, created_at, updated_at";

/// Hash-free projection used by list queries.
const VIEW_COLUMNS: &str = "id, username, role, created_at, updated_at";

/// [`AccountStore`] over a shared connection pool.
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Classify a sqlx error into a [`StoreError`].
///
/// PostgreSQL unique violations (error code 23505) on a `uq_`-prefixed
/// constraint become [`StoreError::UniqueViolation`]; everything else
/// is wrapped opaquely after logging.
fn classify_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return StoreError::UniqueViolation {
                    constraint: constraint.to_string(),
                };
            }
        }
    }
    tracing::error!(error = %err, "database error");
    StoreError::Backend(err.into())
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Account>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE username = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn save(&self, input: NewAccount) -> Result<Account, StoreError> {
        let query = format!(
            "INSERT INTO accounts (username, password_hash, role)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(input.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn update(
        &self,
        id: DbId,
        changes: AccountChanges,
    ) -> Result<Option<Account>, StoreError> {
        let query = format!(
            "UPDATE accounts SET
                username = COALESCE($2, username),
                password_hash = COALESCE($3, password_hash),
                role = COALESCE($4, role),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .bind(&changes.username)
            .bind(&changes.password_hash)
            .bind(changes.role.map(|r| r.as_str()))
            .fetch_optional(&self.pool)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn paginate(
        &self,
        page: i64,
        limit: i64,
        order: ListOrder,
    ) -> Result<Page<AccountView>, StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await
            .map_err(classify_sqlx_error)?;

        // Saturate so an absurd page number binds a huge (empty-result)
        // offset instead of overflowing into a negative OFFSET.
        let offset = (page - 1).saturating_mul(limit);
        let query = format!(
            "SELECT {VIEW_COLUMNS} FROM accounts ORDER BY {} LIMIT $1 OFFSET $2",
            order.as_sql()
        );
        let items = sqlx::query_as::<_, AccountView>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(classify_sqlx_error)?;

        Ok(Page::new(items, page, limit, total))
    }
}
