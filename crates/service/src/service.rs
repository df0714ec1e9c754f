//! Account orchestration: create, login, mutate, delete, list.
//!
//! Every operation returns a tagged [`AccountError`] rather than a raw
//! persistence error, and every successful mutating path issues exactly
//! one store write, so a cancelled call can never leave a half-written
//! account behind.

use std::sync::Arc;

use accountd_core::error::{AccountError, AccountResult, StoreError};
use accountd_core::pagination::{clamp_limit, clamp_page, Page, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use accountd_core::roles::Role;
use accountd_core::types::DbId;
use accountd_db::models::{Account, AccountChanges, AccountView, ListOrder, NewAccount};
use accountd_db::store::AccountStore;
use serde::Deserialize;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::{issue_token, TokenConfig};

/// Minimum length (in characters, after trimming) for usernames and
/// passwords.
const MIN_FIELD_LENGTH: usize = 4;

/// Query parameters for [`AccountService::list`].
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub order: Option<ListOrder>,
}

/// Admin-only update: optional username and role.
///
/// Authorization is enforced upstream by the caller's role guard; this
/// is the only path through which `role` can change.
#[derive(Debug, Default, Deserialize)]
pub struct AdminUpdate {
    pub username: Option<String>,
    pub role: Option<Role>,
}

/// Orchestrates the hasher, token issuer, and account store.
#[derive(Clone)]
pub struct AccountService<S: AccountStore> {
    store: Arc<S>,
    tokens: TokenConfig,
}

impl<S: AccountStore> AccountService<S> {
    pub fn new(store: S, tokens: TokenConfig) -> Self {
        Self {
            store: Arc::new(store),
            tokens,
        }
    }

    /// Create a new account with the default `user` role.
    ///
    /// Username uniqueness is not pre-checked here; the store's unique
    /// constraint is the authoritative guard and surfaces as
    /// [`AccountError::UsernameTaken`].
    pub async fn create(&self, username: &str, password: &str) -> AccountResult<AccountView> {
        let username = validate_field("username", username)?;
        let password = validate_field("password", password)?;

        let password_hash = hash(password)?;

        let account = self
            .store
            .save(NewAccount {
                username: username.to_string(),
                password_hash,
                role: Role::User,
            })
            .await
            .map_err(translate_store_error)?;

        tracing::info!(id = account.id, "account created");
        Ok(AccountView::from(account))
    }

    /// Authenticate and issue a bearer token.
    ///
    /// Unknown username and wrong password produce the identical
    /// [`AccountError::InvalidCredentials`] so login failures cannot be
    /// used to enumerate usernames.
    pub async fn login(&self, username: &str, password: &str) -> AccountResult<String> {
        let account = self
            .store
            .find_by_username(username.trim())
            .await
            .map_err(translate_store_error)?
            .ok_or(AccountError::InvalidCredentials)?;

        let matched = verify_password(password, &account.password_hash).map_err(|e| {
            tracing::error!(error = %e, "password verification failed");
            AccountError::Hashing("password verification failed".to_string())
        })?;
        if !matched {
            return Err(AccountError::InvalidCredentials);
        }

        let view = AccountView::from(account);
        issue_token(&view, &self.tokens).map_err(|e| {
            tracing::error!(error = %e, "token signing failed");
            AccountError::Hashing("token signing failed".to_string())
        })
    }

    /// Look up a single account by id.
    pub async fn find(&self, id: DbId) -> AccountResult<AccountView> {
        let account = self
            .store
            .find_by_id(id)
            .await
            .map_err(translate_store_error)?;
        Ok(AccountView::from(require(account, id)?))
    }

    /// Change an account's username.
    ///
    /// The conflict check here is a fast-path courtesy; a concurrent
    /// writer can still win the race between check and write, in which
    /// case the store's unique constraint reports the same
    /// [`AccountError::UsernameTaken`].
    pub async fn update_username(&self, id: DbId, new_username: &str) -> AccountResult<AccountView> {
        let new_username = validate_field("username", new_username)?;

        self.check_username_free(new_username, id).await?;

        let changes = AccountChanges {
            username: Some(new_username.to_string()),
            ..Default::default()
        };
        self.apply(id, changes).await
    }

    /// Rotate an account's password.
    pub async fn update_password(&self, id: DbId, new_password: &str) -> AccountResult<AccountView> {
        let new_password = validate_field("password", new_password)?;
        let password_hash = hash(new_password)?;

        let changes = AccountChanges {
            password_hash: Some(password_hash),
            ..Default::default()
        };
        self.apply(id, changes).await
    }

    /// Admin update: username and/or role.
    pub async fn update_account(&self, id: DbId, update: AdminUpdate) -> AccountResult<AccountView> {
        let username = match update.username.as_deref() {
            Some(raw) => {
                let trimmed = validate_field("username", raw)?;
                self.check_username_free(trimmed, id).await?;
                Some(trimmed.to_string())
            }
            None => None,
        };

        let changes = AccountChanges {
            username,
            role: update.role,
            ..Default::default()
        };
        self.apply(id, changes).await
    }

    /// Delete an account, returning its id.
    ///
    /// Looks the account up first so a missing id is reported as
    /// [`AccountError::NotFound`] rather than a silent no-op.
    pub async fn delete(&self, id: DbId) -> AccountResult<DbId> {
        let account = self
            .store
            .find_by_id(id)
            .await
            .map_err(translate_store_error)?;
        require(account, id)?;

        self.store.delete(id).await.map_err(translate_store_error)?;
        tracing::info!(id, "account deleted");
        Ok(id)
    }

    /// Paginated listing of safe account views.
    ///
    /// `limit` is clamped to at most [`MAX_PAGE_SIZE`] rows regardless
    /// of what was requested; `page` defaults to 1 when absent or
    /// non-positive. Rows come from a hash-free projection, so the
    /// password hash never leaves the store on this path.
    pub async fn list(&self, params: ListParams) -> AccountResult<Page<AccountView>> {
        let page = clamp_page(params.page);
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
        let order = params.order.unwrap_or_default();

        self.store
            .paginate(page, limit, order)
            .await
            .map_err(translate_store_error)
    }

    /// Fail with [`AccountError::UsernameTaken`] if another account
    /// already holds `username`.
    async fn check_username_free(&self, username: &str, own_id: DbId) -> AccountResult<()> {
        let existing = self
            .store
            .find_by_username(username)
            .await
            .map_err(translate_store_error)?;
        match existing {
            Some(other) if other.id != own_id => Err(AccountError::UsernameTaken),
            _ => Ok(()),
        }
    }

    /// Apply a change set as the single write of a mutating path.
    async fn apply(&self, id: DbId, changes: AccountChanges) -> AccountResult<AccountView> {
        let updated = self
            .store
            .update(id, changes)
            .await
            .map_err(translate_store_error)?;
        Ok(AccountView::from(require(updated, id)?))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Trim and length-check a user-supplied field.
fn validate_field<'a>(name: &str, value: &'a str) -> AccountResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.chars().count() < MIN_FIELD_LENGTH {
        return Err(AccountError::Validation(format!(
            "{name} must be at least {MIN_FIELD_LENGTH} characters"
        )));
    }
    Ok(trimmed)
}

/// Hash a password, logging the cause and returning the generic
/// hashing error on failure.
fn hash(password: &str) -> AccountResult<String> {
    hash_password(password).map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        AccountError::Hashing("password hashing failed".to_string())
    })
}

/// Turn an optional row into the row or [`AccountError::NotFound`].
/// "No account" is always an error, never a nil view.
fn require(account: Option<Account>, id: DbId) -> AccountResult<Account> {
    account.ok_or(AccountError::NotFound {
        entity: "Account",
        id,
    })
}

/// Translate store failures into domain errors.
///
/// A unique violation on the username constraint becomes
/// [`AccountError::UsernameTaken`] -- the same kind the advisory
/// check-then-write produces -- so races lost at the store render
/// identically to conflicts caught early. Everything else is wrapped
/// opaquely.
fn translate_store_error(err: StoreError) -> AccountError {
    match err {
        StoreError::UniqueViolation { ref constraint } if constraint.contains("username") => {
            AccountError::UsernameTaken
        }
        other => AccountError::Store(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_field_trims_before_measuring() {
        assert_eq!(validate_field("username", "  alice  ").unwrap(), "alice");
        assert!(validate_field("username", "  al  ").is_err());
    }

    #[test]
    fn validate_field_counts_characters_not_bytes() {
        // Four two-byte characters pass the four-character minimum.
        assert!(validate_field("password", "äöüß").is_ok());
    }

    #[test]
    fn unique_violation_on_username_becomes_username_taken() {
        let err = translate_store_error(StoreError::UniqueViolation {
            constraint: "uq_accounts_username".to_string(),
        });
        assert!(matches!(err, AccountError::UsernameTaken));
    }

    #[test]
    fn other_unique_violations_stay_store_errors() {
        let err = translate_store_error(StoreError::UniqueViolation {
            constraint: "uq_accounts_email".to_string(),
        });
        assert!(matches!(err, AccountError::Store(_)));
    }
}
