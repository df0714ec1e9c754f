//! End-to-end tests for the account service against the in-memory
//! store: creation, login symmetry, uniqueness, mutation, deletion,
//! and pagination clamping.

use accountd_core::error::AccountError;
use accountd_db::models::ListOrder;
use accountd_db::store::MemoryAccountStore;
use accountd_service::auth::token::{verify_token, TokenConfig};
use accountd_service::{AccountService, AdminUpdate, ListParams};
use assert_matches::assert_matches;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn test_tokens() -> TokenConfig {
    TokenConfig::new("test-secret-that-is-long-enough-for-hmac", 7)
}

fn test_service() -> AccountService<MemoryAccountStore> {
    AccountService::new(MemoryAccountStore::new(), test_tokens())
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_safe_view_with_user_role() {
    let service = test_service();

    let view = service.create("alice", "secret1").await.unwrap();

    assert_eq!(view.username, "alice");
    assert_eq!(view.role.as_str(), "user");
    assert_eq!(view.created_at, view.updated_at);

    // The safe view must not carry any password material, under any key.
    let json = serde_json::to_value(&view).unwrap();
    let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
    assert!(
        !keys.iter().any(|k| k.contains("password") || k.contains("hash")),
        "unexpected keys: {keys:?}"
    );
}

#[tokio::test]
async fn create_trims_inputs_before_validation() {
    let service = test_service();

    let view = service.create("  alice  ", "  secret1  ").await.unwrap();
    assert_eq!(view.username, "alice");

    // The trimmed password is what was hashed.
    let token = service.login("alice", "secret1").await.unwrap();
    assert!(!token.is_empty());
}

#[tokio::test]
async fn create_rejects_short_fields() {
    let service = test_service();

    let err = service.create("al", "secret1").await.unwrap_err();
    assert_matches!(err, AccountError::Validation(_));

    let err = service.create("alice", "ab").await.unwrap_err();
    assert_matches!(err, AccountError::Validation(_));

    // Whitespace padding does not help a too-short value.
    let err = service.create("  al   ", "secret1").await.unwrap_err();
    assert_matches!(err, AccountError::Validation(_));
}

#[tokio::test]
async fn duplicate_username_is_rejected_at_the_store() {
    let service = test_service();
    service.create("alice", "secret1").await.unwrap();

    // No service-level pre-check on create; the store's unique
    // constraint surfaces as the same UsernameTaken kind.
    let err = service.create("alice", "other-password").await.unwrap_err();
    assert_matches!(err, AccountError::UsernameTaken);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_issues_verifiable_token() {
    let service = test_service();
    let view = service.create("alice", "secret1").await.unwrap();

    let token = service.login("alice", "secret1").await.unwrap();
    assert!(!token.is_empty());

    let claims = verify_token(&token, &test_tokens()).unwrap();
    assert_eq!(claims.sub, view.id);
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.role, "user");
    assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let service = test_service();
    service.create("alice", "secret1").await.unwrap();

    let missing_user = service.login("nosuchuser", "secret1").await.unwrap_err();
    let wrong_password = service.login("alice", "wrong").await.unwrap_err();

    assert_matches!(missing_user, AccountError::InvalidCredentials);
    assert_matches!(wrong_password, AccountError::InvalidCredentials);
    assert_eq!(missing_user.to_string(), wrong_password.to_string());
}

// ---------------------------------------------------------------------------
// Username update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_username_enforces_uniqueness_across_accounts() {
    let service = test_service();
    let alice = service.create("alice", "secret1").await.unwrap();
    let bob = service.create("bobby", "secret1").await.unwrap();

    // First rename commits.
    let renamed = service.update_username(alice.id, "carol").await.unwrap();
    assert_eq!(renamed.username, "carol");

    // Second caller asking for the same name loses.
    let err = service.update_username(bob.id, "carol").await.unwrap_err();
    assert_matches!(err, AccountError::UsernameTaken);
}

#[tokio::test]
async fn update_username_to_own_current_name_is_allowed() {
    let service = test_service();
    let alice = service.create("alice", "secret1").await.unwrap();

    let view = service.update_username(alice.id, "alice").await.unwrap();
    assert_eq!(view.username, "alice");
}

#[tokio::test]
async fn update_username_validates_length() {
    let service = test_service();
    let alice = service.create("alice", "secret1").await.unwrap();

    let err = service.update_username(alice.id, "al").await.unwrap_err();
    assert_matches!(err, AccountError::Validation(_));
}

#[tokio::test]
async fn update_username_missing_account_is_not_found() {
    let service = test_service();

    let err = service.update_username(404, "newname").await.unwrap_err();
    assert_matches!(err, AccountError::NotFound { entity: "Account", id: 404 });
}

#[tokio::test]
async fn update_refreshes_updated_at() {
    let service = test_service();
    let alice = service.create("alice", "secret1").await.unwrap();

    let view = service.update_username(alice.id, "carol").await.unwrap();
    assert_eq!(view.created_at, alice.created_at);
    assert!(view.updated_at >= alice.updated_at);
}

// ---------------------------------------------------------------------------
// Password update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_password_rotates_the_stored_hash() {
    let service = test_service();
    let alice = service.create("alice", "secret1").await.unwrap();

    service.update_password(alice.id, "new-secret").await.unwrap();

    let err = service.login("alice", "secret1").await.unwrap_err();
    assert_matches!(err, AccountError::InvalidCredentials);
    assert!(!service.login("alice", "new-secret").await.unwrap().is_empty());
}

#[tokio::test]
async fn update_password_validates_length() {
    let service = test_service();
    let alice = service.create("alice", "secret1").await.unwrap();

    let err = service.update_password(alice.id, " ab ").await.unwrap_err();
    assert_matches!(err, AccountError::Validation(_));
}

// ---------------------------------------------------------------------------
// Admin update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_update_can_change_role() {
    let service = test_service();
    let alice = service.create("alice", "secret1").await.unwrap();

    let update = AdminUpdate {
        role: Some("editor".parse().unwrap()),
        ..Default::default()
    };
    let view = service.update_account(alice.id, update).await.unwrap();
    assert_eq!(view.role.as_str(), "editor");

    // The new role is bound into subsequently issued tokens.
    let token = service.login("alice", "secret1").await.unwrap();
    let claims = verify_token(&token, &test_tokens()).unwrap();
    assert_eq!(claims.role, "editor");
}

#[tokio::test]
async fn admin_update_checks_username_uniqueness() {
    let service = test_service();
    service.create("alice", "secret1").await.unwrap();
    let bob = service.create("bobby", "secret1").await.unwrap();

    let update = AdminUpdate {
        username: Some("alice".to_string()),
        ..Default::default()
    };
    let err = service.update_account(bob.id, update).await.unwrap_err();
    assert_matches!(err, AccountError::UsernameTaken);
}

#[tokio::test]
async fn admin_update_with_no_fields_still_touches_the_account() {
    let service = test_service();
    let alice = service.create("alice", "secret1").await.unwrap();

    let view = service
        .update_account(alice.id, AdminUpdate::default())
        .await
        .unwrap();
    assert_eq!(view.username, "alice");
    assert_eq!(view.role.as_str(), "user");
}

// ---------------------------------------------------------------------------
// Find / delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn find_returns_view_or_not_found() {
    let service = test_service();
    let alice = service.create("alice", "secret1").await.unwrap();

    let view = service.find(alice.id).await.unwrap();
    assert_eq!(view.username, "alice");

    let err = service.find(999).await.unwrap_err();
    assert_matches!(err, AccountError::NotFound { .. });
}

#[tokio::test]
async fn delete_returns_id_and_closes_login() {
    let service = test_service();
    let alice = service.create("alice", "secret1").await.unwrap();

    let deleted = service.delete(alice.id).await.unwrap();
    assert_eq!(deleted, alice.id);

    let err = service.login("alice", "secret1").await.unwrap_err();
    assert_matches!(err, AccountError::InvalidCredentials);
}

#[tokio::test]
async fn delete_missing_account_is_not_found() {
    let service = test_service();

    let err = service.delete(12345).await.unwrap_err();
    assert_matches!(err, AccountError::NotFound { entity: "Account", id: 12345 });
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_clamps_oversized_limit() {
    let service = test_service();
    for name in ["alice", "bobby", "carol"] {
        service.create(name, "secret1").await.unwrap();
    }

    let page = service
        .list(ListParams {
            page: Some(1),
            limit: Some(500),
            order: None,
        })
        .await
        .unwrap();

    assert_eq!(page.limit, 100);
    assert!(page.items.len() <= 100);
    assert_eq!(page.total_items, 3);
}

#[tokio::test]
async fn list_defaults_page_and_limit() {
    let service = test_service();
    service.create("alice", "secret1").await.unwrap();

    let page = service.list(ListParams::default()).await.unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, 10);

    let page = service
        .list(ListParams {
            page: Some(-1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.page, 1);
}

#[tokio::test]
async fn list_passes_order_through_to_the_store() {
    let service = test_service();
    for name in ["carol", "alice", "bobby"] {
        service.create(name, "secret1").await.unwrap();
    }

    let page = service
        .list(ListParams {
            order: Some(ListOrder::UsernameAsc),
            ..Default::default()
        })
        .await
        .unwrap();

    let names: Vec<&str> = page.items.iter().map(|v| v.username.as_str()).collect();
    assert_eq!(names, ["alice", "bobby", "carol"]);
}

#[tokio::test]
async fn list_with_extreme_page_returns_empty_page() {
    let service = test_service();
    for name in ["alice", "bobby", "carol"] {
        service.create(name, "secret1").await.unwrap();
    }

    let page = service
        .list(ListParams {
            page: Some(i64::MAX),
            limit: Some(2),
            order: None,
        })
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 3);
}

#[tokio::test]
async fn list_paginates_across_pages() {
    let service = test_service();
    for name in ["alice", "bobby", "carol"] {
        service.create(name, "secret1").await.unwrap();
    }

    let page2 = service
        .list(ListParams {
            page: Some(2),
            limit: Some(2),
            order: Some(ListOrder::UsernameAsc),
        })
        .await
        .unwrap();

    assert_eq!(page2.total_pages, 2);
    assert_eq!(page2.items.len(), 1);
    assert_eq!(page2.items[0].username, "carol");
}

// ---------------------------------------------------------------------------
// End-to-end scenario
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_account_lifecycle() {
    let service = test_service();

    let alice = service.create("alice", "secret1").await.unwrap();
    assert_eq!(alice.username, "alice");

    let token = service.login("alice", "secret1").await.unwrap();
    assert!(!token.is_empty());

    let err = service.login("alice", "wrong").await.unwrap_err();
    assert_matches!(err, AccountError::InvalidCredentials);

    let err = service.update_username(alice.id, "al").await.unwrap_err();
    assert_matches!(err, AccountError::Validation(_));

    assert_eq!(service.delete(alice.id).await.unwrap(), alice.id);

    let err = service.login("alice", "secret1").await.unwrap_err();
    assert_matches!(err, AccountError::InvalidCredentials);
}
