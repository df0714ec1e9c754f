//! Domain error taxonomy shared across the store and service layers.

use crate::types::DbId;

/// Error returned by [`AccountStore`] implementations.
///
/// [`AccountStore`]: https://docs.rs/accountd-db
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A storage-level unique constraint rejected a write.
    ///
    /// Carries the constraint name so the service layer can translate
    /// known constraints (e.g. the username index) into friendlier
    /// domain errors.
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// Any other backend failure. The cause is preserved as the error
    /// source for logging but is never shown to callers.
    #[error("storage backend failure")]
    Backend(#[from] anyhow::Error),
}

/// Domain-level error returned by every account service operation.
///
/// Messages are caller-facing: they must not leak password material,
/// hash detail, or storage internals. `InvalidCredentials` is a single
/// undifferentiated kind for both unknown-username and wrong-password
/// so login failures cannot be used for username enumeration.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("Invalid username or password")]
    InvalidCredentials,

    /// A cryptographic operation (password hashing/verification or
    /// token signing) failed. The detail is kept for logs only.
    #[error("A cryptographic operation failed")]
    Hashing(String),

    /// An opaque persistence failure. The display string stays generic;
    /// the wrapped [`StoreError`] is available as the source chain.
    #[error("A storage error occurred")]
    Store(#[source] StoreError),
}

/// Convenience alias for service return values.
pub type AccountResult<T> = Result<T, AccountError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_display_does_not_leak_backend_detail() {
        let err = AccountError::Store(StoreError::Backend(anyhow::anyhow!(
            "connection refused: 10.0.0.3:5432"
        )));
        assert_eq!(err.to_string(), "A storage error occurred");
    }

    #[test]
    fn invalid_credentials_message_is_fixed() {
        assert_eq!(
            AccountError::InvalidCredentials.to_string(),
            "Invalid username or password"
        );
    }
}
