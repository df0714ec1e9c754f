//! bcrypt password hashing and verification.
//!
//! Hashes use a per-call random salt at a fixed work factor and are
//! stored in bcrypt's self-describing format (version, cost, and salt
//! embedded in the string), so verification needs no side channel.

use bcrypt::BcryptError;

/// Fixed bcrypt work factor for all password hashes.
const HASH_COST: u32 = 10;

/// Hash a plaintext password with a random salt.
///
/// Fails only on internal failure (e.g. RNG exhaustion), never on
/// malformed input.
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    bcrypt::hash(password, HASH_COST)
}

/// Verify a plaintext password against a stored bcrypt hash in
/// constant time.
///
/// Returns `Ok(false)` for a non-matching password; `Err` only when the
/// stored hash itself is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("secret1").expect("hashing should succeed");

        // Self-describing format: bcrypt prefix with the fixed cost.
        assert!(hash.starts_with("$2"), "expected bcrypt prefix");
        assert!(hash.contains("$10$"), "expected cost 10 in the hash");

        let matched = verify_password("secret1", &hash).expect("verify should succeed");
        assert!(matched, "correct password should verify as true");
    }

    #[test]
    fn wrong_password_is_false_not_error() {
        let hash = hash_password("secret1").expect("hashing should succeed");
        let matched = verify_password("secret2", &hash).expect("verify should succeed");
        assert!(!matched, "wrong password should verify as false");
    }

    #[test]
    fn salts_differ_per_call() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b, "each hash must use a fresh salt");
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        assert!(verify_password("whatever", "not-a-bcrypt-hash").is_err());
    }
}
