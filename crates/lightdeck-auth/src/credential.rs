//! Password verification against the stored web credential hash.
//!
//! The configuration file stores a bcrypt hash (`$2b$10$...`), the same
//! format the device's `crypt(3)`-based firmware used.

use crate::error::{AuthError, Result};

/// Default bcrypt cost for newly generated hashes.
pub const DEFAULT_HASH_COST: u32 = 10;

/// Checks a plaintext password against a stored hash.
pub trait CredentialVerifier: Send + Sync {
    /// Returns `true` iff `password` matches `hash`.
    ///
    /// An empty hash never matches.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Verifier for bcrypt hashes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BcryptVerifier;

impl CredentialVerifier for BcryptVerifier {
    fn verify(&self, password: &str, hash: &str) -> bool {
        if hash.is_empty() {
            tracing::debug!("No web password hash configured, rejecting login");
            return false;
        }

        match bcrypt::verify(password, hash) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::warn!(error = %e, "Stored web password hash is malformed");
                false
            }
        }
    }
}

/// Produce a bcrypt hash suitable for the `web_password_hash` field.
///
/// # Errors
///
/// Returns `AuthError::Hashing` if bcrypt rejects the input or cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost).map_err(|e| AuthError::Hashing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps tests fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn matching_password_verifies() {
        let hash = hash_password("hunter2", TEST_COST).unwrap();
        assert!(hash.starts_with("$2"));
        assert!(BcryptVerifier.verify("hunter2", &hash));
    }

    #[test]
    fn wrong_password_fails() {
        let hash = hash_password("hunter2", TEST_COST).unwrap();
        assert!(!BcryptVerifier.verify("hunter3", &hash));
    }

    #[test]
    fn empty_hash_never_matches() {
        assert!(!BcryptVerifier.verify("", ""));
        assert!(!BcryptVerifier.verify("anything", ""));
    }

    #[test]
    fn malformed_hash_fails_closed() {
        assert!(!BcryptVerifier.verify("hunter2", "not-a-hash"));
    }
}
