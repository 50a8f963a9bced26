use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::HashingFailure;

/// One-way password hasher backed by Argon2id.
///
/// Hashes are salted PHC strings: the same plaintext never hashes to the
/// same string twice, but every hash produced here verifies against the
/// original plaintext.
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password for storage.
    ///
    /// # Errors
    /// * `HashingFailure` - the Argon2 primitive could not complete. Fatal
    ///   for the enclosing attempt; nothing is persisted.
    pub fn hash(&self, password: &str) -> Result<String, HashingFailure> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashingFailure(e.to_string()))
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// Infallible by contract: a stored hash that is not a parsable PHC
    /// string counts as a mismatch, not an error.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(stored_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(error = %e, "stored password hash is not parsable");
                return false;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies_original_and_rejects_others() {
        let hasher = PasswordHasher::new();

        let hash = hasher.hash("my_secure_password").expect("Failed to hash");

        assert!(hasher.verify("my_secure_password", &hash));
        assert!(!hasher.verify("my_secure_passwordX", &hash));
        assert!(!hasher.verify("", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = PasswordHasher::new();

        let first = hasher.hash("same_password").expect("Failed to hash");
        let second = hasher.hash("same_password").expect("Failed to hash");

        // Fresh salt every time, yet both verify.
        assert_ne!(first, second);
        assert!(hasher.verify("same_password", &first));
        assert!(hasher.verify("same_password", &second));
    }

    #[test]
    fn test_malformed_stored_hash_is_a_mismatch() {
        let hasher = PasswordHasher::new();

        assert!(!hasher.verify("password", "not_a_phc_string"));
        assert!(!hasher.verify("password", ""));
        assert!(!hasher.verify("password", "$argon2id$v=19$truncated"));
    }
}
