use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// One-way storage format for user passwords.
///
/// Digests are Argon2id PHC strings carrying their own salt and parameters, so a
/// digest produced with older parameters still verifies after the defaults change.
#[derive(Clone, Default)]
pub struct CredentialStore {
    argon2: Argon2<'static>,
}

impl CredentialStore {
    /// Create a credential store with the Argon2id defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a plaintext password with a freshly generated salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// PHC string digest
    ///
    /// # Errors
    /// * `Empty` - Password is the empty string
    /// * `HashingFailed` - Argon2 rejected the input
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::Empty);
        }

        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Check a plaintext password against a stored digest.
    ///
    /// The digest comparison is constant time. A wrong password yields `Ok(false)`;
    /// only a digest that cannot be parsed is an error.
    ///
    /// # Errors
    /// * `MalformedDigest` - Stored digest is not a valid PHC string
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(digest)
            .map_err(|e| PasswordError::MalformedDigest(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::MalformedDigest(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let store = CredentialStore::new();
        let digest = store.hash("my_secure_password").expect("Failed to hash");

        assert!(store.verify("my_secure_password", &digest).unwrap());
        assert!(!store.verify("wrong_password", &digest).unwrap());
    }

    #[test]
    fn test_digest_never_equals_plaintext() {
        let store = CredentialStore::new();
        let digest = store.hash("p").expect("Failed to hash");

        assert_ne!(digest, "p");
        assert!(digest.starts_with("$argon2id$"));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let store = CredentialStore::new();
        let first = store.hash("hunter2").unwrap();
        let second = store.hash("hunter2").unwrap();

        assert_ne!(first, second);
        assert!(store.verify("hunter2", &first).unwrap());
        assert!(store.verify("hunter2", &second).unwrap());
    }

    #[test]
    fn test_empty_password_rejected() {
        let store = CredentialStore::new();
        assert_eq!(store.hash(""), Err(PasswordError::Empty));
    }

    #[test]
    fn test_verify_malformed_digest() {
        let store = CredentialStore::new();
        let result = store.verify("password", "not-a-phc-string");
        assert!(matches!(result, Err(PasswordError::MalformedDigest(_))));
    }
}
