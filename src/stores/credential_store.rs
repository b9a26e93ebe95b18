use std::fmt;
use std::sync::OnceLock;

use argon2::password_hash::{self, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand_core::OsRng;
use sea_orm::Set;

use crate::errors::internal::CredentialError;
use crate::types::db::user;

/// Argon2id password hashing bound to the user record
///
/// Digests are PHC strings with a fresh random salt per call. Plaintext
/// passwords are only ever borrowed.
pub struct CredentialStore {
    argon2: Argon2<'static>,
    timing_digest: OnceLock<Option<String>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
            timing_digest: OnceLock::new(),
        }
    }

    /// Derive a salted digest for `plaintext`
    pub fn hash_password(&self, plaintext: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CredentialError::HashingFailed(e.to_string()))
    }

    /// Replace the digest on `user`, overwriting any prior value
    pub fn set_password(&self, user: &mut user::ActiveModel, plaintext: &str) -> Result<(), CredentialError> {
        user.password_hash = Set(self.hash_password(plaintext)?);
        Ok(())
    }

    /// Compare `plaintext` against the stored digest
    ///
    /// A mismatch is `Ok(false)`. Only an unparseable stored digest is an error.
    pub fn check_password(&self, user: &user::Model, plaintext: &str) -> Result<bool, CredentialError> {
        self.verify_digest(&user.password_hash, plaintext)
    }

    fn verify_digest(&self, digest: &str, plaintext: &str) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(digest).map_err(|e| CredentialError::MalformedDigest(e.to_string()))?;

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CredentialError::MalformedDigest(e.to_string())),
        }
    }

    /// Spend one verification's worth of work on a throwaway digest
    ///
    /// Called when no user matched so that an unknown username takes as long
    /// as a wrong password.
    pub fn equalize_timing(&self, plaintext: &str) {
        let digest = self
            .timing_digest
            .get_or_init(|| self.hash_password("threatdesk-timing-equalizer").ok());

        if let Some(digest) = digest {
            let _ = self.verify_digest(digest, plaintext);
        }
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("algorithm", &"argon2id")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::db::UserRole;

    fn user_with_digest(password_hash: String) -> user::Model {
        user::Model {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash,
            role: UserRole::SecurityOfficer,
            is_active: true,
            last_login: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_set_password_stores_argon2_digest_not_plaintext() {
        let store = CredentialStore::new();
        let mut active = user::ActiveModel::default();

        store.set_password(&mut active, "Secr3t!").unwrap();

        let digest = active.password_hash.clone().unwrap();
        assert_ne!(digest, "Secr3t!");
        assert!(digest.starts_with("$argon2id$"));
    }

    #[test]
    fn test_set_password_overwrites_prior_digest() {
        let store = CredentialStore::new();
        let mut active = user::ActiveModel::default();

        store.set_password(&mut active, "first").unwrap();
        let first = active.password_hash.clone().unwrap();
        store.set_password(&mut active, "second").unwrap();
        let second = active.password_hash.clone().unwrap();

        assert_ne!(first, second);
        let user = user_with_digest(second);
        assert!(store.check_password(&user, "second").unwrap());
        assert!(!store.check_password(&user, "first").unwrap());
    }

    #[test]
    fn test_check_password_round_trip() {
        let store = CredentialStore::new();
        let user = user_with_digest(store.hash_password("Secr3t!").unwrap());

        assert!(store.check_password(&user, "Secr3t!").unwrap());
        assert!(!store.check_password(&user, "secr3t!").unwrap());
        assert!(!store.check_password(&user, "").unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let store = CredentialStore::new();

        assert_ne!(store.hash_password("same").unwrap(), store.hash_password("same").unwrap());
    }

    #[test]
    fn test_malformed_digest_is_an_error_not_a_mismatch() {
        let store = CredentialStore::new();
        let user = user_with_digest("plaintext-leftover".to_string());

        assert!(matches!(
            store.check_password(&user, "anything"),
            Err(CredentialError::MalformedDigest(_))
        ));
    }

    #[test]
    fn test_equalize_timing_never_panics() {
        let store = CredentialStore::new();
        store.equalize_timing("whatever");
        store.equalize_timing("again");
    }

    #[test]
    fn test_debug_shows_no_digest_material() {
        let output = format!("{:?}", CredentialStore::new());

        assert!(output.contains("CredentialStore"));
        assert!(!output.contains('$'));
    }
}
