//! Admin identities and their stored password credentials.
//!
//! # Responsibility
//! - Define the identity a session holds and the account record it comes
//!   from.
//! - Hash and verify passwords with Argon2id (random salt per credential).
//!
//! # Invariants
//! - Plaintext passwords are never stored or logged.
//! - `AdminIdentity` carries no credential material, so it is safe to
//!   persist in local session state.
//! - `PasswordCredential` debug output never reveals the hash.

use crate::model::entity::{Entity, Stored};
use crate::model::record::RecordId;
use crate::model::schema::{CollectionSchema, FieldKind, FieldSpec};
use crate::model::validation::ValidationError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.@-]{2,63}$").expect("valid username regex")
});

static ADMIN_ACCOUNT_FIELDS: [FieldSpec; 2] = [
    FieldSpec::required("username", FieldKind::Text),
    FieldSpec::required("password_hash", FieldKind::Text),
];

static ADMIN_ACCOUNT_SCHEMA: CollectionSchema =
    CollectionSchema::new("admin_users", &ADMIN_ACCOUNT_FIELDS);

/// Authenticated admin as seen by the rest of the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub id: RecordId,
    pub username: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Stored admin account: username plus password credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAccount {
    pub username: String,
    #[serde(rename = "password_hash")]
    pub credential: PasswordCredential,
}

impl Entity for AdminAccount {
    const COLLECTION: &'static str = "admin_users";

    fn schema() -> &'static CollectionSchema {
        &ADMIN_ACCOUNT_SCHEMA
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_username(&self.username)?;
        if PasswordHash::new(self.credential.as_phc()).is_err() {
            return Err(ValidationError::Invalid {
                field: "password_hash".to_string(),
                reason: "not a PHC formatted hash".to_string(),
            });
        }
        Ok(())
    }
}

impl From<&Stored<AdminAccount>> for AdminIdentity {
    fn from(stored: &Stored<AdminAccount>) -> Self {
        Self {
            id: stored.id,
            username: stored.data.username.clone(),
            created_at: stored.created_at,
        }
    }
}

/// Checks username shape: 3-64 chars of `[A-Za-z0-9_.@-]`, starting
/// alphanumeric.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(username) {
        return Ok(());
    }
    Err(ValidationError::Invalid {
        field: "username".to_string(),
        reason: "expected 3-64 characters of letters, digits, `_`, `.`, `@` or `-`".to_string(),
    })
}

/// Rejects passwords shorter than `MIN_PASSWORD_CHARS`.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::Invalid {
            field: "password".to_string(),
            reason: format!("must be at least {MIN_PASSWORD_CHARS} characters long"),
        });
    }
    Ok(())
}

/// Hashing or hash-parsing failure.
#[derive(Debug)]
pub struct CredentialError(argon2::password_hash::Error);

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "password credential error: {}", self.0)
    }
}

impl Error for CredentialError {}

/// Argon2id PHC string. Comparison only; never displayed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordCredential(String);

impl PasswordCredential {
    /// Hashes `password` with a freshly generated salt.
    pub fn hash(password: &str) -> Result<Self, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(CredentialError)?;
        Ok(Self(hash.to_string()))
    }

    /// Verifies `password` against this credential in constant time.
    ///
    /// Returns `Ok(false)` on mismatch and `Err` when the stored hash is
    /// unreadable.
    pub fn verify(&self, password: &str) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(&self.0).map_err(CredentialError)?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(CredentialError(err)),
        }
    }

    pub fn as_phc(&self) -> &str {
        &self.0
    }
}

impl Debug for PasswordCredential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordCredential(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_password_strength, validate_username, PasswordCredential};

    #[test]
    fn hash_uses_argon2id_and_verifies() {
        let credential = PasswordCredential::hash("correct-horse").expect("hash");
        assert!(credential.as_phc().starts_with("$argon2id$"));
        assert!(credential.verify("correct-horse").expect("verify"));
        assert!(!credential.verify("wrong-horse").expect("verify"));
    }

    #[test]
    fn same_password_hashes_differently() {
        let first = PasswordCredential::hash("correct-horse").expect("hash");
        let second = PasswordCredential::hash("correct-horse").expect("hash");
        assert_ne!(first, second);
    }

    #[test]
    fn debug_output_is_redacted() {
        let credential = PasswordCredential::hash("correct-horse").expect("hash");
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("argon2"));
    }

    #[test]
    fn username_and_password_rules() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("ops.lead@nexus").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(" admin").is_err());
        assert!(validate_password_strength("short").is_err());
        assert!(validate_password_strength("long enough").is_ok());
    }
}
