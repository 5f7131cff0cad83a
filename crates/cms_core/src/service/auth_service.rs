//! Admin authenticator.
//!
//! # Responsibility
//! - Check a username/password pair against the admin directory.
//! - Hand back the matching identity; adopting it is the caller's job.
//!
//! # Invariants
//! - Unknown usernames and wrong passwords produce the same
//!   `AuthError::InvalidCredentials` value.
//! - Both failure paths run one Argon2 verification, so timing does not
//!   reveal whether the username exists.
//! - Session state is never touched here.

use crate::model::admin::{AdminIdentity, PasswordCredential};
use crate::repo::admin_repo::AdminDirectory;
use crate::repo::record_store::RecordStore;
use log::{info, warn};
use once_cell::sync::Lazy;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Credential checked when the username is unknown.
static DUMMY_CREDENTIAL: Lazy<Option<PasswordCredential>> =
    Lazy::new(|| PasswordCredential::hash("cms-dummy-credential").ok());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Username unknown or password wrong. Deliberately indistinguishable.
    InvalidCredentials,
    /// The directory could not be consulted.
    Unavailable(String),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::Unavailable(message) => write!(f, "login failed: {message}"),
        }
    }
}

impl Error for AuthError {}

/// Validates admin credentials.
pub struct Authenticator<'s, S: ?Sized> {
    directory: AdminDirectory<'s, S>,
}

impl<'s, S: RecordStore + ?Sized> Authenticator<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            directory: AdminDirectory::new(store),
        }
    }

    /// Returns the identity owning `username` when `password` matches.
    pub fn login(&self, username: &str, password: &str) -> Result<AdminIdentity, AuthError> {
        let account = self
            .directory
            .find_by_username(username.trim())
            .map_err(|err| {
                warn!("event=admin_login module=auth status=error error={err}");
                AuthError::Unavailable(err.to_string())
            })?;

        let Some(account) = account else {
            if let Some(dummy) = DUMMY_CREDENTIAL.as_ref() {
                let _ = dummy.verify(password);
            }
            info!("event=admin_login module=auth status=denied");
            return Err(AuthError::InvalidCredentials);
        };

        match account.data.credential.verify(password) {
            Ok(true) => {
                info!("event=admin_login module=auth status=ok id={}", account.id);
                Ok(AdminIdentity::from(&account))
            }
            Ok(false) => {
                info!("event=admin_login module=auth status=denied");
                Err(AuthError::InvalidCredentials)
            }
            Err(err) => {
                warn!(
                    "event=admin_login module=auth status=error id={} error={err}",
                    account.id
                );
                Err(AuthError::Unavailable(
                    "stored credential is unreadable".to_string(),
                ))
            }
        }
    }
}
