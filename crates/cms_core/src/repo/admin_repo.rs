//! Admin account directory stored in the `admin_users` collection.
//!
//! # Invariants
//! - Usernames are unique within the directory.
//! - Only hashed credentials are persisted.

use crate::model::admin::{
    validate_password_strength, validate_username, AdminAccount, AdminIdentity,
    PasswordCredential,
};
use crate::model::entity::Stored;
use crate::model::validation::ValidationError;
use crate::repo::collection_repo::{CollectionRepository, RepoError, RepoResult};
use crate::repo::record_store::{BackendError, RecordStore};
use log::info;

/// Lookup and registration of admin accounts.
pub struct AdminDirectory<'s, S: ?Sized> {
    accounts: CollectionRepository<'s, AdminAccount, S>,
}

impl<'s, S: RecordStore + ?Sized> AdminDirectory<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            accounts: CollectionRepository::new(store),
        }
    }

    /// Creates an admin account with a freshly salted credential.
    ///
    /// # Errors
    /// - `Validation` for malformed usernames, short passwords or a taken
    ///   username.
    pub fn register(&self, username: &str, password: &str) -> RepoResult<AdminIdentity> {
        let username = username.trim();
        validate_username(username)?;
        validate_password_strength(password)?;

        if self.find_by_username(username)?.is_some() {
            return Err(ValidationError::Invalid {
                field: "username".to_string(),
                reason: "already registered".to_string(),
            }
            .into());
        }

        let credential = PasswordCredential::hash(password)
            .map_err(|err| RepoError::BackendUnavailable(BackendError::Internal(err.to_string())))?;
        let stored = self.accounts.create(&AdminAccount {
            username: username.to_string(),
            credential,
        })?;

        info!(
            "event=admin_register module=auth status=ok id={}",
            stored.id
        );
        Ok(AdminIdentity::from(&stored))
    }

    /// Returns the single account named `username`, if any.
    ///
    /// More than one match means the directory is corrupt and is reported as
    /// a backend failure.
    pub fn find_by_username(&self, username: &str) -> RepoResult<Option<Stored<AdminAccount>>> {
        let mut matches = self
            .accounts
            .get_all()?
            .into_iter()
            .filter(|account| account.data.username == username);

        let first = matches.next();
        if matches.next().is_some() {
            return Err(RepoError::BackendUnavailable(BackendError::MalformedRecord(
                "duplicate admin usernames".to_string(),
            )));
        }
        Ok(first)
    }

    /// Whether any admin account exists yet.
    pub fn is_empty(&self) -> RepoResult<bool> {
        Ok(self.accounts.get_all()?.is_empty())
    }

    /// Removes an admin account.
    pub fn remove(&self, identity: &AdminIdentity) -> RepoResult<()> {
        self.accounts.delete(identity.id)
    }
}
