//! Record store contract shared by every storage backend.
//!
//! # Responsibility
//! - Define list/get/insert/update/remove over named collections.
//! - Classify failures as validation, not-found or backend-unavailable.
//!
//! # Invariants
//! - `list` on an unknown collection returns an empty sequence.
//! - `insert` sets `created_at == updated_at`; `update` makes `updated_at`
//!   strictly greater than before.
//! - Caller-supplied `id`, `created_at` and `updated_at` are ignored.
//! - A removed record is gone: a second `remove` reports `NotFound`.

use crate::db::DbError;
use crate::model::record::{Fields, Record, RecordId};
use crate::model::validation::ValidationError;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Transient or unexpected backend failure. Safe to retry.
#[derive(Debug)]
pub enum BackendError {
    /// Storage engine failure.
    Db(DbError),
    /// The backend stayed locked longer than the configured timeout.
    Timeout(rusqlite::Error),
    /// Persisted data could not be decoded.
    MalformedRecord(String),
    /// In-process state was poisoned by a panicking writer.
    Poisoned(&'static str),
    /// Supporting machinery (hashing, encoding) failed.
    Internal(String),
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Timeout(err) => write!(f, "backend timed out: {err}"),
            Self::MalformedRecord(message) => write!(f, "malformed stored record: {message}"),
            Self::Poisoned(what) => write!(f, "{what} lock poisoned"),
            Self::Internal(message) => write!(f, "internal failure: {message}"),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Timeout(err) => Some(err),
            Self::MalformedRecord(_) | Self::Poisoned(_) | Self::Internal(_) => None,
        }
    }
}

/// Record store failure.
#[derive(Debug)]
pub enum StoreError {
    Validation(ValidationError),
    NotFound { collection: String, id: RecordId },
    BackendUnavailable(BackendError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { collection, id } => write!(f, "{collection} record not found: {id}"),
            Self::BackendUnavailable(err) => write!(f, "backend unavailable: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::BackendUnavailable(err) => Some(err),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<BackendError> for StoreError {
    fn from(value: BackendError) -> Self {
        Self::BackendUnavailable(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => err.into(),
            other => Self::BackendUnavailable(BackendError::Db(other)),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        match value.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
                Self::BackendUnavailable(BackendError::Timeout(value))
            }
            Some(ErrorCode::ConstraintViolation) => Self::Validation(ValidationError::Invalid {
                field: "record".to_string(),
                reason: value.to_string(),
            }),
            _ => Self::BackendUnavailable(BackendError::Db(DbError::Sqlite(value))),
        }
    }
}

impl StoreError {
    pub(crate) fn not_found(collection: &str, id: RecordId) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            id,
        }
    }
}

/// Backend-agnostic persistence of records grouped by collection.
pub trait RecordStore {
    /// Records of `collection`, newest `created_at` first.
    fn list(&self, collection: &str) -> StoreResult<Vec<Record>>;

    /// One record by id, or `None` when absent.
    fn get(&self, collection: &str, id: RecordId) -> StoreResult<Option<Record>>;

    /// Stores `fields` as a new record with a fresh id.
    fn insert(&self, collection: &str, fields: Fields) -> StoreResult<Record>;

    /// Merges `fields` over an existing record and refreshes `updated_at`.
    fn update(&self, collection: &str, id: RecordId, fields: Fields) -> StoreResult<Record>;

    /// Deletes one record.
    fn remove(&self, collection: &str, id: RecordId) -> StoreResult<()>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn list(&self, collection: &str) -> StoreResult<Vec<Record>> {
        (**self).list(collection)
    }

    fn get(&self, collection: &str, id: RecordId) -> StoreResult<Option<Record>> {
        (**self).get(collection, id)
    }

    fn insert(&self, collection: &str, fields: Fields) -> StoreResult<Record> {
        (**self).insert(collection, fields)
    }

    fn update(&self, collection: &str, id: RecordId, fields: Fields) -> StoreResult<Record> {
        (**self).update(collection, id, fields)
    }

    fn remove(&self, collection: &str, id: RecordId) -> StoreResult<()> {
        (**self).remove(collection, id)
    }
}
