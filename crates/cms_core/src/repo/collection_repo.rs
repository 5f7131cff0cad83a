//! Typed CRUD facade over one record store collection.
//!
//! # Responsibility
//! - Validate entity shape and rules before any store write.
//! - Shape raw records into `Stored<T>` views.
//! - Report failures as `RepoError` (validation, not found, backend).
//!
//! # Invariants
//! - Owns no state; every call goes to the store.
//! - Caller-supplied `id`, `created_at` and `updated_at` never reach the
//!   store.
//! - A failed validation writes nothing.

use crate::model::entity::{from_fields, to_fields, Entity, Stored};
use crate::model::record::{merge_fields, strip_reserved, Fields, Record, RecordId};
use crate::model::schema::CheckMode;
use crate::model::validation::ValidationError;
use crate::repo::record_store::{BackendError, RecordStore, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure category, for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    BackendUnavailable,
}

/// Typed repository error.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    NotFound {
        collection: &'static str,
        id: RecordId,
    },
    BackendUnavailable(BackendError),
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::BackendUnavailable(_) => ErrorKind::BackendUnavailable,
        }
    }

    /// Only backend failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::BackendUnavailable
    }

    fn from_store<T: Entity>(err: StoreError) -> Self {
        match err {
            StoreError::Validation(err) => Self::Validation(err),
            StoreError::NotFound { id, .. } => Self::NotFound {
                collection: T::COLLECTION,
                id,
            },
            StoreError::BackendUnavailable(err) => Self::BackendUnavailable(err),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { collection, id } => write!(f, "{collection} record not found: {id}"),
            Self::BackendUnavailable(err) => write!(f, "backend unavailable: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::BackendUnavailable(err) => Some(err),
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// CRUD over the collection of entity type `T`.
pub struct CollectionRepository<'s, T, S: ?Sized> {
    store: &'s S,
    _entity: PhantomData<fn() -> T>,
}

impl<T, S: ?Sized> Clone for CollectionRepository<'_, T, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, S: ?Sized> Copy for CollectionRepository<'_, T, S> {}

impl<'s, T: Entity, S: RecordStore + ?Sized> CollectionRepository<'s, T, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// All entities, newest first.
    pub fn get_all(&self) -> RepoResult<Vec<Stored<T>>> {
        self.store
            .list(T::COLLECTION)
            .map_err(RepoError::from_store::<T>)?
            .into_iter()
            .map(decode::<T>)
            .collect()
    }

    pub fn get(&self, id: RecordId) -> RepoResult<Option<Stored<T>>> {
        self.store
            .get(T::COLLECTION, id)
            .map_err(RepoError::from_store::<T>)?
            .map(decode::<T>)
            .transpose()
    }

    /// Validates and stores a new entity.
    pub fn create(&self, entity: &T) -> RepoResult<Stored<T>> {
        entity.validate()?;
        let fields = to_fields(entity)?;
        T::schema().check(&fields, CheckMode::Insert)?;
        self.insert_fields(fields)
    }

    /// Creates an entity from loosely typed form fields.
    ///
    /// Missing required fields and mistyped values are validation errors.
    pub fn create_fields(&self, mut fields: Fields) -> RepoResult<Stored<T>> {
        strip_reserved(&mut fields);
        T::schema().check(&fields, CheckMode::Insert)?;
        let entity = parse_entity::<T>(fields)?;
        self.create(&entity)
    }

    /// Applies a partial update.
    ///
    /// The patch is merged over the stored entity and the merged result is
    /// validated as a whole before anything is written.
    pub fn update(&self, id: RecordId, mut patch: Fields) -> RepoResult<Stored<T>> {
        strip_reserved(&mut patch);
        T::schema().check(&patch, CheckMode::Patch)?;

        let existing = self
            .store
            .get(T::COLLECTION, id)
            .map_err(RepoError::from_store::<T>)?
            .ok_or(RepoError::NotFound {
                collection: T::COLLECTION,
                id,
            })?;

        let merged = parse_entity::<T>(merge_fields(&existing.fields, patch))?;
        merged.validate()?;
        self.write_fields(id, to_fields(&merged)?)
    }

    /// Replaces every field of an existing entity.
    pub fn replace(&self, id: RecordId, entity: &T) -> RepoResult<Stored<T>> {
        entity.validate()?;
        self.write_fields(id, to_fields(entity)?)
    }

    pub fn delete(&self, id: RecordId) -> RepoResult<()> {
        self.store
            .remove(T::COLLECTION, id)
            .map_err(RepoError::from_store::<T>)
    }

    fn insert_fields(&self, fields: Fields) -> RepoResult<Stored<T>> {
        let record = self
            .store
            .insert(T::COLLECTION, fields)
            .map_err(RepoError::from_store::<T>)?;
        decode(record)
    }

    fn write_fields(&self, id: RecordId, fields: Fields) -> RepoResult<Stored<T>> {
        let record = self
            .store
            .update(T::COLLECTION, id, fields)
            .map_err(RepoError::from_store::<T>)?;
        decode(record)
    }
}

fn parse_entity<T: Entity>(fields: Fields) -> Result<T, ValidationError> {
    from_fields(fields).map_err(|err| ValidationError::Shape(format!("{}: {err}", T::COLLECTION)))
}

fn decode<T: Entity>(record: Record) -> RepoResult<Stored<T>> {
    let id = record.id;
    Stored::from_record(record).map_err(|err| {
        RepoError::BackendUnavailable(BackendError::MalformedRecord(format!(
            "{} record {id}: {err}",
            T::COLLECTION
        )))
    })
}
