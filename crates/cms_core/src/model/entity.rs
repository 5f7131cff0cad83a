//! Capability set shared by every typed content entity.
//!
//! # Responsibility
//! - Describe what a collection repository needs from an entity type:
//!   a collection name, a field shape and a validation rule.
//! - Convert between typed entities and loosely typed record fields.
//!
//! # Invariants
//! - Entity payloads never carry `id`, `created_at` or `updated_at`; those
//!   live on `Stored<T>` and are owned by the store.

use crate::model::record::{Fields, Record, RecordId};
use crate::model::schema::CollectionSchema;
use crate::model::validation::ValidationError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Typed content stored in one named collection.
pub trait Entity: Serialize + DeserializeOwned + Clone {
    /// Collection name used by the record store.
    const COLLECTION: &'static str;

    /// Field shape enforced before writes.
    fn schema() -> &'static CollectionSchema;

    /// Entity-specific rules beyond the field shape.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// An entity together with its store-owned metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: RecordId,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Entity> Stored<T> {
    /// Shapes a raw record into a typed view.
    ///
    /// Fails when persisted fields no longer match the entity shape.
    pub fn from_record(record: Record) -> Result<Self, serde_json::Error> {
        let data = from_fields(record.fields)?;
        Ok(Self {
            id: record.id,
            created_at: record.created_at,
            updated_at: record.updated_at,
            data,
        })
    }
}

/// Serializes an entity into record fields.
pub fn to_fields<T: Entity>(entity: &T) -> Result<Fields, ValidationError> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(ValidationError::Shape(format!(
            "{} entity did not serialize to an object",
            T::COLLECTION
        ))),
        Err(err) => Err(ValidationError::Shape(err.to_string())),
    }
}

/// Deserializes record fields into an entity.
pub fn from_fields<T: Entity>(fields: Fields) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(fields))
}
