//! Stored record envelope shared by every content collection.
//!
//! # Responsibility
//! - Define the backend-agnostic record shape (`id`, timestamps, fields).
//! - Own the reserved metadata field names and timestamp helpers.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes afterwards.
//! - `created_at` is set once on insert; `updated_at` only moves forward.
//! - `fields` never contains reserved metadata keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable record identifier, unique within one collection.
pub type RecordId = Uuid;

/// Loosely typed field payload of one record (JSON object).
pub type Fields = Map<String, Value>;

/// Metadata keys owned by the store. Callers can never set them.
pub const RESERVED_FIELDS: [&str; 3] = ["id", "created_at", "updated_at"];

/// One stored record in a named collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub collection: String,
    pub fields: Fields,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Never earlier than `created_at`.
    pub updated_at: i64,
}

/// Removes reserved metadata keys from caller input.
///
/// Returns the names that were present, for diagnostics.
pub fn strip_reserved(fields: &mut Fields) -> Vec<&'static str> {
    RESERVED_FIELDS
        .into_iter()
        .filter(|name| fields.remove(*name).is_some())
        .collect()
}

/// Merges `patch` over `base`, key by key. Values in `patch` win.
pub fn merge_fields(base: &Fields, patch: Fields) -> Fields {
    let mut merged = base.clone();
    for (key, value) in patch {
        merged.insert(key, value);
    }
    merged
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

/// Next `updated_at` value for a record last written at `previous`.
///
/// Strictly greater than `previous` even when the clock has not ticked or
/// went backwards.
pub fn next_updated_at(previous: i64) -> i64 {
    now_epoch_ms().max(previous.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::{merge_fields, next_updated_at, now_epoch_ms, strip_reserved, Fields};
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().cloned().expect("test value should be an object")
    }

    #[test]
    fn strip_reserved_removes_only_metadata_keys() {
        let mut input = fields(json!({
            "id": "caller-id",
            "title": "Cloud",
            "updated_at": 5,
        }));

        let stripped = strip_reserved(&mut input);

        assert_eq!(stripped, vec!["id", "updated_at"]);
        assert_eq!(input, fields(json!({ "title": "Cloud" })));
    }

    #[test]
    fn merge_fields_prefers_patch_values() {
        let base = fields(json!({ "title": "Old", "icon": "Zap" }));
        let merged = merge_fields(&base, fields(json!({ "title": "New" })));
        assert_eq!(merged, fields(json!({ "title": "New", "icon": "Zap" })));
    }

    #[test]
    fn next_updated_at_is_strictly_increasing() {
        let future = now_epoch_ms() + 60_000;
        assert_eq!(next_updated_at(future), future + 1);
        assert!(next_updated_at(0) > 0);
    }
}
