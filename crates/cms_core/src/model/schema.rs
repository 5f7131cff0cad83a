//! Collection shapes checked by record stores before any write.
//!
//! # Responsibility
//! - Declare field names and JSON kinds per collection.
//! - Reject missing, unknown or mistyped fields with `ValidationError`.
//!
//! # Invariants
//! - Reserved metadata keys are never part of a shape.
//! - No field accepts `null`; omit an optional field instead. Only the
//!   values inside a `Links` object may be `null`.
//! - A `Links` object carries only its declared keys.

use crate::model::record::Fields;
use crate::model::validation::ValidationError;
use serde_json::Value;
use std::collections::BTreeMap;

/// JSON kind accepted for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Bool,
    /// Non-negative integer.
    Count,
    /// Ordered list of strings.
    TextList,
    /// Unordered collection of strings, stored as an array.
    TextSet,
    /// Object mapping strings to strings.
    TextMap,
    /// Object with a fixed key set whose values are strings or `null`.
    Links(&'static [&'static str]),
}

impl FieldKind {
    fn expected(self) -> &'static str {
        match self {
            Self::Text => "a string",
            Self::Bool => "a boolean",
            Self::Count => "a non-negative integer",
            Self::TextList | Self::TextSet => "an array of strings",
            Self::TextMap => "an object of string values",
            Self::Links(_) => "an object of optional string values",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Text => value.is_string(),
            Self::Bool => value.is_boolean(),
            Self::Count => value.as_u64().is_some(),
            Self::TextList | Self::TextSet => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            Self::TextMap => value
                .as_object()
                .is_some_and(|map| map.values().all(Value::is_string)),
            Self::Links(_) => value
                .as_object()
                .is_some_and(|map| map.values().all(|v| v.is_string() || v.is_null())),
        }
    }
}

/// Declaration of one field in a collection shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Which presence rules apply during a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    /// Full payload: every required field must be present.
    Insert,
    /// Partial payload: only provided fields are checked.
    Patch,
}

/// Field shape of one named collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl CollectionSchema {
    pub const fn new(name: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self { name, fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    /// Checks `fields` against this shape.
    pub fn check(&self, fields: &Fields, mode: CheckMode) -> Result<(), ValidationError> {
        for (name, value) in fields {
            let spec = self
                .field(name)
                .ok_or_else(|| ValidationError::UnknownField(name.clone()))?;

            if !spec.kind.accepts(value) {
                return Err(ValidationError::WrongType {
                    field: name.clone(),
                    expected: spec.kind.expected(),
                });
            }
            if let (FieldKind::Links(keys), Some(links)) = (spec.kind, value.as_object()) {
                if let Some(key) = links.keys().find(|key| !keys.contains(&key.as_str())) {
                    return Err(ValidationError::UnknownField(format!("{name}.{key}")));
                }
            }
        }

        if mode == CheckMode::Insert {
            if let Some(missing) = self
                .fields
                .iter()
                .find(|spec| spec.required && !fields.contains_key(spec.name))
            {
                return Err(ValidationError::MissingField(missing.name.to_string()));
            }
        }

        Ok(())
    }
}

/// Set of shapes known to a record store, keyed by collection name.
///
/// Collections without a registered shape accept any JSON object.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<&'static str, CollectionSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the shape for `schema.name`.
    pub fn with(mut self, schema: CollectionSchema) -> Self {
        self.schemas.insert(schema.name, schema);
        self
    }

    pub fn get(&self, collection: &str) -> Option<&CollectionSchema> {
        self.schemas.get(collection)
    }

    /// Checks `fields` when a shape is registered for `collection`.
    pub fn check(
        &self,
        collection: &str,
        fields: &Fields,
        mode: CheckMode,
    ) -> Result<(), ValidationError> {
        match self.get(collection) {
            Some(schema) => schema.check(fields, mode),
            None => Ok(()),
        }
    }

    pub fn collections(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schemas.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{CheckMode, CollectionSchema, FieldKind, FieldSpec, SchemaRegistry};
    use crate::model::record::Fields;
    use crate::model::validation::ValidationError;
    use serde_json::json;

    static FIELDS: [FieldSpec; 4] = [
        FieldSpec::required("name", FieldKind::Text),
        FieldSpec::required("monthly_price", FieldKind::Count),
        FieldSpec::optional("features", FieldKind::TextList),
        FieldSpec::optional("social", FieldKind::Links(&["github", "twitter"])),
    ];
    static PLANS: CollectionSchema = CollectionSchema::new("plans", &FIELDS);

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().cloned().expect("test value should be an object")
    }

    #[test]
    fn insert_requires_every_required_field() {
        let err = PLANS
            .check(&fields(json!({ "name": "Starter" })), CheckMode::Insert)
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("monthly_price".to_string()));
    }

    #[test]
    fn patch_checks_only_present_fields() {
        assert!(PLANS
            .check(&fields(json!({ "features": ["a"] })), CheckMode::Patch)
            .is_ok());
    }

    #[test]
    fn negative_and_fractional_counts_are_rejected() {
        for price in [json!(-1), json!(4.5), json!("49")] {
            let err = PLANS
                .check(&fields(json!({ "monthly_price": price })), CheckMode::Patch)
                .unwrap_err();
            assert!(matches!(err, ValidationError::WrongType { ref field, .. } if field == "monthly_price"));
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = PLANS
            .check(&fields(json!({ "colour": "red" })), CheckMode::Patch)
            .unwrap_err();
        assert_eq!(err, ValidationError::UnknownField("colour".to_string()));
    }

    #[test]
    fn null_is_rejected_outside_link_values() {
        for payload in [json!({ "features": null }), json!({ "social": null })] {
            let err = PLANS.check(&fields(payload), CheckMode::Patch).unwrap_err();
            assert!(matches!(err, ValidationError::WrongType { .. }));
        }

        let links = fields(json!({
            "social": { "github": "https://github.com/x", "twitter": null },
        }));
        assert!(PLANS.check(&links, CheckMode::Patch).is_ok());
    }

    #[test]
    fn undeclared_link_keys_are_rejected() {
        let err = PLANS
            .check(
                &fields(json!({ "social": { "mastodon": "https://x.example" } })),
                CheckMode::Patch,
            )
            .unwrap_err();
        assert_eq!(err, ValidationError::UnknownField("social.mastodon".to_string()));
    }

    #[test]
    fn registry_accepts_anything_for_unregistered_collections() {
        let registry = SchemaRegistry::new().with(PLANS);
        assert!(registry
            .check("notes", &fields(json!({ "any": 1 })), CheckMode::Insert)
            .is_ok());
        assert!(registry
            .check("plans", &fields(json!({ "any": 1 })), CheckMode::Insert)
            .is_err());
        assert_eq!(registry.collections().collect::<Vec<_>>(), vec!["plans"]);
    }
}
