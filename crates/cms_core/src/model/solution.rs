//! Solution showcase entry with tags and headline metrics.

use crate::model::entity::Entity;
use crate::model::schema::{CollectionSchema, FieldKind, FieldSpec};
use crate::model::validation::{require_entries, require_text, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

static SOLUTION_FIELDS: [FieldSpec; 6] = [
    FieldSpec::required("title", FieldKind::Text),
    FieldSpec::required("category", FieldKind::Text),
    FieldSpec::optional("description", FieldKind::Text),
    FieldSpec::optional("image", FieldKind::Text),
    FieldSpec::optional("tags", FieldKind::TextSet),
    FieldSpec::optional("metrics", FieldKind::TextMap),
];

static SOLUTION_SCHEMA: CollectionSchema = CollectionSchema::new("solutions", &SOLUTION_FIELDS);

/// Delivered solution presented in the showcase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Image reference (URL or asset path).
    #[serde(default)]
    pub image: String,
    /// Duplicates collapse; stored sorted.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Metric name to display value, e.g. `accuracy -> 99.2%`.
    #[serde(default)]
    pub metrics: BTreeMap<String, String>,
}

impl Solution {
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            ..Self::default()
        }
    }
}

impl Entity for Solution {
    const COLLECTION: &'static str = "solutions";

    fn schema() -> &'static CollectionSchema {
        &SOLUTION_SCHEMA
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("category", &self.category)?;
        require_entries("tags", &self.tags)?;
        require_entries("metrics", self.metrics.keys())
    }
}
