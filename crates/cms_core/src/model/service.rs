//! Service offering shown in the services section.

use crate::model::entity::Entity;
use crate::model::schema::{CollectionSchema, FieldKind, FieldSpec};
use crate::model::validation::{require_entries, require_text, ValidationError};
use serde::{Deserialize, Serialize};

static SERVICE_FIELDS: [FieldSpec; 6] = [
    FieldSpec::required("title", FieldKind::Text),
    FieldSpec::optional("description", FieldKind::Text),
    FieldSpec::optional("features", FieldKind::TextList),
    FieldSpec::optional("icon", FieldKind::Text),
    FieldSpec::optional("color", FieldKind::Text),
    FieldSpec::optional("glow_color", FieldKind::Text),
];

static SERVICE_SCHEMA: CollectionSchema = CollectionSchema::new("services", &SERVICE_FIELDS);

/// One consultancy service offering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Rendered in the given order.
    #[serde(default)]
    pub features: Vec<String>,
    /// Icon reference, e.g. `Brain`.
    #[serde(default)]
    pub icon: String,
    /// Gradient styling token.
    #[serde(default)]
    pub color: String,
    /// Shadow styling token.
    #[serde(default)]
    pub glow_color: String,
}

impl Service {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

impl Entity for Service {
    const COLLECTION: &'static str = "services";

    fn schema() -> &'static CollectionSchema {
        &SERVICE_SCHEMA
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_entries("features", &self.features)
    }
}
