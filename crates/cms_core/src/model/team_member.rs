//! Team member profile.

use crate::model::entity::Entity;
use crate::model::schema::{CollectionSchema, FieldKind, FieldSpec};
use crate::model::validation::{optional_url, require_entries, require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Keys accepted inside `social`.
pub const SOCIAL_LINK_KEYS: [&str; 3] = ["github", "linkedin", "twitter"];

static TEAM_MEMBER_FIELDS: [FieldSpec; 9] = [
    FieldSpec::required("name", FieldKind::Text),
    FieldSpec::required("role", FieldKind::Text),
    FieldSpec::optional("specialty", FieldKind::Text),
    FieldSpec::optional("image", FieldKind::Text),
    FieldSpec::optional("bio", FieldKind::Text),
    FieldSpec::optional("skills", FieldKind::TextList),
    FieldSpec::optional("social", FieldKind::Links(&SOCIAL_LINK_KEYS)),
    FieldSpec::optional("icon", FieldKind::Text),
    FieldSpec::optional("color", FieldKind::Text),
];

static TEAM_MEMBER_SCHEMA: CollectionSchema =
    CollectionSchema::new("team_members", &TEAM_MEMBER_FIELDS);

/// Social profile links. Each link is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

impl SocialLinks {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_url("social.github", self.github.as_deref())?;
        optional_url("social.linkedin", self.linkedin.as_deref())?;
        optional_url("social.twitter", self.twitter.as_deref())
    }
}

/// One member of the team section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub bio: String,
    /// Ordered; the site shows the first three and a `+N` badge.
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub social: SocialLinks,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

impl TeamMember {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            ..Self::default()
        }
    }
}

impl Entity for TeamMember {
    const COLLECTION: &'static str = "team_members";

    fn schema() -> &'static CollectionSchema {
        &TEAM_MEMBER_SCHEMA
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("role", &self.role)?;
        require_entries("skills", &self.skills)?;
        self.social.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{SocialLinks, TeamMember};
    use crate::model::entity::Entity;
    use crate::model::validation::ValidationError;

    #[test]
    fn blank_skill_is_rejected() {
        let mut member = TeamMember::new("Ava", "CTO");
        member.skills = vec!["Rust".to_string(), String::new()];
        assert!(matches!(
            member.validate(),
            Err(ValidationError::BlankEntry { index: 1, .. })
        ));
    }

    #[test]
    fn social_links_must_be_urls() {
        let mut member = TeamMember::new("Ava", "CTO");
        member.social = SocialLinks {
            linkedin: Some("not a url".to_string()),
            ..SocialLinks::default()
        };
        assert!(matches!(
            member.validate(),
            Err(ValidationError::InvalidUrl { ref field, .. }) if field == "social.linkedin"
        ));

        member.social.linkedin = Some("https://linkedin.com/in/ava".to_string());
        assert!(member.validate().is_ok());
    }
}
