//! Validation errors and reusable field checks for content entities.

use std::error::Error;
use std::fmt::{Display, Formatter};
use url::Url;

/// Caller-supplied fields are malformed. Never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent from an insert payload.
    MissingField(String),
    /// A field name not declared by the collection shape.
    UnknownField(String),
    /// A field value has the wrong JSON type.
    WrongType {
        field: String,
        expected: &'static str,
    },
    /// A display field is empty or whitespace only.
    BlankField(String),
    /// A list entry is empty or whitespace only.
    BlankEntry { field: String, index: usize },
    /// A link is not an absolute http(s) URL.
    InvalidUrl { field: String, value: String },
    /// Payload passed field checks but does not fit the entity shape.
    Shape(String),
    /// Domain rule violation not covered by the variants above.
    Invalid { field: String, reason: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "field `{field}` is required"),
            Self::UnknownField(field) => write!(f, "field `{field}` is not recognized"),
            Self::WrongType { field, expected } => {
                write!(f, "field `{field}` must be {expected}")
            }
            Self::BlankField(field) => write!(f, "field `{field}` must not be blank"),
            Self::BlankEntry { field, index } => {
                write!(f, "entry {index} of `{field}` must not be blank")
            }
            Self::InvalidUrl { field, value } => {
                write!(f, "field `{field}` is not an http(s) URL: `{value}`")
            }
            Self::Shape(message) => write!(f, "invalid payload: {message}"),
            Self::Invalid { field, reason } => write!(f, "field `{field}` is invalid: {reason}"),
        }
    }
}

impl Error for ValidationError {}

/// Rejects blank display text such as titles and names.
pub fn require_text(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field.to_string()));
    }
    Ok(())
}

/// Rejects any blank entry in an ordered or unordered text collection.
pub fn require_entries<'a>(
    field: &str,
    entries: impl IntoIterator<Item = &'a String>,
) -> Result<(), ValidationError> {
    for (index, entry) in entries.into_iter().enumerate() {
        if entry.trim().is_empty() {
            return Err(ValidationError::BlankEntry {
                field: field.to_string(),
                index,
            });
        }
    }
    Ok(())
}

/// Accepts `None` or an absolute `http`/`https` URL.
pub fn optional_url(field: &str, value: Option<&str>) -> Result<(), ValidationError> {
    let Some(value) = value else {
        return Ok(());
    };

    let invalid = || ValidationError::InvalidUrl {
        field: field.to_string(),
        value: value.to_string(),
    };
    let parsed = Url::parse(value).map_err(|_| invalid())?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(invalid()),
    }
}

/// Splits comma separated form input into trimmed, non-empty entries.
///
/// `"a, b,, c "` becomes `["a", "b", "c"]`.
pub fn parse_comma_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{optional_url, parse_comma_list, require_entries, require_text, ValidationError};

    #[test]
    fn comma_list_drops_blank_entries() {
        assert_eq!(
            parse_comma_list(" 24/7 support, ,Custom AI models,"),
            vec!["24/7 support".to_string(), "Custom AI models".to_string()]
        );
        assert!(parse_comma_list("  ").is_empty());
    }

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!(
            require_text("title", "   "),
            Err(ValidationError::BlankField("title".to_string()))
        );
        assert!(require_text("title", "AI").is_ok());
    }

    #[test]
    fn blank_entry_reports_its_position() {
        let skills = vec!["Rust".to_string(), " ".to_string()];
        assert_eq!(
            require_entries("skills", &skills),
            Err(ValidationError::BlankEntry {
                field: "skills".to_string(),
                index: 1
            })
        );
    }

    #[test]
    fn urls_must_be_absolute_http() {
        assert!(optional_url("social.github", None).is_ok());
        assert!(optional_url("social.github", Some("https://github.com/nexus")).is_ok());
        assert!(optional_url("social.github", Some("github.com/nexus")).is_err());
        assert!(optional_url("social.github", Some("ftp://example.com")).is_err());
    }
}
