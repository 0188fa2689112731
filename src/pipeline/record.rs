//! Record loading: JSON text → validated [`ContactRecord`].
//!
//! The record schema is flat: one required `name` and eight optional text
//! fields. Unknown keys are ignored so card files can carry notes or fields
//! for other tools. Numbers and booleans in known fields are read as their
//! JSON text (`5550100`, `true`). Empty optional strings are normalised to
//! `None` here, so later stages only ever test for presence.

use crate::error::RecordError;
use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// A validated contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Display name, trimmed and never empty.
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub twitter: Option<String>,
}

/// Wire shape of a record file. Every field is optional at this level;
/// validation happens in [`ContactRecord::from_json`].
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default, deserialize_with = "scalar_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    email: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    phone: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    company: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    website: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    linkedin: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    github: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    twitter: Option<String>,
}

/// Read a string, number or boolean as text; `null` is absent.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) => Err(D::Error::custom("expected text, found an array")),
        Value::Object(_) => Err(D::Error::custom("expected text, found an object")),
    }
}

impl ContactRecord {
    /// Create a record with only the required name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
            company: None,
            title: None,
            website: None,
            linkedin: None,
            github: None,
            twitter: None,
        }
    }

    /// Parse and validate one record.
    ///
    /// # Errors
    /// - [`RecordError::MalformedInput`] if `raw` is not a JSON object or a
    ///   known field holds an array or object
    /// - [`RecordError::MissingField`] if `name` is absent or blank
    pub fn from_json(raw: &str) -> Result<Self, RecordError> {
        let malformed = |e: serde_json::Error| RecordError::MalformedInput {
            detail: e.to_string(),
        };

        let value: Value = serde_json::from_str(raw).map_err(malformed)?;
        if !value.is_object() {
            return Err(RecordError::MalformedInput {
                detail: "expected a JSON object".to_string(),
            });
        }
        let raw: RawRecord = serde_json::from_value(value).map_err(malformed)?;

        let name = raw
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| RecordError::MissingField {
                field: "name".to_string(),
            })?
            .to_string();

        Ok(Self {
            name,
            email: present(raw.email),
            phone: present(raw.phone),
            company: present(raw.company),
            title: present(raw.title),
            website: present(raw.website),
            linkedin: present(raw.linkedin),
            github: present(raw.github),
            twitter: present(raw.twitter),
        })
    }
}

/// Read a record file and validate it.
pub fn load_record(path: &Path) -> Result<ContactRecord, RecordError> {
    let text = std::fs::read_to_string(path).map_err(|e| RecordError::ReadFailed {
        detail: format!("{}: {}", path.display(), e),
    })?;
    let record = ContactRecord::from_json(&text)?;
    debug!("Loaded record '{}' from {}", record.name, path.display());
    Ok(record)
}

/// Empty strings count as absent; anything else passes through unchanged.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_record_loads() {
        let r = ContactRecord::from_json(
            r#"{
                "name": "Jane Doe",
                "email": "jane@example.com",
                "phone": "+1 555 0100",
                "company": "Acme",
                "title": "Engineer",
                "website": "https://jane.dev",
                "linkedin": "https://linkedin.com/in/jane",
                "github": "https://github.com/jane",
                "twitter": "https://twitter.com/jane"
            }"#,
        )
        .unwrap();
        assert_eq!(r.name, "Jane Doe");
        assert_eq!(r.email.as_deref(), Some("jane@example.com"));
        assert_eq!(r.twitter.as_deref(), Some("https://twitter.com/jane"));
    }

    #[test]
    fn test_name_is_trimmed() {
        let r = ContactRecord::from_json(r#"{"name": "  Jane Doe \n"}"#).unwrap();
        assert_eq!(r.name, "Jane Doe");
    }

    #[test]
    fn test_missing_name_fails() {
        for raw in [
            r#"{}"#,
            r#"{"name": null}"#,
            r#"{"name": ""}"#,
            r#"{"name": "   "}"#,
            r#"{"email": "x@example.com"}"#,
        ] {
            assert_eq!(
                ContactRecord::from_json(raw),
                Err(RecordError::MissingField {
                    field: "name".into()
                }),
                "input: {raw}"
            );
        }
    }

    #[test]
    fn test_malformed_json_fails() {
        for raw in [
            "",
            "{not json",
            "[1, 2]",
            r#""Jane""#,
            "42",
            r#"{"name": ["Jane"]}"#,
            r#"{"name": "Jane", "phone": {"work": "555"}}"#,
        ] {
            assert!(
                matches!(
                    ContactRecord::from_json(raw),
                    Err(RecordError::MalformedInput { .. })
                ),
                "input: {raw}"
            );
        }
    }

    #[test]
    fn test_optional_fields_absent_not_empty() {
        let r = ContactRecord::from_json(r#"{"name": "A", "email": "", "phone": null}"#).unwrap();
        assert_eq!(r, ContactRecord::new("A"));
    }

    #[test]
    fn test_optional_fields_pass_through_unchanged() {
        let r = ContactRecord::from_json(r#"{"name": "A", "company": " Acme, Inc. ", "title": "  "}"#)
            .unwrap();
        assert_eq!(r.company.as_deref(), Some(" Acme, Inc. "));
        assert_eq!(r.title.as_deref(), Some("  "));
    }

    #[test]
    fn test_scalar_values_read_as_text() {
        let r = ContactRecord::from_json(r#"{"name": 42, "phone": 5550100, "company": true}"#)
            .unwrap();
        assert_eq!(r.name, "42");
        assert_eq!(r.phone.as_deref(), Some("5550100"));
        assert_eq!(r.company.as_deref(), Some("true"));
    }

    #[test]
    fn test_numeric_phone_reaches_vcard() {
        let r = ContactRecord::from_json(r#"{"name": "Jane Doe", "phone": 5550100}"#).unwrap();
        let vcard = crate::pipeline::vcard::to_vcard(&r);
        assert!(vcard.as_str().contains("\r\nTEL;TYPE=WORK:5550100\r\n"));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let r = ContactRecord::from_json(r#"{"name": "A", "pronouns": "they/them", "age": 3}"#)
            .unwrap();
        assert_eq!(r.name, "A");
    }

    #[test]
    fn test_load_record_reports_missing_file() {
        let err = load_record(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, RecordError::ReadFailed { .. }));
    }
}
