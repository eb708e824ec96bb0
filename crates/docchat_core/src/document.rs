//! Document identifiers and listings

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque token returned by the upload endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Returns `None` for blank input; a document id is never empty.
    pub fn parse(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A previously ingested document as listed by the service.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DocumentSummary {
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub created_at: String,
}

// The service reports file creation time either as text or as a raw epoch.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
