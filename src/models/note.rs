use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::wire;

/// How a note's raw input was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Text,
    Voice,
    Image,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Voice => "voice",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "voice" => Ok(Self::Voice),
            "image" => Ok(Self::Image),
            other => Err(format!("unknown source type `{other}`; expected text|voice|image")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    pub source_type: SourceType,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub transcription: Option<String>,
    /// The backend stores whatever the extractor produced here.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub extracted_tasks: Vec<Value>,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub metadata: Map<String, Value>,
    #[serde(with = "wire::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "wire::timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    pub source_type: Option<SourceType>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl NoteFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(source) = self.source_type {
            pairs.push(("source_type", source.as_str().to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }
}
