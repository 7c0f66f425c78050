use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::wire;

/// Metadata for a file uploaded through ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub storage_path: String,
    #[serde(default)]
    pub public_url: Option<String>,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub metadata: Map<String, Value>,
    #[serde(with = "wire::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl MediaAsset {
    /// Where the asset can be fetched from, preferring the public URL.
    pub fn location(&self) -> &str {
        self.public_url.as_deref().unwrap_or(&self.storage_path)
    }
}
