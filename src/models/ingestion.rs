use serde::{Deserialize, Serialize};

use super::task::TaskSummary;
use super::wire;

/// A task candidate as the backend's extractor described it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTask {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "wire::lenient_option")]
    pub estimated_duration: Option<u32>,
}

/// Response of the three `POST /ingestion/*` endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestionResult {
    #[serde(default)]
    pub note_id: Option<String>,
    #[serde(default)]
    pub transcription: Option<String>,
    #[serde(default)]
    pub extracted_text: Option<String>,
    #[serde(default, deserialize_with = "wire::lenient_vec")]
    pub extracted_tasks: Vec<ExtractedTask>,
    #[serde(default, deserialize_with = "wire::lenient_vec")]
    pub created_tasks: Vec<TaskSummary>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionJobStatus {
    pub job_id: String,
    pub status: String,
}
