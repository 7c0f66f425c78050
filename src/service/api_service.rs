use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::clients::api_client::ApiClient;
use crate::error::ApiError;
use crate::models::account::{AuthResponse, LoginRequest, SignupRequest};
use crate::models::ingestion::{IngestionJobStatus, IngestionResult};
use crate::models::note::{Note, NoteFilter};
use crate::models::preferences::{PreferencesUpdate, UserPreferences};
use crate::models::schedule::{GenerateScheduleRequest, Schedule};
use crate::models::task::{NewTask, Task, TaskFilter, TaskUpdate};
use crate::service::upload::Upload;

#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, ApiError>;
    async fn get_task(&self, id: &str) -> Result<Task, ApiError>;
    async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError>;
    async fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<Task, ApiError>;
    async fn delete_task(&self, id: &str) -> Result<(), ApiError>;
}

#[async_trait]
pub trait IngestionApi: Send + Sync {
    async fn ingest_text(
        &self,
        content: &str,
        title: Option<&str>,
    ) -> Result<IngestionResult, ApiError>;
    async fn ingest_voice(&self, upload: Upload) -> Result<IngestionResult, ApiError>;
    async fn ingest_image(&self, upload: Upload) -> Result<IngestionResult, ApiError>;
    async fn ingestion_status(&self, job_id: &str) -> Result<IngestionJobStatus, ApiError>;
}

#[async_trait]
pub trait ScheduleApi: Send + Sync {
    async fn get_schedule(&self, date: NaiveDate) -> Result<Schedule, ApiError>;
    async fn generate_schedule(
        &self,
        request: &GenerateScheduleRequest,
    ) -> Result<Schedule, ApiError>;
}

#[async_trait]
pub trait NoteApi: Send + Sync {
    async fn list_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>, ApiError>;
    async fn get_note(&self, id: &str) -> Result<Note, ApiError>;
    async fn delete_note(&self, id: &str) -> Result<(), ApiError>;
}

#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
    async fn current_user(&self) -> Result<Value, ApiError>;
    async fn get_preferences(&self) -> Result<UserPreferences, ApiError>;
    async fn update_preferences(
        &self,
        update: &PreferencesUpdate,
    ) -> Result<UserPreferences, ApiError>;
}

/// The backend, reached over HTTP.
pub struct ApiService {
    client: ApiClient,
}

impl ApiService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

/// Validates an id before it is spliced into a path.
pub fn path_segment(id: &str) -> Result<&str, ApiError> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#', ' ']) {
        return Err(ApiError::InvalidInput(format!("invalid id `{id}`")));
    }
    Ok(id)
}

pub fn text_form(content: &str, title: Option<&str>) -> Form {
    let form = Form::new().text("content", content.to_string());
    match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => form.text("title", title.to_string()),
        None => form,
    }
}

pub fn file_form(upload: Upload) -> Result<Form, ApiError> {
    let part = Part::bytes(upload.bytes)
        .file_name(upload.file_name)
        .mime_str(upload.mime)?;
    Ok(Form::new().part("file", part))
}

#[async_trait]
impl TaskApi for ApiService {
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, ApiError> {
        self.client.get_json("/tasks", &filter.query_pairs()).await
    }

    async fn get_task(&self, id: &str) -> Result<Task, ApiError> {
        let path = format!("/tasks/{}", path_segment(id)?);
        self.client.get_json(&path, &[]).await
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        self.client.send_json(Method::POST, "/tasks", task).await
    }

    async fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<Task, ApiError> {
        let path = format!("/tasks/{}", path_segment(id)?);
        self.client.send_json(Method::PATCH, &path, update).await
    }

    async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/tasks/{}", path_segment(id)?);
        self.client.delete(&path).await
    }
}

#[async_trait]
impl IngestionApi for ApiService {
    async fn ingest_text(
        &self,
        content: &str,
        title: Option<&str>,
    ) -> Result<IngestionResult, ApiError> {
        self.client
            .post_multipart("/ingestion/text", text_form(content, title))
            .await
    }

    async fn ingest_voice(&self, upload: Upload) -> Result<IngestionResult, ApiError> {
        self.client
            .post_multipart("/ingestion/voice", file_form(upload)?)
            .await
    }

    async fn ingest_image(&self, upload: Upload) -> Result<IngestionResult, ApiError> {
        self.client
            .post_multipart("/ingestion/image", file_form(upload)?)
            .await
    }

    async fn ingestion_status(&self, job_id: &str) -> Result<IngestionJobStatus, ApiError> {
        let path = format!("/ingestion/status/{}", path_segment(job_id)?);
        self.client.get_json(&path, &[]).await
    }
}

#[async_trait]
impl ScheduleApi for ApiService {
    async fn get_schedule(&self, date: NaiveDate) -> Result<Schedule, ApiError> {
        let path = format!("/schedule/{}", date.format("%Y-%m-%d"));
        self.client.get_json(&path, &[]).await
    }

    async fn generate_schedule(
        &self,
        request: &GenerateScheduleRequest,
    ) -> Result<Schedule, ApiError> {
        self.client
            .send_json(Method::POST, "/schedule/generate", request)
            .await
    }
}

#[async_trait]
impl NoteApi for ApiService {
    async fn list_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>, ApiError> {
        self.client.get_json("/notes", &filter.query_pairs()).await
    }

    async fn get_note(&self, id: &str) -> Result<Note, ApiError> {
        let path = format!("/notes/{}", path_segment(id)?);
        self.client.get_json(&path, &[]).await
    }

    async fn delete_note(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/notes/{}", path_segment(id)?);
        self.client.delete(&path).await
    }
}

#[async_trait]
impl AccountApi for ApiService {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.client.send_json(Method::POST, "/auth/login", request).await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        self.client.send_json(Method::POST, "/auth/signup", request).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.client.post_empty("/auth/logout").await
    }

    async fn current_user(&self) -> Result<Value, ApiError> {
        self.client.get_json("/users/me", &[]).await
    }

    async fn get_preferences(&self) -> Result<UserPreferences, ApiError> {
        self.client.get_json("/users/preferences", &[]).await
    }

    async fn update_preferences(
        &self,
        update: &PreferencesUpdate,
    ) -> Result<UserPreferences, ApiError> {
        self.client
            .send_json(Method::PATCH, "/users/preferences", update)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::CONTENT_TYPE;
    use std::time::Duration;

    #[test]
    fn path_segment_rejects_traversal() {
        assert_eq!(path_segment(" abc-123 ").unwrap(), "abc-123");
        assert!(path_segment("").is_err());
        assert!(path_segment("../users").is_err());
        assert!(path_segment("a?b").is_err());
    }

    #[test]
    fn multipart_requests_are_form_data() {
        let client =
            ApiClient::new("http://localhost:8000/api/v1", None, Duration::from_secs(5)).unwrap();
        let upload = Upload {
            file_name: "memo.wav".to_string(),
            mime: "audio/wav",
            bytes: vec![1, 2, 3],
        };
        let request = client
            .request(Method::POST, "/ingestion/voice")
            .multipart(file_form(upload).unwrap())
            .build()
            .unwrap();
        let content_type = request.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
        assert_eq!(request.url().path(), "/api/v1/ingestion/voice");
    }
}
