#![allow(dead_code)]

use std::sync::Mutex;

use chrono::NaiveDate;
use serde_json::json;
use taskpilot::error::ApiError;
use taskpilot::models::ingestion::{IngestionJobStatus, IngestionResult};
use taskpilot::models::schedule::{GenerateScheduleRequest, Schedule};
use taskpilot::models::task::{
    NewTask, Task, TaskFilter, TaskStatus, TaskSummary, TaskUpdate,
};
use taskpilot::service::api_service::{IngestionApi, ScheduleApi, TaskApi};
use taskpilot::service::feedback::{Confirmer, Notifier};
use taskpilot::service::upload::Upload;

pub fn task(id: &str, title: &str, status: TaskStatus) -> Task {
    serde_json::from_value(json!({
        "id": id,
        "user_id": "u1",
        "title": title,
        "description": null,
        "priority": "medium",
        "status": status.as_str(),
        "estimated_duration": 30,
        "tags": [],
        "metadata": {},
        "created_at": "2024-05-01T09:00:00",
        "updated_at": "2024-05-01T09:00:00"
    }))
    .unwrap()
}

pub fn schedule(date: NaiveDate, ai_generated: bool, titles: &[&str]) -> Schedule {
    let tasks: Vec<_> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            json!({
                "task_id": format!("t{i}"),
                "task": task(&format!("t{i}"), title, TaskStatus::Pending),
                "start_time": format!("{:02}:00", 9 + i),
                "end_time": format!("{:02}:00", 10 + i),
                "order": i
            })
        })
        .collect();
    serde_json::from_value(json!({
        "id": "s1",
        "user_id": "u1",
        "date": date.format("%Y-%m-%d").to_string(),
        "tasks": tasks,
        "metadata": { "ai_generated": ai_generated, "adjustments_count": 0 }
    }))
    .unwrap()
}

fn boom() -> ApiError {
    ApiError::Status {
        status: 500,
        detail: "boom".to_string(),
    }
}

/// In-memory backend that records every call.
#[derive(Default)]
pub struct FakeBackend {
    pub tasks: Mutex<Vec<Task>>,
    pub schedule: Mutex<Option<Schedule>>,
    pub fail_list: bool,
    /// Lets the first fetch through, then fails every fetch after an update.
    pub fail_list_after_update: bool,
    pub fail_update: bool,
    pub fail_delete: bool,
    pub fail_ingest: bool,
    pub fail_generate: bool,
    pub calls: Mutex<Vec<String>>,
    pub updates: Mutex<Vec<(String, TaskUpdate)>>,
    pub text_submissions: Mutex<Vec<(String, Option<String>)>>,
    pub uploads: Mutex<Vec<Upload>>,
    pub generate_requests: Mutex<Vec<GenerateScheduleRequest>>,
}

impl FakeBackend {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            ..Self::default()
        }
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }
}

#[async_trait::async_trait]
impl TaskApi for FakeBackend {
    async fn list_tasks(&self, _filter: &TaskFilter) -> Result<Vec<Task>, ApiError> {
        self.record("list_tasks");
        if self.fail_list || (self.fail_list_after_update && self.count("update_task") > 0) {
            return Err(boom());
        }
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn get_task(&self, id: &str) -> Result<Task, ApiError> {
        self.record("get_task");
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                detail: "Task not found".to_string(),
            })
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        self.record("create_task");
        let created = self::task("new", &task.title, task.status);
        self.tasks.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<Task, ApiError> {
        self.record("update_task");
        self.updates
            .lock()
            .unwrap()
            .push((id.to_string(), update.clone()));
        if self.fail_update {
            return Err(boom());
        }
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(boom)?;
        if let Some(status) = update.status {
            task.status = status;
        }
        Ok(task.clone())
    }

    async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        self.record("delete_task");
        if self.fail_delete {
            return Err(boom());
        }
        self.tasks.lock().unwrap().retain(|t| t.id != id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl IngestionApi for FakeBackend {
    async fn ingest_text(
        &self,
        content: &str,
        title: Option<&str>,
    ) -> Result<IngestionResult, ApiError> {
        self.record("ingest_text");
        self.text_submissions
            .lock()
            .unwrap()
            .push((content.to_string(), title.map(str::to_string)));
        if self.fail_ingest {
            return Err(boom());
        }
        let created = task("from-text", content, TaskStatus::Pending);
        self.tasks.lock().unwrap().push(created.clone());
        Ok(IngestionResult {
            note_id: Some("n1".to_string()),
            created_tasks: vec![TaskSummary::from(&created)],
            status: Some("completed".to_string()),
            ..IngestionResult::default()
        })
    }

    async fn ingest_voice(&self, upload: Upload) -> Result<IngestionResult, ApiError> {
        self.record("ingest_voice");
        self.uploads.lock().unwrap().push(upload);
        if self.fail_ingest {
            return Err(boom());
        }
        Ok(IngestionResult {
            note_id: Some("n2".to_string()),
            transcription: Some("call the plumber".to_string()),
            ..IngestionResult::default()
        })
    }

    async fn ingest_image(&self, upload: Upload) -> Result<IngestionResult, ApiError> {
        self.record("ingest_image");
        self.uploads.lock().unwrap().push(upload);
        if self.fail_ingest {
            return Err(boom());
        }
        Ok(IngestionResult::default())
    }

    async fn ingestion_status(&self, job_id: &str) -> Result<IngestionJobStatus, ApiError> {
        self.record("ingestion_status");
        Ok(IngestionJobStatus {
            job_id: job_id.to_string(),
            status: "completed".to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ScheduleApi for FakeBackend {
    async fn get_schedule(&self, _date: NaiveDate) -> Result<Schedule, ApiError> {
        self.record("get_schedule");
        self.schedule.lock().unwrap().clone().ok_or(ApiError::Status {
            status: 404,
            detail: "Schedule not found".to_string(),
        })
    }

    async fn generate_schedule(
        &self,
        request: &GenerateScheduleRequest,
    ) -> Result<Schedule, ApiError> {
        self.record("generate_schedule");
        self.generate_requests.lock().unwrap().push(request.clone());
        if self.fail_generate {
            return Err(boom());
        }
        let generated = schedule(request.date, true, &["Deep work", "Email"]);
        *self.schedule.lock().unwrap() = Some(generated.clone());
        Ok(generated)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toast {
    Success(String),
    Error(String),
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notes: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn notes(&self) -> Vec<Toast> {
        self.notes.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notes()
            .into_iter()
            .filter_map(|n| match n {
                Toast::Error(m) => Some(m),
                Toast::Success(_) => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notes.lock().unwrap().push(Toast::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notes.lock().unwrap().push(Toast::Error(message.to_string()));
    }
}

/// Answers every confirmation the same way and remembers the prompts.
pub struct ScriptedConfirmer {
    pub answer: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirmer {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&self, message: &str) -> bool {
        self.prompts.lock().unwrap().push(message.to_string());
        self.answer
    }
}
