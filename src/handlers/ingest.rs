use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::ingestion::IngestionResult;
use crate::service::api_service::IngestionApi;
use crate::service::feedback::Notifier;
use crate::service::upload::{self, MediaKind};

pub const FAILURE_MESSAGE: &str = "Failed to process input";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IngestMode {
    #[default]
    Text,
    Voice,
    Image,
}

impl IngestMode {
    pub const ALL: [IngestMode; 3] = [Self::Text, Self::Voice, Self::Image];

    pub fn media_kind(&self) -> Option<MediaKind> {
        match self {
            Self::Text => None,
            Self::Voice => Some(MediaKind::Audio),
            Self::Image => Some(MediaKind::Image),
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            Self::Text => "Text processed successfully!",
            Self::Voice => "Voice recording processed!",
            Self::Image => "Image processed successfully!",
        }
    }
}

impl fmt::Display for IngestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "Text",
            Self::Voice => "Voice",
            Self::Image => "Image",
        })
    }
}

/// Form state. Switching modes keeps what was typed, but only the current
/// mode's fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestForm {
    mode: IngestMode,
    content: String,
    title: String,
    file: Option<PathBuf>,
}

impl IngestForm {
    pub fn new(mode: IngestMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> IngestMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: IngestMode) {
        if mode != self.mode {
            // A file picked for one media type never satisfies the other.
            self.file = None;
        }
        self.mode = mode;
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn title(&self) -> Option<&str> {
        Some(self.title.trim()).filter(|t| !t.is_empty())
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Selects a file for voice or image mode. A file of the wrong media type
    /// is refused and leaves the previous selection in place.
    pub fn select_file(&mut self, path: impl Into<PathBuf>) -> Result<(), ApiError> {
        let path = path.into();
        let Some(kind) = self.mode.media_kind() else {
            return Err(ApiError::InvalidInput(
                "text mode does not take a file".to_string(),
            ));
        };
        upload::check_kind(&path, kind)?;
        self.file = Some(path);
        Ok(())
    }

    /// What still has to be filled in before submitting, if anything.
    pub fn missing_requirement(&self) -> Option<&'static str> {
        match self.mode {
            IngestMode::Text if self.content.trim().is_empty() => Some("content is required"),
            IngestMode::Voice if self.file.is_none() => Some("select an audio file"),
            IngestMode::Image if self.file.is_none() => Some("select an image file"),
            _ => None,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.missing_requirement().is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Submission is disabled; no request was made.
    Blocked(&'static str),
    /// The form closed and the owner should refresh.
    Submitted(IngestionResult),
    /// The form stays open with its input for another attempt.
    Failed,
}

/// The add-task form: one request per submission, no retry.
pub struct IngestModal {
    api: Arc<dyn IngestionApi>,
    notifier: Arc<dyn Notifier>,
    max_upload_bytes: u64,
    pub form: IngestForm,
    open: bool,
}

impl IngestModal {
    pub fn new(
        api: Arc<dyn IngestionApi>,
        notifier: Arc<dyn Notifier>,
        max_upload_bytes: u64,
    ) -> Self {
        Self {
            api,
            notifier,
            max_upload_bytes,
            form: IngestForm::default(),
            open: true,
        }
    }

    pub fn with_form(mut self, form: IngestForm) -> Self {
        self.form = form;
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        if let Some(missing) = self.form.missing_requirement() {
            return SubmitOutcome::Blocked(missing);
        }

        let mode = self.form.mode();
        match self.send().await {
            Ok(result) => {
                log::info!(
                    "event=ingest_ok mode={} note_id={} created={}",
                    mode,
                    result.note_id.as_deref().unwrap_or("-"),
                    result.created_tasks.len()
                );
                self.notifier.success(mode.success_message());
                self.open = false;
                SubmitOutcome::Submitted(result)
            }
            Err(err) => {
                log::warn!("event=ingest_failed mode={} error={}", mode, err);
                self.notifier.error(FAILURE_MESSAGE);
                SubmitOutcome::Failed
            }
        }
    }

    async fn send(&self) -> Result<IngestionResult, ApiError> {
        let mode = self.form.mode();
        match (mode, mode.media_kind(), self.form.file()) {
            (IngestMode::Text, _, _) => {
                self.api
                    .ingest_text(self.form.content(), self.form.title())
                    .await
            }
            (IngestMode::Voice, Some(kind), Some(path)) => {
                let upload = upload::read_upload(path, kind, self.max_upload_bytes).await?;
                self.api.ingest_voice(upload).await
            }
            (IngestMode::Image, Some(kind), Some(path)) => {
                let upload = upload::read_upload(path, kind, self.max_upload_bytes).await?;
                self.api.ingest_image(upload).await
            }
            _ => Err(ApiError::InvalidInput("no file selected".to_string())),
        }
    }
}

pub fn render_result(result: &IngestionResult) -> String {
    let mut body = String::new();
    if let Some(note_id) = &result.note_id {
        body.push_str(&format!("Note: {}\n", note_id));
    }
    if let Some(transcription) = result.transcription.as_deref().filter(|t| !t.is_empty()) {
        body.push_str(&format!("Transcription: {}\n", transcription));
    }
    if let Some(text) = result.extracted_text.as_deref().filter(|t| !t.is_empty()) {
        body.push_str(&format!("Extracted text: {}\n", text));
    }
    if result.created_tasks.is_empty() {
        body.push_str(&format!(
            "Extracted {} task(s), none created\n",
            result.extracted_tasks.len()
        ));
    } else {
        body.push_str(&format!("Created {} task(s):\n", result.created_tasks.len()));
        for task in &result.created_tasks {
            let title = task.title().unwrap_or("(untitled)");
            match task.priority {
                Some(priority) => body.push_str(&format!("  - {} ({})\n", title, priority)),
                None => body.push_str(&format!("  - {}\n", title)),
            }
        }
    }
    body.trim_end().to_string()
}
