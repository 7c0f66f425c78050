use std::sync::Arc;

use chrono::NaiveDate;

use crate::handlers::ingest::{IngestForm, IngestModal, SubmitOutcome};
use crate::handlers::schedule_view::ScheduleView;
use crate::handlers::task_list::{self, ItemOutcome, TaskItemActions};
use crate::models::task::{Task, TaskFilter};
use crate::service::api_service::{IngestionApi, ScheduleApi, TaskApi};
use crate::service::feedback::{Confirmer, Notifier};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load tasks";

/// Everything the dashboard talks to.
#[derive(Clone)]
pub struct DashboardServices {
    pub tasks: Arc<dyn TaskApi>,
    pub ingestion: Arc<dyn IngestionApi>,
    pub schedule: Arc<dyn ScheduleApi>,
    pub notifier: Arc<dyn Notifier>,
    pub confirmer: Arc<dyn Confirmer>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskListState {
    Loading,
    Ready(Vec<Task>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardAction {
    AddTask(IngestForm),
    ToggleTask(String),
    DeleteTask(String),
    GenerateSchedule,
    Refresh,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Owns the one task list shared by the task and schedule panels.
/// Every successful mutation is followed by a full re-fetch.
pub struct Dashboard {
    services: DashboardServices,
    actions: TaskItemActions,
    schedule: ScheduleView,
    tasks: TaskListState,
    ingest: Option<IngestModal>,
    max_upload_bytes: u64,
}

impl Dashboard {
    pub fn new(
        services: DashboardServices,
        date: NaiveDate,
        today: NaiveDate,
        max_upload_bytes: u64,
    ) -> Self {
        let actions = TaskItemActions::new(
            services.tasks.clone(),
            services.notifier.clone(),
            services.confirmer.clone(),
        );
        let schedule = ScheduleView::new(
            services.schedule.clone(),
            services.notifier.clone(),
            date,
            today,
        );
        Self {
            services,
            actions,
            schedule,
            tasks: TaskListState::Loading,
            ingest: None,
            max_upload_bytes,
        }
    }

    pub fn tasks(&self) -> &TaskListState {
        &self.tasks
    }

    pub fn schedule(&self) -> &ScheduleView {
        &self.schedule
    }

    /// The form left open by a failed submission, if any.
    pub fn pending_form(&self) -> Option<&IngestForm> {
        self.ingest.as_ref().filter(|m| m.is_open()).map(|m| &m.form)
    }

    pub fn find_task(&self, id: &str) -> Option<&Task> {
        match &self.tasks {
            TaskListState::Ready(tasks) => tasks.iter().find(|t| t.id == id),
            TaskListState::Loading => None,
        }
    }

    /// First entry: tasks and today's schedule.
    pub async fn enter(&mut self) {
        self.load_tasks().await;
        self.schedule.load().await;
    }

    /// A failed fetch keeps the last list; only a first fetch falls back to empty.
    pub async fn load_tasks(&mut self) {
        let previous = std::mem::replace(&mut self.tasks, TaskListState::Loading);
        let tasks = match self.services.tasks.list_tasks(&TaskFilter::default()).await {
            Ok(tasks) => {
                log::debug!("event=tasks_loaded count={}", tasks.len());
                tasks
            }
            Err(err) => {
                log::error!("event=tasks_load_failed error={}", err);
                self.services.notifier.error(LOAD_FAILED_MESSAGE);
                match previous {
                    TaskListState::Ready(tasks) => tasks,
                    TaskListState::Loading => Vec::new(),
                }
            }
        };
        self.tasks = TaskListState::Ready(tasks);
    }

    pub async fn handle(&mut self, action: DashboardAction) -> Flow {
        match action {
            DashboardAction::AddTask(form) => self.submit_ingest(form).await,
            DashboardAction::ToggleTask(id) => {
                if let Some(task) = self.find_task(&id).cloned() {
                    let outcome = self.actions.toggle_complete(&task).await;
                    self.refresh_after(&outcome).await;
                } else {
                    self.report_unknown(&id);
                }
            }
            DashboardAction::DeleteTask(id) => {
                if let Some(task) = self.find_task(&id).cloned() {
                    let outcome = self.actions.delete(&task).await;
                    self.refresh_after(&outcome).await;
                } else {
                    self.report_unknown(&id);
                }
            }
            DashboardAction::GenerateSchedule => {
                self.schedule.generate().await;
            }
            DashboardAction::Refresh => {
                self.load_tasks().await;
                self.schedule.load().await;
            }
            DashboardAction::Quit => return Flow::Exit,
        }
        Flow::Continue
    }

    async fn submit_ingest(&mut self, form: IngestForm) {
        let mut modal = match self.ingest.take() {
            Some(modal) if modal.is_open() => modal,
            _ => IngestModal::new(
                self.services.ingestion.clone(),
                self.services.notifier.clone(),
                self.max_upload_bytes,
            ),
        };
        modal.form = form;
        match modal.submit().await {
            SubmitOutcome::Submitted(_) => self.load_tasks().await,
            SubmitOutcome::Blocked(missing) => {
                log::debug!("event=ingest_blocked reason={:?}", missing);
                self.ingest = Some(modal);
            }
            SubmitOutcome::Failed => self.ingest = Some(modal),
        }
    }

    async fn refresh_after(&mut self, outcome: &ItemOutcome) {
        if outcome.needs_refresh() {
            self.load_tasks().await;
        }
    }

    fn report_unknown(&self, id: &str) {
        log::warn!("event=task_not_found task_id={}", id);
        self.services.notifier.error("Task not found");
    }

    pub fn render(&self) -> String {
        let tasks = match &self.tasks {
            TaskListState::Loading => "Loading...".to_string(),
            TaskListState::Ready(tasks) => task_list::render_task_list(tasks),
        };
        format!(
            "== Tasks ==\n{}\n\n== Schedule ({}) ==\n{}",
            tasks,
            self.schedule.date().format("%Y-%m-%d"),
            self.schedule.render()
        )
    }
}
