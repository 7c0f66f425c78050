use std::sync::Arc;

use crate::models::task::{Task, TaskStatus, TaskUpdate};
use crate::service::api_service::TaskApi;
use crate::service::feedback::{Confirmer, Notifier};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";
pub const EMPTY_MESSAGE: &str = "No tasks yet. Add one to get started!";

/// Display grouping only; cancelled tasks belong to neither group.
#[derive(Debug, Default)]
pub struct TaskGroups<'a> {
    pub active: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
}

pub fn partition(tasks: &[Task]) -> TaskGroups<'_> {
    let mut groups = TaskGroups::default();
    for task in tasks {
        if task.status.is_active() {
            groups.active.push(task);
        } else if task.status == TaskStatus::Completed {
            groups.completed.push(task);
        }
    }
    groups
}

pub fn render_task_item(task: &Task) -> String {
    let marker = if task.status == TaskStatus::Completed { "[x]" } else { "[ ]" };
    let mut line = format!("{} {}", marker, task.title);
    line.push_str(&format!("  ({})", task.priority));
    if let Some(minutes) = task.estimated_duration {
        line.push_str(&format!("  {}m", minutes));
    }
    if task.status == TaskStatus::InProgress {
        line.push_str("  in progress");
    }
    line.push_str(&format!("  #{}", task.id));
    if let Some(description) = task.description.as_deref().filter(|d| !d.trim().is_empty()) {
        line.push_str(&format!("\n      {}", description.trim()));
    }
    line
}

pub fn render_task_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }
    let groups = partition(tasks);
    let mut body = String::new();
    if !groups.active.is_empty() {
        body.push_str(&format!("Active ({})\n", groups.active.len()));
        for task in &groups.active {
            body.push_str(&format!("  {}\n", render_task_item(task)));
        }
    }
    if !groups.completed.is_empty() {
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str(&format!("Completed ({})\n", groups.completed.len()));
        for task in &groups.completed {
            body.push_str(&format!("  {}\n", render_task_item(task)));
        }
    }
    let hidden = tasks.len() - groups.active.len() - groups.completed.len();
    if hidden > 0 {
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str(&format!("{} cancelled task(s) hidden\n", hidden));
    }
    body.trim_end().to_string()
}

/// Result of a per-item action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Updated(TaskStatus),
    Deleted,
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
    Failed,
}

impl ItemOutcome {
    /// Whether the owner should re-fetch the task list.
    pub fn needs_refresh(&self) -> bool {
        matches!(self, Self::Updated(_) | Self::Deleted)
    }
}

/// Complete/reopen and delete actions for a single task.
#[derive(Clone)]
pub struct TaskItemActions {
    api: Arc<dyn TaskApi>,
    notifier: Arc<dyn Notifier>,
    confirmer: Arc<dyn Confirmer>,
}

impl TaskItemActions {
    pub fn new(
        api: Arc<dyn TaskApi>,
        notifier: Arc<dyn Notifier>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        Self {
            api,
            notifier,
            confirmer,
        }
    }

    pub async fn toggle_complete(&self, task: &Task) -> ItemOutcome {
        let next = task.status.toggled();
        match self.api.update_task(&task.id, &TaskUpdate::status(next)).await {
            Ok(_) => {
                log::info!("event=task_toggled task_id={} status={}", task.id, next);
                self.notifier.success(if next == TaskStatus::Completed {
                    "Task completed!"
                } else {
                    "Task reopened"
                });
                ItemOutcome::Updated(next)
            }
            Err(err) => {
                log::warn!("event=task_toggle_failed task_id={} error={}", task.id, err);
                self.notifier.error("Failed to update task");
                ItemOutcome::Failed
            }
        }
    }

    pub async fn delete(&self, task: &Task) -> ItemOutcome {
        if !self.confirmer.confirm(DELETE_PROMPT) {
            return ItemOutcome::Cancelled;
        }
        match self.api.delete_task(&task.id).await {
            Ok(()) => {
                log::info!("event=task_deleted task_id={}", task.id);
                self.notifier.success("Task deleted");
                ItemOutcome::Deleted
            }
            Err(err) => {
                log::warn!("event=task_delete_failed task_id={} error={}", task.id, err);
                self.notifier.error("Failed to delete task");
                ItemOutcome::Failed
            }
        }
    }
}
