mod support;

use std::sync::Arc;

use support::{task, FakeBackend, RecordingNotifier, ScriptedConfirmer, Toast};
use taskpilot::handlers::task_list::{
    self, ItemOutcome, TaskItemActions, DELETE_PROMPT, EMPTY_MESSAGE,
};
use taskpilot::models::task::TaskStatus;

fn actions(
    backend: &Arc<FakeBackend>,
    notifier: &Arc<RecordingNotifier>,
    confirm: bool,
) -> (TaskItemActions, Arc<ScriptedConfirmer>) {
    let confirmer = Arc::new(ScriptedConfirmer::new(confirm));
    let actions = TaskItemActions::new(backend.clone(), notifier.clone(), confirmer.clone());
    (actions, confirmer)
}

#[tokio::test]
async fn completed_task_toggles_back_to_pending() {
    let done = task("t1", "File taxes", TaskStatus::Completed);
    let backend = Arc::new(FakeBackend::with_tasks(vec![done.clone()]));
    let notifier = Arc::new(RecordingNotifier::default());
    let (actions, _) = actions(&backend, &notifier, true);

    let outcome = actions.toggle_complete(&done).await;

    assert_eq!(outcome, ItemOutcome::Updated(TaskStatus::Pending));
    assert!(outcome.needs_refresh());
    let updates = backend.updates.lock().unwrap().clone();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, "t1");
    assert_eq!(updates[0].1.status, Some(TaskStatus::Pending));
    assert_eq!(notifier.notes(), vec![Toast::Success("Task reopened".to_string())]);
}

#[tokio::test]
async fn open_tasks_toggle_to_completed_never_in_progress() {
    for status in [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Cancelled] {
        let item = task("t1", "Water plants", status);
        let backend = Arc::new(FakeBackend::with_tasks(vec![item.clone()]));
        let notifier = Arc::new(RecordingNotifier::default());
        let (actions, _) = actions(&backend, &notifier, true);

        assert_eq!(
            actions.toggle_complete(&item).await,
            ItemOutcome::Updated(TaskStatus::Completed)
        );
        let body = serde_json::to_value(&backend.updates.lock().unwrap()[0].1).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "completed" }));
        assert_eq!(notifier.notes(), vec![Toast::Success("Task completed!".to_string())]);
    }
}

#[tokio::test]
async fn failed_toggle_reports_and_skips_refresh() {
    let item = task("t1", "Water plants", TaskStatus::Pending);
    let backend = Arc::new(FakeBackend {
        fail_update: true,
        ..FakeBackend::with_tasks(vec![item.clone()])
    });
    let notifier = Arc::new(RecordingNotifier::default());
    let (actions, _) = actions(&backend, &notifier, true);

    let outcome = actions.toggle_complete(&item).await;

    assert_eq!(outcome, ItemOutcome::Failed);
    assert!(!outcome.needs_refresh());
    assert_eq!(notifier.errors(), vec!["Failed to update task".to_string()]);
}

#[tokio::test]
async fn declined_delete_makes_no_api_call() {
    let item = task("t1", "Book flights", TaskStatus::Pending);
    let backend = Arc::new(FakeBackend::with_tasks(vec![item.clone()]));
    let notifier = Arc::new(RecordingNotifier::default());
    let (actions, confirmer) = actions(&backend, &notifier, false);

    let outcome = actions.delete(&item).await;

    assert_eq!(outcome, ItemOutcome::Cancelled);
    assert!(backend.calls().is_empty());
    assert_eq!(backend.tasks.lock().unwrap().len(), 1);
    assert!(notifier.notes().is_empty());
    assert_eq!(confirmer.prompts.lock().unwrap().clone(), vec![DELETE_PROMPT.to_string()]);
}

#[tokio::test]
async fn confirmed_delete_removes_task() {
    let item = task("t1", "Book flights", TaskStatus::Pending);
    let backend = Arc::new(FakeBackend::with_tasks(vec![item.clone()]));
    let notifier = Arc::new(RecordingNotifier::default());
    let (actions, _) = actions(&backend, &notifier, true);

    assert_eq!(actions.delete(&item).await, ItemOutcome::Deleted);
    assert_eq!(backend.calls(), vec!["delete_task".to_string()]);
    assert!(backend.tasks.lock().unwrap().is_empty());
    assert_eq!(notifier.notes(), vec![Toast::Success("Task deleted".to_string())]);
}

#[tokio::test]
async fn failed_delete_is_reported() {
    let item = task("t1", "Book flights", TaskStatus::Pending);
    let backend = Arc::new(FakeBackend {
        fail_delete: true,
        ..FakeBackend::with_tasks(vec![item.clone()])
    });
    let notifier = Arc::new(RecordingNotifier::default());
    let (actions, _) = actions(&backend, &notifier, true);

    assert_eq!(actions.delete(&item).await, ItemOutcome::Failed);
    assert_eq!(notifier.errors(), vec!["Failed to delete task".to_string()]);
}

#[test]
fn list_groups_active_and_completed_only() {
    let tasks = vec![
        task("a", "Draft report", TaskStatus::Pending),
        task("b", "Review PR", TaskStatus::InProgress),
        task("c", "Ship release", TaskStatus::Completed),
        task("d", "Old idea", TaskStatus::Cancelled),
    ];
    let groups = task_list::partition(&tasks);
    let active: Vec<&str> = groups.active.iter().map(|t| t.id.as_str()).collect();
    let completed: Vec<&str> = groups.completed.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(active, vec!["a", "b"]);
    assert_eq!(completed, vec!["c"]);

    let rendered = task_list::render_task_list(&tasks);
    assert!(rendered.contains("Active (2)"));
    assert!(rendered.contains("Completed (1)"));
    assert!(rendered.contains("[x] Ship release"));
    assert!(rendered.contains("30m"));
    assert!(!rendered.contains("Old idea"));
    assert!(rendered.ends_with("1 cancelled task(s) hidden"));
}

#[test]
fn empty_list_shows_placeholder() {
    assert_eq!(task_list::render_task_list(&[]), EMPTY_MESSAGE);
}
