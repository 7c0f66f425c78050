mod support;

use std::sync::Arc;

use chrono::NaiveDate;
use support::{schedule, FakeBackend, RecordingNotifier, Toast};
use taskpilot::handlers::schedule_view::ScheduleView;
use taskpilot::models::schedule::GenerateScheduleRequest;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
}

fn view(backend: &Arc<FakeBackend>, notifier: &Arc<RecordingNotifier>) -> ScheduleView {
    ScheduleView::new(backend.clone(), notifier.clone(), day(), day())
}

#[tokio::test]
async fn fetch_error_reads_as_no_schedule() {
    let backend = Arc::new(FakeBackend::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let mut view = view(&backend, &notifier);

    view.load().await;

    assert!(view.schedule().is_none());
    assert!(!view.is_loading());
    assert!(view.render().starts_with("No schedule for today yet"));
    assert!(notifier.notes().is_empty());
}

#[tokio::test]
async fn other_days_name_the_date() {
    let backend = Arc::new(FakeBackend::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let tomorrow = day().succ_opt().unwrap();
    let mut view = ScheduleView::new(backend.clone(), notifier.clone(), tomorrow, day());

    view.load().await;

    assert!(view.render().starts_with("No schedule for 2024-05-07 yet"));
}

#[tokio::test]
async fn existing_schedule_renders_in_order() {
    let backend = Arc::new(FakeBackend::default());
    *backend.schedule.lock().unwrap() = Some(schedule(day(), false, &["Standup", "Write tests"]));
    let notifier = Arc::new(RecordingNotifier::default());
    let mut view = view(&backend, &notifier);

    view.load().await;
    let rendered = view.render();

    assert!(rendered.starts_with("2 tasks scheduled"));
    let standup = rendered.find("09:00 - 10:00  Standup").unwrap();
    let tests = rendered.find("10:00 - 11:00  Write tests").unwrap();
    assert!(standup < tests);
    assert!(!rendered.contains("AI-generated schedule"));
}

#[tokio::test]
async fn generate_always_forces_regeneration() {
    let backend = Arc::new(FakeBackend::default());
    *backend.schedule.lock().unwrap() = Some(schedule(day(), false, &["Old plan"]));
    let notifier = Arc::new(RecordingNotifier::default());
    let mut view = view(&backend, &notifier);
    view.load().await;

    assert!(view.generate().await);

    assert_eq!(
        backend.generate_requests.lock().unwrap().clone(),
        vec![GenerateScheduleRequest {
            date: day(),
            force_regenerate: true,
        }]
    );
    let rendered = view.render();
    assert!(rendered.contains("Deep work"));
    assert!(!rendered.contains("Old plan"));
    assert!(rendered.ends_with("AI-generated schedule"));
    assert_eq!(
        notifier.notes(),
        vec![Toast::Success("Schedule generated successfully!".to_string())]
    );
}

#[tokio::test]
async fn failed_generate_keeps_previous_schedule() {
    let backend = Arc::new(FakeBackend {
        fail_generate: true,
        ..FakeBackend::default()
    });
    *backend.schedule.lock().unwrap() = Some(schedule(day(), false, &["Old plan"]));
    let notifier = Arc::new(RecordingNotifier::default());
    let mut view = view(&backend, &notifier);
    view.load().await;

    assert!(!view.generate().await);

    assert!(view.render().contains("Old plan"));
    assert_eq!(notifier.errors(), vec!["Failed to generate schedule".to_string()]);
}
