use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::task::TaskSummary;
use super::wire;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetadata {
    #[serde(default)]
    pub ai_generated: bool,
    #[serde(default)]
    pub adjustments_count: u32,
    #[serde(default)]
    pub user_satisfaction: Option<f64>,
}

/// One placement of a task inside a day's schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub task_id: String,
    /// Whatever the backend embedded; non-object bodies read as `None`.
    #[serde(default, deserialize_with = "wire::lenient_option")]
    pub task: Option<TaskSummary>,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub order: i32,
}

impl ScheduledTask {
    pub fn title(&self) -> &str {
        self.task
            .as_ref()
            .and_then(TaskSummary::title)
            .unwrap_or("Task")
    }

    pub fn description(&self) -> Option<&str> {
        self.task.as_ref().and_then(TaskSummary::description)
    }
}

/// `tasks` is kept in the order the backend sent; `order` is informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub tasks: Vec<ScheduledTask>,
    #[serde(default, deserialize_with = "wire::lenient_option")]
    pub metadata: Option<ScheduleMetadata>,
    #[serde(default, with = "wire::timestamp_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "wire::timestamp_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Schedule {
    pub fn is_ai_generated(&self) -> bool {
        self.metadata.as_ref().is_some_and(|m| m.ai_generated)
    }
}

/// Body of `POST /schedule/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateScheduleRequest {
    pub date: NaiveDate,
    pub force_regenerate: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_titles_come_from_whatever_body_was_sent() {
        let raw = r#"{
            "id": "s1",
            "user_id": "u1",
            "date": "2026-03-02",
            "tasks": [
                {
                    "task_id": "a",
                    "task": {
                        "id": "a",
                        "title": "Standup",
                        "description": "daily sync",
                        "estimated_duration": 15.5
                    },
                    "start_time": "09:00",
                    "end_time": "09:15",
                    "order": 2
                },
                {
                    "task_id": "b",
                    "task": {"title": "Write report"},
                    "start_time": "10:00",
                    "end_time": "10:30",
                    "order": 1
                },
                {"task_id": "c", "task": "c", "start_time": "11:00", "end_time": "11:30"},
                {"task_id": "d", "start_time": "12:00", "end_time": "12:30"}
            ],
            "metadata": {"ai_generated": true, "adjustments_count": 0},
            "created_at": "2026-03-02T06:00:00"
        }"#;
        let schedule: Schedule = serde_json::from_str(raw).unwrap();
        let titles: Vec<&str> = schedule.tasks.iter().map(ScheduledTask::title).collect();
        assert_eq!(titles, vec!["Standup", "Write report", "Task", "Task"]);
        assert_eq!(schedule.tasks[0].description(), Some("daily sync"));
        assert_eq!(schedule.tasks[1].description(), None);
        assert!(schedule.is_ai_generated());
        assert!(schedule.updated_at.is_none());
    }

    #[test]
    fn generate_request_wire_shape() {
        let body = serde_json::to_value(GenerateScheduleRequest {
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            force_regenerate: true,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "date": "2026-03-02", "force_regenerate": true }));
    }
}
