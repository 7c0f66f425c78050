use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::models::schedule::{GenerateScheduleRequest, Schedule};
use crate::service::api_service::ScheduleApi;
use crate::service::feedback::Notifier;

/// Today's date from the local clock, or in `tz` when one is configured.
pub fn today(tz: Option<Tz>) -> NaiveDate {
    match tz {
        Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
        None => Local::now().date_naive(),
    }
}

/// A single day's schedule. Fetch errors of any kind read as "not generated yet".
pub struct ScheduleView {
    api: Arc<dyn ScheduleApi>,
    notifier: Arc<dyn Notifier>,
    date: NaiveDate,
    is_today: bool,
    schedule: Option<Schedule>,
    loading: bool,
}

impl ScheduleView {
    pub fn new(
        api: Arc<dyn ScheduleApi>,
        notifier: Arc<dyn Notifier>,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Self {
        Self {
            api,
            notifier,
            date,
            is_today: date == today,
            schedule: None,
            loading: false,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn schedule(&self) -> Option<&Schedule> {
        self.schedule.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub async fn load(&mut self) {
        self.loading = true;
        self.schedule = match self.api.get_schedule(self.date).await {
            Ok(schedule) => Some(schedule),
            Err(err) => {
                log::debug!("event=schedule_missing date={} error={}", self.date, err);
                None
            }
        };
        self.loading = false;
    }

    /// Always asks for a fresh schedule; whatever was there is replaced.
    /// Returns whether a new schedule was stored.
    pub async fn generate(&mut self) -> bool {
        self.loading = true;
        let request = GenerateScheduleRequest {
            date: self.date,
            force_regenerate: true,
        };
        let stored = match self.api.generate_schedule(&request).await {
            Ok(schedule) => {
                log::info!(
                    "event=schedule_generated date={} tasks={}",
                    self.date,
                    schedule.tasks.len()
                );
                self.schedule = Some(schedule);
                self.notifier.success("Schedule generated successfully!");
                true
            }
            Err(err) => {
                log::warn!("event=schedule_generate_failed date={} error={}", self.date, err);
                self.notifier.error("Failed to generate schedule");
                false
            }
        };
        self.loading = false;
        stored
    }

    pub fn render(&self) -> String {
        if self.loading {
            return "Loading...".to_string();
        }
        let Some(schedule) = &self.schedule else {
            let day = if self.is_today {
                "today".to_string()
            } else {
                self.date.format("%Y-%m-%d").to_string()
            };
            return format!(
                "No schedule for {} yet\n  Generate one with `taskpilot schedule generate`",
                day
            );
        };
        render_schedule(schedule)
    }
}

pub fn render_schedule(schedule: &Schedule) -> String {
    let mut body = format!("{} tasks scheduled\n", schedule.tasks.len());
    for item in &schedule.tasks {
        body.push_str(&format!(
            "  {} - {}  {}\n",
            item.start_time,
            item.end_time,
            item.title()
        ));
        if let Some(description) = item.description() {
            body.push_str(&format!("      {}\n", description.trim()));
        }
    }
    if schedule.is_ai_generated() {
        body.push_str("\nAI-generated schedule\n");
    }
    body.trim_end().to_string()
}
