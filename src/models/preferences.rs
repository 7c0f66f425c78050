use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarProvider {
    Google,
    Outlook,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub email: bool,
    pub push: bool,
    pub in_app: bool,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub reminder_minutes_before: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityWeights {
    pub deadline: f64,
    pub importance: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiPreferences {
    pub auto_schedule: bool,
    #[serde(default)]
    pub priority_weights: Option<PriorityWeights>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, with = "wire::time_option")]
    pub work_hours_start: Option<NaiveTime>,
    #[serde(default, with = "wire::time_option")]
    pub work_hours_end: Option<NaiveTime>,
    /// 0 is Sunday.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub work_days: Vec<u8>,
    #[serde(default)]
    pub preferred_break_duration: Option<u32>,
    #[serde(default)]
    pub notification_settings: Option<NotificationSettings>,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub calendar_sync_enabled: bool,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub calendar_providers: Vec<CalendarProvider>,
    #[serde(default)]
    pub ai_preferences: Option<AiPreferences>,
    #[serde(with = "wire::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "wire::timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Body of `PATCH /users/preferences`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreferencesUpdate {
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "wire::time_option::serialize"
    )]
    pub work_hours_start: Option<NaiveTime>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "wire::time_option::serialize"
    )]
    pub work_hours_end: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_days: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_break_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_sync_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_preferences: Option<AiPreferences>,
}

impl PreferencesUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Parses `1,2,3,4,5` into weekday numbers, 0 being Sunday.
pub fn parse_work_days(raw: &str) -> Result<Vec<u8>, String> {
    let mut days = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let day: u8 = part
            .parse()
            .map_err(|_| format!("invalid work day `{part}`"))?;
        if day > 6 {
            return Err(format!("work day `{day}` out of range 0-6"));
        }
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}
