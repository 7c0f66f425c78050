use serde_json::Value;

use crate::error::AppError;
use crate::models::account::{LoginRequest, SignupRequest};
use crate::models::preferences::UserPreferences;
use crate::service::api_service::AccountApi;
use crate::service::session_store::{Session, SessionStore};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub async fn login(
    api: &dyn AccountApi,
    store: &SessionStore,
    email: &str,
    password: &str,
) -> Result<Session, AppError> {
    let request = LoginRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
    };
    let auth = api.login(&request).await?;
    let session = Session::from_auth(&request.email, &auth);
    store.save(&session).map_err(AppError::Session)?;
    log::info!("event=login_ok email={}", session.email);
    Ok(session)
}

pub async fn signup(
    api: &dyn AccountApi,
    store: &SessionStore,
    email: &str,
    password: &str,
    full_name: Option<&str>,
) -> Result<Session, AppError> {
    let request = SignupRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
        full_name: full_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
    };
    let auth = api.signup(&request).await?;
    let session = Session::from_auth(&request.email, &auth);
    store.save(&session).map_err(AppError::Session)?;
    log::info!("event=signup_ok email={}", session.email);
    Ok(session)
}

/// The local session is dropped even if the backend call fails.
pub async fn logout(api: &dyn AccountApi, store: &SessionStore) -> Result<(), AppError> {
    if let Err(err) = api.logout().await {
        log::warn!("event=logout_failed error={}", err);
    }
    store.clear().map_err(AppError::Session)
}

pub fn render_user(user: &Value) -> String {
    let field = |key: &str| user.get(key).and_then(Value::as_str).unwrap_or("-");
    format!(
        "Email: {}\nName:  {}\nId:    {}",
        field("email"),
        user.get("user_metadata")
            .and_then(|m| m.get("full_name"))
            .and_then(Value::as_str)
            .or_else(|| user.get("full_name").and_then(Value::as_str))
            .unwrap_or("-"),
        field("id")
    )
}

pub fn render_preferences(prefs: &UserPreferences) -> String {
    let time = |t: Option<chrono::NaiveTime>| {
        t.map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    let days = if prefs.work_days.is_empty() {
        "-".to_string()
    } else {
        prefs
            .work_days
            .iter()
            .filter_map(|d| WEEKDAYS.get(*d as usize).copied())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let mut body = format!(
        "Work hours:       {} - {}\n\
         Work days:        {}\n\
         Break length:     {}\n\
         Calendar sync:    {}\n",
        time(prefs.work_hours_start),
        time(prefs.work_hours_end),
        days,
        prefs
            .preferred_break_duration
            .map(|m| format!("{}m", m))
            .unwrap_or_else(|| "-".to_string()),
        if prefs.calendar_sync_enabled { "on" } else { "off" },
    );
    if !prefs.calendar_providers.is_empty() {
        let providers: Vec<String> = prefs
            .calendar_providers
            .iter()
            .map(|p| format!("{:?}", p).to_lowercase())
            .collect();
        body.push_str(&format!("Providers:        {}\n", providers.join(", ")));
    }
    if let Some(ai) = &prefs.ai_preferences {
        body.push_str(&format!(
            "Auto-schedule:    {}\n",
            if ai.auto_schedule { "on" } else { "off" }
        ));
        if let Some(w) = &ai.priority_weights {
            body.push_str(&format!(
                "Priority weights: deadline {:.2}, importance {:.2}, duration {:.2}\n",
                w.deadline, w.importance, w.duration
            ));
        }
    }
    if let Some(n) = &prefs.notification_settings {
        body.push_str(&format!(
            "Notifications:    email {}, push {}, in-app {}\n",
            n.email, n.push, n.in_app
        ));
    }
    body.trim_end().to_string()
}
