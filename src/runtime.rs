use std::sync::Arc;

use chrono::NaiveDate;

use crate::cli;
use crate::clients::api_client::ApiClient;
use crate::config::{self, Settings};
use crate::error::AppError;
use crate::handlers::dashboard::{Dashboard, DashboardServices, Flow};
use crate::handlers::schedule_view;
use crate::service::api_service::ApiService;
use crate::service::feedback::{AssumeYes, Confirmer, InquireConfirmer, Notifier, TerminalNotifier};
use crate::service::session_store::SessionStore;

const SESSION_FILE: &str = "session.json";

/// Shared wiring for every command: one HTTP client, one notifier.
pub struct Runtime {
    pub settings: Settings,
    pub service: Arc<ApiService>,
    pub notifier: Arc<dyn Notifier>,
    pub sessions: SessionStore,
}

impl Runtime {
    pub fn new(settings: Settings) -> Result<Self, AppError> {
        let session_path = config::config_dir()
            .map(|dir| dir.join(SESSION_FILE))
            .ok_or_else(|| AppError::Session("no config directory on this platform".to_string()))?;
        let sessions = SessionStore::new(session_path);

        // An explicit token wins over whatever `auth login` stored.
        let token = match &settings.api_token {
            Some(token) => Some(token.clone()),
            None => match sessions.load() {
                Ok(session) => session.map(|s| s.access_token),
                Err(err) => {
                    log::warn!("event=session_unreadable error={}", err);
                    None
                }
            },
        };

        let client = ApiClient::new(&settings.api_url, token, settings.timeout)?;
        log::debug!(
            "event=runtime_ready api_url={} authenticated={}",
            client.base_url(),
            client.has_token()
        );

        Ok(Self {
            settings,
            service: Arc::new(ApiService::new(client)),
            notifier: Arc::new(TerminalNotifier),
            sessions,
        })
    }

    pub fn confirmer(&self, assume_yes: bool) -> Arc<dyn Confirmer> {
        if assume_yes {
            Arc::new(AssumeYes)
        } else {
            Arc::new(InquireConfirmer)
        }
    }

    pub fn today(&self) -> NaiveDate {
        schedule_view::today(self.settings.timezone)
    }

    pub fn dashboard(&self, date: Option<NaiveDate>) -> Dashboard {
        let services = DashboardServices {
            tasks: self.service.clone(),
            ingestion: self.service.clone(),
            schedule: self.service.clone(),
            notifier: self.notifier.clone(),
            confirmer: self.confirmer(false),
        };
        let today = self.today();
        Dashboard::new(
            services,
            date.unwrap_or(today),
            today,
            self.settings.max_upload_bytes,
        )
    }
}

/// The interactive dashboard: render, ask for one action, run it, repeat.
pub async fn run_dashboard_loop(dashboard: &mut Dashboard) -> Result<(), AppError> {
    dashboard.enter().await;
    loop {
        println!("\n{}\n", dashboard.render());
        let Some(action) = cli::prompt_dashboard_action(dashboard)? else {
            continue;
        };
        if dashboard.handle(action).await == Flow::Exit {
            return Ok(());
        }
    }
}
