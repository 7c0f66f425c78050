use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use inquire::error::InquireError;
use inquire::{Password, Select, Text};

use crate::error::AppError;
use crate::handlers::dashboard::{Dashboard, DashboardAction, TaskListState};
use crate::handlers::ingest::{self, IngestForm, IngestMode, IngestModal, SubmitOutcome};
use crate::handlers::schedule_view::ScheduleView;
use crate::handlers::task_list::{self, ItemOutcome, TaskItemActions};
use crate::handlers::{account, home, notes};
use crate::models::note::{NoteFilter, SourceType};
use crate::models::preferences::{self, AiPreferences, PreferencesUpdate};
use crate::models::task::{NewTask, Priority, TaskFilter, TaskStatus};
use crate::runtime::{self, Runtime};
use crate::service::api_service::{AccountApi, IngestionApi, NoteApi, TaskApi};

#[derive(Parser)]
#[command(
    name = "taskpilot",
    version,
    about = "Terminal client for the TaskPilot scheduling assistant"
)]
pub struct Cli {
    /// KEY=VALUE config file to read instead of the default one.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Backend base URL, e.g. http://localhost:8000/api/v1.
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    /// Bearer token; overrides the stored login session.
    #[arg(long, global = true)]
    pub token: Option<String>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Product overview (the default).
    Home,
    /// Tasks and today's schedule in one view.
    Dashboard {
        #[arg(short, long)]
        interactive: bool,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    #[command(subcommand)]
    Tasks(TaskCommand),
    /// Turn text, a voice memo or a photo into tasks.
    #[command(subcommand)]
    Ingest(IngestCommand),
    #[command(subcommand)]
    Schedule(ScheduleCommand),
    #[command(subcommand)]
    Notes(NoteCommand),
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Show the signed-in user.
    Me,
    #[command(subcommand)]
    Prefs(PrefsCommand),
}

#[derive(Subcommand)]
pub enum TaskCommand {
    List {
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    Show {
        id: String,
    },
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Estimated duration in minutes.
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Complete a task, or reopen a completed one.
    Toggle {
        id: String,
    },
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum IngestCommand {
    Text {
        /// Prompted for when omitted.
        content: Option<String>,
        #[arg(long)]
        title: Option<String>,
    },
    Voice {
        file: PathBuf,
    },
    Image {
        file: PathBuf,
    },
    /// Check on an ingestion job.
    Status {
        job_id: String,
    },
    /// Fill in the add-task form interactively.
    Form,
}

#[derive(Args)]
pub struct DateArg {
    /// Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Subcommand)]
pub enum ScheduleCommand {
    Show(DateArg),
    /// Ask the backend for a fresh schedule, replacing any existing one.
    Generate(DateArg),
}

#[derive(Subcommand)]
pub enum NoteCommand {
    List {
        #[arg(long)]
        source: Option<SourceType>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    Show {
        id: String,
    },
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum AuthCommand {
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    Signup {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    Logout,
}

#[derive(Subcommand)]
pub enum PrefsCommand {
    Show,
    Set(PrefsArgs),
}

#[derive(Args)]
pub struct PrefsArgs {
    /// HH:MM
    #[arg(long, value_parser = parse_clock)]
    pub work_start: Option<NaiveTime>,
    /// HH:MM
    #[arg(long, value_parser = parse_clock)]
    pub work_end: Option<NaiveTime>,
    /// Comma separated, 0 is Sunday.
    #[arg(long)]
    pub work_days: Option<String>,
    /// Minutes.
    #[arg(long)]
    pub break_minutes: Option<u32>,
    #[arg(long)]
    pub calendar_sync: Option<bool>,
    #[arg(long)]
    pub auto_schedule: Option<bool>,
}

fn parse_clock(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|e| format!("expected HH:MM: {e}"))
}

pub async fn execute(command: Commands, rt: Runtime) -> Result<(), AppError> {
    match command {
        Commands::Home => {
            println!("{}", home::render_home());
            Ok(())
        }
        Commands::Dashboard { interactive, date } => {
            let mut dashboard = rt.dashboard(date);
            if interactive {
                runtime::run_dashboard_loop(&mut dashboard).await
            } else {
                dashboard.enter().await;
                println!("{}", dashboard.render());
                Ok(())
            }
        }
        Commands::Tasks(command) => run_tasks(command, &rt).await,
        Commands::Ingest(command) => run_ingest(command, &rt).await,
        Commands::Schedule(command) => run_schedule(command, &rt).await,
        Commands::Notes(command) => run_notes(command, &rt).await,
        Commands::Auth(command) => run_auth(command, &rt).await,
        Commands::Me => {
            let user = rt.service.current_user().await?;
            println!("{}", account::render_user(&user));
            Ok(())
        }
        Commands::Prefs(command) => run_prefs(command, &rt).await,
    }
}

fn reported(outcome: ItemOutcome) -> Result<(), AppError> {
    match outcome {
        ItemOutcome::Failed => Err(AppError::Reported),
        _ => Ok(()),
    }
}

async fn run_tasks(command: TaskCommand, rt: &Runtime) -> Result<(), AppError> {
    match command {
        TaskCommand::List {
            status,
            priority,
            limit,
            offset,
        } => {
            let filter = TaskFilter {
                status,
                priority,
                limit,
                offset,
            };
            let tasks = rt.service.list_tasks(&filter).await?;
            println!("{}", task_list::render_task_list(&tasks));
        }
        TaskCommand::Show { id } => {
            let task = rt.service.get_task(&id).await?;
            println!("{}", task_list::render_task_item(&task));
            if let (Some(start), Some(end)) = (task.scheduled_start, task.scheduled_end) {
                println!("      scheduled {} - {}", start.to_rfc3339(), end.to_rfc3339());
            }
            if !task.tags.is_empty() {
                println!("      tags: {}", task.tags.join(", "));
            }
        }
        TaskCommand::Add {
            title,
            description,
            priority,
            duration,
            tags,
        } => {
            let mut new_task = NewTask::new(title.trim());
            new_task.description = description;
            new_task.priority = priority;
            new_task.estimated_duration = duration;
            new_task.tags = tags;
            let task = rt.service.create_task(&new_task).await?;
            log::info!("event=task_created task_id={}", task.id);
            println!("{}", task_list::render_task_item(&task));
        }
        TaskCommand::Toggle { id } => {
            let task = rt.service.get_task(&id).await?;
            let actions =
                TaskItemActions::new(rt.service.clone(), rt.notifier.clone(), rt.confirmer(false));
            return reported(actions.toggle_complete(&task).await);
        }
        TaskCommand::Delete { id, yes } => {
            let task = rt.service.get_task(&id).await?;
            let actions =
                TaskItemActions::new(rt.service.clone(), rt.notifier.clone(), rt.confirmer(yes));
            return reported(actions.delete(&task).await);
        }
    }
    Ok(())
}

async fn submit_form(rt: &Runtime, form: IngestForm) -> Result<(), AppError> {
    let mut modal = IngestModal::new(
        rt.service.clone(),
        rt.notifier.clone(),
        rt.settings.max_upload_bytes,
    )
    .with_form(form);
    match modal.submit().await {
        SubmitOutcome::Submitted(result) => {
            println!("{}", ingest::render_result(&result));
            Ok(())
        }
        SubmitOutcome::Blocked(missing) => Err(AppError::Usage(missing.to_string())),
        SubmitOutcome::Failed => Err(AppError::Reported),
    }
}

async fn run_ingest(command: IngestCommand, rt: &Runtime) -> Result<(), AppError> {
    match command {
        IngestCommand::Text { content, title } => {
            let content = match content {
                Some(content) => content,
                None => Text::new("What do you need to get done?").prompt()?,
            };
            let mut form = IngestForm::new(IngestMode::Text);
            form.set_content(content);
            form.set_title(title.unwrap_or_default());
            submit_form(rt, form).await
        }
        IngestCommand::Voice { file } => {
            let mut form = IngestForm::new(IngestMode::Voice);
            form.select_file(file)?;
            submit_form(rt, form).await
        }
        IngestCommand::Image { file } => {
            let mut form = IngestForm::new(IngestMode::Image);
            form.select_file(file)?;
            submit_form(rt, form).await
        }
        IngestCommand::Status { job_id } => {
            let status = rt.service.ingestion_status(&job_id).await?;
            println!("{}: {}", status.job_id, status.status);
            Ok(())
        }
        IngestCommand::Form => {
            let mut modal = IngestModal::new(
                rt.service.clone(),
                rt.notifier.clone(),
                rt.settings.max_upload_bytes,
            );
            // The form stays open after a failure so the input can be resent.
            while modal.is_open() {
                let Some(form) = prompt_ingest_form(Some(&modal.form))? else {
                    modal.close();
                    break;
                };
                modal.form = form;
                match modal.submit().await {
                    SubmitOutcome::Submitted(result) => {
                        println!("{}", ingest::render_result(&result))
                    }
                    SubmitOutcome::Blocked(missing) => eprintln!("Cannot submit yet: {}", missing),
                    SubmitOutcome::Failed => {}
                }
            }
            Ok(())
        }
    }
}

async fn run_schedule(command: ScheduleCommand, rt: &Runtime) -> Result<(), AppError> {
    let (date, generate) = match command {
        ScheduleCommand::Show(arg) => (arg.date, false),
        ScheduleCommand::Generate(arg) => (arg.date, true),
    };
    let today = rt.today();
    let mut view = ScheduleView::new(
        rt.service.clone(),
        rt.notifier.clone(),
        date.unwrap_or(today),
        today,
    );
    if generate {
        if !view.generate().await {
            return Err(AppError::Reported);
        }
    } else {
        view.load().await;
    }
    println!("{}", view.render());
    Ok(())
}

async fn run_notes(command: NoteCommand, rt: &Runtime) -> Result<(), AppError> {
    match command {
        NoteCommand::List {
            source,
            limit,
            offset,
        } => {
            let filter = NoteFilter {
                source_type: source,
                limit,
                offset,
            };
            let list = rt.service.list_notes(&filter).await?;
            println!("{}", notes::render_note_list(&list));
        }
        NoteCommand::Show { id } => {
            let note = rt.service.get_note(&id).await?;
            println!("{}", notes::render_note(&note));
        }
        NoteCommand::Delete { id, yes } => {
            let outcome = notes::delete_note(
                rt.service.clone(),
                rt.notifier.clone(),
                rt.confirmer(yes),
                &id,
            )
            .await;
            return reported(outcome);
        }
    }
    Ok(())
}

async fn run_auth(command: AuthCommand, rt: &Runtime) -> Result<(), AppError> {
    match command {
        AuthCommand::Login { email } => {
            let email = match email {
                Some(email) => email,
                None => Text::new("Email:").prompt()?,
            };
            let password = Password::new("Password:").without_confirmation().prompt()?;
            let session =
                account::login(rt.service.as_ref(), &rt.sessions, &email, &password).await?;
            println!("Signed in as {}", session.email);
        }
        AuthCommand::Signup { email, name } => {
            let email = match email {
                Some(email) => email,
                None => Text::new("Email:").prompt()?,
            };
            let password = Password::new("Password:").prompt()?;
            let session = account::signup(
                rt.service.as_ref(),
                &rt.sessions,
                &email,
                &password,
                name.as_deref(),
            )
            .await?;
            println!("Account created for {}", session.email);
        }
        AuthCommand::Logout => {
            account::logout(rt.service.as_ref(), &rt.sessions).await?;
            println!("Signed out");
        }
    }
    Ok(())
}

async fn run_prefs(command: PrefsCommand, rt: &Runtime) -> Result<(), AppError> {
    let current = rt.service.get_preferences().await?;
    let prefs = match command {
        PrefsCommand::Show => current,
        PrefsCommand::Set(args) => {
            let mut update = PreferencesUpdate {
                work_hours_start: args.work_start,
                work_hours_end: args.work_end,
                work_days: args
                    .work_days
                    .as_deref()
                    .map(preferences::parse_work_days)
                    .transpose()
                    .map_err(AppError::Usage)?,
                preferred_break_duration: args.break_minutes,
                calendar_sync_enabled: args.calendar_sync,
                ai_preferences: None,
            };
            if let Some(auto_schedule) = args.auto_schedule {
                // Keep the stored weights; the backend replaces the whole object.
                update.ai_preferences = Some(AiPreferences {
                    auto_schedule,
                    priority_weights: current.ai_preferences.and_then(|ai| ai.priority_weights),
                });
            }
            if update.is_empty() {
                return Err(AppError::Usage(
                    "nothing to update; pass at least one option".to_string(),
                ));
            }
            rt.service.update_preferences(&update).await?
        }
    };
    println!("{}", account::render_preferences(&prefs));
    Ok(())
}

fn cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Walks the user through the add-task form, starting from `previous` when a
/// failed submission left input behind. `None` when the user backs out.
pub fn prompt_ingest_form(previous: Option<&IngestForm>) -> Result<Option<IngestForm>, AppError> {
    let mut form = previous.cloned().unwrap_or_default();
    let start = IngestMode::ALL
        .iter()
        .position(|m| *m == form.mode())
        .unwrap_or(0);
    let mode = match Select::new("Input type:", IngestMode::ALL.to_vec())
        .with_starting_cursor(start)
        .prompt()
    {
        Ok(mode) => mode,
        Err(err) if cancelled(&err) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    form.set_mode(mode);

    let result = match mode.media_kind() {
        None => Text::new("Content:")
            .with_initial_value(form.content())
            .prompt()
            .and_then(|content| {
                form.set_content(content);
                let title = form.title().unwrap_or_default().to_string();
                Text::new("Title (optional):").with_initial_value(&title).prompt()
            })
            .map(|title| form.set_title(title)),
        Some(kind) => loop {
            let path = match Text::new(&format!("Path to {} file:", kind)).prompt() {
                Ok(path) => path,
                Err(err) => break Err(err),
            };
            match form.select_file(PathBuf::from(path.trim())) {
                Ok(()) => break Ok(()),
                Err(err) => eprintln!("{}", err),
            }
        },
    };
    match result {
        Ok(()) => Ok(Some(form)),
        Err(err) if cancelled(&err) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

const MENU: [&str; 6] = [
    "Add task",
    "Toggle task",
    "Delete task",
    "Generate schedule",
    "Refresh",
    "Quit",
];

/// One round of the interactive dashboard menu. `None` means nothing to do
/// this round (the user backed out of a sub-prompt).
pub fn prompt_dashboard_action(dashboard: &Dashboard) -> Result<Option<DashboardAction>, AppError> {
    let choice = match Select::new("What next?", MENU.to_vec()).prompt() {
        Ok(choice) => choice,
        Err(err) if cancelled(&err) => return Ok(Some(DashboardAction::Quit)),
        Err(err) => return Err(err.into()),
    };
    let action = match choice {
        "Add task" => prompt_ingest_form(dashboard.pending_form())?.map(DashboardAction::AddTask),
        "Toggle task" => {
            pick_task(dashboard, "Toggle which task?")?.map(DashboardAction::ToggleTask)
        }
        "Delete task" => {
            pick_task(dashboard, "Delete which task?")?.map(DashboardAction::DeleteTask)
        }
        "Generate schedule" => Some(DashboardAction::GenerateSchedule),
        "Refresh" => Some(DashboardAction::Refresh),
        _ => Some(DashboardAction::Quit),
    };
    Ok(action)
}

fn pick_task(dashboard: &Dashboard, message: &str) -> Result<Option<String>, AppError> {
    let tasks = match dashboard.tasks() {
        TaskListState::Ready(tasks) if !tasks.is_empty() => tasks,
        _ => {
            println!("{}", task_list::EMPTY_MESSAGE);
            return Ok(None);
        }
    };
    let labels: Vec<String> = tasks
        .iter()
        .map(|t| {
            let marker = if t.status == TaskStatus::Completed { "[x]" } else { "[ ]" };
            format!("{} {} ({})", marker, t.title, t.priority)
        })
        .collect();
    match Select::new(message, labels).raw_prompt() {
        Ok(picked) => Ok(tasks.get(picked.index).map(|t| t.id.clone())),
        Err(err) if cancelled(&err) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
