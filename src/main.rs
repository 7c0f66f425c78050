use std::env;
use std::process::ExitCode;

use clap::Parser;

use taskpilot::cli::{self, Cli, Commands};
use taskpilot::config::{self, Settings};
use taskpilot::error::AppError;
use taskpilot::logging;
use taskpilot::runtime::Runtime;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::Reported) => ExitCode::FAILURE,
        Err(err) => {
            log::error!("event=command_failed error={}", err);
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> Result<(), AppError> {
    let config = config::load_config(args.config.as_deref())?;
    let mut settings = Settings::resolve(&config, |key| env::var(key).ok())?;
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url.trim_end_matches('/').to_string();
    }
    if let Some(token) = args.token {
        settings.api_token = Some(token);
    }

    let _logger = logging::init_logging(&settings.log_level, settings.log_dir.as_deref())
        .map_err(AppError::Logging)?;
    log::debug!("event=startup api_url={}", settings.api_url);

    let runtime = Runtime::new(settings)?;
    cli::execute(args.command.unwrap_or(Commands::Home), runtime).await
}
