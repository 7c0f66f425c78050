use thiserror::Error;

/// Failure of a single backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to read local file: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    InvalidInput(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config line {line}: {content}")]
    InvalidLine { line: usize, content: String },
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Everything that can end a command.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("logging setup failed: {0}")]
    Logging(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("prompt aborted: {0}")]
    Prompt(#[from] inquire::InquireError),
    #[error("session file error: {0}")]
    Session(String),
    #[error("{0}")]
    Usage(String),
    /// The user has already been notified; only the exit status is left.
    #[error("operation failed")]
    Reported,
}
