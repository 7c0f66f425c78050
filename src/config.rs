// Lookups fall back to the process environment; see `Settings::resolve`.
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Mirrors the backend's upload ceiling.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_LOG_LEVEL: &str = "warn";

pub const KEY_API_URL: &str = "TASKPILOT_API_URL";
pub const KEY_API_TOKEN: &str = "TASKPILOT_API_TOKEN";
pub const KEY_TIMEZONE: &str = "TASKPILOT_TIMEZONE";
pub const KEY_TIMEOUT_SECS: &str = "TASKPILOT_TIMEOUT_SECS";
pub const KEY_MAX_UPLOAD_BYTES: &str = "TASKPILOT_MAX_UPLOAD_BYTES";
pub const KEY_LOG_LEVEL: &str = "TASKPILOT_LOG_LEVEL";
pub const KEY_LOG_DIR: &str = "TASKPILOT_LOG_DIR";

#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::InvalidLine {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// `<config dir>/taskpilot`, where the config and session files live.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taskpilot"))
}

pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.env"))
}

/// Picks the config file: an explicit path first, then `CONFIG_FILE`, then
/// the default location if it exists. No file at all is an empty config.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    if let Some(path) = explicit {
        return AppConfig::from_file(path);
    }
    if let Ok(path) = std::env::var("CONFIG_FILE") {
        return AppConfig::from_file(Path::new(&path));
    }
    match default_config_path() {
        Some(path) if path.exists() => AppConfig::from_file(&path),
        _ => Ok(AppConfig::default()),
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub api_token: Option<String>,
    pub timezone: Option<Tz>,
    pub timeout: Duration,
    pub max_upload_bytes: u64,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Settings {
    pub fn resolve<F>(config: &AppConfig, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_prop = |key: &str| -> Option<String> {
            config
                .get(key)
                .or_else(|| env(key))
                .filter(|v| !v.trim().is_empty())
        };

        let api_url = get_prop(KEY_API_URL)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timezone = match get_prop(KEY_TIMEZONE) {
            Some(name) => Some(name.trim().parse::<Tz>().map_err(|e| ConfigError::InvalidValue {
                key: KEY_TIMEZONE.to_string(),
                reason: e.to_string(),
            })?),
            None => None,
        };

        let timeout_secs = parse_number(KEY_TIMEOUT_SECS, get_prop(KEY_TIMEOUT_SECS))?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let max_upload_bytes = parse_number(KEY_MAX_UPLOAD_BYTES, get_prop(KEY_MAX_UPLOAD_BYTES))?
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        Ok(Self {
            api_url,
            api_token: get_prop(KEY_API_TOKEN),
            timezone,
            timeout: Duration::from_secs(timeout_secs),
            max_upload_bytes,
            log_level: get_prop(KEY_LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_dir: get_prop(KEY_LOG_DIR).map(PathBuf::from),
        })
    }
}

fn parse_number(key: &str, raw: Option<String>) -> Result<Option<u64>, ConfigError> {
    raw.map(|value| {
        value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("`{value}` is not a non-negative integer"),
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn parses_exports_quotes_and_comments() {
        let config = AppConfig::parse(
            "# backend\n\
             export TASKPILOT_API_URL=\"https://api.example.com/v1/\"\n\
             \n\
             TASKPILOT_TIMEZONE='Europe/Berlin'\n",
        )
        .unwrap();
        assert_eq!(
            config.get(KEY_API_URL).as_deref(),
            Some("https://api.example.com/v1/")
        );
        assert_eq!(config.get(KEY_TIMEZONE).as_deref(), Some("Europe/Berlin"));
    }

    #[test]
    fn rejects_lines_without_equals() {
        let err = AppConfig::parse("TASKPILOT_API_URL\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLine { line: 1, .. }));
    }

    #[test]
    fn defaults_apply_without_config_or_env() {
        let settings = Settings::resolve(&AppConfig::default(), no_env).unwrap();
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(settings.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert!(settings.api_token.is_none());
        assert!(settings.timezone.is_none());
    }

    #[test]
    fn config_file_wins_over_environment() {
        let config = AppConfig::parse("TASKPILOT_API_URL=http://file/api/\n").unwrap();
        let settings = Settings::resolve(&config, |key| match key {
            KEY_API_URL => Some("http://env/api".to_string()),
            KEY_API_TOKEN => Some("secret".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(settings.api_url, "http://file/api");
        assert_eq!(settings.api_token.as_deref(), Some("secret"));
    }

    #[test]
    fn invalid_timezone_and_numbers_are_errors() {
        let config = AppConfig::parse("TASKPILOT_TIMEZONE=Mars/Olympus\n").unwrap();
        assert!(Settings::resolve(&config, no_env).is_err());

        let config = AppConfig::parse("TASKPILOT_TIMEOUT_SECS=soon\n").unwrap();
        let err = Settings::resolve(&config, no_env).unwrap_err();
        assert!(err.to_string().contains(KEY_TIMEOUT_SECS));
    }
}
