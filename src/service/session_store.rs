use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::account::AuthResponse;

/// What `auth login` keeps between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub email: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Session {
    pub fn from_auth(email: &str, auth: &AuthResponse) -> Self {
        Self {
            access_token: auth.access_token.clone(),
            refresh_token: auth.refresh_token.clone(),
            email: email.to_string(),
            user_id: auth.user_id().map(str::to_string),
        }
    }
}

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `Ok(None)` when nobody has logged in yet.
    pub fn load(&self) -> Result<Option<Session>, String> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| format!("failed to read {}: {e}", self.path.display()))?;
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| format!("corrupt session file {}: {e}", self.path.display()))
    }

    pub fn save(&self, session: &Session) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create {}: {e}", parent.display()))?;
        }
        let body = serde_json::to_string_pretty(session).map_err(|e| e.to_string())?;
        fs::write(&self.path, body)
            .map_err(|e| format!("failed to write {}: {e}", self.path.display()))?;
        restrict_permissions(&self.path)
    }

    /// Removing a session that does not exist is not an error.
    pub fn clear(&self) -> Result<(), String> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(format!("failed to remove {}: {e}", self.path.display())),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), String> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .map_err(|e| format!("failed to restrict {}: {e}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), String> {
    Ok(())
}
