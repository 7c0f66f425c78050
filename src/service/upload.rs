use std::fmt;
use std::path::Path;

use crate::error::ApiError;

/// Which ingestion endpoint a file is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Image,
}

impl MediaKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A local file read into memory and ready for a multipart `file` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Media type by file extension, matching what `audio/*` and `image/*`
/// pickers accept.
pub fn detect_mime(path: &Path) -> Option<(MediaKind, &'static str)> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let found = match ext.as_str() {
        "mp3" => (MediaKind::Audio, "audio/mpeg"),
        "wav" => (MediaKind::Audio, "audio/wav"),
        "m4a" | "mp4a" => (MediaKind::Audio, "audio/mp4"),
        "aac" => (MediaKind::Audio, "audio/aac"),
        "ogg" | "oga" => (MediaKind::Audio, "audio/ogg"),
        "opus" => (MediaKind::Audio, "audio/opus"),
        "flac" => (MediaKind::Audio, "audio/flac"),
        "weba" => (MediaKind::Audio, "audio/webm"),
        "png" => (MediaKind::Image, "image/png"),
        "jpg" | "jpeg" => (MediaKind::Image, "image/jpeg"),
        "gif" => (MediaKind::Image, "image/gif"),
        "webp" => (MediaKind::Image, "image/webp"),
        "bmp" => (MediaKind::Image, "image/bmp"),
        "heic" => (MediaKind::Image, "image/heic"),
        "tif" | "tiff" => (MediaKind::Image, "image/tiff"),
        _ => return None,
    };
    Some(found)
}

/// Checks that `path` names a file of the expected kind, without reading it.
pub fn check_kind(path: &Path, expected: MediaKind) -> Result<&'static str, ApiError> {
    match detect_mime(path) {
        Some((kind, mime)) if kind == expected => Ok(mime),
        Some((kind, _)) => Err(ApiError::InvalidInput(format!(
            "{} is an {} file, expected {}",
            path.display(),
            kind,
            expected
        ))),
        None => Err(ApiError::InvalidInput(format!(
            "{} is not a recognised {} file",
            path.display(),
            expected
        ))),
    }
}

pub async fn read_upload(
    path: &Path,
    expected: MediaKind,
    max_bytes: u64,
) -> Result<Upload, ApiError> {
    let mime = check_kind(path, expected)?;
    let size = tokio::fs::metadata(path).await?.len();
    if size > max_bytes {
        return Err(ApiError::InvalidInput(format!(
            "{} is {} bytes, the upload limit is {} bytes",
            path.display(),
            size,
            max_bytes
        )));
    }
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    Ok(Upload {
        file_name,
        mime,
        bytes,
    })
}
