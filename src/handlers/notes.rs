use std::sync::Arc;

use crate::handlers::task_list::ItemOutcome;
use crate::models::note::Note;
use crate::service::api_service::NoteApi;
use crate::service::feedback::{Confirmer, Notifier};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this note?";

fn preview(content: &str, max_chars: usize) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

pub fn render_note_list(notes: &[Note]) -> String {
    if notes.is_empty() {
        return "No notes yet".to_string();
    }
    let mut body = String::new();
    for note in notes {
        let title = note.title.as_deref().unwrap_or("Untitled");
        body.push_str(&format!(
            "[{}] {}  {}  #{}\n      {}\n",
            note.source_type,
            title,
            note.created_at.format("%Y-%m-%d %H:%M"),
            note.id,
            preview(&note.content, 72)
        ));
    }
    body.trim_end().to_string()
}

pub fn render_note(note: &Note) -> String {
    let mut body = format!(
        "{} ({})\nCreated: {}\n",
        note.title.as_deref().unwrap_or("Untitled"),
        note.source_type,
        note.created_at.to_rfc3339()
    );
    if let Some(url) = &note.media_url {
        body.push_str(&format!("Media: {}\n", url));
    }
    body.push_str(&format!("\n{}\n", note.content.trim()));
    if let Some(transcription) = note.transcription.as_deref().filter(|t| !t.is_empty()) {
        body.push_str(&format!("\nTranscription:\n{}\n", transcription.trim()));
    }
    if !note.extracted_tasks.is_empty() {
        body.push_str(&format!("\nExtracted tasks ({}):\n", note.extracted_tasks.len()));
        for task in &note.extracted_tasks {
            let title = task
                .get("title")
                .and_then(|v| v.as_str())
                .unwrap_or("(untitled)");
            body.push_str(&format!("  - {}\n", title));
        }
    }
    body.trim_end().to_string()
}

/// Same confirmation rule as task deletion.
pub async fn delete_note(
    api: Arc<dyn NoteApi>,
    notifier: Arc<dyn Notifier>,
    confirmer: Arc<dyn Confirmer>,
    id: &str,
) -> ItemOutcome {
    if !confirmer.confirm(DELETE_PROMPT) {
        return ItemOutcome::Cancelled;
    }
    match api.delete_note(id).await {
        Ok(()) => {
            log::info!("event=note_deleted note_id={}", id);
            notifier.success("Note deleted");
            ItemOutcome::Deleted
        }
        Err(err) => {
            log::warn!("event=note_delete_failed note_id={} error={}", id, err);
            notifier.error("Failed to delete note");
            ItemOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_flattens_and_truncates() {
        assert_eq!(preview("buy\n  milk", 20), "buy milk");
        assert_eq!(preview("abcdef ghij", 6), "abcdef...");
    }
}
