//! History presentation.

use super::shared::to_json;
use crate::error::ApiError;
use crate::store::CommitEntry;
use comfy_table::Table;

pub fn format_history_text(entries: &[CommitEntry]) -> String {
    if entries.is_empty() {
        return "No commits found.".to_string();
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Commit ID", "Timestamp", "Files", "Root Hash", "Message"]);
    for entry in entries {
        table.add_row(vec![
            entry.commit_id.to_string(),
            entry.timestamp.clone(),
            entry.file_count.to_string(),
            entry.root_hash.short(12).to_string(),
            entry.message.clone(),
        ]);
    }
    table.to_string()
}

pub fn format_history_json(entries: &[CommitEntry]) -> Result<String, ApiError> {
    to_json(&entries)
}
