//! Commit and revert presentation.

use crate::repository::{CommitSummary, RevertReport};
use owo_colors::OwoColorize;

pub fn format_commit_summary(summary: &CommitSummary) -> String {
    let mut s = format!(
        "{} {}\n  Root hash: {}\n  Files: {}\n  Message: {}",
        "Committed".green().bold(),
        summary.commit_id,
        summary.root_hash,
        summary.file_count,
        summary.message
    );
    if !summary.skipped.is_empty() {
        s.push_str(&format!("\n\nSkipped ({}):", summary.skipped.len()));
        for skipped in &summary.skipped {
            s.push_str(&format!(
                "\n  {} {}: {}",
                "!".yellow(),
                skipped.path.display(),
                skipped.error
            ));
        }
    }
    s
}

pub fn format_revert_report(report: &RevertReport) -> String {
    let mut s = format!(
        "Reverted to {}\n  Restored: {}",
        report.commit_id,
        report.restored.len()
    );
    for filename in &report.restored {
        s.push_str(&format!("\n  {} {}", "✓".green(), filename));
    }
    if !report.failed.is_empty() {
        s.push_str(&format!("\n\nFailed ({}):", report.failed.len()));
        for failure in &report.failed {
            s.push_str(&format!(
                "\n  {} {} ({}): {}",
                "✗".red(),
                failure.filename,
                failure.path.display(),
                failure.error
            ));
        }
    }
    s
}
