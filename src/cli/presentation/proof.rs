//! Proof and integrity presentation.

use super::shared::to_json;
use crate::error::ApiError;
use crate::repository::{ProofReport, VerifyReport};
use owo_colors::OwoColorize;

pub fn format_proof_text(report: &ProofReport) -> String {
    let mut s = format!(
        "Inclusion proof for {} in {}\n  Leaf index: {}\n  Leaf hash: {}\n  Root hash: {}\n  Steps ({}):",
        report.filename,
        report.commit_id,
        report.leaf_index,
        report.leaf_hash,
        report.root_hash,
        report.proof.len()
    );
    for (i, step) in report.proof.steps().iter().enumerate() {
        s.push_str(&format!("\n  {}. {} {}", i + 1, step.side, step.sibling));
    }
    let status = if report.verified {
        format!("{}", "verified".green().bold())
    } else {
        format!("{}", "NOT verified".red().bold())
    };
    s.push_str(&format!("\n  Result: {}", status));
    s
}

pub fn format_proof_json(report: &ProofReport) -> Result<String, ApiError> {
    to_json(report)
}

pub fn format_verify_report(report: &VerifyReport) -> String {
    let computed = report
        .computed_root
        .as_ref()
        .map(|h| h.to_string())
        .unwrap_or_else(|| "-".to_string());
    let status = if report.is_intact() {
        format!("{}", "intact".green().bold())
    } else {
        format!("{}", "CORRUPTED".red().bold())
    };
    format!(
        "Commit {}: {}\n  Files: {}\n  Stored root: {}\n  Computed root: {}",
        report.commit_id, status, report.file_count, report.stored_root, computed
    )
}
