//! CLI presentation: text and json formatters per command family.

mod commit;
mod history;
mod proof;
mod shared;

pub use commit::{format_commit_summary, format_revert_report};
pub use history::{format_history_json, format_history_text};
pub use proof::{format_proof_json, format_proof_text, format_verify_report};
pub use shared::format_config;
