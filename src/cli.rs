//! CLI domain: parse, route, help, output, and presentation only.
//! No snapshot logic; the route table dispatches to the repository.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, OutputFormat};
pub use presentation::{
    format_commit_summary, format_config, format_history_json, format_history_text,
    format_proof_json, format_proof_text, format_revert_report, format_verify_report,
};
pub use route::{CommandOutput, RunContext};
