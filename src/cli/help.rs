//! CLI command-name contract for logging.

use crate::cli::parse::Commands;

/// Command name recorded on the command span (e.g. "commit", "revert").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Commit { .. } => "commit",
        Commands::History { .. } => "history",
        Commands::Revert { .. } => "revert",
        Commands::Prove { .. } => "prove",
        Commands::Verify { .. } => "verify",
        Commands::Config => "config",
    }
}
