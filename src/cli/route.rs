//! CLI route: single route table and run context. Dispatches to the repository and presentation.

use crate::cli::help::command_name;
use crate::cli::parse::{Commands, OutputFormat};
use crate::cli::presentation::{
    format_commit_summary, format_config, format_history_json, format_history_text,
    format_proof_json, format_proof_text, format_revert_report, format_verify_report,
};
use crate::config::{ConfigLoader, VcsConfig};
use crate::error::ApiError;
use crate::repository::Repository;
use std::path::PathBuf;
use tracing::{info, info_span};

/// Rendered result of a command that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    /// False when the command found a problem: a partial revert, a corrupted
    /// commit or a proof that does not verify
    pub success: bool,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }
}

/// Runtime context for CLI execution: effective config and workspace.
///
/// The repository is opened per command. Only `commit` creates a store.
pub struct RunContext {
    config: VcsConfig,
    workspace_root: PathBuf,
}

impl RunContext {
    /// Create run context from an optional workspace flag and optional config path.
    ///
    /// An explicit workspace wins over `workspace_root` from config, which wins
    /// over the current directory.
    pub fn new(workspace: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let lookup_root = workspace.clone().unwrap_or_else(|| PathBuf::from("."));
        let config = ConfigLoader::resolve(&lookup_root, config_path.as_deref())?;
        let workspace_root = workspace
            .or_else(|| config.workspace_root.clone())
            .unwrap_or(lookup_root);

        Ok(Self {
            config,
            workspace_root,
        })
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        let span = info_span!("command", name = command_name(command));
        let _entered = span.enter();
        let result = self.execute_inner(command);
        info!(
            ok = result.is_ok(),
            success = result.as_ref().map(|o| o.success).unwrap_or(false),
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        match command {
            Commands::Commit { message, paths } => self.handle_commit(message.as_deref(), paths),
            Commands::History { format } => {
                let entries = match self.existing_repository()? {
                    Some(repository) => repository.history()?,
                    None => Vec::new(),
                };
                let text = match format {
                    OutputFormat::Text => format_history_text(&entries),
                    OutputFormat::Json => format_history_json(&entries)?,
                };
                Ok(CommandOutput::ok(text))
            }
            Commands::Revert { commit_id, into } => {
                let repository = self.lookup_repository(commit_id)?;
                let report = match into {
                    Some(dest) => repository.revert_into(commit_id, dest)?,
                    None => repository.revert(commit_id)?,
                };
                Ok(CommandOutput {
                    text: format_revert_report(&report),
                    success: report.is_complete(),
                })
            }
            Commands::Prove {
                commit_id,
                file,
                format,
            } => {
                let report = self.lookup_repository(commit_id)?.prove(commit_id, file)?;
                let text = match format {
                    OutputFormat::Text => format_proof_text(&report),
                    OutputFormat::Json => format_proof_json(&report)?,
                };
                Ok(CommandOutput {
                    text,
                    success: report.verified,
                })
            }
            Commands::Verify { commit_id, tree } => {
                let repository = self.lookup_repository(commit_id)?;
                let report = repository.verify(commit_id)?;
                let mut text = format_verify_report(&report);
                if *tree {
                    let dump = repository.commit_tree(commit_id)?;
                    text.push_str(&format!("\n  Tree:\n{}", indent(&dump.to_string(), 4)));
                }
                Ok(CommandOutput {
                    text,
                    success: report.is_intact(),
                })
            }
            Commands::Config => format_config(&self.config).map(CommandOutput::ok),
        }
    }

    fn handle_commit(
        &self,
        message: Option<&str>,
        paths: &[PathBuf],
    ) -> Result<CommandOutput, ApiError> {
        let repository = Repository::open(&self.workspace_root, &self.config)?;
        let message = message.unwrap_or(&self.config.snapshot.default_message);
        let summary = if paths.is_empty() {
            repository.commit_workspace(message)?
        } else {
            // Relative arguments are relative to where the command runs
            let cwd = std::env::current_dir().map_err(crate::error::StorageError::from)?;
            let absolute: Vec<PathBuf> = paths
                .iter()
                .map(|p| if p.is_absolute() { p.clone() } else { cwd.join(p) })
                .collect();
            repository.commit(&absolute, message)?
        };
        Ok(CommandOutput::ok(format_commit_summary(&summary)))
    }

    fn existing_repository(&self) -> Result<Option<Repository>, ApiError> {
        Repository::open_existing(&self.workspace_root, &self.config)
    }

    /// Repository holding `commit_id`; a missing store means the commit is unknown
    fn lookup_repository(&self, commit_id: &str) -> Result<Repository, ApiError> {
        self.existing_repository()?
            .ok_or_else(|| ApiError::CommitNotFound(commit_id.to_string()))
    }
}

fn indent(text: &str, width: usize) -> String {
    text.lines()
        .map(|line| format!("{:width$}{}", "", line, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}
