//! CLI parse: clap types for mvcs. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// mvcs - Content-addressable snapshots over Merkle trees
#[derive(Parser)]
#[command(name = "mvcs")]
#[command(version)]
#[command(about = "Content-addressable file snapshots identified by Merkle roots")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (default: `workspace_root` from config, then ".")
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Snapshot files (the whole workspace when no paths are given)
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: Option<String>,
        /// Files to snapshot
        paths: Vec<PathBuf>,
    },
    /// List commits, oldest first
    History {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Restore the files of a commit
    Revert {
        /// Full commit ID
        commit_id: String,
        /// Restore into this directory instead of the original locations
        #[arg(long)]
        into: Option<PathBuf>,
    },
    /// Show the inclusion proof of a file in a commit
    Prove {
        /// Full commit ID
        commit_id: String,
        /// Stored filename or path of the file
        file: String,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Check that a commit's contents still hash to its root
    Verify {
        /// Full commit ID
        commit_id: String,
        /// Also print the rebuilt Merkle tree
        #[arg(long)]
        tree: bool,
    },
    /// Print the effective configuration
    Config,
}
