//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::NothingToCommit => "Nothing to commit.".to_string(),
        other => format!("Error: {}", other),
    }
}
