//! Shared presentation helpers.

use crate::config::VcsConfig;
use crate::error::{ApiError, StorageError};
use serde::Serialize;

/// Pretty JSON for any report type
pub(super) fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::StorageError(StorageError::Serialization(e.to_string())))
}

pub fn format_config(config: &VcsConfig) -> Result<String, ApiError> {
    config.to_toml()
}
