//! Path canonicalization and the mapping between file paths and stored keys

use crate::error::StorageError;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a path (resolves symlinks, `..`, `.`)
///
/// The result keeps the exact on-disk name bytes.
pub fn canonicalize_path(path: &Path) -> Result<PathBuf, StorageError> {
    // dunce avoids UNC prefixes on Windows
    dunce::canonicalize(path).map_err(|e| {
        StorageError::InvalidPath(format!(
            "Failed to canonicalize path {}: {}",
            path.display(),
            e
        ))
    })
}

/// Unicode NFC form of a name, used only to match user input against stored keys
///
/// Stored keys are never normalized: they must name the file exactly as it
/// exists on disk.
pub fn nfc(name: &str) -> String {
    name.nfc().collect()
}

fn utf8_name<'a>(name: &'a OsStr, path: &Path) -> Result<&'a str, StorageError> {
    name.to_str().ok_or_else(|| {
        StorageError::InvalidPath(format!(
            "{} is not valid UTF-8",
            path.display()
        ))
    })
}

/// Map a file path to the key it is stored under in a commit
///
/// Files inside `workspace_root` are keyed by their path relative to it,
/// joined with `/`. Files outside keep their canonical absolute path.
/// Relative inputs are resolved against `workspace_root`. Names are kept
/// byte for byte; a path that is not valid UTF-8 has no key.
pub fn to_store_key(path: &Path, workspace_root: &Path) -> Result<String, StorageError> {
    let resolved = if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace_root.join(path)
    };
    let canonical = canonicalize_path(&resolved)?;
    let canonical_root = canonicalize_path(workspace_root)?;

    match canonical.strip_prefix(&canonical_root) {
        Ok(relative) => {
            let mut parts = Vec::new();
            for component in relative.components() {
                if let Component::Normal(name) = component {
                    parts.push(utf8_name(name, path)?);
                }
            }
            if parts.is_empty() {
                return Err(StorageError::InvalidPath(format!(
                    "{} is the workspace root, not a file",
                    path.display()
                )));
            }
            Ok(parts.join("/"))
        }
        Err(_) => Ok(utf8_name(canonical.as_os_str(), path)?.to_string()),
    }
}

/// Resolve a stored key to the path it is restored to
///
/// Relative keys land under `base`. Absolute keys are kept as they are,
/// unless `reroot` is set, in which case their root is dropped and they land
/// under `base` as well. Only normal components are kept, so a key can never
/// climb out of `base` with `..`.
pub fn restore_path(key: &str, base: &Path, reroot: bool) -> PathBuf {
    let key_path = Path::new(key);
    if key_path.is_absolute() && !reroot {
        return key_path.to_path_buf();
    }

    let mut target = base.to_path_buf();
    for component in key_path.components() {
        match component {
            Component::Normal(name) => target.push(name),
            Component::RootDir
            | Component::Prefix(_)
            | Component::CurDir
            | Component::ParentDir => {}
        }
    }
    target
}
