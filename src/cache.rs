//! JSON snapshot files on disk.
//!
//! The catalog snapshot is read back as a fallback source and never expires. Review
//! dumps are written one file per app and never read by the server.

use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read cache file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to decode cache file {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode cache data: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to write cache file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Loads a JSON array previously written by [`save`]
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CacheError> {
    let content = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => CacheError::NotFound(path.to_path_buf()),
        _ => CacheError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;

    serde_json::from_slice(&content).map_err(|source| CacheError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `entries` as a pretty-printed JSON array, creating parent directories
pub fn save<T: Serialize>(path: &Path, entries: &[T]) -> Result<(), CacheError> {
    let json = serde_json::to_string_pretty(entries).map_err(CacheError::Encode)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| CacheError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, json).map_err(|source| CacheError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Dump file for the raw reviews of one app
///
/// `app_id` must already be a safe path component (see [`is_valid_path_component`]).
pub fn review_dump_path(dir: &Path, app_id: &str) -> PathBuf {
    dir.join(format!("{}.json", app_id))
}

/// Validates that a path component doesn't contain directory traversal characters
pub fn is_valid_path_component(component: &str) -> bool {
    !component.is_empty()
        && !component.starts_with('.')
        && !component.contains("..")
        && !component.contains('/')
        && !component.contains('\\')
}
