//! Path helpers for the filesystem façade.
//!
//! Paths are an external-facing addressing scheme only; they are always
//! resolved to Drive file IDs before any remote call.

use crate::errors::{FsError, FsResult};

/// Characters Drive cannot represent in a name. NUL is rejected outright and
/// `:` is reserved by the hosting filesystem abstraction.
const INVALID_PATH_CHARS: [char; 2] = [':', '\0'];

/// Validate a raw path before any resolution work.
pub fn check_path(path: &str) -> FsResult<()> {
    if path.contains(&INVALID_PATH_CHARS[..]) {
        return Err(FsError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(())
}

/// Split a path into its name segments, ignoring empty segments caused by
/// duplicate or trailing slashes. The root path yields no segments.
pub fn iterate_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Normalize a path to a canonical rooted form without a trailing slash.
pub fn normalize(path: &str) -> String {
    let segments = iterate_path(path);
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// The final name segment of a path. Empty for the root.
pub fn basename(path: &str) -> String {
    iterate_path(path).pop().unwrap_or_default()
}

/// Everything up to (but excluding) the final segment.
pub fn dirname(path: &str) -> String {
    let mut segments = iterate_path(path);
    segments.pop();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Join a parent path and a child name.
pub fn join(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", normalize(parent), name)
    }
}

pub fn is_root(path: &str) -> bool {
    iterate_path(path).is_empty()
}
