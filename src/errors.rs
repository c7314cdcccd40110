//! Error taxonomy for the filesystem layer and the remote Drive client.

use thiserror::Error;

/// Errors reported by the remote Drive API client.
///
/// Transport and API failures are surfaced unmodified; the filesystem layer
/// never retries or reinterprets them.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("access token expired or rejected by the remote service")]
    AuthExpired,

    #[error("remote object not found: {0}")]
    NotFound(String),

    #[error("write rejected by the remote service due to a concurrent mutation: {0}")]
    Conflict(String),

    #[error("Drive API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("transport failure: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        RemoteError::Transport(e.to_string())
    }
}

/// Errors raised by the path-based filesystem contract.
#[derive(Error, Debug)]
pub enum FsError {
    #[error("resource not found: {path}")]
    ResourceNotFound { path: String },

    #[error("a directory was expected at {path}")]
    DirectoryExpected { path: String },

    #[error("a file was expected at {path}")]
    FileExpected { path: String },

    #[error("a file already exists at {path}")]
    FileExists { path: String },

    #[error("a directory already exists at {path}")]
    DirectoryExists { path: String },

    #[error("directory is not empty: {path}")]
    DirectoryNotEmpty { path: String },

    #[error("destination already exists: {path}")]
    DestinationExists { path: String },

    #[error("more than one sibling is named {path}")]
    DuplicateName { path: String },

    #[error("invalid characters in path: {path}")]
    InvalidPath { path: String },

    #[error("the root directory cannot be removed")]
    RemoveRoot,

    #[error("no URL available for {path}: {reason}")]
    NoUrl { path: String, reason: String },

    #[error("unsupported open mode: {0}")]
    UnsupportedMode(String),

    #[error("operation failed on {path}: {msg}")]
    OperationFailed { path: String, msg: String },

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl FsError {
    pub fn not_found(path: &str) -> Self {
        FsError::ResourceNotFound {
            path: path.to_string(),
        }
    }

    pub fn directory_expected(path: &str) -> Self {
        FsError::DirectoryExpected {
            path: path.to_string(),
        }
    }

    pub fn file_expected(path: &str) -> Self {
        FsError::FileExpected {
            path: path.to_string(),
        }
    }

    pub fn file_exists(path: &str) -> Self {
        FsError::FileExists {
            path: path.to_string(),
        }
    }
}

pub type FsResult<T> = Result<T, FsError>;
