//! Byte-stream handles returned by `openbin`.
//!
//! Reads are served from a buffer downloaded on open; writes accumulate in
//! the same buffer and commit to Drive as one new content version when the
//! handle is closed. A handle that is dropped without `close` discards its
//! buffer; it never commits silently.

use crate::drive_service::drive_client::DriveApi;
use crate::drive_service::drive_models::{DriveFile, FileMetadata};
use crate::errors::{FsError, FsResult};
use crate::fs::info::format_timestamp;
use chrono::Utc;
use log::{debug, warn};
use std::io::SeekFrom;
use std::sync::Arc;

/// Parsed open mode, following the usual r/w/a/x vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenMode {
    pub reading: bool,
    pub writing: bool,
    pub appending: bool,
    pub truncate: bool,
    pub exclusive: bool,
    pub create: bool,
}

impl OpenMode {
    pub fn parse(mode: &str) -> FsResult<Self> {
        let plus = mode.contains('+');
        let base = mode.trim_end_matches(['+', 'b', 't']);
        let parsed = match base {
            "r" => Self {
                reading: true,
                writing: plus,
                appending: false,
                truncate: false,
                exclusive: false,
                create: false,
            },
            "w" => Self {
                reading: plus,
                writing: true,
                appending: false,
                truncate: true,
                exclusive: false,
                create: true,
            },
            "a" => Self {
                reading: plus,
                writing: true,
                appending: true,
                truncate: false,
                exclusive: false,
                create: true,
            },
            "x" => Self {
                reading: plus,
                writing: true,
                appending: false,
                truncate: true,
                exclusive: true,
                create: true,
            },
            _ => return Err(FsError::UnsupportedMode(mode.to_string())),
        };
        Ok(parsed)
    }
}

/// Where a dirty buffer goes on close.
#[derive(Debug)]
enum CommitTarget {
    /// New content version for an existing object.
    Existing(String),
    /// Create a new object under this parent on commit.
    New { parent_id: String, name: String },
}

/// An open byte stream for one Drive file.
pub struct DriveFileHandle {
    client: Arc<dyn DriveApi>,
    path: String,
    mode: OpenMode,
    target: CommitTarget,
    buffer: Vec<u8>,
    pos: usize,
    dirty: bool,
    closed: bool,
}

impl DriveFileHandle {
    /// Handle for an existing object. `initial` is the downloaded content,
    /// already truncated/empty when the mode calls for it.
    pub(crate) fn for_existing(
        client: Arc<dyn DriveApi>,
        path: &str,
        mode: OpenMode,
        file_id: String,
        initial: Vec<u8>,
    ) -> Self {
        let pos = if mode.appending { initial.len() } else { 0 };
        Self {
            client,
            path: path.to_string(),
            mode,
            target: CommitTarget::Existing(file_id),
            buffer: initial,
            pos,
            // a truncating open commits even if nothing else is written
            dirty: mode.truncate,
            closed: false,
        }
    }

    /// Handle for an object that does not exist yet; created on close.
    pub(crate) fn for_new(
        client: Arc<dyn DriveApi>,
        path: &str,
        mode: OpenMode,
        parent_id: String,
        name: String,
    ) -> Self {
        Self {
            client,
            path: path.to_string(),
            mode,
            target: CommitTarget::New { parent_id, name },
            buffer: Vec::new(),
            pos: 0,
            dirty: true, // even an untouched create commits an (empty) file
            closed: false,
        }
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Read from the current position into `buf`, returning the byte count.
    pub fn read(&mut self, buf: &mut [u8]) -> FsResult<usize> {
        if !self.mode.reading {
            return Err(FsError::UnsupportedMode("handle not open for reading".into()));
        }
        let available = self.buffer.len().saturating_sub(self.pos);
        let count = available.min(buf.len());
        buf[..count].copy_from_slice(&self.buffer[self.pos..self.pos + count]);
        self.pos += count;
        Ok(count)
    }

    /// Read everything from the current position to the end.
    pub fn read_to_end(&mut self) -> FsResult<Vec<u8>> {
        if !self.mode.reading {
            return Err(FsError::UnsupportedMode("handle not open for reading".into()));
        }
        let rest = self.buffer[self.pos..].to_vec();
        self.pos = self.buffer.len();
        Ok(rest)
    }

    /// Write at the current position, extending the buffer as needed.
    pub fn write(&mut self, data: &[u8]) -> FsResult<usize> {
        if !self.mode.writing {
            return Err(FsError::UnsupportedMode("handle not open for writing".into()));
        }
        let end = self.pos + data.len();
        if end > self.buffer.len() {
            self.buffer.resize(end, 0);
        }
        self.buffer[self.pos..end].copy_from_slice(data);
        self.pos = end;
        self.dirty = true;
        Ok(data.len())
    }

    pub fn seek(&mut self, from: SeekFrom) -> FsResult<u64> {
        let new_pos = match from {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::End(offset) => self.buffer.len() as i64 + offset,
            SeekFrom::Current(offset) => self.pos as i64 + offset,
        };
        if new_pos < 0 {
            return Err(FsError::OperationFailed {
                path: self.path.clone(),
                msg: "seek before start of stream".to_string(),
            });
        }
        self.pos = new_pos as usize;
        Ok(self.pos as u64)
    }

    /// Close the handle. This is the only point a buffered write commits:
    /// a new object is created or a new content version uploaded.
    pub async fn close(mut self) -> FsResult<Option<DriveFile>> {
        self.closed = true;
        if !(self.mode.writing && self.dirty) {
            return Ok(None);
        }

        let now = format_timestamp(Utc::now());
        let committed = match &self.target {
            CommitTarget::Existing(file_id) => {
                debug!("Committing {} bytes to {}", self.buffer.len(), file_id);
                self.client.update_content(file_id, &self.buffer).await?
            }
            CommitTarget::New { parent_id, name } => {
                debug!(
                    "Creating {} ({} bytes) under {}",
                    name,
                    self.buffer.len(),
                    parent_id
                );
                let metadata = FileMetadata {
                    created_time: Some(now.clone()),
                    modified_time: Some(now),
                    ..FileMetadata::file(name, parent_id)
                };
                self.client.upload_new_file(&metadata, &self.buffer).await?
            }
        };
        Ok(Some(committed))
    }
}

impl Drop for DriveFileHandle {
    fn drop(&mut self) {
        if !self.closed && self.dirty && self.mode.writing {
            warn!(
                "File handle for {} dropped without close; {} buffered bytes discarded",
                self.path,
                self.buffer.len()
            );
        }
    }
}
