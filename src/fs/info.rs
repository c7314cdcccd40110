//! Metadata mapper: Drive wire records to the generic info schema and back.

use crate::drive_service::drive_models::{DriveFile, FileMetadata};
use chrono::{DateTime, SecondsFormat, Utc};

/// Kind of a filesystem resource. Everything that is not a Drive folder is
/// reported as a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    File,
    Directory,
}

/// Generic metadata for one object, as seen through the path contract.
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    /// Remote object ID. Stable across rename and move.
    pub id: String,
    pub name: String,
    pub resource_type: ResourceType,
    /// Content size in bytes. `None` for directories and for size-less
    /// items such as shortcuts and native Google documents.
    pub size: Option<u64>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub mime_type: Option<String>,
    pub shared: bool,
}

impl ObjectInfo {
    pub fn is_dir(&self) -> bool {
        self.resource_type == ResourceType::Directory
    }

    pub fn is_file(&self) -> bool {
        self.resource_type == ResourceType::File
    }
}

/// Metadata changes applied through `setinfo`, mapped back onto a remote
/// patch payload.
#[derive(Debug, Clone, Default)]
pub struct InfoPatch {
    pub name: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

impl InfoPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.created.is_none() && self.modified.is_none()
    }
}

/// Map one Drive record into the generic schema.
pub fn info_from_file(file: &DriveFile) -> ObjectInfo {
    let is_folder = file.is_folder();
    ObjectInfo {
        id: file.id.clone(),
        name: file.display_name().to_string(),
        resource_type: if is_folder {
            ResourceType::Directory
        } else {
            ResourceType::File
        },
        size: if is_folder { None } else { file.size_bytes() },
        created: parse_timestamp(file.created_time.as_deref()),
        modified: parse_timestamp(file.modified_time.as_deref()),
        mime_type: file.mime_type.clone(),
        shared: file.shared.unwrap_or(false),
    }
}

/// Synthetic info for the filesystem root, which has no backing record of
/// its own in the path contract.
pub fn root_info(root_id: &str) -> ObjectInfo {
    ObjectInfo {
        id: root_id.to_string(),
        name: String::new(),
        resource_type: ResourceType::Directory,
        size: None,
        created: None,
        modified: None,
        mime_type: None,
        shared: false,
    }
}

/// Map a `setinfo` patch onto the remote update payload.
pub fn patch_to_metadata(patch: &InfoPatch) -> FileMetadata {
    FileMetadata {
        name: patch.name.clone(),
        created_time: patch.created.map(format_timestamp),
        modified_time: patch.modified.map(format_timestamp),
        ..Default::default()
    }
}

/// RFC 3339 without fractional seconds; Drive rejects the fractional part.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
