//! Serde models for the Drive v3 wire format.

use serde::{Deserialize, Serialize};

/// MIME type Drive uses to mark a folder.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Fallback MIME type for uploaded content.
pub const OCTET_STREAM_MIME_TYPE: &str = "application/octet-stream";

/// Field selector requested on every metadata fetch and listing.
pub const FILE_FIELDS: &str = "id,name,mimeType,size,createdTime,modifiedTime,parents,trashed,shared";

/// DriveFile: one object in the Drive file graph.
///
/// Identity is the opaque `id`; the name is mutable and not unique within a
/// parent. An object may carry zero, one or many parent IDs.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DriveFile {
    #[serde(default)]
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
    // Drive serializes int64 fields as JSON strings
    pub size: Option<String>,
    #[serde(rename = "createdTime")]
    pub created_time: Option<String>,
    #[serde(rename = "modifiedTime")]
    pub modified_time: Option<String>,
    pub parents: Option<Vec<String>>,
    pub trashed: Option<bool>,
    pub shared: Option<bool>,
}

impl DriveFile {
    pub fn is_folder(&self) -> bool {
        self.mime_type.as_deref() == Some(FOLDER_MIME_TYPE)
    }

    pub fn is_trashed(&self) -> bool {
        self.trashed.unwrap_or(false)
    }

    /// Size in bytes. Folders, shortcuts and native Google documents carry
    /// no size at all; those report `None`.
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.as_deref().and_then(|s| s.parse().ok())
    }

    /// The display name. Drive never returns a file without one, but the
    /// field is optional on the wire.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// One page of a child listing plus the continuation token for the next.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct FileListPage {
    #[serde(default)]
    pub files: Vec<DriveFile>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// Create/patch payload for a Drive file. Only the populated fields are
/// serialized; parent changes on PATCH go through the `addParents` /
/// `removeParents` query parameters instead of this body.
#[derive(Debug, Serialize, Clone, Default)]
pub struct FileMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<String>>,
    #[serde(rename = "createdTime", skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    #[serde(rename = "modifiedTime", skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trashed: Option<bool>,
}

impl FileMetadata {
    /// Metadata for a new folder under a single parent.
    pub fn folder(name: &str, parent_id: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            mime_type: Some(FOLDER_MIME_TYPE.to_string()),
            parents: Some(vec![parent_id.to_string()]),
            ..Default::default()
        }
    }

    /// Metadata for a new regular file under a single parent.
    pub fn file(name: &str, parent_id: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            parents: Some(vec![parent_id.to_string()]),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.mime_type.is_none()
            && self.parents.is_none()
            && self.created_time.is_none()
            && self.modified_time.is_none()
            && self.trashed.is_none()
    }
}

/// A sharing permission on a Drive file.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Permission {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub role: String,
    #[serde(rename = "type")]
    pub grantee_type: String,
    #[serde(rename = "emailAddress", skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}

impl Permission {
    /// Permission granting `role` to a single user, or to anyone with the
    /// link when no email is given.
    pub fn for_grantee(role: &str, email: Option<&str>) -> Self {
        match email {
            Some(email) => Self {
                id: String::new(),
                role: role.to_string(),
                grantee_type: "user".to_string(),
                email_address: Some(email.to_string()),
            },
            None => Self {
                id: String::new(),
                role: role.to_string(),
                grantee_type: "anyone".to_string(),
                email_address: None,
            },
        }
    }
}
