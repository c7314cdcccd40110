//! In-memory implementation of the DriveApi trait for integration tests.
//!
//! Keeps a real graph: objects with parent-ID sets, insertion-ordered
//! listings sliced into pages, content bytes. Same-named siblings and
//! trashed objects are representable, matching what the live service
//! permits.

use async_trait::async_trait;
use googledrive_fs::drive_service::drive_client::{DriveApi, ROOT_FILE_ID};
use googledrive_fs::drive_service::drive_models::{
    DriveFile, FileListPage, FileMetadata, Permission, FOLDER_MIME_TYPE,
};
use googledrive_fs::errors::RemoteError;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

const MOCK_TIMESTAMP: &str = "2024-01-01T00:00:00Z";

#[derive(Debug, Clone)]
struct StoredObject {
    file: DriveFile,
    content: Vec<u8>,
}

#[derive(Default)]
struct MockState {
    // insertion order is the service page order
    objects: Vec<StoredObject>,
    next_id: u64,
    next_permission_id: u64,
    fail_operations: HashSet<String>,
    // fail listing after N successful pages, for no-partial-result tests
    fail_listing_after_pages: Option<u32>,
    pages_served: u32,
}

#[derive(Clone)]
pub struct MockDriveClient {
    state: Arc<Mutex<MockState>>,
}

impl MockDriveClient {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Make the named operation fail with a transport error.
    pub fn fail_operation(&self, operation: &str) {
        let mut state = self.state.lock().unwrap();
        state.fail_operations.insert(operation.to_string());
    }

    /// Serve N listing pages, then fail every further page request.
    pub fn fail_listing_after_pages(&self, pages: u32) {
        let mut state = self.state.lock().unwrap();
        state.fail_listing_after_pages = Some(pages);
        state.pages_served = 0;
    }

    /// Insert an object directly, bypassing the API surface. Used to set up
    /// states the façade itself refuses to create, like same-named
    /// siblings.
    pub fn insert_raw(&self, name: &str, parent_id: &str, content: &[u8]) -> String {
        let mut state = self.state.lock().unwrap();
        let id = format!("id-{}", state.next_id);
        state.next_id += 1;
        state.objects.push(StoredObject {
            file: DriveFile {
                id: id.clone(),
                name: Some(name.to_string()),
                mime_type: Some("application/octet-stream".to_string()),
                size: Some(content.len().to_string()),
                created_time: Some(MOCK_TIMESTAMP.to_string()),
                modified_time: Some(MOCK_TIMESTAMP.to_string()),
                parents: Some(vec![parent_id.to_string()]),
                trashed: Some(false),
                shared: Some(false),
            },
            content: content.to_vec(),
        });
        id
    }

    /// Parent IDs currently recorded for an object.
    pub fn parents_of(&self, file_id: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .objects
            .iter()
            .find(|o| o.file.id == file_id)
            .and_then(|o| o.file.parents.clone())
            .unwrap_or_default()
    }

    /// Whether the object still exists in the backing store (trashed or
    /// not). Unreachable objects linger until a real delete.
    pub fn object_exists(&self, file_id: &str) -> bool {
        let state = self.state.lock().unwrap();
        state.objects.iter().any(|o| o.file.id == file_id)
    }

    pub fn is_trashed(&self, file_id: &str) -> bool {
        let state = self.state.lock().unwrap();
        state
            .objects
            .iter()
            .find(|o| o.file.id == file_id)
            .map(|o| o.file.is_trashed())
            .unwrap_or(false)
    }

    fn check_failure(state: &MockState, operation: &str) -> Result<(), RemoteError> {
        if state.fail_operations.contains(operation) {
            return Err(RemoteError::Transport(format!(
                "injected failure in {}",
                operation
            )));
        }
        Ok(())
    }

    fn find(state: &MockState, file_id: &str) -> Result<StoredObject, RemoteError> {
        state
            .objects
            .iter()
            .find(|o| o.file.id == file_id)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(file_id.to_string()))
    }

    fn file_from_metadata(state: &mut MockState, metadata: &FileMetadata) -> DriveFile {
        let id = format!("id-{}", state.next_id);
        state.next_id += 1;
        let is_folder = metadata.mime_type.as_deref() == Some(FOLDER_MIME_TYPE);
        DriveFile {
            id,
            name: metadata.name.clone(),
            mime_type: Some(
                metadata
                    .mime_type
                    .clone()
                    .unwrap_or_else(|| "application/octet-stream".to_string()),
            ),
            size: if is_folder {
                None
            } else {
                Some("0".to_string())
            },
            created_time: Some(
                metadata
                    .created_time
                    .clone()
                    .unwrap_or_else(|| MOCK_TIMESTAMP.to_string()),
            ),
            modified_time: Some(
                metadata
                    .modified_time
                    .clone()
                    .unwrap_or_else(|| MOCK_TIMESTAMP.to_string()),
            ),
            parents: metadata
                .parents
                .clone()
                .or_else(|| Some(vec![ROOT_FILE_ID.to_string()])),
            trashed: Some(false),
            shared: Some(false),
        }
    }
}

#[async_trait]
impl DriveApi for MockDriveClient {
    async fn get_file(&self, file_id: &str) -> Result<DriveFile, RemoteError> {
        let state = self.state.lock().unwrap();
        Self::check_failure(&state, "get_file")?;
        Ok(Self::find(&state, file_id)?.file)
    }

    async fn list_children_page(
        &self,
        parent_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<FileListPage, RemoteError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state, "list_children_page")?;
        if let Some(limit) = state.fail_listing_after_pages {
            if state.pages_served >= limit {
                return Err(RemoteError::Transport(
                    "injected page failure".to_string(),
                ));
            }
            state.pages_served += 1;
        }

        let children: Vec<DriveFile> = state
            .objects
            .iter()
            .filter(|o| {
                o.file
                    .parents
                    .as_ref()
                    .map(|p| p.iter().any(|id| id == parent_id))
                    .unwrap_or(false)
            })
            .map(|o| o.file.clone())
            .collect();

        let offset: usize = page_token.map(|t| t.parse().unwrap_or(0)).unwrap_or(0);
        let end = (offset + page_size as usize).min(children.len());
        let page = children[offset.min(children.len())..end].to_vec();
        let next_page_token = if end < children.len() {
            Some(end.to_string())
        } else {
            None
        };
        Ok(FileListPage {
            files: page,
            next_page_token,
        })
    }

    async fn create_file(&self, metadata: &FileMetadata) -> Result<DriveFile, RemoteError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state, "create_file")?;
        let file = Self::file_from_metadata(&mut state, metadata);
        state.objects.push(StoredObject {
            file: file.clone(),
            content: Vec::new(),
        });
        Ok(file)
    }

    async fn upload_new_file(
        &self,
        metadata: &FileMetadata,
        content: &[u8],
    ) -> Result<DriveFile, RemoteError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state, "upload_new_file")?;
        let mut file = Self::file_from_metadata(&mut state, metadata);
        file.size = Some(content.len().to_string());
        state.objects.push(StoredObject {
            file: file.clone(),
            content: content.to_vec(),
        });
        Ok(file)
    }

    async fn update_content(
        &self,
        file_id: &str,
        content: &[u8],
    ) -> Result<DriveFile, RemoteError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state, "update_content")?;
        let object = state
            .objects
            .iter_mut()
            .find(|o| o.file.id == file_id)
            .ok_or_else(|| RemoteError::NotFound(file_id.to_string()))?;
        object.content = content.to_vec();
        object.file.size = Some(content.len().to_string());
        Ok(object.file.clone())
    }

    async fn patch_file(
        &self,
        file_id: &str,
        metadata: &FileMetadata,
        add_parents: &[String],
        remove_parents: &[String],
    ) -> Result<DriveFile, RemoteError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state, "patch_file")?;
        let object = state
            .objects
            .iter_mut()
            .find(|o| o.file.id == file_id)
            .ok_or_else(|| RemoteError::NotFound(file_id.to_string()))?;

        if let Some(name) = &metadata.name {
            object.file.name = Some(name.clone());
        }
        if let Some(modified) = &metadata.modified_time {
            object.file.modified_time = Some(modified.clone());
        }
        if let Some(created) = &metadata.created_time {
            object.file.created_time = Some(created.clone());
        }
        if let Some(trashed) = metadata.trashed {
            object.file.trashed = Some(trashed);
        }

        let mut parents = object.file.parents.clone().unwrap_or_default();
        parents.retain(|p| !remove_parents.contains(p));
        for parent in add_parents {
            if !parents.contains(parent) {
                parents.push(parent.clone());
            }
        }
        object.file.parents = Some(parents);
        Ok(object.file.clone())
    }

    async fn copy_file(
        &self,
        file_id: &str,
        metadata: &FileMetadata,
    ) -> Result<DriveFile, RemoteError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state, "copy_file")?;
        let source = Self::find(&state, file_id)?;

        let id = format!("id-{}", state.next_id);
        state.next_id += 1;
        let mut file = source.file.clone();
        file.id = id;
        if let Some(name) = &metadata.name {
            file.name = Some(name.clone());
        }
        if let Some(parents) = &metadata.parents {
            file.parents = Some(parents.clone());
        }
        state.objects.push(StoredObject {
            file: file.clone(),
            content: source.content,
        });
        Ok(file)
    }

    async fn download(&self, file_id: &str) -> Result<Vec<u8>, RemoteError> {
        let state = self.state.lock().unwrap();
        Self::check_failure(&state, "download")?;
        Ok(Self::find(&state, file_id)?.content)
    }

    async fn download_range(
        &self,
        file_id: &str,
        start: u64,
        end: u64,
    ) -> Result<Vec<u8>, RemoteError> {
        let state = self.state.lock().unwrap();
        Self::check_failure(&state, "download_range")?;
        let content = Self::find(&state, file_id)?.content;
        let start = start as usize;
        let end = ((end + 1) as usize).min(content.len());
        if start >= content.len() {
            return Ok(Vec::new());
        }
        Ok(content[start..end].to_vec())
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state, "delete_file")?;
        let before = state.objects.len();
        state.objects.retain(|o| o.file.id != file_id);
        if state.objects.len() == before {
            return Err(RemoteError::NotFound(file_id.to_string()));
        }
        Ok(())
    }

    async fn create_permission(
        &self,
        file_id: &str,
        permission: &Permission,
    ) -> Result<Permission, RemoteError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state, "create_permission")?;
        let permission_id = format!("perm-{}", state.next_permission_id);
        state.next_permission_id += 1;
        let object = state
            .objects
            .iter_mut()
            .find(|o| o.file.id == file_id)
            .ok_or_else(|| RemoteError::NotFound(file_id.to_string()))?;
        object.file.shared = Some(true);
        Ok(Permission {
            id: permission_id,
            ..permission.clone()
        })
    }
}
