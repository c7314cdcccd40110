//! Typed client for the Drive v3 API.
//!
//! [`DriveApi`] is the outbound contract the filesystem façade composes:
//! metadata fetch by ID, paginated child listing, create/update/copy,
//! content transfer and delete. [`DriveClient`] implements it over REST;
//! tests substitute an in-memory implementation.

use crate::drive_service::auth::TokenProvider;
use crate::drive_service::drive_models::{
    DriveFile, FileListPage, FileMetadata, Permission, FILE_FIELDS, OCTET_STREAM_MIME_TYPE,
};
use crate::drive_service::http_client::HttpClient;
use crate::errors::RemoteError;
use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

/// Alias for the canonical Drive root container.
pub const ROOT_FILE_ID: &str = "root";

/// Interface to the remote Drive service.
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// Fetch one file's metadata by ID.
    async fn get_file(&self, file_id: &str) -> Result<DriveFile, RemoteError>;

    /// Fetch one page of a container's children. Trashed children are
    /// included; callers filter them.
    async fn list_children_page(
        &self,
        parent_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<FileListPage, RemoteError>;

    /// Create a folder or a metadata-only (empty) file.
    async fn create_file(&self, metadata: &FileMetadata) -> Result<DriveFile, RemoteError>;

    /// Create a file and upload its content.
    async fn upload_new_file(
        &self,
        metadata: &FileMetadata,
        content: &[u8],
    ) -> Result<DriveFile, RemoteError>;

    /// Replace an existing file's content with a new version.
    async fn update_content(&self, file_id: &str, content: &[u8])
        -> Result<DriveFile, RemoteError>;

    /// Patch metadata and/or parent linkage in a single call. Parent changes
    /// are atomic: the service applies additions and removals together.
    async fn patch_file(
        &self,
        file_id: &str,
        metadata: &FileMetadata,
        add_parents: &[String],
        remove_parents: &[String],
    ) -> Result<DriveFile, RemoteError>;

    /// Server-side copy with new name/parents.
    async fn copy_file(
        &self,
        file_id: &str,
        metadata: &FileMetadata,
    ) -> Result<DriveFile, RemoteError>;

    /// Download the full content of a file.
    async fn download(&self, file_id: &str) -> Result<Vec<u8>, RemoteError>;

    /// Download an inclusive byte range of a file.
    async fn download_range(
        &self,
        file_id: &str,
        start: u64,
        end: u64,
    ) -> Result<Vec<u8>, RemoteError>;

    /// Permanently delete a file.
    async fn delete_file(&self, file_id: &str) -> Result<(), RemoteError>;

    /// Create a sharing permission on a file.
    async fn create_permission(
        &self,
        file_id: &str,
        permission: &Permission,
    ) -> Result<Permission, RemoteError>;
}

/// REST implementation of [`DriveApi`].
pub struct DriveClient {
    http_client: HttpClient,
    token_provider: Arc<dyn TokenProvider>,
}

impl DriveClient {
    pub fn new(token_provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            http_client: HttpClient::new(),
            token_provider,
        }
    }

    /// Authorization header with a currently-valid token.
    async fn auth_header(&self) -> Result<String, RemoteError> {
        let token = self.token_provider.access_token().await?;
        Ok(format!("Bearer {}", token))
    }

    /// Children query: direct children of `parent_id`, trash included so the
    /// caller decides how to treat it.
    fn children_query(parent_id: &str) -> String {
        format!("'{}' in parents", parent_id.replace('\'', "\\'"))
    }
}

#[async_trait]
impl DriveApi for DriveClient {
    async fn get_file(&self, file_id: &str) -> Result<DriveFile, RemoteError> {
        let auth_header = self.auth_header().await?;
        let url = format!("/files/{}?fields={}", file_id, FILE_FIELDS);
        self.http_client.get_json(&url, &auth_header).await
    }

    async fn list_children_page(
        &self,
        parent_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<FileListPage, RemoteError> {
        let auth_header = self.auth_header().await?;
        let query = urlencoding::encode(&Self::children_query(parent_id)).into_owned();
        let mut url = format!(
            "/files?q={}&pageSize={}&fields=nextPageToken,files({})",
            query, page_size, FILE_FIELDS
        );
        if let Some(token) = page_token {
            url.push_str(&format!("&pageToken={}", urlencoding::encode(token)));
        }

        debug!("Listing children of {} (token: {:?})", parent_id, page_token);
        self.http_client.get_json(&url, &auth_header).await
    }

    async fn create_file(&self, metadata: &FileMetadata) -> Result<DriveFile, RemoteError> {
        let auth_header = self.auth_header().await?;
        let url = format!("/files?fields={}", FILE_FIELDS);

        let file: DriveFile = self
            .http_client
            .post_json(&url, metadata, &auth_header)
            .await?;
        info!(
            "Created {} -> {}",
            metadata.name.as_deref().unwrap_or(""),
            file.id
        );
        Ok(file)
    }

    async fn upload_new_file(
        &self,
        metadata: &FileMetadata,
        content: &[u8],
    ) -> Result<DriveFile, RemoteError> {
        // Two-step create: metadata first, then content as a media upload.
        let created = self.create_file(metadata).await?;
        if content.is_empty() {
            return Ok(created);
        }
        self.update_content(&created.id, content).await
    }

    async fn update_content(
        &self,
        file_id: &str,
        content: &[u8],
    ) -> Result<DriveFile, RemoteError> {
        let auth_header = self.auth_header().await?;
        let url = format!("/files/{}?uploadType=media&fields={}", file_id, FILE_FIELDS);

        let file: DriveFile = self
            .http_client
            .upload_media(&url, content, OCTET_STREAM_MIME_TYPE, &auth_header)
            .await?;
        info!("Uploaded {} bytes to {}", content.len(), file_id);
        Ok(file)
    }

    async fn patch_file(
        &self,
        file_id: &str,
        metadata: &FileMetadata,
        add_parents: &[String],
        remove_parents: &[String],
    ) -> Result<DriveFile, RemoteError> {
        let auth_header = self.auth_header().await?;
        let mut url = format!("/files/{}?fields={}", file_id, FILE_FIELDS);
        if !add_parents.is_empty() {
            url.push_str(&format!(
                "&addParents={}",
                urlencoding::encode(&add_parents.join(","))
            ));
        }
        if !remove_parents.is_empty() {
            url.push_str(&format!(
                "&removeParents={}",
                urlencoding::encode(&remove_parents.join(","))
            ));
        }

        let file: DriveFile = self
            .http_client
            .patch_json(&url, metadata, &auth_header)
            .await?;
        info!(
            "Patched {} (add parents: {:?}, remove parents: {:?})",
            file_id, add_parents, remove_parents
        );
        Ok(file)
    }

    async fn copy_file(
        &self,
        file_id: &str,
        metadata: &FileMetadata,
    ) -> Result<DriveFile, RemoteError> {
        let auth_header = self.auth_header().await?;
        let url = format!("/files/{}/copy?fields={}", file_id, FILE_FIELDS);

        let file: DriveFile = self
            .http_client
            .post_json(&url, metadata, &auth_header)
            .await?;
        info!("Copied {} -> {}", file_id, file.id);
        Ok(file)
    }

    async fn download(&self, file_id: &str) -> Result<Vec<u8>, RemoteError> {
        let auth_header = self.auth_header().await?;
        let url = format!("/files/{}?alt=media", file_id);
        self.http_client.get_bytes(&url, &auth_header, None).await
    }

    async fn download_range(
        &self,
        file_id: &str,
        start: u64,
        end: u64,
    ) -> Result<Vec<u8>, RemoteError> {
        let auth_header = self.auth_header().await?;
        let url = format!("/files/{}?alt=media", file_id);
        self.http_client
            .get_bytes(&url, &auth_header, Some((start, end)))
            .await
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), RemoteError> {
        let auth_header = self.auth_header().await?;
        let url = format!("/files/{}", file_id);
        self.http_client.delete(&url, &auth_header).await?;
        info!("Deleted {}", file_id);
        Ok(())
    }

    async fn create_permission(
        &self,
        file_id: &str,
        permission: &Permission,
    ) -> Result<Permission, RemoteError> {
        let auth_header = self.auth_header().await?;
        let url = format!("/files/{}/permissions", file_id);
        self.http_client
            .post_json(&url, permission, &auth_header)
            .await
    }
}
