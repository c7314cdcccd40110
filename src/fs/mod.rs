//! Filesystem operations façade over the Drive file graph.
//!
//! Paths in, IDs out: every operation resolves its path arguments through
//! the [`resolver`], talks to the remote service by ID only, and maps
//! metadata through [`info`]. Validation happens before any mutating remote
//! call; unavoidable check-then-act races surface as remote conflicts.

pub mod file_handle;
pub mod info;
pub mod paginator;
pub mod resolver;

use crate::config::{DeletePolicy, DriveFsConfig};
use crate::drive_service::drive_client::{DriveApi, ROOT_FILE_ID};
use crate::drive_service::drive_models::{DriveFile, FileMetadata, Permission};
use crate::errors::{FsError, FsResult};
use crate::path_utils;
use file_handle::{DriveFileHandle, OpenMode};
use info::{info_from_file, patch_to_metadata, root_info, InfoPatch, ObjectInfo};
use log::info;
use paginator::ListingPaginator;
use resolver::{PathResolver, ResolvedLocation};
use std::sync::Arc;

const SHARING_URL: &str = "https://drive.google.com/open?id=";
const SHARING_ROLES: [&str; 6] = [
    "reader",
    "writer",
    "commenter",
    "fileOrganizer",
    "organizer",
    "owner",
];

/// A hierarchical filesystem view of a Drive account (or a designated
/// subdirectory of it).
///
/// Drive itself is a graph: objects are addressed by ID, may carry several
/// parents and may share a name with a sibling. This façade exposes the
/// conventional path contract on top and keeps all graph handling behind
/// the resolver. The façade holds no state besides configuration and the
/// root ID, so it is safe to share across tasks; consistency under
/// concurrent external writers is whatever the remote service guarantees.
pub struct GoogleDriveFs {
    client: Arc<dyn DriveApi>,
    config: DriveFsConfig,
    paginator: ListingPaginator,
    root_id: String,
}

impl GoogleDriveFs {
    /// Filesystem rooted at the Drive root container.
    pub fn new(client: Arc<dyn DriveApi>, config: DriveFsConfig) -> Self {
        let paginator = ListingPaginator::new(client.clone(), config.page_size);
        Self {
            client,
            config,
            paginator,
            root_id: ROOT_FILE_ID.to_string(),
        }
    }

    /// Filesystem whose `/` is an existing subdirectory of the Drive root.
    pub async fn with_root_path(
        client: Arc<dyn DriveApi>,
        config: DriveFsConfig,
        root_path: &str,
    ) -> FsResult<Self> {
        let fs = Self::new(client, config);
        let location = fs.resolver().resolve_existing(root_path).await?;
        match location {
            ResolvedLocation::Root => Ok(fs),
            ResolvedLocation::Existing { file, .. } => {
                if !file.is_folder() {
                    return Err(FsError::directory_expected(root_path));
                }
                info!("Rooting filesystem at {} ({})", root_path, file.id);
                Ok(Self {
                    root_id: file.id,
                    ..fs
                })
            }
            ResolvedLocation::Missing { .. } => Err(FsError::not_found(root_path)),
        }
    }

    fn resolver(&self) -> PathResolver<'_> {
        PathResolver::new(&self.paginator, &self.root_id, self.config.duplicate_policy)
    }

    /// Make an object unreachable according to the configured policy.
    async fn delete_by_policy(&self, file_id: &str) -> FsResult<()> {
        match self.config.delete_policy {
            DeletePolicy::Delete => self.client.delete_file(file_id).await?,
            DeletePolicy::Trash => {
                let trash = FileMetadata {
                    trashed: Some(true),
                    ..Default::default()
                };
                self.client.patch_file(file_id, &trash, &[], &[]).await?;
            }
        }
        Ok(())
    }

    // ---- metadata -------------------------------------------------------

    /// Metadata for the object at `path`.
    pub async fn getinfo(&self, path: &str) -> FsResult<ObjectInfo> {
        path_utils::check_path(path)?;
        match self.resolver().resolve_existing(path).await? {
            ResolvedLocation::Root => Ok(root_info(&self.root_id)),
            ResolvedLocation::Existing { file, .. } => Ok(info_from_file(&file)),
            ResolvedLocation::Missing { .. } => Err(FsError::not_found(path)),
        }
    }

    /// Apply a metadata patch (rename, timestamps) to the object at `path`.
    pub async fn setinfo(&self, path: &str, patch: &InfoPatch) -> FsResult<()> {
        path_utils::check_path(path)?;
        let (file, _) = self
            .resolver()
            .resolve_existing(path)
            .await?
            .into_existing(path)?;
        if patch.is_empty() {
            return Ok(());
        }
        self.client
            .patch_file(&file.id, &patch_to_metadata(patch), &[], &[])
            .await?;
        Ok(())
    }

    // ---- listing --------------------------------------------------------

    /// Names of all children of the directory at `path`, fully
    /// materialized across listing pages, in service order.
    pub async fn listdir(&self, path: &str) -> FsResult<Vec<String>> {
        Ok(self
            .scandir(path)
            .await?
            .into_iter()
            .map(|info| info.name)
            .collect())
    }

    /// Full child metadata in one pass; listing already carries it, so
    /// callers walking a tree avoid one `getinfo` per entry.
    pub async fn scandir(&self, path: &str) -> FsResult<Vec<ObjectInfo>> {
        path_utils::check_path(path)?;
        let container_id = self.directory_id(path).await?;
        let children = self.paginator.list_all(&container_id).await?;
        Ok(children.iter().map(info_from_file).collect())
    }

    /// Resolve `path` to a directory ID, failing `DirectoryExpected` on a
    /// file.
    async fn directory_id(&self, path: &str) -> FsResult<String> {
        match self.resolver().resolve_existing(path).await? {
            ResolvedLocation::Root => Ok(self.root_id.clone()),
            ResolvedLocation::Existing { file, .. } => {
                if !file.is_folder() {
                    return Err(FsError::directory_expected(path));
                }
                Ok(file.id)
            }
            ResolvedLocation::Missing { .. } => Err(FsError::not_found(path)),
        }
    }

    // ---- directories ----------------------------------------------------

    /// Create a directory. With `recreate` an existing directory at the
    /// path is accepted instead of failing `DirectoryExists`.
    pub async fn makedir(&self, path: &str, recreate: bool) -> FsResult<()> {
        path_utils::check_path(path)?;
        info!("makedir: {} (recreate: {})", path, recreate);

        match self.resolver().resolve(path).await? {
            ResolvedLocation::Root => {
                if recreate {
                    Ok(())
                } else {
                    Err(FsError::DirectoryExists {
                        path: path.to_string(),
                    })
                }
            }
            ResolvedLocation::Existing { file, .. } => {
                if recreate && file.is_folder() {
                    return Ok(());
                }
                Err(FsError::DirectoryExists {
                    path: path.to_string(),
                })
            }
            ResolvedLocation::Missing { parent_id, name } => {
                self.client
                    .create_file(&FileMetadata::folder(&name, &parent_id))
                    .await?;
                Ok(())
            }
        }
    }

    /// Create a directory and any missing ancestors.
    pub async fn makedirs(&self, path: &str, recreate: bool) -> FsResult<()> {
        path_utils::check_path(path)?;
        if path_utils::is_root(path) {
            return self.makedir(path, recreate).await;
        }
        let segments = path_utils::iterate_path(path);
        let mut walked = String::new();
        for (index, segment) in segments.iter().enumerate() {
            walked.push('/');
            walked.push_str(segment);
            let is_last = index == segments.len() - 1;
            match self.makedir(&walked, recreate || !is_last).await {
                Ok(()) => {}
                Err(FsError::DirectoryExists { .. }) if !is_last => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Remove an empty directory.
    pub async fn removedir(&self, path: &str) -> FsResult<()> {
        path_utils::check_path(path)?;
        if path_utils::is_root(path) {
            return Err(FsError::RemoveRoot);
        }
        info!("removedir: {}", path);

        let (file, _) = self
            .resolver()
            .resolve_existing(path)
            .await?
            .into_existing(path)?;
        if !file.is_folder() {
            return Err(FsError::directory_expected(path));
        }
        let children = self.paginator.list_all(&file.id).await?;
        if !children.is_empty() {
            return Err(FsError::DirectoryNotEmpty {
                path: path.to_string(),
            });
        }
        self.delete_by_policy(&file.id).await
    }

    // ---- files ----------------------------------------------------------

    /// Open a byte stream on the file at `path`.
    ///
    /// Read modes preload the content; write modes buffer locally and
    /// commit one new content version when the returned handle is closed.
    pub async fn openbin(&self, path: &str, mode: &str) -> FsResult<DriveFileHandle> {
        path_utils::check_path(path)?;
        let mode = OpenMode::parse(mode)?;
        info!("openbin: {} ({:?})", path, mode);

        match self.resolver().resolve(path).await? {
            ResolvedLocation::Root => Err(FsError::file_expected(path)),
            ResolvedLocation::Existing { file, .. } => {
                if mode.exclusive {
                    return Err(FsError::file_exists(path));
                }
                if file.is_folder() {
                    return Err(FsError::file_expected(path));
                }
                let initial = if mode.truncate || !(mode.reading || mode.appending) {
                    Vec::new()
                } else {
                    self.client.download(&file.id).await?
                };
                Ok(DriveFileHandle::for_existing(
                    self.client.clone(),
                    path,
                    mode,
                    file.id,
                    initial,
                ))
            }
            ResolvedLocation::Missing { parent_id, name } => {
                if !mode.create {
                    return Err(FsError::not_found(path));
                }
                Ok(DriveFileHandle::for_new(
                    self.client.clone(),
                    path,
                    mode,
                    parent_id,
                    name,
                ))
            }
        }
    }

    /// Full content of the file at `path`.
    pub async fn readbytes(&self, path: &str) -> FsResult<Vec<u8>> {
        path_utils::check_path(path)?;
        let (file, _) = self
            .resolver()
            .resolve_existing(path)
            .await?
            .into_existing(path)?;
        if file.is_folder() {
            return Err(FsError::file_expected(path));
        }
        Ok(self.client.download(&file.id).await?)
    }

    /// A byte range of the file at `path` (inclusive bounds).
    pub async fn readrange(&self, path: &str, start: u64, end: u64) -> FsResult<Vec<u8>> {
        path_utils::check_path(path)?;
        let (file, _) = self
            .resolver()
            .resolve_existing(path)
            .await?
            .into_existing(path)?;
        if file.is_folder() {
            return Err(FsError::file_expected(path));
        }
        Ok(self.client.download_range(&file.id, start, end).await?)
    }

    /// Replace (or create) the file at `path` with `data`.
    pub async fn writebytes(&self, path: &str, data: &[u8]) -> FsResult<()> {
        let mut handle = self.openbin(path, "w").await?;
        handle.write(data)?;
        handle.close().await?;
        Ok(())
    }

    /// Remove a file. Directories fail `FileExpected`; use `removedir`.
    pub async fn remove(&self, path: &str) -> FsResult<()> {
        path_utils::check_path(path)?;
        if path_utils::is_root(path) {
            return Err(FsError::RemoveRoot);
        }
        info!("remove: {}", path);

        let (file, _) = self
            .resolver()
            .resolve_existing(path)
            .await?
            .into_existing(path)?;
        if file.is_folder() {
            return Err(FsError::file_expected(path));
        }
        self.delete_by_policy(&file.id).await
    }

    // ---- move / copy ----------------------------------------------------

    /// Move a file to a new path, relinking parents and renaming in a
    /// single remote call so a failure never strands the object between
    /// containers.
    pub async fn move_file(&self, src_path: &str, dst_path: &str, overwrite: bool) -> FsResult<()> {
        path_utils::check_path(src_path)?;
        path_utils::check_path(dst_path)?;
        info!("move: {} -> {} (overwrite: {})", src_path, dst_path, overwrite);

        let (dst_parent_id, dst_name, dst_existing) =
            self.destination(dst_path, overwrite).await?;

        let (src_file, src_parent_id) = self
            .resolver()
            .resolve_existing(src_path)
            .await?
            .into_existing(src_path)?;
        if src_file.is_folder() {
            return Err(FsError::file_expected(src_path));
        }

        if let Some(existing) = dst_existing {
            // the destination is the source itself; deleting it would
            // destroy the file before the relink patch
            if existing.id == src_file.id {
                return Ok(());
            }
            self.delete_by_policy(&existing.id).await?;
        }

        let rename = FileMetadata {
            name: Some(dst_name),
            ..Default::default()
        };
        self.client
            .patch_file(
                &src_file.id,
                &rename,
                &[dst_parent_id],
                &[src_parent_id],
            )
            .await?;
        Ok(())
    }

    /// Server-side copy of a file to a new path. The copy is a distinct
    /// object with its own ID.
    pub async fn copy_file(&self, src_path: &str, dst_path: &str, overwrite: bool) -> FsResult<()> {
        path_utils::check_path(src_path)?;
        path_utils::check_path(dst_path)?;
        info!("copy: {} -> {} (overwrite: {})", src_path, dst_path, overwrite);

        let (dst_parent_id, dst_name, dst_existing) =
            self.destination(dst_path, overwrite).await?;

        let (src_file, _) = self
            .resolver()
            .resolve_existing(src_path)
            .await?
            .into_existing(src_path)?;
        if src_file.is_folder() {
            return Err(FsError::file_expected(src_path));
        }

        if let Some(existing) = dst_existing {
            // copying onto itself would delete the source before the copy
            if existing.id == src_file.id {
                return Ok(());
            }
            self.delete_by_policy(&existing.id).await?;
        }

        let metadata = FileMetadata {
            name: Some(dst_name),
            parents: Some(vec![dst_parent_id]),
            ..Default::default()
        };
        self.client.copy_file(&src_file.id, &metadata).await?;
        Ok(())
    }

    /// Resolve a destination path for move/copy: parent ID, final name and
    /// whichever object already occupies the destination (only returned
    /// when `overwrite` allows replacing it).
    async fn destination(
        &self,
        dst_path: &str,
        overwrite: bool,
    ) -> FsResult<(String, String, Option<DriveFile>)> {
        match self.resolver().resolve(dst_path).await? {
            ResolvedLocation::Root => Err(FsError::DestinationExists {
                path: dst_path.to_string(),
            }),
            ResolvedLocation::Existing { file, parent_id } => {
                if !overwrite {
                    return Err(FsError::DestinationExists {
                        path: dst_path.to_string(),
                    });
                }
                if file.is_folder() {
                    return Err(FsError::file_expected(dst_path));
                }
                Ok((parent_id, file.display_name().to_string(), Some(file)))
            }
            ResolvedLocation::Missing { parent_id, name } => Ok((parent_id, name, None)),
        }
    }

    // ---- multi-parent extension -----------------------------------------

    /// Link the object at `path` into a second container without touching
    /// its existing parents. Afterwards the same object, same ID and same
    /// content, is reachable through both paths.
    pub async fn add_parent(&self, path: &str, container_path: &str) -> FsResult<()> {
        path_utils::check_path(path)?;
        path_utils::check_path(container_path)?;
        info!("add_parent: {} -> {}", path, container_path);

        let (file, _) = self
            .resolver()
            .resolve_existing(path)
            .await?
            .into_existing(path)?;

        let container_id = match self.resolver().resolve_existing(container_path).await? {
            ResolvedLocation::Root => self.root_id.clone(),
            ResolvedLocation::Existing { file: container, .. } => {
                if !container.is_folder() {
                    return Err(FsError::directory_expected(container_path));
                }
                container.id
            }
            ResolvedLocation::Missing { .. } => return Err(FsError::not_found(container_path)),
        };

        // Same collision policy as makedir: one name, one child.
        if self
            .resolver()
            .child_by_name(&container_id, file.display_name(), container_path)
            .await?
            .is_some()
        {
            return Err(FsError::file_exists(&path_utils::join(
                container_path,
                file.display_name(),
            )));
        }

        self.client
            .patch_file(
                &file.id,
                &FileMetadata::default(),
                &[container_id],
                &[],
            )
            .await?;
        Ok(())
    }

    /// Unlink the object at `path` from the parent the path implies. Other
    /// parents keep their linkage; removing the last one makes the object
    /// unreachable through any path.
    pub async fn remove_parent(&self, path: &str) -> FsResult<()> {
        path_utils::check_path(path)?;
        if path_utils::is_root(path) {
            return Err(FsError::RemoveRoot);
        }
        info!("remove_parent: {}", path);

        let (file, parent_id) = self
            .resolver()
            .resolve_existing(path)
            .await?
            .into_existing(path)?;
        self.client
            .patch_file(&file.id, &FileMetadata::default(), &[], &[parent_id])
            .await?;
        Ok(())
    }

    // ---- sharing --------------------------------------------------------

    /// Share the object at `path` and return its sharing URL. With an
    /// email the grant goes to that user; without one, to anyone with the
    /// link.
    pub async fn share(&self, path: &str, role: &str, email: Option<&str>) -> FsResult<String> {
        path_utils::check_path(path)?;
        if !SHARING_ROLES.contains(&role) {
            return Err(FsError::OperationFailed {
                path: path.to_string(),
                msg: format!("unknown sharing role: {}", role),
            });
        }
        let (file, _) = self
            .resolver()
            .resolve_existing(path)
            .await?
            .into_existing(path)?;
        self.client
            .create_permission(&file.id, &Permission::for_grantee(role, email))
            .await?;
        Ok(format!("{}{}", SHARING_URL, file.id))
    }

    /// Sharing URL for an already-shared object.
    pub async fn shared_url(&self, path: &str) -> FsResult<String> {
        let info = self.getinfo(path).await?;
        if !info.shared {
            return Err(FsError::NoUrl {
                path: path.to_string(),
                reason: "not shared".to_string(),
            });
        }
        Ok(format!("{}{}", SHARING_URL, info.id))
    }

    /// Whether `path` has a sharing URL. Missing paths report `false`.
    pub async fn has_url(&self, path: &str) -> FsResult<bool> {
        match self.getinfo(path).await {
            Ok(info) => Ok(info.shared),
            Err(FsError::ResourceNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Whether anything exists at `path`.
    pub async fn exists(&self, path: &str) -> FsResult<bool> {
        match self.getinfo(path).await {
            Ok(_) => Ok(true),
            Err(FsError::ResourceNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
