//! Path resolver: the single translation boundary between slash-separated
//! paths and Drive file IDs.
//!
//! Every other component operates on IDs; only the resolver walks the graph
//! by name. Nothing is cached across top-level calls; the remote store is
//! the source of truth and may change between them.

use crate::config::DuplicateNamePolicy;
use crate::drive_service::drive_models::DriveFile;
use crate::errors::{FsError, FsResult};
use crate::fs::paginator::ListingPaginator;
use crate::path_utils;
use log::debug;

/// Outcome of resolving a path.
#[derive(Debug)]
pub enum ResolvedLocation {
    /// The filesystem root. It has an ID but no backing metadata record in
    /// the path contract.
    Root,
    /// The path names an existing object, reached through `parent_id`. When
    /// the object has several parents, `parent_id` is the one the path
    /// implies.
    Existing { file: DriveFile, parent_id: String },
    /// Every segment but the last resolved; the parent container exists and
    /// is a folder, but nothing in it bears the final name. Enables
    /// "create at this location" callers.
    Missing { parent_id: String, name: String },
}

impl ResolvedLocation {
    /// The existing object, or `ResourceNotFound` for a missing final
    /// segment. The root does not count as an object here.
    pub fn into_existing(self, path: &str) -> FsResult<(DriveFile, String)> {
        match self {
            ResolvedLocation::Existing { file, parent_id } => Ok((file, parent_id)),
            _ => Err(FsError::not_found(path)),
        }
    }
}

pub struct PathResolver<'a> {
    paginator: &'a ListingPaginator,
    root_id: &'a str,
    duplicate_policy: DuplicateNamePolicy,
}

impl<'a> PathResolver<'a> {
    pub fn new(
        paginator: &'a ListingPaginator,
        root_id: &'a str,
        duplicate_policy: DuplicateNamePolicy,
    ) -> Self {
        Self {
            paginator,
            root_id,
            duplicate_policy,
        }
    }

    /// Walk `path` one segment at a time from the root container.
    ///
    /// Fails with `ResourceNotFound` when a non-final segment is absent and
    /// with `DirectoryExpected` when a non-final segment names a file. The
    /// walk itself is the per-call memoization: each ancestor is looked up
    /// exactly once.
    pub async fn resolve(&self, path: &str) -> FsResult<ResolvedLocation> {
        let segments = path_utils::iterate_path(path);
        if segments.is_empty() {
            return Ok(ResolvedLocation::Root);
        }

        let mut parent_id = self.root_id.to_string();
        let mut walked = String::new();
        let last_index = segments.len() - 1;

        for (index, name) in segments.iter().enumerate() {
            walked.push('/');
            walked.push_str(name);

            match self.child_by_name(&parent_id, name, &walked).await? {
                Some(file) => {
                    if index == last_index {
                        debug!("Resolved {} -> {}", path, file.id);
                        return Ok(ResolvedLocation::Existing { file, parent_id });
                    }
                    if !file.is_folder() {
                        return Err(FsError::directory_expected(&walked));
                    }
                    parent_id = file.id;
                }
                None => {
                    if index == last_index {
                        return Ok(ResolvedLocation::Missing {
                            parent_id,
                            name: name.clone(),
                        });
                    }
                    return Err(FsError::not_found(path));
                }
            }
        }
        unreachable!("non-empty segment list always returns from the loop");
    }

    /// Resolve a path that must already exist.
    pub async fn resolve_existing(&self, path: &str) -> FsResult<ResolvedLocation> {
        match self.resolve(path).await? {
            ResolvedLocation::Missing { .. } => Err(FsError::not_found(path)),
            location => Ok(location),
        }
    }

    /// Find a direct child of `parent_id` by exact name.
    ///
    /// Drive permits several siblings with the same name; the configured
    /// policy either picks the first match in service page order or rejects
    /// the ambiguity outright.
    pub async fn child_by_name(
        &self,
        parent_id: &str,
        name: &str,
        path_for_error: &str,
    ) -> FsResult<Option<DriveFile>> {
        let children = self.paginator.list_all(parent_id).await?;
        let mut matches = children.into_iter().filter(|c| c.display_name() == name);

        let first = match matches.next() {
            Some(file) => file,
            None => return Ok(None),
        };
        if matches.next().is_some() && self.duplicate_policy == DuplicateNamePolicy::Reject {
            return Err(FsError::DuplicateName {
                path: path_for_error.to_string(),
            });
        }
        Ok(Some(first))
    }
}
