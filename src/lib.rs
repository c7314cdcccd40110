//! Filesystem-style access to the Google Drive file graph.
//!
//! Drive models storage as a graph of objects addressed by opaque ID, where
//! an object may sit in several parent containers at once and siblings may
//! share a name. This crate layers the conventional path contract on top:
//! resolution, directory listings, byte-stream read/write, move/copy/delete
//! and metadata, plus the two graph-native extensions `add_parent` and
//! `remove_parent`.
//!
//! The remote side is reached through the [`drive_service::drive_client::DriveApi`]
//! trait; credentials come from a [`drive_service::auth::TokenProvider`] and
//! are refreshed outside this crate.

pub mod config;
pub mod drive_service;
pub mod errors;
pub mod fs;
pub mod path_utils;

pub use config::{DeletePolicy, DriveFsConfig, DuplicateNamePolicy};
pub use errors::{FsError, FsResult, RemoteError};
pub use fs::GoogleDriveFs;
