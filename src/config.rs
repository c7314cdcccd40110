//! Construction-time configuration for the filesystem façade.
//!
//! Everything here used to be implicit in the Drive client defaults; making
//! it explicit keeps the façade free of process-wide mutable state.

/// What the path resolver does when a container holds more than one child
/// with the requested name. Drive permits same-named siblings; the
/// path-based contract cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateNamePolicy {
    /// Deterministically pick the first match in the page order supplied by
    /// the service. This mirrors what the service itself returns first and
    /// is the historical behavior.
    #[default]
    UseFirst,
    /// Refuse to resolve the ambiguous name.
    Reject,
}

/// How `remove`/`removedir` make an object unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Permanently delete the object.
    #[default]
    Delete,
    /// Flag the object as trashed. Trashed objects are filtered out of all
    /// listings, so the path contract treats them as gone.
    Trash,
}

/// Configuration passed to [`crate::fs::GoogleDriveFs`] at construction.
#[derive(Debug, Clone)]
pub struct DriveFsConfig {
    /// Page size used for child listings. The Drive default is 100; tests
    /// exercise pagination by filling containers past one page.
    pub page_size: u32,
    pub duplicate_policy: DuplicateNamePolicy,
    pub delete_policy: DeletePolicy,
}

pub const DEFAULT_PAGE_SIZE: u32 = 100;

impl Default for DriveFsConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            duplicate_policy: DuplicateNamePolicy::default(),
            delete_policy: DeletePolicy::default(),
        }
    }
}
