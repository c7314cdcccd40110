//! Listing paginator: full child listings over the page-token protocol.

use crate::drive_service::drive_client::DriveApi;
use crate::drive_service::drive_models::DriveFile;
use crate::errors::RemoteError;
use log::debug;
use std::sync::Arc;

/// Materializes complete child listings for a container, following the
/// continuation token until the service reports no further page. Callers
/// never see a partial listing: any page failure aborts the whole call.
pub struct ListingPaginator {
    client: Arc<dyn DriveApi>,
    page_size: u32,
}

impl ListingPaginator {
    pub fn new(client: Arc<dyn DriveApi>, page_size: u32) -> Self {
        Self {
            client,
            // a zero page size would never advance the continuation token
            page_size: page_size.max(1),
        }
    }

    /// All non-trashed children of `parent_id`, in the order the service
    /// supplies them. Each call starts a fresh page sequence.
    pub async fn list_all(&self, parent_id: &str) -> Result<Vec<DriveFile>, RemoteError> {
        let mut children = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page_count = 0u32;

        loop {
            let page = self
                .client
                .list_children_page(parent_id, self.page_size, page_token.as_deref())
                .await?;
            page_count += 1;
            children.extend(page.files.into_iter().filter(|f| !f.is_trashed()));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(
            "Listed {} children of {} across {} page(s)",
            children.len(),
            parent_id,
            page_count
        );
        Ok(children)
    }
}
