use std::sync::Arc;

use culler_core::{has_dated_filename, MediaFilter, MediaItem};
use culler_logging::{culler_debug, culler_error};

use crate::{CullError, Credential, PhotosApi};

/// Eligible items of one listing page, in remote order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedPage {
    pub items: Vec<MediaItem>,
    pub next_cursor: Option<String>,
}

/// Pulls listing pages and keeps only the entries the filter accepts.
#[derive(Clone)]
pub struct PageFetcher {
    api: Arc<dyn PhotosApi>,
    filter: MediaFilter,
}

impl PageFetcher {
    pub fn new(api: Arc<dyn PhotosApi>, filter: MediaFilter) -> Self {
        Self { api, filter }
    }

    pub fn filter(&self) -> &MediaFilter {
        &self.filter
    }

    /// Fetches one page starting at `cursor`.
    ///
    /// The listing omits camera metadata, so every entry costs one detail
    /// lookup. A failed lookup drops that entry only; a failed listing call
    /// fails the whole page.
    pub async fn fetch_page(
        &self,
        credential: &Credential,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<FetchedPage, CullError> {
        culler_debug!("Listing {} photos from cursor {:?}", page_size, cursor);
        let page = self
            .api
            .search(credential, page_size, cursor)
            .await
            .map_err(CullError::listing)?;
        culler_debug!("Listing returned {} entries", page.media_items.len());

        let mut items = Vec::with_capacity(page.media_items.len());
        for entry in &page.media_items {
            let detail = match self.api.get(credential, &entry.id).await {
                Ok(detail) => detail,
                Err(err) => {
                    let err = CullError::detail(&entry.id, err);
                    culler_error!("Skipping {} ({}): {}", entry.filename, entry.id, err);
                    continue;
                }
            };

            if !has_dated_filename(&entry.filename) {
                culler_debug!("{} does not match the filename pattern", entry.filename);
                continue;
            }
            if !self.filter.is_from_vendor(detail.media_metadata.as_ref()) {
                culler_debug!("{} is not from {}", entry.filename, self.filter.vendor());
                continue;
            }
            items.push(detail);
        }

        culler_debug!("Filtered page down to {} photos", items.len());
        Ok(FetchedPage {
            items,
            next_cursor: page.next_page_token,
        })
    }
}
