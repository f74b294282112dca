use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use culler_core::{MediaFilter, ReviewCard, Selection, DEFAULT_CACHE_TTL};
use serde::Serialize;

use crate::{
    ApprovalReceipt, ApprovalSink, Credential, CullError, PageCache, PageFetcher, PhotosApi,
    Selector, SelectorSettings, ViewedSet, DEFAULT_VIEWED_FILE,
};

#[derive(Debug, Clone)]
pub struct CullerConfig {
    pub viewed_file: PathBuf,
    pub target_album_id: Option<String>,
    pub vendor: String,
    pub cache_ttl: Duration,
    pub selector: SelectorSettings,
}

impl Default for CullerConfig {
    fn default() -> Self {
        Self {
            viewed_file: PathBuf::from(DEFAULT_VIEWED_FILE),
            target_album_id: None,
            vendor: culler_core::DEFAULT_VENDOR.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
            selector: SelectorSettings::default(),
        }
    }
}

/// Serializable answer to "what should I review next?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PickResult {
    Picked(ReviewCard),
    NoneAvailable {
        message: String,
        cached_eligible: usize,
        viewed: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkipReceipt {
    pub success: bool,
}

/// Composition root of the review pipeline.
pub struct Culler {
    cache: Arc<PageCache>,
    viewed: Arc<ViewedSet>,
    selector: Selector,
    sink: ApprovalSink,
}

impl Culler {
    pub fn new(config: CullerConfig, api: Arc<dyn PhotosApi>) -> Self {
        let cache = Arc::new(PageCache::new(config.cache_ttl));
        Self::with_cache(config, api, cache)
    }

    /// Builds the pipeline around an existing cache, e.g. one with a test clock.
    pub fn with_cache(config: CullerConfig, api: Arc<dyn PhotosApi>, cache: Arc<PageCache>) -> Self {
        let viewed = Arc::new(ViewedSet::open(config.viewed_file));
        let fetcher = PageFetcher::new(api.clone(), MediaFilter::new(config.vendor));
        let selector = Selector::new(cache.clone(), fetcher, viewed.clone(), config.selector);
        let sink = ApprovalSink::new(api, viewed.clone(), config.target_album_id);
        Self {
            cache,
            viewed,
            selector,
            sink,
        }
    }

    pub fn cache(&self) -> &Arc<PageCache> {
        &self.cache
    }

    pub fn viewed(&self) -> &Arc<ViewedSet> {
        &self.viewed
    }

    pub async fn pick_random_unseen(&self, credential: &Credential) -> Result<PickResult, CullError> {
        Ok(match self.selector.pick_random_unseen(credential).await? {
            Selection::Picked(item) => PickResult::Picked(ReviewCard::from_item(&item)),
            Selection::NoneAvailable {
                cached_eligible,
                viewed,
            } => PickResult::NoneAvailable {
                message: format!(
                    "No more unviewed photos available. Total photos found: {cached_eligible}, Already viewed: {viewed}"
                ),
                cached_eligible,
                viewed,
            },
        })
    }

    pub async fn approve(
        &self,
        credential: &Credential,
        item_id: &str,
    ) -> Result<ApprovalReceipt, CullError> {
        self.sink.approve(credential, item_id).await
    }

    pub fn skip(&self, item_id: &str) -> Result<SkipReceipt, CullError> {
        self.sink.skip(item_id)?;
        Ok(SkipReceipt { success: true })
    }
}
