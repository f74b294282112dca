use std::sync::{Arc, Mutex};

use culler_core::{unseen, Selection};
use culler_logging::{culler_debug, culler_info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::{CullError, Credential, PageCache, PageFetcher, ViewedSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorSettings {
    pub page_size: u32,
    /// Extra pages to pull when the current window is fully viewed.
    pub max_advances: u32,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            page_size: 50,
            max_advances: 3,
        }
    }
}

/// Picks one random eligible, unseen item, paging forward a bounded number of times.
pub struct Selector {
    cache: Arc<PageCache>,
    fetcher: PageFetcher,
    viewed: Arc<ViewedSet>,
    settings: SelectorSettings,
    rng: Mutex<StdRng>,
}

impl Selector {
    pub fn new(
        cache: Arc<PageCache>,
        fetcher: PageFetcher,
        viewed: Arc<ViewedSet>,
        settings: SelectorSettings,
    ) -> Self {
        Self::with_rng(cache, fetcher, viewed, settings, StdRng::from_entropy())
    }

    pub fn with_rng(
        cache: Arc<PageCache>,
        fetcher: PageFetcher,
        viewed: Arc<ViewedSet>,
        settings: SelectorSettings,
        rng: StdRng,
    ) -> Self {
        Self {
            cache,
            fetcher,
            viewed,
            settings,
            rng: Mutex::new(rng),
        }
    }

    pub fn settings(&self) -> SelectorSettings {
        self.settings
    }

    pub async fn pick_random_unseen(&self, credential: &Credential) -> Result<Selection, CullError> {
        let viewed = self.viewed.load()?;
        culler_debug!("Loaded {} viewed photos", viewed.len());

        let page_size = self.settings.page_size;
        let (mut items, mut cursor) = self
            .cache
            .get_or_refresh(&self.fetcher, credential, page_size)
            .await?;

        let mut advances = 0;
        while unseen(&items, &viewed).is_empty() && advances < self.settings.max_advances {
            let Some(next) = cursor.take() else {
                break;
            };
            advances += 1;
            culler_debug!("Window exhausted, advancing to page {}", advances);
            (items, cursor) = self
                .cache
                .advance_and_refresh(&self.fetcher, credential, &next, page_size)
                .await?;
        }

        let available = unseen(&items, &viewed);
        let picked = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            available.choose(&mut *rng).map(|item| (*item).clone())
        };

        match picked {
            Some(item) => {
                culler_debug!("Selected {} ({})", item.filename, item.id);
                Ok(Selection::Picked(item))
            }
            None => {
                culler_info!(
                    "No unviewed photos left: {} eligible cached, {} viewed",
                    items.len(),
                    viewed.len()
                );
                Ok(Selection::NoneAvailable {
                    cached_eligible: items.len(),
                    viewed: viewed.len(),
                })
            }
        }
    }
}
