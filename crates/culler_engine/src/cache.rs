use std::sync::Arc;
use std::time::{Duration, Instant};

use culler_core::{CacheWindow, MediaItem, DEFAULT_CACHE_TTL};
use culler_logging::culler_debug;
use tokio::sync::Mutex;

use crate::{CullError, Credential, PageFetcher};

pub type Clock = Arc<dyn Fn() -> Instant + Send + Sync>;

/// Shared, time-bounded window over the remote listing.
///
/// The lock is held across the fetch so that concurrent callers of a stale
/// cache cause a single refresh.
pub struct PageCache {
    window: Mutex<CacheWindow>,
    ttl: Duration,
    clock: Clock,
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(Instant::now))
    }

    pub fn with_clock(ttl: Duration, clock: Clock) -> Self {
        Self {
            window: Mutex::new(CacheWindow::new()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached items and cursor, fetching the page at the stored cursor when
    /// the window is stale or empty. A failed fetch leaves the window as it was.
    pub async fn get_or_refresh(
        &self,
        fetcher: &PageFetcher,
        credential: &Credential,
        page_size: u32,
    ) -> Result<(Vec<MediaItem>, Option<String>), CullError> {
        let mut window = self.window.lock().await;
        if window.is_fresh_hit((self.clock)(), self.ttl) {
            culler_debug!("Serving {} photos from cache", window.items().len());
            return Ok(snapshot(&window));
        }

        self.refresh(&mut window, fetcher, credential, page_size).await
    }

    /// Advances past `cursor` and fetches the next page in one critical section.
    ///
    /// When another caller already moved the window off `cursor` and its page
    /// is still fresh, that page is returned without fetching again.
    pub async fn advance_and_refresh(
        &self,
        fetcher: &PageFetcher,
        credential: &Credential,
        cursor: &str,
        page_size: u32,
    ) -> Result<(Vec<MediaItem>, Option<String>), CullError> {
        let mut window = self.window.lock().await;
        if window.next_cursor() == Some(cursor) {
            window.force_advance(Some(cursor.to_string()));
        } else if !window.is_stale((self.clock)(), self.ttl) {
            culler_debug!("Window already advanced past {}", cursor);
            return Ok(snapshot(&window));
        }
        self.refresh(&mut window, fetcher, credential, page_size).await
    }

    /// Moves the window to `cursor`; the next read fetches regardless of age.
    pub async fn force_advance(&self, cursor: Option<String>) {
        self.window.lock().await.force_advance(cursor);
    }

    pub async fn invalidate(&self) {
        self.window.lock().await.invalidate();
    }

    pub async fn window(&self) -> CacheWindow {
        self.window.lock().await.clone()
    }
}

impl PageCache {
    async fn refresh(
        &self,
        window: &mut CacheWindow,
        fetcher: &PageFetcher,
        credential: &Credential,
        page_size: u32,
    ) -> Result<(Vec<MediaItem>, Option<String>), CullError> {
        let cursor = window.next_cursor().map(str::to_string);
        let page = fetcher
            .fetch_page(credential, cursor.as_deref(), page_size)
            .await?;
        window.replace(page.items, page.next_cursor, (self.clock)());
        Ok(snapshot(window))
    }
}

fn snapshot(window: &CacheWindow) -> (Vec<MediaItem>, Option<String>) {
    (
        window.items().to_vec(),
        window.next_cursor().map(str::to_string),
    )
}
