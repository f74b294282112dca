use std::time::{Duration, Instant};

use crate::MediaItem;

/// Maximum age of a cached page before it must be fetched again.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// One page of already filtered items plus the cursor of the page after it.
///
/// The window is never cumulative: `replace` swaps the whole page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheWindow {
    fetched_at: Option<Instant>,
    items: Vec<MediaItem>,
    next_cursor: Option<String>,
}

impl CacheWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    pub fn fetched_at(&self) -> Option<Instant> {
        self.fetched_at
    }

    /// A window with no timestamp is always stale.
    pub fn is_stale(&self, now: Instant, ttl: Duration) -> bool {
        match self.fetched_at {
            None => true,
            Some(at) => now.saturating_duration_since(at) > ttl,
        }
    }

    /// True when the window can be served without a network call.
    pub fn is_fresh_hit(&self, now: Instant, ttl: Duration) -> bool {
        !self.is_stale(now, ttl) && !self.items.is_empty()
    }

    pub fn replace(&mut self, items: Vec<MediaItem>, next_cursor: Option<String>, now: Instant) {
        self.items = items;
        self.next_cursor = next_cursor;
        self.fetched_at = Some(now);
    }

    /// Points the window at `cursor` and forces the next read to fetch.
    pub fn force_advance(&mut self, cursor: Option<String>) {
        self.next_cursor = cursor;
        self.fetched_at = None;
    }

    pub fn invalidate(&mut self) {
        self.fetched_at = None;
    }
}
