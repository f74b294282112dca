#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::{Duration, Instant};

use culler_core::{MediaItem, MediaMetadata, PhotoMetadata};
use culler_engine::{ApiError, ApiFailure, Clock, Credential, PhotosApi, SearchPage};
use serde_json::{json, Value};

static INIT: Once = Once::new();

pub fn init_logging() {
    INIT.call_once(culler_logging::initialize_for_tests);
}

pub fn credential() -> Credential {
    Credential::bearer("test-token").expect("non-empty token")
}

pub fn photo(id: &str, filename: &str, make: &str) -> MediaItem {
    MediaItem {
        id: id.to_string(),
        filename: filename.to_string(),
        base_url: format!("https://photos.example/{id}"),
        media_metadata: Some(MediaMetadata {
            creation_time: Some("2023-01-01T12:00:00Z".to_string()),
            width: Some(4000),
            height: Some(3000),
            photo: Some(PhotoMetadata {
                camera_make: Some(make.to_string()),
                camera_model: None,
            }),
        }),
    }
}

/// An eligible Samsung photo whose filename is derived from `n`.
pub fn samsung(n: u32) -> MediaItem {
    photo(&format!("id-{n}"), &format!("20230101_{n:06}.jpg"), "samsung")
}

pub fn page_cursor(index: usize) -> Option<String> {
    (index > 0).then(|| format!("page-{index}"))
}

fn listing_entry(detail: &MediaItem) -> MediaItem {
    MediaItem {
        media_metadata: None,
        ..detail.clone()
    }
}

/// In-memory photo library serving pre-built pages chained by cursor.
#[derive(Default)]
pub struct FakeApi {
    pages: HashMap<Option<String>, SearchPage>,
    details: HashMap<String, MediaItem>,
    failing_details: HashSet<String>,
    listing_failure: Option<ApiFailure>,
    batch_failure: Option<ApiFailure>,
    search_calls: AtomicUsize,
    get_calls: AtomicUsize,
    searched_cursors: Mutex<Vec<Option<String>>>,
    batch_calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeApi {
    /// Page `i` is served for cursor `page_cursor(i)` and links to page `i + 1`.
    pub fn with_pages(pages: Vec<Vec<MediaItem>>) -> Self {
        let mut api = Self::default();
        let count = pages.len();
        for (index, details) in pages.into_iter().enumerate() {
            let next_page_token = (index + 1 < count).then(|| format!("page-{}", index + 1));
            let media_items = details.iter().map(listing_entry).collect();
            for detail in details {
                api.details.insert(detail.id.clone(), detail);
            }
            api.pages.insert(
                page_cursor(index),
                SearchPage {
                    media_items,
                    next_page_token,
                },
            );
        }
        api
    }

    pub fn failing_detail(mut self, id: &str) -> Self {
        self.failing_details.insert(id.to_string());
        self
    }

    pub fn failing_listing(mut self, kind: ApiFailure) -> Self {
        self.listing_failure = Some(kind);
        self
    }

    pub fn failing_batch(mut self, kind: ApiFailure) -> Self {
        self.batch_failure = Some(kind);
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn searched_cursors(&self) -> Vec<Option<String>> {
        self.searched_cursors.lock().unwrap().clone()
    }

    pub fn batch_calls(&self) -> Vec<(String, Vec<String>)> {
        self.batch_calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PhotosApi for FakeApi {
    async fn search(
        &self,
        _credential: &Credential,
        _page_size: u32,
        page_token: Option<&str>,
    ) -> Result<SearchPage, ApiError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.searched_cursors
            .lock()
            .unwrap()
            .push(page_token.map(str::to_string));
        if let Some(kind) = &self.listing_failure {
            return Err(ApiError::new(kind.clone(), "listing refused"));
        }
        Ok(self
            .pages
            .get(&page_token.map(str::to_string))
            .cloned()
            .unwrap_or_default())
    }

    async fn get(&self, _credential: &Credential, id: &str) -> Result<MediaItem, ApiError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_details.contains(id) {
            return Err(ApiError::new(ApiFailure::HttpStatus(500), "detail exploded"));
        }
        self.details
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::new(ApiFailure::HttpStatus(404), "no such item"))
    }

    async fn batch_add(
        &self,
        _credential: &Credential,
        album_id: &str,
        ids: &[String],
    ) -> Result<Value, ApiError> {
        self.batch_calls
            .lock()
            .unwrap()
            .push((album_id.to_string(), ids.to_vec()));
        if let Some(kind) = &self.batch_failure {
            return Err(ApiError::new(kind.clone(), "album add refused"));
        }
        Ok(json!({ "newMediaItemResults": [{ "status": { "message": "Success" } }] }))
    }
}

/// Clock that only moves when told to.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }

    pub fn as_clock(&self) -> Clock {
        let now = self.now.clone();
        Arc::new(move || *now.lock().unwrap())
    }
}
