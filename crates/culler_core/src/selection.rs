use std::collections::HashSet;

use chrono::SecondsFormat;
use serde::Serialize;

use crate::MediaItem;

const DEFAULT_WIDTH: u32 = 1600;
const DEFAULT_HEIGHT: u32 = 1200;
const UNKNOWN: &str = "Unknown";

/// Outcome of asking for the next item to review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Picked(MediaItem),
    /// Nothing eligible and unseen is left after bounded paging.
    NoneAvailable {
        /// Eligible items in the current window.
        cached_eligible: usize,
        /// Identifiers in the viewed ledger.
        viewed: usize,
    },
}

/// Items of `items` whose identifier is not in `viewed`, in window order.
pub fn unseen<'a>(items: &'a [MediaItem], viewed: &HashSet<String>) -> Vec<&'a MediaItem> {
    items
        .iter()
        .filter(|item| !viewed.contains(&item.id))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CameraInfo {
    pub make: String,
    pub model: String,
}

/// What the presentation layer needs to show one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewCard {
    pub id: String,
    pub url: String,
    pub filename: String,
    pub timestamp: Option<String>,
    pub camera: CameraInfo,
}

impl ReviewCard {
    pub fn from_item(item: &MediaItem) -> Self {
        let metadata = item.media_metadata.as_ref();
        let width = metadata.and_then(|m| m.width).unwrap_or(DEFAULT_WIDTH);
        let height = metadata.and_then(|m| m.height).unwrap_or(DEFAULT_HEIGHT);
        Self {
            id: item.id.clone(),
            url: format!("{}=w{width}-h{height}", item.base_url),
            filename: item.filename.clone(),
            timestamp: item
                .capture_time()
                .map(|ts| ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
                .or_else(|| metadata.and_then(|m| m.creation_time.clone())),
            camera: CameraInfo {
                make: item.camera_make().unwrap_or(UNKNOWN).to_string(),
                model: item.camera_model().unwrap_or(UNKNOWN).to_string(),
            },
        }
    }
}
