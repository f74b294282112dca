use std::sync::LazyLock;

use regex::Regex;

use crate::MediaMetadata;

/// Device vendor matched when no other vendor is configured.
pub const DEFAULT_VENDOR: &str = "samsung";

// `YYYYMMDD_HHMMSS.jpg`, ASCII digits only.
static DATED_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{8}_[0-9]{6}\.jpg$").expect("valid dated filename regex")
});

/// Returns true when `filename` is exactly `8 digits _ 6 digits .jpg`.
pub fn has_dated_filename(filename: &str) -> bool {
    DATED_FILENAME.is_match(filename)
}

/// Eligibility predicate for remote media entries.
///
/// An entry is eligible when its filename follows the camera's dated naming
/// convention and its camera make or model mentions the configured vendor.
/// Missing metadata never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFilter {
    vendor: String,
}

impl Default for MediaFilter {
    fn default() -> Self {
        Self::new(DEFAULT_VENDOR)
    }
}

impl MediaFilter {
    pub fn new(vendor: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into().to_lowercase(),
        }
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn is_eligible(&self, metadata: Option<&MediaMetadata>, filename: &str) -> bool {
        has_dated_filename(filename) && self.is_from_vendor(metadata)
    }

    pub fn is_from_vendor(&self, metadata: Option<&MediaMetadata>) -> bool {
        if self.vendor.is_empty() {
            return false;
        }
        let Some(photo) = metadata.and_then(|meta| meta.photo.as_ref()) else {
            return false;
        };
        [photo.camera_make.as_deref(), photo.camera_model.as_deref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&self.vendor))
    }
}
