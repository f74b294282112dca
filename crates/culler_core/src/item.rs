use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A media entry as returned by the photo library API.
///
/// The listing call only fills `id`, `filename` and `base_url` reliably; the
/// detail call additionally populates `media_metadata`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_metadata: Option<MediaMetadata>,
}

impl MediaItem {
    /// Capture time parsed from `creationTime`, if present and well formed.
    pub fn capture_time(&self) -> Option<DateTime<Utc>> {
        let raw = self.media_metadata.as_ref()?.creation_time.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }

    pub fn camera_make(&self) -> Option<&str> {
        self.photo().and_then(|photo| photo.camera_make.as_deref())
    }

    pub fn camera_model(&self) -> Option<&str> {
        self.photo().and_then(|photo| photo.camera_model.as_deref())
    }

    fn photo(&self) -> Option<&PhotoMetadata> {
        self.media_metadata.as_ref()?.photo.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_dimension",
        skip_serializing_if = "Option::is_none"
    )]
    pub width: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_dimension",
        skip_serializing_if = "Option::is_none"
    )]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<PhotoMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,
}

/// The API encodes dimensions as decimal strings (`"4032"`). Numbers are
/// accepted too; anything unparsable becomes `None`.
fn lenient_dimension<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => text.trim().parse().ok(),
        Some(Raw::Number(n)) => u32::try_from(n).ok(),
        Some(Raw::Other(_)) | None => None,
    })
}
