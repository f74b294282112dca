use std::fmt;
use std::time::Duration;

use culler_core::MediaItem;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

pub const DEFAULT_API_BASE_URL: &str = "https://photoslibrary.googleapis.com/v1";

/// Bearer credential supplied by the identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    access_token: String,
}

impl Credential {
    /// Returns `None` for a blank token so callers can treat it as logged out.
    pub fn bearer(access_token: impl Into<String>) -> Option<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return None;
        }
        Some(Self { access_token })
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub media_items: Vec<MediaItem>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiFailure,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ApiFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    /// 401/403, or the credential was refused outright.
    Unauthorized,
    HttpStatus(u16),
    Timeout,
    InvalidUrl,
    Decode,
    Network,
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailure::Unauthorized => write!(f, "unauthorized"),
            ApiFailure::HttpStatus(code) => write!(f, "http status {code}"),
            ApiFailure::Timeout => write!(f, "timeout"),
            ApiFailure::InvalidUrl => write!(f, "invalid url"),
            ApiFailure::Decode => write!(f, "invalid response body"),
            ApiFailure::Network => write!(f, "network error"),
        }
    }
}

/// The three remote calls the culling pipeline depends on.
#[async_trait::async_trait]
pub trait PhotosApi: Send + Sync {
    /// One page of photo entries, optionally continuing from `page_token`.
    async fn search(
        &self,
        credential: &Credential,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<SearchPage, ApiError>;

    /// Fully populated entry for `id`.
    async fn get(&self, credential: &Credential, id: &str) -> Result<MediaItem, ApiError>;

    /// Adds `ids` to the album `album_id`, returning the raw response.
    async fn batch_add(
        &self,
        credential: &Credential,
        album_id: &str,
        ids: &[String],
    ) -> Result<Value, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestPhotosClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestPhotosClient {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(ApiFailure::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                ApiFailure::InvalidUrl,
                format!("{} cannot be a base url", settings.base_url),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiFailure::Network, err.to_string()))?;
        Ok(Self { base_url, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::new(ApiFailure::Unauthorized, status.to_string()));
        }
        if !status.is_success() {
            return Err(ApiError::new(
                ApiFailure::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &body
        };
        serde_json::from_slice(body).map_err(|err| ApiError::new(ApiFailure::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl PhotosApi for ReqwestPhotosClient {
    async fn search(
        &self,
        credential: &Credential,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<SearchPage, ApiError> {
        let mut body = json!({
            "pageSize": page_size,
            "filters": { "mediaTypeFilter": { "mediaTypes": ["PHOTO"] } },
        });
        if let Some(token) = page_token {
            body["pageToken"] = Value::String(token.to_string());
        }

        let request = self
            .client
            .post(self.endpoint(&["mediaItems:search"]))
            .bearer_auth(credential.access_token())
            .json(&body);
        // A blank body decodes as `null`.
        let page: Option<SearchPage> = self.send(request).await?;
        Ok(page.unwrap_or_default())
    }

    async fn get(&self, credential: &Credential, id: &str) -> Result<MediaItem, ApiError> {
        let request = self
            .client
            .get(self.endpoint(&["mediaItems", id]))
            .bearer_auth(credential.access_token());
        self.send(request).await
    }

    async fn batch_add(
        &self,
        credential: &Credential,
        album_id: &str,
        ids: &[String],
    ) -> Result<Value, ApiError> {
        let items: Vec<Value> = ids.iter().map(|id| json!({ "mediaItemId": id })).collect();
        let body = json!({ "albumId": album_id, "mediaItems": items });

        let request = self
            .client
            .post(self.endpoint(&["mediaItems:batchCreate"]))
            .bearer_auth(credential.access_token())
            .json(&body);
        self.send(request).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiFailure::Timeout, err.to_string());
    }
    ApiError::new(ApiFailure::Network, err.to_string())
}
