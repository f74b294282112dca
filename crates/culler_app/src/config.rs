//! Application configuration.
//!
//! Read from `culler.ron` (or `--config <path>`), then overridden from the
//! environment. Every field is optional.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use culler_engine::{
    ApiSettings, Credential, CullerConfig, SelectorSettings, DEFAULT_API_BASE_URL,
    DEFAULT_VIEWED_FILE,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "culler.ron";
pub const ENV_TARGET_ALBUM_ID: &str = "PHOTO_CULLER_TARGET_ALBUM_ID";
pub const ENV_ACCESS_TOKEN: &str = "PHOTO_CULLER_ACCESS_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Config not found at: {0}")]
    NotFound(String),

    #[error("Config validation error: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub target_album_id: Option<String>,
    pub access_token: Option<String>,
    pub viewed_file: PathBuf,
    pub api_base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub page_size: u32,
    pub max_advances: u32,
    pub cache_ttl_secs: u64,
    pub vendor: String,
    pub log_level: String,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let api = ApiSettings::default();
        let selector = SelectorSettings::default();
        Self {
            target_album_id: None,
            access_token: None,
            viewed_file: PathBuf::from(DEFAULT_VIEWED_FILE),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            connect_timeout_secs: api.connect_timeout.as_secs(),
            request_timeout_secs: api.request_timeout.as_secs(),
            page_size: selector.page_size,
            max_advances: selector.max_advances,
            cache_ttl_secs: culler_core::DEFAULT_CACHE_TTL.as_secs(),
            vendor: culler_core::DEFAULT_VENDOR.to_string(),
            log_level: "info".to_string(),
            log_destination: LogDestination::default(),
        }
    }
}

impl AppConfig {
    /// Loads `path`, or `culler.ron` when no path is given.
    ///
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        match fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text),
            Err(err) if err.kind() == io::ErrorKind::NotFound && !explicit => Ok(Self::default()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(ConfigError::NotFound(path.display().to_string()))
            }
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies environment overrides; `lookup` is normally `std::env::var`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(album) = lookup(ENV_TARGET_ALBUM_ID) {
            self.target_album_id = Some(album);
        }
        if let Some(token) = lookup(ENV_ACCESS_TOKEN) {
            self.access_token = Some(token);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 || self.page_size > 100 {
            return Err(ConfigError::Invalid(format!(
                "page_size must be between 1 and 100, got {}",
                self.page_size
            )));
        }
        if self.vendor.trim().is_empty() {
            return Err(ConfigError::Invalid("vendor must not be empty".to_string()));
        }
        Ok(())
    }

    /// `None` when no usable token is configured.
    pub fn credential(&self) -> Option<Credential> {
        self.access_token.as_deref().and_then(Credential::bearer)
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.api_base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn culler_config(&self) -> CullerConfig {
        CullerConfig {
            viewed_file: self.viewed_file.clone(),
            target_album_id: self.target_album_id.clone(),
            vendor: self.vendor.clone(),
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            selector: SelectorSettings {
                page_size: self.page_size,
                max_advances: self.max_advances,
            },
        }
    }
}
