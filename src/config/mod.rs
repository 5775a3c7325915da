//! Configuration module for the Rebrickable client
//!
//! Credentials, throttling and endpoint locations live in an explicit
//! [`Settings`] value handed to each client instance.

use serde::Deserialize;
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::RebrickResult;

/// Placeholder substituted in image URL templates
const ID_PLACEHOLDER: &str = "{id}";

/// Client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rebrickable API access key
    pub api_key: Option<String>,

    /// Rebrickable user token for user account endpoints
    pub user_token: Option<String>,

    /// Swallow HTTP errors and return `None` from facade calls
    pub silent: bool,

    /// Minimum delay between consecutive API requests, in milliseconds
    pub request_delay_ms: u64,

    /// Total request timeout, in seconds
    pub timeout_secs: u64,

    /// Connect timeout, in seconds
    pub connect_timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// Base URL of the catalog API
    pub lego_url: String,

    /// Base URL of the users API
    pub users_url: String,

    /// Set image URL template (`{id}` is replaced by the set number)
    pub set_image_url: String,

    /// Rebrickable element image URL template
    pub element_image_url: String,

    /// LEGO element image URL template, used as a fallback
    pub lego_element_image_url: String,
}

impl Settings {
    /// Create settings with the given API key and default everything else
    pub fn new(api_key: impl Into<String>) -> Self {
        Settings::default().with_api_key(api_key)
    }

    /// Load configuration from files and environment variables
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables (prefixed with REBRICK_)
    /// 2. config/local.toml (gitignored)
    /// 3. config/default.toml
    /// 4. Built-in defaults
    pub fn load() -> RebrickResult<Self> {
        let config_dir = std::env::var("CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"));

        Self::load_from(&config_dir)
    }

    /// Load configuration using an explicit config directory
    pub fn load_from(config_dir: &Path) -> RebrickResult<Self> {
        let builder = Config::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // REBRICK_API_KEY, REBRICK_REQUEST_DELAY_MS, etc.
            .add_source(
                Environment::with_prefix("REBRICK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
            );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the user token
    pub fn with_user_token(mut self, user_token: impl Into<String>) -> Self {
        self.user_token = Some(user_token.into());
        self
    }

    /// Enable or disable silent mode
    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Set the minimum delay between requests
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Point both API bases at another host (mock servers, proxies)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.lego_url = format!("{}/api/v3/lego/", base);
        self.users_url = format!("{}/api/v3/users/", base);
        self
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Image URL for a set number (expected already normalized)
    pub fn set_image(&self, set_id: &str) -> String {
        self.set_image_url.replace(ID_PLACEHOLDER, set_id)
    }

    /// Rebrickable image URL for an element
    pub fn element_image(&self, element_id: &str) -> String {
        self.element_image_url.replace(ID_PLACEHOLDER, element_id)
    }

    /// LEGO image URL for an element
    pub fn lego_element_image(&self, element_id: &str) -> String {
        self.lego_element_image_url.replace(ID_PLACEHOLDER, element_id)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_key: None,
            user_token: None,
            silent: false,
            request_delay_ms: 1100,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: format!("rebrick/{}", env!("CARGO_PKG_VERSION")),
            lego_url: "https://rebrickable.com/api/v3/lego/".to_string(),
            users_url: "https://rebrickable.com/api/v3/users/".to_string(),
            set_image_url: "https://m.rebrickable.com/media/sets/{id}.jpg".to_string(),
            element_image_url: "https://m.rebrickable.com/media/parts/elements/{id}.jpg"
                .to_string(),
            lego_element_image_url:
                "https://www.lego.com/cdn/product-assets/element.img.lod5photo.192x192/{id}.jpg"
                    .to_string(),
        }
    }
}
