//! Throttled HTTP Client for the Rebrickable API
//!
//! This module provides the request builder every endpoint goes through. It
//! resolves parameters and credentials, enforces the minimum spacing between
//! requests and decodes JSON responses. Errors are returned as-is; nothing is
//! retried.

use bytes::Bytes;
use governor::{
    clock::DefaultClock,
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use nonzero_ext::nonzero;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use reqwest::{Client, Method};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

use crate::config::Settings;
use super::error::{RebrickError, RebrickResult};
use super::query::Params;

/// Maximum number of body characters quoted in parse errors
const BODY_EXCERPT_LEN: usize = 500;

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Process-wide throttles, one per configured delay
static SHARED_THROTTLES: Lazy<Mutex<HashMap<Duration, Arc<Throttle>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

// ============================================================================
// Throttle
// ============================================================================

/// Minimum spacing between outbound API requests
///
/// Backed by a GCRA limiter with a burst of one: the first request passes
/// immediately and every following one waits until `delay` has elapsed since
/// the previous permit. Permits are taken atomically, so one throttle can be
/// shared between clients and tasks through an `Arc`.
pub struct Throttle {
    limiter: Option<DirectLimiter>,
    delay: Duration,
}

impl Throttle {
    /// Create a throttle enforcing `delay` between requests
    ///
    /// A zero delay disables throttling.
    pub fn new(delay: Duration) -> Self {
        let limiter = Quota::with_period(delay)
            .map(|quota| RateLimiter::direct(quota.allow_burst(nonzero!(1u32))));

        Throttle { limiter, delay }
    }

    /// Process-wide throttle for `delay`
    ///
    /// Every caller asking for the same delay gets the same instance, so
    /// independent clients in one process keep the spacing between them.
    pub fn shared(delay: Duration) -> Arc<Throttle> {
        let mut throttles = SHARED_THROTTLES.lock();
        Arc::clone(
            throttles
                .entry(delay)
                .or_insert_with(|| Arc::new(Throttle::new(delay))),
        )
    }

    /// Create a throttle that never waits
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Configured minimum spacing
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait until the next request is allowed and take the permit
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    /// Take the permit if a request is allowed right now
    pub fn try_acquire(&self) -> bool {
        match &self.limiter {
            Some(limiter) => limiter.check().is_ok(),
            None => true,
        }
    }
}

impl std::fmt::Debug for Throttle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("delay", &self.delay)
            .field("enabled", &self.limiter.is_some())
            .finish()
    }
}

// ============================================================================
// API Client
// ============================================================================

/// HTTP client bound to one set of credentials and one throttle
pub struct ApiClient {
    /// Inner HTTP client
    client: Client,

    /// Shared request spacing
    throttle: Arc<Throttle>,

    /// Default API key injected into requests
    api_key: Option<String>,

    /// User token for user account endpoints
    user_token: Option<String>,

    /// Catalog API base URL
    lego_url: String,

    /// Users API base URL
    users_url: String,
}

impl ApiClient {
    /// Create a new client from settings
    ///
    /// The client uses the process-wide throttle for the configured delay.
    pub fn new(settings: &Settings) -> RebrickResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .connect_timeout(settings.connect_timeout())
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(ApiClient {
            client,
            throttle: Throttle::shared(settings.request_delay()),
            api_key: settings.api_key.clone(),
            user_token: settings.user_token.clone(),
            lego_url: settings.lego_url.clone(),
            users_url: settings.users_url.clone(),
        })
    }

    /// Replace the throttle, e.g. to share one between several clients
    pub fn with_throttle(mut self, throttle: Arc<Throttle>) -> Self {
        self.throttle = throttle;
        self
    }

    /// Throttle used by this client
    pub fn throttle(&self) -> Arc<Throttle> {
        Arc::clone(&self.throttle)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Configured user token, required by user account endpoints
    pub fn user_token(&self) -> RebrickResult<&str> {
        self.user_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(RebrickError::MissingUserToken)
    }

    pub fn set_user_token(&mut self, user_token: Option<String>) {
        self.user_token = user_token;
    }

    /// Full URL of a catalog resource
    pub fn lego_url(&self, path: &str) -> String {
        format!("{}{}", self.lego_url, path)
    }

    /// Full URL of a users resource
    pub fn users_url(&self, path: &str) -> String {
        format!("{}{}", self.users_url, path)
    }

    /// Send a GET request with parameters in the query string
    pub async fn get(&self, url: &str, params: Params) -> RebrickResult<Value> {
        self.execute(Method::GET, url, params).await
    }

    /// Send a POST request with parameters as a form body
    pub async fn post(&self, url: &str, params: Params) -> RebrickResult<Value> {
        self.execute(Method::POST, url, params).await
    }

    /// Resolve parameters, wait for the throttle and execute the request
    async fn execute(&self, method: Method, url: &str, params: Params) -> RebrickResult<Value> {
        // Fails before any network access when no key is available
        let params = params.resolve(self.api_key.as_deref())?;

        self.throttle.wait().await;

        debug!(method = %method, url = %url, "Rebrickable API request");

        let builder = if method == Method::POST {
            self.client.post(url).form(&params)
        } else {
            self.client.request(method, url).query(&params)
        };

        let response = builder
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        // Check for error status
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RebrickError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        // Parse JSON response
        let text = response.text().await?;
        trace!(bytes = text.len(), "Rebrickable API response");

        serde_json::from_str(&text).map_err(|e| {
            let excerpt: String = text.chars().take(BODY_EXCERPT_LEN).collect();
            RebrickError::ParseError(format!("JSON parse error: {} - Body: {}", e, excerpt))
        })
    }

    /// Download a file (images) from an arbitrary URL
    ///
    /// Media downloads do not count against the API throttle and carry no
    /// credentials.
    pub async fn get_file(&self, url: &str) -> RebrickResult<Bytes> {
        debug!(url = %url, "Downloading file");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RebrickError::ApiError {
                status: status.as_u16(),
                message: format!("failed to download {}", url),
            });
        }

        Ok(response.bytes().await?)
    }
}
