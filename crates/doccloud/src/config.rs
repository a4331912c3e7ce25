//! Client configuration.

use std::num::NonZeroU32;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "https://api.www.documentcloud.org/api";
pub const DEFAULT_AUTH_BASE_URL: &str = "https://accounts.muckrock.com";
pub const DEFAULT_EMBED_BASE_URL: &str = "https://embed.documentcloud.org";
pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 10;

const CSRF_COOKIE: &str = "csrftoken";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base for all REST resources, without a trailing slash.
    pub api_base_url: String,
    /// Account service used for login and signup links.
    pub auth_base_url: String,
    /// Public viewer used to build document embed URLs.
    pub embed_base_url: String,
    /// Sent as `Authorization: Token <key>`; omitted when unset.
    pub api_key: Option<String>,
    /// Raw `Cookie` header value carrying the logged-in session.
    pub session_cookie: Option<String>,
    /// Explicit CSRF token. Falls back to the `csrftoken` session cookie.
    pub csrf_token: Option<String>,
    pub requests_per_second: u32,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            embed_base_url: DEFAULT_EMBED_BASE_URL.to_string(),
            api_key: None,
            session_cookie: None,
            csrf_token: None,
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_auth_base_url(mut self, url: impl Into<String>) -> Self {
        self.auth_base_url = url.into();
        self
    }

    pub fn with_embed_base_url(mut self, url: impl Into<String>) -> Self {
        self.embed_base_url = url.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    pub fn with_requests_per_second(mut self, rate: u32) -> Self {
        self.requests_per_second = rate;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// CSRF token to send: the explicit one, else the session's `csrftoken` cookie.
    pub fn effective_csrf_token(&self) -> Option<String> {
        self.csrf_token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| {
                self.session_cookie
                    .as_deref()
                    .and_then(|c| cookie_value(c, CSRF_COOKIE))
            })
    }

    pub(crate) fn rate(&self) -> Result<NonZeroU32, ConfigError> {
        NonZeroU32::new(self.requests_per_second).ok_or(ConfigError::ZeroRate)
    }

    /// Check every base URL parses and return them without trailing slashes.
    pub(crate) fn validated_urls(&self) -> Result<(String, String, String), ConfigError> {
        Ok((
            normalize_url("api_base_url", &self.api_base_url)?,
            normalize_url("auth_base_url", &self.auth_base_url)?,
            normalize_url("embed_base_url", &self.embed_base_url)?,
        ))
    }
}

fn normalize_url(name: &'static str, value: &str) -> Result<String, ConfigError> {
    let parsed = reqwest::Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            name,
            value: value.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(value.trim_end_matches('/').to_string())
}

/// Look up one cookie in a `name=value; name2=value2` header.
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        let value = value.trim();
        (key.trim() == name && !value.is_empty()).then(|| value.to_string())
    })
}
