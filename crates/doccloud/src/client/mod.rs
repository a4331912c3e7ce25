//! DocumentCloud REST client.
//!
//! Every request:
//! - waits for a permit from the client's [`RateLimiter`] right before it is sent
//! - carries `Authorization: Token <key>` when a key is configured
//! - carries the session cookie and CSRF token when configured
//! - fails on a non-2xx status, or on a 2xx body with a non-empty `error` field
//!
//! Operations are split by area: generic resources, documents and notes,
//! projects, and users/session.

mod documents;
mod projects;
mod resources;
mod users;

use std::fmt;

use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError, Result};
use crate::permit::RateLimiter;
use crate::types::DocumentId;
use crate::version::user_agent;

const CSRF_HEADER: HeaderName = HeaderName::from_static("x-csrftoken");
const LOGIN_NEXT: &str = "https%3A%2F%2Fwww.documentcloud.org%2F";

/// Client for one DocumentCloud deployment.
///
/// Cloning is cheap; clones share the HTTP connection pool and the permit queue.
#[derive(Clone)]
pub struct DocumentCloudClient {
    http: reqwest::Client,
    /// No API credentials; used for presigned upload URLs.
    plain_http: reqwest::Client,
    limiter: RateLimiter,
    config: ClientConfig,
    api_base_url: String,
    auth_base_url: String,
    embed_base_url: String,
}

impl DocumentCloudClient {
    pub fn new(config: ClientConfig) -> std::result::Result<Self, ConfigError> {
        let limiter = RateLimiter::new(config.rate()?);
        Self::with_limiter(config, limiter)
    }

    /// Build a client that draws permits from an existing limiter.
    ///
    /// `requests_per_second` in `config` is ignored in favour of the limiter's rate.
    pub fn with_limiter(
        config: ClientConfig,
        limiter: RateLimiter,
    ) -> std::result::Result<Self, ConfigError> {
        let (api_base_url, auth_base_url, embed_base_url) = config.validated_urls()?;

        let mut headers = HeaderMap::new();
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let mut value = header_value("api_key", &format!("Token {key}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        if let Some(cookie) = config.session_cookie.as_deref().filter(|c| !c.is_empty()) {
            let mut value = header_value("session_cookie", cookie)?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }
        if let Some(token) = config.effective_csrf_token() {
            headers.insert(CSRF_HEADER, header_value("csrf_token", &token)?);
        }

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent());
        let mut plain_builder = reqwest::Client::builder().user_agent(user_agent());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
            plain_builder = plain_builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            plain_http: plain_builder.build()?,
            limiter,
            config,
            api_base_url,
            auth_base_url,
            embed_base_url,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn has_api_key(&self) -> bool {
        self.config.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Public viewer URL for a document.
    pub fn embed_url(&self, document: DocumentId) -> String {
        format!("{}/documents/{}", self.embed_base_url, document)
    }

    pub fn login_url(&self) -> String {
        format!(
            "{}/accounts/login/?next={}&intent=documentcloud",
            self.auth_base_url, LOGIN_NEXT
        )
    }

    pub fn signup_url(&self) -> String {
        format!("{}/accounts/signup/?intent=documentcloud", self.auth_base_url)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    /// Send one request against the API base and decode the JSON response.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        customize: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<T> {
        let endpoint = self.endpoint(path);
        let request = customize(self.http.request(method.clone(), &endpoint));

        self.limiter.acquire().await;
        tracing::debug!(method = %method, endpoint = %endpoint, "Sending API request");

        let response = request.send().await.map_err(|source| ApiError::Transport {
            endpoint: endpoint.clone(),
            source,
        })?;

        parse_response(endpoint, response).await
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(Method::GET, path, |r| r).await
    }

    pub(crate) async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.execute(Method::GET, path, |r| r.query(query)).await
    }

    pub(crate) async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(method, path, |r| r.json(body)).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.execute::<Value>(Method::DELETE, path, |r| r).await?;
        Ok(())
    }
}

impl fmt::Debug for DocumentCloudClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentCloudClient")
            .field("api_base_url", &self.api_base_url)
            .field("has_api_key", &self.has_api_key())
            .field("limiter", &self.limiter)
            .finish()
    }
}

fn header_value(name: &'static str, value: &str) -> std::result::Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidHeader { name })
}

/// Build `/a/b/c/` from path segments.
pub(crate) fn api_path(segments: &[&dyn fmt::Display]) -> String {
    let mut path = String::from("/");
    for segment in segments {
        path.push_str(&segment.to_string());
        path.push('/');
    }
    path
}

/// The `error` field of a success body, if it holds anything truthy.
fn embedded_error(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

async fn parse_response<T: DeserializeOwned>(endpoint: String, response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await.map_err(|source| ApiError::Transport {
        endpoint: endpoint.clone(),
        source,
    })?;

    if !status.is_success() {
        tracing::warn!(status = %status.as_u16(), endpoint = %endpoint, "API request failed");
        return Err(ApiError::Status {
            endpoint,
            status: status.as_u16(),
            body,
        });
    }

    let value: Value = if body.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(source) => {
                return Err(ApiError::Decode {
                    endpoint,
                    body,
                    source,
                });
            }
        }
    };

    if let Some(message) = embedded_error(&value) {
        tracing::warn!(endpoint = %endpoint, error = %message, "API returned error payload");
        return Err(ApiError::Payload {
            endpoint,
            status: status.as_u16(),
            message,
            body,
        });
    }

    serde_json::from_value(value).map_err(|source| ApiError::Decode {
        endpoint,
        body,
        source,
    })
}
