//! Error types for API calls and client configuration.

use thiserror::Error;

/// Failure of a single API call.
///
/// Every variant carries the full endpoint URL that was requested.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, TLS, body read).
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request failed with status {status} at endpoint: {endpoint}. Response text: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Success status, but the body reported an `error`.
    #[error("error in response data for endpoint: {endpoint}. Error: {message}")]
    Payload {
        endpoint: String,
        status: u16,
        message: String,
        body: String,
    },

    #[error("unexpected response body from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response from {endpoint} is missing field '{field}'")]
    MissingField {
        endpoint: String,
        field: &'static str,
    },

    /// A client derived from the response could not be built.
    #[error("invalid client configuration from {endpoint}: {source}")]
    Config {
        endpoint: String,
        #[source]
        source: ConfigError,
    },
}

impl ApiError {
    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Transport { endpoint, .. }
            | ApiError::Status { endpoint, .. }
            | ApiError::Payload { endpoint, .. }
            | ApiError::Decode { endpoint, .. }
            | ApiError::MissingField { endpoint, .. }
            | ApiError::Config { endpoint, .. } => endpoint,
        }
    }

    /// HTTP status of the response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } | ApiError::Payload { status, .. } => Some(*status),
            ApiError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw response text, when the server sent one.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. }
            | ApiError::Payload { body, .. }
            | ApiError::Decode { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }
}

/// Invalid client configuration, reported by `DocumentCloudClient::new`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name} '{value}': {reason}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("requests_per_second must be greater than zero")]
    ZeroRate,

    #[error("{name} contains characters not allowed in an HTTP header")]
    InvalidHeader { name: &'static str },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_carries_context() {
        let err = ApiError::Status {
            endpoint: "https://api.example/projects/1/".to_string(),
            status: 404,
            body: "{\"detail\":\"Not found.\"}".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("https://api.example/projects/1/"));
        assert!(msg.contains("Not found."));
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.endpoint(), "https://api.example/projects/1/");
    }

    #[test]
    fn payload_error_exposes_raw_body() {
        let err = ApiError::Payload {
            endpoint: "https://api.example/documents/".to_string(),
            status: 200,
            message: "bad input".to_string(),
            body: "{\"error\":\"bad input\"}".to_string(),
        };

        assert_eq!(err.status(), Some(200));
        assert_eq!(err.body(), Some("{\"error\":\"bad input\"}"));
        assert!(!err.is_transport());
        assert!(err.to_string().contains("bad input"));
    }

    #[test]
    fn missing_field_has_no_status() {
        let err = ApiError::MissingField {
            endpoint: "https://api.example/users/me/".to_string(),
            field: "api_key",
        };
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), None);
        assert!(err.to_string().contains("api_key"));
    }
}
