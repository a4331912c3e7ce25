//! Users and session state.

use serde_json::Value;

use super::{DocumentCloudClient, api_path};
use crate::error::{ApiError, Result};
use crate::types::{ResourceId, User};

impl DocumentCloudClient {
    /// Whether the configured credentials identify a user.
    ///
    /// Any failure, including transport errors, reads as logged out.
    pub async fn is_logged_in(&self) -> bool {
        match self.get::<Value>(&api_path(&[&"users", &"me"])).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Session check failed");
                false
            }
        }
    }

    /// Fetch a user by id, or the current user with `ResourceId::me()`.
    pub async fn fetch_user(&self, user: impl Into<ResourceId>) -> Result<User> {
        let user: ResourceId = user.into();
        self.get(&api_path(&[&"users", &user])).await
    }

    /// Derive a client that authenticates with the current user's API key.
    ///
    /// Looks up `/users/me/` with the session credentials this client was
    /// built with. The derived client shares this client's permit queue.
    pub async fn authenticated(&self) -> Result<DocumentCloudClient> {
        let me = self.fetch_user(ResourceId::me()).await?;
        let endpoint = self.endpoint(&api_path(&[&"users", &"me"]));

        let Some(api_key) = me.api_key.filter(|k| !k.is_empty()) else {
            return Err(ApiError::MissingField {
                endpoint,
                field: "api_key",
            });
        };

        tracing::info!(username = %me.username, "Authenticated with session API key");

        let config = self.config.clone().with_api_key(api_key);
        DocumentCloudClient::with_limiter(config, self.limiter.clone())
            .map_err(|source| ApiError::Config { endpoint, source })
    }
}
