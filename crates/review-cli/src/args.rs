//! Command-line options. Every connection option also reads from the environment.

use std::time::Duration;

use clap::{Parser, Subcommand};
use doccloud::ClientConfig;
use doccloud::config::{
    DEFAULT_API_BASE_URL, DEFAULT_AUTH_BASE_URL, DEFAULT_EMBED_BASE_URL,
    DEFAULT_REQUESTS_PER_SECOND,
};
use doccloud::review::{
    DEFAULT_NON_SENSITIVE_PROJECT, DEFAULT_SENSITIVE_PROJECT, DEFAULT_UNREVIEWED_PROJECT,
    ReviewProjects,
};
use doccloud::types::ProjectId;

#[derive(Parser, Debug)]
#[command(name = "doccloud-review")]
#[command(about = "Review DocumentCloud documents for sensitive content")]
#[command(version)]
pub struct Cli {
    /// API key, sent as `Authorization: Token <key>`
    #[arg(long, env = "DOCUMENTCLOUD_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Session cookie header; used to derive an API key when none is given
    #[arg(long, env = "DOCUMENTCLOUD_SESSION_COOKIE", hide_env_values = true)]
    pub session_cookie: Option<String>,

    /// CSRF token; defaults to the session's csrftoken cookie
    #[arg(long, env = "DOCUMENTCLOUD_CSRF_TOKEN", hide_env_values = true)]
    pub csrf_token: Option<String>,

    #[arg(long, env = "DOCUMENTCLOUD_API_URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_url: String,

    #[arg(long, env = "DOCUMENTCLOUD_AUTH_URL", default_value = DEFAULT_AUTH_BASE_URL)]
    pub auth_url: String,

    #[arg(long, env = "DOCUMENTCLOUD_EMBED_URL", default_value = DEFAULT_EMBED_BASE_URL)]
    pub embed_url: String,

    /// Maximum API requests started per second
    #[arg(
        long,
        env = "DOCUMENTCLOUD_RATE",
        default_value_t = DEFAULT_REQUESTS_PER_SECOND,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub rate: u32,

    /// Per-request timeout in seconds (no timeout if not specified)
    #[arg(long, env = "DOCUMENTCLOUD_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Project holding documents awaiting review
    #[arg(long, default_value_t = DEFAULT_UNREVIEWED_PROJECT)]
    pub unreviewed: ProjectId,

    /// Project for documents found not to be sensitive
    #[arg(long, default_value_t = DEFAULT_NON_SENSITIVE_PROJECT)]
    pub non_sensitive: ProjectId,

    /// Project for documents found to be sensitive
    #[arg(long, default_value_t = DEFAULT_SENSITIVE_PROJECT)]
    pub sensitive: ProjectId,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Command {
    /// Review documents one at a time (default)
    #[default]
    Review,
    /// Print the next unreviewed document
    Next,
    /// Print downstream counts and the false positive rate
    Counts,
    /// Print the current login state
    Whoami,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new()
            .with_api_base_url(&self.api_url)
            .with_auth_base_url(&self.auth_url)
            .with_embed_base_url(&self.embed_url)
            .with_requests_per_second(self.rate);
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key);
        }
        if let Some(cookie) = &self.session_cookie {
            config = config.with_session_cookie(cookie);
        }
        if let Some(token) = &self.csrf_token {
            config = config.with_csrf_token(token);
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }

    pub fn projects(&self) -> ReviewProjects {
        ReviewProjects {
            unreviewed: self.unreviewed,
            non_sensitive: self.non_sensitive,
            sensitive: self.sensitive,
        }
    }

    pub fn command(&self) -> Command {
        self.command.unwrap_or_default()
    }
}
