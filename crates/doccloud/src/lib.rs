//! doccloud: rate-limited DocumentCloud API client and review queue.

mod version;

pub mod client;
pub mod config;
pub mod error;
pub mod permit;
pub mod query;
pub mod review;
pub mod types;

pub use client::DocumentCloudClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError};
pub use permit::RateLimiter;
pub use review::{
    Decision, LoginPrompt, ReviewCounts, ReviewItem, ReviewProjects, ReviewSummary,
    ReviewWorkflow, Reviewer, Verdict,
};
pub use version::{DOCCLOUD_VERSION, user_agent};
