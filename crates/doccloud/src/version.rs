//! Version information for the doccloud client.

/// Client version from Cargo.toml
pub const DOCCLOUD_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent sent with every API request.
pub fn user_agent() -> String {
    format!("doccloud/{}", DOCCLOUD_VERSION)
}
