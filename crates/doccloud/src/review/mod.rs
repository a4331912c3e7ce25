//! Sensitive-document review queue.
//!
//! Documents wait in an "unreviewed" project. A reviewer looks at each one
//! and files it into either the "sensitive" or the "non-sensitive" project.
//! A document counts as reviewed once it belongs to either downstream
//! project; the unreviewed project itself is never pruned.
//!
//! The workflow talks to whoever makes the decision through [`Reviewer`],
//! so a terminal prompt, a web form or a test script can drive the same loop.

mod workflow;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::types::{DocumentId, Note, ProjectDocument, ProjectId};

pub use workflow::ReviewWorkflow;

pub const DEFAULT_UNREVIEWED_PROJECT: ProjectId = 211312;
pub const DEFAULT_NON_SENSITIVE_PROJECT: ProjectId = 212657;
pub const DEFAULT_SENSITIVE_PROJECT: ProjectId = 212658;

/// The three projects that make up a review queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewProjects {
    pub unreviewed: ProjectId,
    pub non_sensitive: ProjectId,
    pub sensitive: ProjectId,
}

impl Default for ReviewProjects {
    fn default() -> Self {
        Self {
            unreviewed: DEFAULT_UNREVIEWED_PROJECT,
            non_sensitive: DEFAULT_NON_SENSITIVE_PROJECT,
            sensitive: DEFAULT_SENSITIVE_PROJECT,
        }
    }
}

impl ReviewProjects {
    pub fn target(&self, verdict: Verdict) -> ProjectId {
        match verdict {
            Verdict::Sensitive => self.sensitive,
            Verdict::NonSensitive => self.non_sensitive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Sensitive,
    NonSensitive,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sensitive => "sensitive",
            Self::NonSensitive => "non-sensitive",
        }
    }
}

/// What the reviewer wants done with the current document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Classify(Verdict),
    /// Leave it unreviewed and move on for the rest of this run.
    Skip,
    /// Stop the run.
    Quit,
}

/// Everything a reviewer needs to judge one document.
#[derive(Debug, Clone)]
pub struct ReviewItem {
    pub document: DocumentId,
    pub membership: ProjectDocument,
    pub notes: Vec<Note>,
    pub embed_url: String,
}

/// Sizes of the two downstream projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReviewCounts {
    pub non_sensitive: u64,
    pub sensitive: u64,
}

impl ReviewCounts {
    pub fn total(&self) -> u64 {
        self.non_sensitive + self.sensitive
    }

    /// Share of reviewed documents that turned out non-sensitive, in percent.
    pub fn false_positive_rate(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.non_sensitive as f64 / total as f64 * 100.0),
        }
    }
}

impl fmt::Display for ReviewCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "non-sensitive: {}, sensitive: {}, false positive rate: ",
            self.non_sensitive, self.sensitive
        )?;
        match self.false_positive_rate() {
            Some(rate) => write!(f, "{rate:.2}%"),
            None => f.write_str("n/a"),
        }
    }
}

/// Session state shown before a review starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginPrompt {
    LoggedIn {
        username: String,
    },
    LoggedOut {
        login_url: String,
        signup_url: String,
    },
}

impl LoginPrompt {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, LoginPrompt::LoggedIn { .. })
    }
}

impl fmt::Display for LoginPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginPrompt::LoggedIn { username } => write!(f, "Logged in as {username}."),
            LoginPrompt::LoggedOut {
                login_url,
                signup_url,
            } => write!(
                f,
                "Please log in ({login_url}) or create an account ({signup_url})."
            ),
        }
    }
}

/// Outcome of one `ReviewWorkflow::run`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    pub sensitive: usize,
    pub non_sensitive: usize,
    pub skipped: usize,
    /// True when the queue ran out, false when the reviewer quit.
    pub exhausted: bool,
}

impl ReviewSummary {
    pub fn classified(&self) -> usize {
        self.sensitive + self.non_sensitive
    }
}

/// Makes the call on each document.
#[async_trait]
pub trait Reviewer: Send + Sync {
    async fn decide(&self, item: &ReviewItem) -> Decision;

    /// Latest downstream counts, reported before each document.
    async fn show_counts(&self, _counts: &ReviewCounts) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_projects() {
        let projects = ReviewProjects::default();
        assert_eq!(projects.unreviewed, 211312);
        assert_eq!(projects.target(Verdict::NonSensitive), 212657);
        assert_eq!(projects.target(Verdict::Sensitive), 212658);
    }

    #[test]
    fn false_positive_rate() {
        let counts = ReviewCounts {
            non_sensitive: 3,
            sensitive: 1,
        };
        assert_eq!(counts.false_positive_rate(), Some(75.0));
        assert_eq!(
            counts.to_string(),
            "non-sensitive: 3, sensitive: 1, false positive rate: 75.00%"
        );
    }

    #[test]
    fn false_positive_rate_undefined_when_empty() {
        let counts = ReviewCounts::default();
        assert_eq!(counts.false_positive_rate(), None);
        assert!(counts.to_string().ends_with("n/a"));
    }

    #[test]
    fn login_prompt_text() {
        let prompt = LoginPrompt::LoggedIn {
            username: "reviewer".to_string(),
        };
        assert!(prompt.is_logged_in());
        assert_eq!(prompt.to_string(), "Logged in as reviewer.");

        let prompt = LoginPrompt::LoggedOut {
            login_url: "https://a/login".to_string(),
            signup_url: "https://a/signup".to_string(),
        };
        assert!(!prompt.is_logged_in());
        assert!(prompt.to_string().contains("https://a/signup"));
    }

    #[test]
    fn verdict_serializes_snake_case() {
        insta::assert_json_snapshot!(
            "verdict_all_variants",
            [Verdict::Sensitive, Verdict::NonSensitive]
        );
    }
}
