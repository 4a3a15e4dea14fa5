use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::Deserialize;

/// Raw pull request data as emitted by `gh pr view --json ...`.
///
/// Every field is defaulted so a partial dump still deserializes; a
/// timestamp that is present but malformed is still a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestSnapshot {
    #[serde(default)]
    pub commits: Vec<Commit>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub state: PrState,
    /// Conversation comments; only the count is reported.
    #[serde(default)]
    pub comments: Vec<IgnoredAny>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    /// Total files changed
    #[serde(default)]
    pub changed_files: u64,
    /// Total lines added
    #[serde(default)]
    pub additions: u64,
    /// Total lines deleted
    #[serde(default)]
    pub deletions: u64,
}

/// A commit on the PR branch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    #[serde(default)]
    pub oid: Option<String>,
    #[serde(default)]
    pub message_headline: Option<String>,
    #[serde(default)]
    pub committed_date: Option<DateTime<Utc>>,
}

/// A submitted review.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub author: Option<Author>,
    /// APPROVED, CHANGES_REQUESTED, COMMENTED, ...
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    pub login: String,
}

/// Pull request state as reported by `gh`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PrState {
    #[default]
    Open,
    Closed,
    Merged,
    Other(String),
}

impl From<String> for PrState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "OPEN" => PrState::Open,
            "CLOSED" => PrState::Closed,
            "MERGED" => PrState::Merged,
            _ => PrState::Other(value),
        }
    }
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrState::Open => write!(f, "OPEN"),
            PrState::Closed => write!(f, "CLOSED"),
            PrState::Merged => write!(f, "MERGED"),
            PrState::Other(state) => write!(f, "{}", state),
        }
    }
}
