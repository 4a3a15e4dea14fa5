use chrono::{DateTime, Utc};

use crate::pr::types::{Commit, Review};

/// Kind of lifecycle event placed on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Created,
    Commit,
    Review,
    Merged,
    Closed,
}

impl EventKind {
    /// Merged and closed both end the life of the branch.
    pub fn is_terminal(self) -> bool {
        matches!(self, EventKind::Merged | EventKind::Closed)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Created => write!(f, "created"),
            EventKind::Commit => write!(f, "commit"),
            EventKind::Review => write!(f, "review"),
            EventKind::Merged => write!(f, "merged"),
            EventKind::Closed => write!(f, "closed"),
        }
    }
}

/// The snapshot record an event was materialized from.
#[derive(Debug, Clone, Copy)]
pub enum EventPayload<'a> {
    /// createdAt / mergedAt / closedAt carry nothing beyond the timestamp.
    Lifecycle,
    Commit(&'a Commit),
    Review(&'a Review),
}

impl EventPayload<'_> {
    /// Short description for the timeline table, e.g. `3f1c2a9 Add parser`.
    pub fn summary(&self) -> String {
        match self {
            EventPayload::Lifecycle => String::new(),
            EventPayload::Commit(commit) => {
                let sha = commit
                    .oid
                    .as_deref()
                    .map(|oid| oid.get(..7).unwrap_or(oid))
                    .unwrap_or("");
                let headline = commit.message_headline.as_deref().unwrap_or("");
                format!("{} {}", sha, headline).trim().to_string()
            }
            EventPayload::Review(review) => {
                let author = review.author.as_ref().map(|a| a.login.as_str()).unwrap_or("");
                let state = review.state.as_deref().unwrap_or("");
                match (author.is_empty(), state.is_empty()) {
                    (false, false) => format!("{} ({})", author, state),
                    (false, true) => author.to_string(),
                    (true, false) => state.to_string(),
                    (true, true) => String::new(),
                }
            }
        }
    }
}

/// An event before dating is enforced. Events without a timestamp never
/// reach the timeline.
#[derive(Debug, Clone, Copy)]
pub struct TimelineEvent<'a> {
    pub kind: EventKind,
    pub timestamp: Option<DateTime<Utc>>,
    pub payload: EventPayload<'a>,
}

/// A dated event in sorted position.
#[derive(Debug, Clone, Copy)]
pub struct TimedEvent<'a> {
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    /// Seconds since the previous event; 0 for the first.
    pub elapsed: i64,
    pub payload: EventPayload<'a>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pr::types::Author;

    #[test]
    fn test_terminal_kinds() {
        assert!(EventKind::Merged.is_terminal());
        assert!(EventKind::Closed.is_terminal());
        assert!(!EventKind::Created.is_terminal());
        assert!(!EventKind::Commit.is_terminal());
        assert!(!EventKind::Review.is_terminal());
    }

    #[test]
    fn test_commit_summary() {
        let commit = Commit {
            oid: Some("3f1c2a9d8e7b".to_string()),
            message_headline: Some("Add parser".to_string()),
            committed_date: None,
        };
        assert_eq!(EventPayload::Commit(&commit).summary(), "3f1c2a9 Add parser");

        let short = Commit {
            oid: Some("abc".to_string()),
            ..Default::default()
        };
        assert_eq!(EventPayload::Commit(&short).summary(), "abc");
    }

    #[test]
    fn test_review_summary() {
        let review = Review {
            author: Some(Author {
                login: "carol".to_string(),
            }),
            state: Some("APPROVED".to_string()),
            submitted_at: None,
        };
        assert_eq!(EventPayload::Review(&review).summary(), "carol (APPROVED)");
        assert_eq!(EventPayload::Review(&Review::default()).summary(), "");
        assert_eq!(EventPayload::Lifecycle.summary(), "");
    }
}
