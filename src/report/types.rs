use chrono::{DateTime, Utc};

use crate::metrics::DurationMetrics;
use crate::pr::types::PrState;
use crate::timeline::EventKind;

/// One line of the optional timeline section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRow {
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    /// Seconds since the previous row
    pub elapsed: i64,
    /// Commit sha/headline or review author/state; empty for lifecycle events
    pub detail: String,
}

/// Everything the renderers need, detached from the snapshot.
#[derive(Debug, Clone)]
pub struct Report {
    /// PR number
    pub pr_id: u64,
    /// OPEN / CLOSED / MERGED
    pub state: PrState,
    /// Duration metrics in seconds
    pub durations: DurationMetrics,
    /// Files changed count
    pub changed_files: u64,
    /// Number of commits on the PR
    pub commit_count: usize,
    /// Lines added
    pub additions: u64,
    /// Lines deleted
    pub deletions: u64,
    /// Number of conversation comments
    pub comment_count: usize,
    /// Number of submitted reviews
    pub review_count: usize,
    /// Sorted timeline, for the optional timeline section
    pub timeline: Vec<TimelineRow>,
}

/// Rendering switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Append a `### Timeline` section after the PR metrics
    pub include_timeline: bool,
}
