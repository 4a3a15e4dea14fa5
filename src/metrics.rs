use thiserror::Error;
use tracing::debug;

use crate::timeline::{EventKind, TimedEvent, Timeline};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricsError {
    #[error("Pull request has no dated commits; cannot measure time on branch before creation")]
    MissingCommit,

    #[error("Pull request has no creation date; cannot measure time on branch before creation")]
    MissingCreatedAt,
}

/// The four duration metrics, in whole seconds. Values may be negative when
/// the source data is (e.g., a commit rebased after the PR was opened).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationMetrics {
    pub time_on_branch_before_pr_created: i64,
    pub time_on_branch_until_merged: i64,
    pub time_to_merge_after_last_review: i64,
    pub time_on_pr_after_creation: i64,
}

/// First event of `kind` in timeline order.
pub fn first_of_kind<'t, 'a>(
    events: &'t [TimedEvent<'a>],
    kind: EventKind,
) -> Option<&'t TimedEvent<'a>> {
    events.iter().find(|event| event.kind == kind)
}

/// Last event of `kind` in timeline order.
pub fn last_of_kind<'t, 'a>(
    events: &'t [TimedEvent<'a>],
    kind: EventKind,
) -> Option<&'t TimedEvent<'a>> {
    events.iter().rev().find(|event| event.kind == kind)
}

/// Seconds from `earlier` to `later`, or 0 when either end is missing.
fn seconds_between(later: Option<&TimedEvent<'_>>, earlier: Option<&TimedEvent<'_>>) -> i64 {
    match (later, earlier) {
        (Some(later), Some(earlier)) => (later.timestamp - earlier.timestamp).num_seconds(),
        _ => 0,
    }
}

/// Time between the first commit and the PR being opened.
///
/// Every pull request is expected to have at least one commit and a creation
/// date; a snapshot without either is rejected instead of reported as zero.
pub fn time_on_branch_before_pr_created(events: &[TimedEvent<'_>]) -> Result<i64, MetricsError> {
    let first_commit = first_of_kind(events, EventKind::Commit).ok_or(MetricsError::MissingCommit)?;
    let created = first_of_kind(events, EventKind::Created).ok_or(MetricsError::MissingCreatedAt)?;
    Ok((created.timestamp - first_commit.timestamp).num_seconds())
}

pub fn time_to_merge_after_last_review(events: &[TimedEvent<'_>]) -> i64 {
    seconds_between(
        first_of_kind(events, EventKind::Merged),
        last_of_kind(events, EventKind::Review),
    )
}

pub fn time_on_pr_after_creation(events: &[TimedEvent<'_>]) -> i64 {
    seconds_between(
        first_of_kind(events, EventKind::Merged),
        first_of_kind(events, EventKind::Created),
    )
}

/// Sum of elapsed time up to and including the first merged or closed event.
/// A PR that is still open sums the whole timeline.
pub fn time_on_branch_until_merged(events: &[TimedEvent<'_>]) -> i64 {
    let end = events
        .iter()
        .position(|event| event.kind.is_terminal())
        .map_or(events.len(), |idx| idx + 1);
    events[..end].iter().map(|event| event.elapsed).sum()
}

/// Compute all four metrics for a timeline.
pub fn compute(timeline: &Timeline<'_>) -> Result<DurationMetrics, MetricsError> {
    let events = timeline.events();
    let metrics = DurationMetrics {
        time_on_branch_before_pr_created: time_on_branch_before_pr_created(events)?,
        time_on_branch_until_merged: time_on_branch_until_merged(events),
        time_to_merge_after_last_review: time_to_merge_after_last_review(events),
        time_on_pr_after_creation: time_on_pr_after_creation(events),
    };
    debug!(?metrics, "computed duration metrics");
    Ok(metrics)
}
