pub mod types;

pub use types::{EventKind, EventPayload, TimedEvent, TimelineEvent};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::pr::PullRequestSnapshot;

/// Chronologically sorted lifecycle events of one pull request.
///
/// Invariants: every event has a timestamp, timestamps are non-decreasing,
/// the first event has `elapsed == 0` and every later one carries the gap to
/// its predecessor.
#[derive(Debug, Clone, Default)]
pub struct Timeline<'a> {
    events: Vec<TimedEvent<'a>>,
}

impl<'a> Timeline<'a> {
    pub fn events(&self) -> &[TimedEvent<'a>] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Materialize one event per dated record of the snapshot, in the order
/// created, commits, reviews, merged, closed. Undated records are dropped.
pub fn build_events(snapshot: &PullRequestSnapshot) -> Vec<TimelineEvent<'_>> {
    std::iter::once(lifecycle(EventKind::Created, snapshot.created_at))
        .chain(snapshot.commits.iter().map(|commit| TimelineEvent {
            kind: EventKind::Commit,
            timestamp: commit.committed_date,
            payload: EventPayload::Commit(commit),
        }))
        .chain(snapshot.reviews.iter().map(|review| TimelineEvent {
            kind: EventKind::Review,
            timestamp: review.submitted_at,
            payload: EventPayload::Review(review),
        }))
        .chain(std::iter::once(lifecycle(EventKind::Merged, snapshot.merged_at)))
        .chain(std::iter::once(lifecycle(EventKind::Closed, snapshot.closed_at)))
        .filter(|event| event.timestamp.is_some())
        .collect()
}

fn lifecycle<'a>(kind: EventKind, timestamp: Option<DateTime<Utc>>) -> TimelineEvent<'a> {
    TimelineEvent {
        kind,
        timestamp,
        payload: EventPayload::Lifecycle,
    }
}

/// Build the sorted timeline with inter-event deltas.
pub fn build(snapshot: &PullRequestSnapshot) -> Timeline<'_> {
    let mut dated: Vec<_> = build_events(snapshot)
        .into_iter()
        .filter_map(|event| event.timestamp.map(|ts| (ts, event)))
        .collect();

    // Stable: equal timestamps keep materialization order.
    dated.sort_by_key(|(ts, _)| *ts);

    let mut previous: Option<DateTime<Utc>> = None;
    let events: Vec<TimedEvent<'_>> = dated
        .into_iter()
        .map(|(timestamp, event)| {
            let elapsed = previous
                .map(|prev| (timestamp - prev).num_seconds())
                .unwrap_or(0);
            previous = Some(timestamp);
            TimedEvent {
                kind: event.kind,
                timestamp,
                elapsed,
                payload: event.payload,
            }
        })
        .collect();

    debug!(
        events = events.len(),
        commits = snapshot.commits.len(),
        reviews = snapshot.reviews.len(),
        "built timeline"
    );
    Timeline { events }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pr::parse_snapshot;
    use crate::pr::types::{Commit, Review};

    const SAMPLE_SNAPSHOT: &str = include_str!("../../tests/fixtures/sample_pr.json");

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn commit_at(s: &str) -> Commit {
        Commit {
            committed_date: Some(ts(s)),
            ..Default::default()
        }
    }

    fn review_at(s: &str) -> Review {
        Review {
            submitted_at: Some(ts(s)),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_events_drops_undated() {
        let snapshot = PullRequestSnapshot {
            created_at: Some(ts("2024-01-01T00:00:00Z")),
            commits: vec![commit_at("2023-12-30T00:00:00Z"), Commit::default()],
            reviews: vec![Review::default()],
            ..Default::default()
        };
        let events = build_events(&snapshot);
        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Created, EventKind::Commit]);
        assert!(events.iter().all(|e| e.timestamp.is_some()));
    }

    #[test]
    fn test_build_sorts_and_computes_elapsed() {
        let snapshot = PullRequestSnapshot {
            created_at: Some(ts("2024-01-01T00:00:00Z")),
            commits: vec![commit_at("2023-12-30T00:00:00Z")],
            merged_at: Some(ts("2024-01-02T00:00:00Z")),
            ..Default::default()
        };
        let timeline = build(&snapshot);
        let kinds: Vec<_> = timeline.events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::Commit, EventKind::Created, EventKind::Merged]
        );
        let elapsed: Vec<_> = timeline.events().iter().map(|e| e.elapsed).collect();
        assert_eq!(elapsed, vec![0, 172_800, 86_400]);
    }

    #[test]
    fn test_build_sample_invariants() {
        let snapshot = parse_snapshot(SAMPLE_SNAPSHOT).unwrap();
        let timeline = build(&snapshot);
        // created + 3 commits + 2 reviews + merged + closed
        assert_eq!(timeline.len(), 8);

        let events = timeline.events();
        assert_eq!(events[0].elapsed, 0);
        for pair in events.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
            assert_eq!(
                pair[1].elapsed,
                (pair[1].timestamp - pair[0].timestamp).num_seconds()
            );
        }
    }

    #[test]
    fn test_ties_keep_materialization_order() {
        let snapshot = parse_snapshot(SAMPLE_SNAPSHOT).unwrap();
        let timeline = build(&snapshot);
        let events = timeline.events();
        let last_two: Vec<_> = events[events.len() - 2..].iter().map(|e| e.kind).collect();
        // mergedAt and closedAt are identical in the fixture
        assert_eq!(last_two, vec![EventKind::Merged, EventKind::Closed]);
        assert_eq!(events[events.len() - 1].elapsed, 0);
    }

    #[test]
    fn test_payload_points_at_source_record() {
        let snapshot = parse_snapshot(SAMPLE_SNAPSHOT).unwrap();
        let timeline = build(&snapshot);
        let first = &timeline.events()[0];
        assert_eq!(first.kind, EventKind::Commit);
        match first.payload {
            EventPayload::Commit(commit) => {
                assert_eq!(commit.message_headline.as_deref(), Some("Add timeline parser"))
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_open_pr_without_dates() {
        let snapshot = PullRequestSnapshot {
            reviews: vec![review_at("2024-01-03T00:00:00Z")],
            ..Default::default()
        };
        let timeline = build(&snapshot);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.events()[0].kind, EventKind::Review);
        assert_eq!(timeline.events()[0].elapsed, 0);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = PullRequestSnapshot::default();
        assert!(build(&snapshot).is_empty());
    }
}
