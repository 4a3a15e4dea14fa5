pub mod duration;
pub mod types;

pub use duration::convert_seconds_to_readable;
pub use types::{RenderOptions, Report, TimelineRow};

use crate::metrics::DurationMetrics;
use crate::pr::types::PrState;
use crate::pr::PullRequestSnapshot;
use crate::timeline::Timeline;
use chrono::SecondsFormat;
use colored::Colorize;
use std::fmt::Write as _;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),
}

/// Build a Report from the snapshot counters, its timeline and the computed
/// duration metrics.
pub fn build(
    pr_id: u64,
    snapshot: &PullRequestSnapshot,
    timeline: &Timeline<'_>,
    durations: DurationMetrics,
) -> Report {
    let timeline = timeline
        .events()
        .iter()
        .map(|event| TimelineRow {
            kind: event.kind,
            timestamp: event.timestamp,
            elapsed: event.elapsed,
            detail: event.payload.summary(),
        })
        .collect();

    Report {
        pr_id,
        state: snapshot.state.clone(),
        durations,
        changed_files: snapshot.changed_files,
        commit_count: snapshot.commits.len(),
        additions: snapshot.additions,
        deletions: snapshot.deletions,
        comment_count: snapshot.comments.len(),
        review_count: snapshot.reviews.len(),
        timeline,
    }
}

/// Output the report to terminal (no path) or to a markdown file. An
/// existing file is overwritten.
#[instrument(skip(report, options), fields(pr = report.pr_id, state = %report.state))]
pub fn output(report: &Report, options: RenderOptions, output_path: Option<&Path>) -> Result<(), ReportError> {
    match output_path {
        None => {
            debug!("writing report to terminal");
            print_terminal_report(report);
            Ok(())
        }
        Some(path) => {
            debug!(path = %path.display(), "writing report to file");
            write_markdown_report(report, options, path)
        }
    }
}

fn duration_rows(durations: &DurationMetrics) -> [(&'static str, i64); 4] {
    [
        (
            "Time that was spend on the branch before the PR was created",
            durations.time_on_branch_before_pr_created,
        ),
        (
            "Time that was spend on the branch before the PR was merged",
            durations.time_on_branch_until_merged,
        ),
        (
            "Time to merge after the last review",
            durations.time_to_merge_after_last_review,
        ),
        (
            "Time spend on the PR after creation",
            durations.time_on_pr_after_creation,
        ),
    ]
}

fn count_rows(report: &Report) -> [(&'static str, u64); 6] {
    [
        ("Changed files count", report.changed_files),
        ("Commit count", report.commit_count as u64),
        ("Additions", report.additions),
        ("Deletions", report.deletions),
        ("Comment count", report.comment_count as u64),
        ("Review count", report.review_count as u64),
    ]
}

/// Render the markdown document. Pure: the same report and options always
/// produce the same bytes.
pub fn render_markdown(report: &Report, options: RenderOptions) -> String {
    let mut md = String::new();
    md.push_str("## Pull Request Metrics\n\n");

    md.push_str("### Duration Metrics\n\n");
    md.push_str("|Metric description|Duration|Duration in seconds|\n");
    md.push_str("|---|---|---|\n");
    for (description, seconds) in duration_rows(&report.durations) {
        let _ = writeln!(
            md,
            "|{}|{}|{}|",
            description,
            convert_seconds_to_readable(seconds),
            seconds
        );
    }

    md.push_str("\n### PR Metrics\n\n");
    md.push_str("|Description|Value|\n");
    md.push_str("|---|---|\n");
    for (description, value) in count_rows(report) {
        let _ = writeln!(md, "|{}|{}|", description, value);
    }

    if options.include_timeline {
        md.push_str("\n### Timeline\n\n");
        md.push_str("|#|Event|Timestamp|Elapsed|Detail|\n");
        md.push_str("|---|---|---|---|---|\n");
        for (idx, row) in report.timeline.iter().enumerate() {
            let _ = writeln!(
                md,
                "|{}|{}|{}|{} ({}s)|{}|",
                idx + 1,
                row.kind,
                row.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
                convert_seconds_to_readable(row.elapsed),
                row.elapsed,
                row.detail.replace('|', "\\|")
            );
        }
    }

    md
}

fn write_markdown_report(report: &Report, options: RenderOptions, path: &Path) -> Result<(), ReportError> {
    let md = render_markdown(report, options);
    std::fs::write(path, md)?;
    Ok(())
}

/// Format and print the report to the terminal with colors.
fn print_terminal_report(report: &Report) {
    println!();
    println!("PR #{} {}", report.pr_id, colorize_state(&report.state));
    println!(
        "Files changed: {} | +{} -{} | {} commits, {} reviews, {} comments",
        report.changed_files,
        report.additions,
        report.deletions,
        report.commit_count,
        report.review_count,
        report.comment_count
    );
    println!();

    println!("═══ Duration Metrics ═══");
    for (description, seconds) in duration_rows(&report.durations) {
        println!(
            "  • {}: {} ({}s)",
            description,
            convert_seconds_to_readable(seconds).bold(),
            seconds
        );
    }
    println!();
}

fn colorize_state(state: &PrState) -> colored::ColoredString {
    match state {
        PrState::Merged => "MERGED".magenta().bold(),
        PrState::Open => "OPEN".green().bold(),
        PrState::Closed => "CLOSED".red().bold(),
        PrState::Other(other) => other.as_str().yellow().bold(),
    }
}
