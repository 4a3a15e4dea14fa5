mod config;
mod metrics;
mod pr;
mod report;
mod timeline;

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, info_span, warn};
use tracing_subscriber::EnvFilter;

use pr::SnapshotSource;

/// PR Metrics: CLI tool that measures how long a GitHub Pull Request spent
/// on its branch, in review and waiting to merge, and writes the numbers as
/// a markdown report.
#[derive(Parser, Debug)]
#[command(name = "pr-metrics", version, about)]
struct Cli {
    /// Pull request number
    pr_id: u64,

    /// Markdown file to write (overwritten if it exists).
    ///
    /// When omitted the summary is printed to the terminal.
    output: Option<PathBuf>,

    /// Repository in OWNER/NAME form, passed to `gh --repo`
    #[arg(short, long)]
    repo: Option<String>,

    /// Read the pull request JSON from a file instead of running `gh`
    #[arg(long, value_name = "PATH")]
    from_json: Option<PathBuf>,

    /// Append the sorted event timeline to the report
    #[arg(long)]
    timeline: bool,

    /// GitHub CLI executable to run
    #[arg(long, value_name = "PATH")]
    gh: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let _main_span = info_span!("pr_metrics", pr = cli.pr_id).entered();

    info!("loading configuration");
    let config = config::Config::load()?;

    let source: Box<dyn SnapshotSource> = match &cli.from_json {
        Some(path) => Box::new(pr::JsonFile::new(path)),
        None => {
            let settings = config.resolve_gh(cli.gh.clone(), cli.repo.clone());
            Box::new(pr::GhCli::new(settings.command, settings.repo))
        }
    };

    info!(source = source.name(), "fetching pull request");
    let snapshot = source.fetch(cli.pr_id).await?;
    info!(
        state = %snapshot.state,
        commits = snapshot.commits.len(),
        reviews = snapshot.reviews.len(),
        "fetched PR metadata"
    );

    info!("building timeline");
    let timeline = timeline::build(&snapshot);
    if timeline.is_empty() {
        warn!("pull request has no dated events");
    }
    debug!(events = timeline.len(), "timeline ready");

    info!("computing metrics");
    let durations = metrics::compute(&timeline)?;

    info!("generating report");
    let options = report::RenderOptions {
        include_timeline: cli.timeline || config.report.timeline,
    };
    let built_report = report::build(cli.pr_id, &snapshot, &timeline, durations);
    report::output(&built_report, options, cli.output.as_deref())?;
    info!("done");

    Ok(())
}
