pub mod types;

pub use types::PullRequestSnapshot;

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Fields requested from `gh pr view --json`.
pub const GH_JSON_FIELDS: &str =
    "commits,reviews,state,comments,closedAt,createdAt,mergedAt,changedFiles,additions,deletions";

#[derive(Debug, Error)]
pub enum PrError {
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Pull request source returned no data")]
    EmptyOutput,

    #[error("Failed to parse pull request JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read snapshot file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that can produce the raw snapshot for one pull request.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Short label used in logs (e.g., "gh", "file").
    fn name(&self) -> &str;

    async fn fetch(&self, pr_id: u64) -> Result<PullRequestSnapshot, PrError>;
}

/// Parse the JSON text of a snapshot. Blank input is rejected up front so the
/// error says what happened instead of "EOF while parsing".
pub fn parse_snapshot(json: &str) -> Result<PullRequestSnapshot, PrError> {
    if json.trim().is_empty() {
        return Err(PrError::EmptyOutput);
    }
    Ok(serde_json::from_str(json)?)
}

/// Fetches the snapshot by shelling out to the GitHub CLI.
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
    repo: Option<String>,
}

impl GhCli {
    pub fn new(program: impl Into<String>, repo: Option<String>) -> Self {
        Self {
            program: program.into(),
            repo,
        }
    }

    /// Arguments passed to the executable for `pr_id`.
    pub fn args(&self, pr_id: u64) -> Vec<String> {
        let mut args = vec![
            "pr".to_string(),
            "view".to_string(),
            pr_id.to_string(),
        ];
        if let Some(repo) = &self.repo {
            args.push("--repo".to_string());
            args.push(repo.clone());
        }
        args.push("--json".to_string());
        args.push(GH_JSON_FIELDS.to_string());
        args
    }

    fn display_command(&self, pr_id: u64) -> String {
        format!("{} {}", self.program, self.args(pr_id).join(" "))
    }
}

#[async_trait]
impl SnapshotSource for GhCli {
    fn name(&self) -> &str {
        "gh"
    }

    #[instrument(skip(self), fields(program = %self.program, repo = ?self.repo))]
    async fn fetch(&self, pr_id: u64) -> Result<PullRequestSnapshot, PrError> {
        let command = self.display_command(pr_id);
        debug!(%command, "running pull request command");

        let output = Command::new(&self.program)
            .args(self.args(pr_id))
            .output()
            .await
            .map_err(|source| PrError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PrError::CommandFailed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(bytes = stdout.len(), "received pull request JSON");
        parse_snapshot(&stdout)
    }
}

/// Reads a snapshot previously saved from `gh pr view --json`.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for JsonFile {
    fn name(&self) -> &str {
        "file"
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self, pr_id: u64) -> Result<PullRequestSnapshot, PrError> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| PrError::FileRead {
                path: self.path.clone(),
                source,
            })?;
        debug!(pr = pr_id, bytes = json.len(), "read pull request JSON from file");
        parse_snapshot(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SNAPSHOT: &str = include_str!("../../tests/fixtures/sample_pr.json");

    #[test]
    fn test_parse_sample_snapshot() {
        let snapshot = parse_snapshot(SAMPLE_SNAPSHOT).unwrap();
        assert_eq!(snapshot.commits.len(), 3);
        assert_eq!(snapshot.reviews.len(), 2);
        assert_eq!(snapshot.comments.len(), 2);
        assert_eq!(snapshot.changed_files, 4);
        assert_eq!(snapshot.additions, 120);
        assert_eq!(snapshot.deletions, 15);
        assert_eq!(snapshot.state, types::PrState::Merged);
        assert!(snapshot.merged_at.is_some());
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(matches!(parse_snapshot(""), Err(PrError::EmptyOutput)));
        assert!(matches!(parse_snapshot("  \n"), Err(PrError::EmptyOutput)));
    }

    #[test]
    fn test_parse_non_json_output() {
        assert!(matches!(
            parse_snapshot("no pull requests found"),
            Err(PrError::Parse(_))
        ));
    }

    #[test]
    fn test_gh_args_without_repo() {
        let gh = GhCli::new("gh", None);
        assert_eq!(
            gh.args(42),
            vec!["pr", "view", "42", "--json", GH_JSON_FIELDS]
        );
    }

    #[test]
    fn test_gh_args_with_repo() {
        let gh = GhCli::new("gh", Some("org/repo".to_string()));
        assert_eq!(
            gh.args(7),
            vec!["pr", "view", "7", "--repo", "org/repo", "--json", GH_JSON_FIELDS]
        );
    }

    #[tokio::test]
    async fn test_gh_missing_executable() {
        let gh = GhCli::new("definitely-not-a-real-gh-binary", None);
        let err = gh.fetch(1).await.unwrap_err();
        assert!(matches!(err, PrError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_json_file_source() {
        let path = std::env::temp_dir().join("pr_metrics_test_snapshot.json");
        std::fs::write(&path, SAMPLE_SNAPSHOT).unwrap();

        let source = JsonFile::new(&path);
        assert_eq!(source.name(), "file");
        let snapshot = source.fetch(42).await.unwrap();
        assert_eq!(snapshot.commits.len(), 3);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_json_file_source_missing_file() {
        let source = JsonFile::new(std::env::temp_dir().join("pr_metrics_no_such_file.json"));
        let err = source.fetch(42).await.unwrap_err();
        assert!(matches!(err, PrError::FileRead { .. }));
    }
}
