//! Commit-and-push of changed transcripts.
//!
//! "Nothing to commit" is a reported no-op, never an error: the cron host
//! runs this after every pipeline pass whether or not new episodes appeared.

use std::path::Path;

use chrono::Local;
use glob::glob;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::git;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishOutput {
    pub committed: bool,
    pub pushed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    pub message: String,
}

/// Transcript files eligible for staging, as repo-relative paths.
fn transcript_paths(repo: &Path, transcripts_dir: &str) -> Result<Vec<String>> {
    let pattern = repo.join(transcripts_dir).join("*.txt");
    let pattern = pattern.to_string_lossy().to_string();

    let mut paths = Vec::new();
    for entry in glob(&pattern)
        .map_err(|e| Error::internal_unexpected(format!("Invalid glob pattern: {}", e)))?
        .filter_map(|entry| entry.ok())
    {
        if let Ok(relative) = entry.strip_prefix(repo) {
            paths.push(relative.to_string_lossy().to_string());
        }
    }
    paths.sort();

    Ok(paths)
}

/// Stage changed `*.txt` transcripts, commit with a dated message, and push.
///
/// When nothing is staged after the add, reports a no-op and exits cleanly.
pub fn publish(repo: &Path, transcripts_dir: &str, push: bool) -> Result<PublishOutput> {
    if !git::is_repo(repo) {
        return Err(Error::git_command_failed(format!(
            "{} is not a git repository",
            repo.display()
        )));
    }

    let candidates = transcript_paths(repo, transcripts_dir)?;
    git::add(repo, &candidates)?;

    let staged = git::staged_files(repo)?;
    if staged.is_empty() {
        crate::log_status!("publish", "No transcript changes to commit");
        return Ok(PublishOutput {
            committed: false,
            pushed: false,
            files: Vec::new(),
            commit: None,
            message: "No transcript changes to commit".to_string(),
        });
    }

    let message = format!("Update transcripts ({})", Local::now().format("%Y-%m-%d"));
    let commit = git::commit(repo, &message)?;
    crate::log_status!("publish", "Committed {} file(s) as {}", staged.len(), commit);

    let pushed = if push {
        git::push(repo)?;
        crate::log_status!("publish", "Pushed to remote");
        true
    } else {
        false
    };

    Ok(PublishOutput {
        committed: true,
        pushed,
        files: staged,
        commit: Some(commit),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::process::Command;

    fn init_repo(dir: &Path) {
        let run = |args: &[&str]| {
            let status = Command::new("git")
                .args(args)
                .current_dir(dir)
                .output()
                .unwrap();
            assert!(status.status.success(), "git {:?} failed", args);
        };
        run(&["init", "-q"]);
        run(&["config", "user.email", "tests@podscribe.invalid"]);
        run(&["config", "user.name", "podscribe tests"]);
    }

    #[test]
    fn publish_outside_repo_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = publish(dir.path(), "transcripts", false).unwrap_err();
        assert_eq!(err.code.as_str(), "git.command_failed");
    }

    #[test]
    fn publish_with_no_transcripts_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        fs::create_dir_all(dir.path().join("transcripts")).unwrap();

        let output = publish(dir.path(), "transcripts", false).unwrap();

        assert!(!output.committed);
        assert!(!output.pushed);
        assert!(output.message.contains("No transcript changes"));
    }

    #[test]
    fn publish_commits_new_transcripts_then_noops() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        let transcripts = dir.path().join("transcripts");
        fs::create_dir_all(&transcripts).unwrap();
        fs::write(transcripts.join("EP123_._2024-01-01T00.txt"), "transcript").unwrap();

        let first = publish(dir.path(), "transcripts", false).unwrap();
        assert!(first.committed);
        assert_eq!(first.files, vec!["transcripts/EP123_._2024-01-01T00.txt"]);
        assert!(first.commit.is_some());

        let second = publish(dir.path(), "transcripts", false).unwrap();
        assert!(!second.committed);
    }

    #[test]
    fn publish_ignores_non_txt_files() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        let transcripts = dir.path().join("transcripts");
        fs::create_dir_all(&transcripts).unwrap();
        fs::write(transcripts.join("episode.wav"), "audio").unwrap();

        let output = publish(dir.path(), "transcripts", false).unwrap();
        assert!(!output.committed);
    }
}
