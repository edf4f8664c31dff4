use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};
use crate::utils::command::{error_text, run_in};

// ============================================================================
// Low-level Git Primitives (path-based)
// ============================================================================

/// Check whether a directory is inside a git work tree.
pub fn is_repo(path: &Path) -> bool {
    let output = Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(path)
        .output();

    match output {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}

/// Check if a git working directory has no uncommitted changes.
pub fn is_workdir_clean(path: &Path) -> bool {
    let output = Command::new("git")
        .args(["status", "--porcelain"])
        .current_dir(path)
        .output();

    match output {
        Ok(output) => output.status.success() && output.stdout.is_empty(),
        Err(_) => false,
    }
}

/// Stage the given paths (relative to the repository root).
pub fn add(repo: &Path, paths: &[String]) -> Result<()> {
    if paths.is_empty() {
        return Ok(());
    }

    let mut args: Vec<&str> = vec!["add", "--"];
    args.extend(paths.iter().map(String::as_str));

    let output = Command::new("git")
        .args(&args)
        .current_dir(repo)
        .output()
        .map_err(|e| Error::git_command_failed(format!("Failed to run git add: {}", e)))?;

    if !output.status.success() {
        return Err(Error::git_command_failed(format!(
            "git add failed: {}",
            error_text(&output)
        )));
    }

    Ok(())
}

/// List staged file paths (`git diff --cached --name-only`).
pub fn staged_files(repo: &Path) -> Result<Vec<String>> {
    let stdout = run_in(
        repo,
        "git",
        &["diff", "--cached", "--name-only"],
        "git diff --cached",
    )
    .map_err(|e| Error::git_command_failed(e.message))?;

    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Commit staged changes, returning the short hash of the new commit.
pub fn commit(repo: &Path, message: &str) -> Result<String> {
    let output = Command::new("git")
        .args(["commit", "-m", message])
        .current_dir(repo)
        .output()
        .map_err(|e| Error::git_command_failed(format!("Failed to run git commit: {}", e)))?;

    if !output.status.success() {
        return Err(Error::git_command_failed(format!(
            "git commit failed: {}",
            error_text(&output)
        )));
    }

    run_in(
        repo,
        "git",
        &["rev-parse", "--short", "HEAD"],
        "git rev-parse",
    )
    .map_err(|e| Error::git_command_failed(e.message))
}

/// Push local commits to the default remote.
pub fn push(repo: &Path) -> Result<()> {
    let output = Command::new("git")
        .args(["push"])
        .current_dir(repo)
        .output()
        .map_err(|e| Error::git_command_failed(format!("Failed to run git push: {}", e)))?;

    if !output.status.success() {
        return Err(Error::git_command_failed(format!(
            "git push failed: {}",
            error_text(&output)
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_repo_false_for_plain_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_repo(dir.path()));
    }

    #[test]
    fn add_with_no_paths_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        // No git repo here, but an empty path list never shells out.
        assert!(add(dir.path(), &[]).is_ok());
    }

    #[test]
    fn workdir_clean_false_outside_repo() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_workdir_clean(dir.path()));
    }
}
