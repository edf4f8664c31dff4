//! External transcription driver invocation.
//!
//! The driver is a Python program (Whisper + WhisperX + pyannote) treated as
//! a black box: build its command line, stream its output to the terminal,
//! map a nonzero exit to an error. Nothing is retried.

use std::path::Path;
use std::process::{Command, Stdio};

use serde::Serialize;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::setup::venv_python;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    pub command: String,
    pub exit_code: i32,
}

/// Driver arguments for the given feed and repository.
pub fn driver_args(rss: &str, repo: &Path, token: Option<&str>) -> Vec<String> {
    let mut args = vec![
        "--rss".to_string(),
        rss.to_string(),
        "--repo".to_string(),
        repo.display().to_string(),
    ];

    if let Some(token) = token {
        args.push("--token".to_string());
        args.push(token.to_string());
    }

    args
}

/// Invoke the transcription driver and wait for it to finish.
///
/// Uses the venv interpreter when present, falling back to the configured
/// system interpreter. `HF_TOKEN` is exported to the child so the driver's
/// own hub requests authenticate with the same token.
pub fn run(config: &AppConfig, rss: &str, repo: &Path, token: Option<&str>) -> Result<PipelineOutput> {
    let script = config.pipeline_script_path(repo);
    if !script.is_file() {
        return Err(Error::validation_invalid_argument(
            "pipeline_script",
            "Transcription driver script not found",
            Some(script.display().to_string()),
        ));
    }

    let venv_interpreter = venv_python(&config.venv_path());
    let interpreter = if venv_interpreter.is_file() {
        venv_interpreter.display().to_string()
    } else {
        config.python_bin.clone()
    };

    let args = driver_args(rss, repo, token);
    let display = format!("{} {} {}", interpreter, script.display(), args.join(" "));

    crate::log_status!("pipeline", "Running transcription driver");

    let mut command = Command::new(&interpreter);
    command
        .arg(&script)
        .args(&args)
        .current_dir(repo)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    if let Some(token) = token {
        command.env("HF_TOKEN", token);
    }

    let status = command
        .status()
        .map_err(|e| Error::internal_io(format!("Failed to run driver: {}", e), Some("pipeline".to_string())))?;

    let exit_code = status.code().unwrap_or(-1);
    if !status.success() {
        return Err(Error::pipeline_failed(display, exit_code));
    }

    Ok(PipelineOutput {
        command: display,
        exit_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_args_without_token() {
        let args = driver_args("https://example.com/feed.xml", Path::new("/srv/repo"), None);
        assert_eq!(
            args,
            vec!["--rss", "https://example.com/feed.xml", "--repo", "/srv/repo"]
        );
    }

    #[test]
    fn driver_args_with_token() {
        let args = driver_args(
            "https://example.com/feed.xml",
            Path::new("/srv/repo"),
            Some("hf_secret1234567890"),
        );
        assert_eq!(args[4], "--token");
        assert_eq!(args[5], "hf_secret1234567890");
    }

    #[test]
    fn missing_script_is_rejected_before_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::default();

        let err = run(&config, "https://example.com/feed.xml", dir.path(), None).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }
}
