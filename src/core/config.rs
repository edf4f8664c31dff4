use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

/// Root configuration structure for config.json
///
/// Every field has a built-in default so a missing or partial file still
/// yields a usable configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Podcast RSS feed consumed by the transcription driver
    #[serde(default)]
    pub rss_url: Option<String>,

    /// Local transcript repository the driver writes into
    #[serde(default)]
    pub repo_path: Option<String>,

    #[serde(default = "default_transcripts_dir")]
    pub transcripts_dir: String,

    /// Interpreter used to create the venv and as fallback driver host
    #[serde(default = "default_python_bin")]
    pub python_bin: String,

    #[serde(default = "default_venv_dir")]
    pub venv_dir: String,

    /// Transcription driver script, resolved relative to repo_path when not absolute
    #[serde(default = "default_pipeline_script")]
    pub pipeline_script: String,

    /// Gated diarization model whose access is verified before each run
    #[serde(default = "default_diarization_model")]
    pub diarization_model: String,

    /// Token file shared with the Python stack (huggingface_hub convention)
    #[serde(default = "default_token_file")]
    pub token_file: String,

    #[serde(default = "default_hub_base_url")]
    pub hub_base_url: String,

    /// Python packages `setup init` installs into the venv
    #[serde(default = "default_pip_packages")]
    pub pip_packages: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rss_url: None,
            repo_path: None,
            transcripts_dir: default_transcripts_dir(),
            python_bin: default_python_bin(),
            venv_dir: default_venv_dir(),
            pipeline_script: default_pipeline_script(),
            diarization_model: default_diarization_model(),
            token_file: default_token_file(),
            hub_base_url: default_hub_base_url(),
            pip_packages: default_pip_packages(),
        }
    }
}

fn default_transcripts_dir() -> String {
    "transcripts".to_string()
}

fn default_python_bin() -> String {
    "python3".to_string()
}

fn default_venv_dir() -> String {
    "~/.local/share/podscribe/venv".to_string()
}

fn default_pipeline_script() -> String {
    "run-transcription.py".to_string()
}

fn default_diarization_model() -> String {
    "pyannote/speaker-diarization-3.1".to_string()
}

fn default_token_file() -> String {
    "~/.cache/huggingface/token".to_string()
}

fn default_hub_base_url() -> String {
    "https://huggingface.co".to_string()
}

fn default_pip_packages() -> Vec<String> {
    [
        "openai-whisper",
        "whisperx",
        "pyannote.audio",
        "feedparser",
        "requests",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load the full config, falling back to built-in defaults on any error.
pub fn load_config() -> AppConfig {
    load_config_from_file().unwrap_or_default()
}

/// Attempt to load config from config.json.
fn load_config_from_file() -> crate::Result<AppConfig> {
    let path = paths::config_json()?;

    if !path.exists() {
        return Err(crate::Error::other("config.json not found"));
    }

    let content = crate::utils::io::read_file(&path, "read config.json")?;

    let config: AppConfig = serde_json::from_str(&content)
        .map_err(|e| crate::Error::config_invalid_json(path.display().to_string(), e))?;

    Ok(config)
}

/// Save config to config.json (creates the config directory if missing).
pub fn save_config(config: &AppConfig) -> crate::Result<()> {
    let path = paths::config_json()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            crate::Error::internal_io(e.to_string(), Some(format!("create {}", parent.display())))
        })?;
    }

    let content = serde_json::to_string_pretty(config).map_err(|e| {
        crate::Error::internal_json(e.to_string(), Some("serialize config.json".to_string()))
    })?;

    fs::write(&path, content).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("write {}", path.display())))
    })?;

    Ok(())
}

/// Check if config.json exists
pub fn config_exists() -> bool {
    paths::config_json().map(|p| p.exists()).unwrap_or(false)
}

/// Delete config.json (reset to defaults)
pub fn reset_config() -> crate::Result<bool> {
    let path = paths::config_json()?;

    if path.exists() {
        fs::remove_file(&path).map_err(|e| {
            crate::Error::internal_io(e.to_string(), Some(format!("delete {}", path.display())))
        })?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Get the path to config.json (for display purposes)
pub fn config_path() -> crate::Result<String> {
    Ok(paths::config_json()?.display().to_string())
}

// =============================================================================
// Path helpers
// =============================================================================

/// Expand `~` and environment-free tilde paths to an absolute PathBuf.
pub fn expand_path(value: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(value).into_owned())
}

impl AppConfig {
    /// Repository path, expanded. The `--repo` flag takes precedence.
    pub fn resolve_repo(&self, flag: Option<&str>) -> crate::Result<PathBuf> {
        let raw = flag
            .map(str::to_string)
            .or_else(|| self.repo_path.clone())
            .ok_or_else(|| {
                crate::Error::validation_missing_argument(vec!["repo".to_string()])
                    .with_hint("Pass --repo or set repo_path with 'podscribe config set repo_path <path>'")
            })?;
        Ok(expand_path(&raw))
    }

    /// RSS feed URL. The `--rss` flag takes precedence over the config file.
    pub fn resolve_rss(&self, flag: Option<&str>) -> crate::Result<String> {
        let url = flag
            .map(str::to_string)
            .or_else(|| self.rss_url.clone())
            .ok_or_else(|| {
                crate::Error::validation_missing_argument(vec!["rss".to_string()])
                    .with_hint("Pass --rss or set rss_url with 'podscribe config set rss_url <url>'")
            })?;

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(crate::Error::validation_invalid_argument(
                "rss",
                "RSS feed must be an http(s) URL",
                Some(url),
            ));
        }

        Ok(url)
    }

    /// Transcripts directory inside the repository.
    pub fn transcripts_path(&self, repo: &Path) -> PathBuf {
        repo.join(&self.transcripts_dir)
    }

    /// Expanded venv directory.
    pub fn venv_path(&self) -> PathBuf {
        expand_path(&self.venv_dir)
    }

    /// Expanded token file path.
    pub fn token_file_path(&self) -> PathBuf {
        expand_path(&self.token_file)
    }

    /// Driver script path, resolved against the repository when relative.
    pub fn pipeline_script_path(&self, repo: &Path) -> PathBuf {
        let script = expand_path(&self.pipeline_script);
        if script.is_absolute() {
            script
        } else {
            repo.join(script)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.transcripts_dir, "transcripts");
        assert_eq!(config.diarization_model, "pyannote/speaker-diarization-3.1");
        assert!(config.rss_url.is_none());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"rss_url": "https://example.com/feed.xml"}"#).unwrap();
        assert_eq!(config.rss_url.as_deref(), Some("https://example.com/feed.xml"));
        assert_eq!(config.python_bin, "python3");
    }

    #[test]
    fn resolve_rss_prefers_flag() {
        let config = AppConfig {
            rss_url: Some("https://configured.example/feed".to_string()),
            ..Default::default()
        };
        let url = config
            .resolve_rss(Some("https://flag.example/feed"))
            .unwrap();
        assert_eq!(url, "https://flag.example/feed");
    }

    #[test]
    fn resolve_rss_rejects_non_url() {
        let config = AppConfig::default();
        let err = config.resolve_rss(Some("not-a-url")).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }

    #[test]
    fn resolve_repo_missing_everywhere_fails() {
        let config = AppConfig::default();
        let err = config.resolve_repo(None).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.missing_argument");
    }

    #[test]
    fn pipeline_script_resolves_relative_to_repo() {
        let config = AppConfig::default();
        let repo = Path::new("/srv/podcast-repo");
        assert_eq!(
            config.pipeline_script_path(repo),
            Path::new("/srv/podcast-repo/run-transcription.py")
        );
    }

    #[test]
    fn pipeline_script_keeps_absolute_path() {
        let config = AppConfig {
            pipeline_script: "/opt/scripts/run.py".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.pipeline_script_path(Path::new("/srv/repo")),
            Path::new("/opt/scripts/run.py")
        );
    }
}
