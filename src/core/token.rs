//! Hugging Face token resolution and storage.
//!
//! Resolution follows an explicit precedence instead of whatever happens to
//! be in the process environment at the time: explicit flag, then the
//! `HF_TOKEN` environment variable, then the system keychain, then the token
//! file shared with the Python stack. The interactive prompt fallback lives
//! in the command layer so this module stays free of terminal I/O.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::Result;
use crate::keychain;
use crate::utils::io::write_file_with_parents;

const KEYCHAIN_ENTRY: &str = "hf_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenSource {
    Flag,
    Env,
    Keychain,
    File,
    Prompt,
}

impl TokenSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSource::Flag => "flag",
            TokenSource::Env => "env",
            TokenSource::Keychain => "keychain",
            TokenSource::File => "file",
            TokenSource::Prompt => "prompt",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedToken {
    pub value: String,
    pub source: TokenSource,
}

impl ResolvedToken {
    /// Display form that never leaks the token itself.
    pub fn masked(&self) -> String {
        let tail: String = self
            .value
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("...{}", tail)
    }
}

/// Resolve a token without prompting.
///
/// `env_token` is the caller-read `HF_TOKEN` value; threading it through as a
/// parameter keeps resolution order explicit and testable. Returns `Ok(None)`
/// when no source yields a token, so the caller can decide between an
/// interactive fallback and a hard failure.
pub fn resolve(
    explicit: Option<&str>,
    env_token: Option<&str>,
    config: &AppConfig,
) -> Result<Option<ResolvedToken>> {
    if let Some(value) = non_empty(explicit) {
        return Ok(Some(ResolvedToken {
            value,
            source: TokenSource::Flag,
        }));
    }

    if let Some(value) = non_empty(env_token) {
        return Ok(Some(ResolvedToken {
            value,
            source: TokenSource::Env,
        }));
    }

    if let Some(value) = keychain::get(KEYCHAIN_ENTRY)? {
        if !value.trim().is_empty() {
            return Ok(Some(ResolvedToken {
                value: value.trim().to_string(),
                source: TokenSource::Keychain,
            }));
        }
    }

    if let Some(value) = read_token_file(&config.token_file_path()) {
        return Ok(Some(ResolvedToken {
            value,
            source: TokenSource::File,
        }));
    }

    Ok(None)
}

/// Sources consulted by [`resolve`], for error reporting.
pub fn sources_tried() -> Vec<String> {
    ["flag", "env", "keychain", "file"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Read a token file in the huggingface_hub convention: the token is the
/// whole file, surrounding whitespace ignored.
pub fn read_token_file(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Store a token in the keychain and mirror it to the token file so the
/// external Python stack authenticates without re-prompting.
pub fn store(config: &AppConfig, value: &str) -> Result<()> {
    keychain::store(KEYCHAIN_ENTRY, value)?;

    let path = config.token_file_path();
    write_file_with_parents(&path, value, "write token file")?;

    Ok(())
}

/// Remove the stored token from both the keychain and the token file.
/// Returns whether anything was actually removed.
pub fn forget(config: &AppConfig) -> Result<bool> {
    let had_keychain = keychain::get(KEYCHAIN_ENTRY)?.is_some();
    keychain::delete(KEYCHAIN_ENTRY)?;

    let path = config.token_file_path();
    let had_file = path.is_file();
    if had_file {
        fs::remove_file(&path).map_err(|e| {
            crate::Error::internal_io(e.to_string(), Some(format!("delete {}", path.display())))
        })?;
    }

    Ok(had_keychain || had_file)
}

/// Hub tokens look like `hf_` followed by alphanumerics. Unknown shapes are
/// accepted (fine-grained tokens have varied over time); this only backs a
/// warning at login.
pub fn looks_like_hub_token(value: &str) -> bool {
    let pattern = Regex::new(r"^hf_[A-Za-z0-9]{10,}$").expect("Invalid token pattern");
    pattern.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_token_file(path: &Path) -> AppConfig {
        AppConfig {
            token_file: path.display().to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn explicit_flag_wins() {
        let dir = tempfile::tempdir().unwrap();
        let token_file = dir.path().join("token");
        fs::write(&token_file, "hf_fromfile123456").unwrap();
        let config = config_with_token_file(&token_file);

        let resolved = resolve(Some("hf_fromflag123456"), Some("hf_fromenv123456"), &config)
            .unwrap()
            .unwrap();

        assert_eq!(resolved.source, TokenSource::Flag);
        assert_eq!(resolved.value, "hf_fromflag123456");
    }

    #[test]
    fn env_beats_file() {
        let dir = tempfile::tempdir().unwrap();
        let token_file = dir.path().join("token");
        fs::write(&token_file, "hf_fromfile123456").unwrap();
        let config = config_with_token_file(&token_file);

        let resolved = resolve(None, Some("hf_fromenv123456"), &config)
            .unwrap()
            .unwrap();

        assert_eq!(resolved.source, TokenSource::Env);
    }

    #[test]
    fn file_is_last_resort_before_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let token_file = dir.path().join("token");
        fs::write(&token_file, "  hf_fromfile123456\n").unwrap();
        let config = config_with_token_file(&token_file);

        let resolved = resolve(None, None, &config).unwrap().unwrap();

        assert_eq!(resolved.source, TokenSource::File);
        assert_eq!(resolved.value, "hf_fromfile123456");
    }

    #[test]
    fn nothing_found_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_token_file(&dir.path().join("absent"));

        let resolved = resolve(None, None, &config).unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn empty_values_do_not_count() {
        let dir = tempfile::tempdir().unwrap();
        let token_file = dir.path().join("token");
        fs::write(&token_file, "   \n").unwrap();
        let config = config_with_token_file(&token_file);

        let resolved = resolve(Some("  "), Some(""), &config).unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn masked_token_shows_only_tail() {
        let token = ResolvedToken {
            value: "hf_abcdefgh1234".to_string(),
            source: TokenSource::Env,
        };
        assert_eq!(token.masked(), "...1234");
        assert!(!token.masked().contains("abcdefgh"));
    }

    #[test]
    fn token_shape_detection() {
        assert!(looks_like_hub_token("hf_AbCdEf123456789x"));
        assert!(!looks_like_hub_token("ghp_notahuggingface1"));
        assert!(!looks_like_hub_token("hf_short"));
    }
}
