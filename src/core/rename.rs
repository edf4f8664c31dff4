use std::fs;
use std::path::Path;

use glob::glob;
use serde::Serialize;

use crate::error::{Error, Result};

/// Width of the timestamp-style prefix the transcription driver puts on every
/// transcript filename (e.g. `2024-01-01T00`).
pub const PREFIX_LEN: usize = 13;

/// Separator inserted between the relocated parts. Its presence in a stem
/// also marks the file as already processed, which keeps the pass idempotent.
pub const PREFIX_MARKER: &str = "_._";

/// Strip every character outside `[A-Za-z0-9._-]`, preserving the relative
/// order of retained characters.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}

/// Move the fixed-width leading prefix to the end of the stem.
///
/// `2024-01-01T00_EP123` becomes `EP123_._2024-01-01T00`. The single
/// separator underscore after the prefix is consumed so the original stem is
/// recoverable by splitting on the last `_._` and re-joining with `_`.
///
/// Returns `None` when the stem should be left alone: it already carries the
/// marker, or it is too short to contain a prefix plus a non-empty remainder.
/// Short stems are a driver-side anomaly that is surfaced to the caller
/// rather than guessed at.
pub fn relocate_prefix(stem: &str) -> Option<String> {
    if stem.contains(PREFIX_MARKER) {
        return None;
    }

    if stem.len() <= PREFIX_LEN || !stem.is_char_boundary(PREFIX_LEN) {
        return None;
    }

    let (prefix, rest) = stem.split_at(PREFIX_LEN);
    let rest = rest.strip_prefix('_').unwrap_or(rest);
    if rest.is_empty() {
        return None;
    }

    Some(format!("{}{}{}", rest, PREFIX_MARKER, prefix))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenamedFile {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameSummary {
    pub scanned: usize,
    pub renamed: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenamePass {
    pub directory: String,
    pub summary: RenameSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub renamed: Vec<RenamedFile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
}

/// Normalize every `*.txt` transcript directly under `dir`, sequentially.
///
/// Each file gets its name sanitized and its timestamp prefix relocated.
/// Files whose normalized name collides with an existing file are skipped and
/// reported; the pass continues with the remaining files.
pub fn normalize_dir(dir: &Path) -> Result<RenamePass> {
    if !dir.is_dir() {
        return Err(Error::validation_invalid_argument(
            "transcripts_dir",
            "Transcripts directory does not exist",
            Some(dir.display().to_string()),
        ));
    }

    let pattern = dir.join("*.txt");
    let pattern = pattern.to_string_lossy().to_string();

    let mut entries: Vec<_> = glob(&pattern)
        .map_err(|e| Error::internal_unexpected(format!("Invalid glob pattern: {}", e)))?
        .filter_map(|entry| entry.ok())
        .collect();
    entries.sort();

    let mut renamed = Vec::new();
    let mut skipped = Vec::new();
    let mut unchanged = 0usize;
    let scanned = entries.len();

    for path in entries {
        let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };

        let stem = file_name.strip_suffix(".txt").unwrap_or(&file_name);
        let clean = sanitize_name(stem);

        let target_stem = match relocate_prefix(&clean) {
            Some(relocated) => relocated,
            None if clean.contains(PREFIX_MARKER) => clean,
            None if clean.len() <= PREFIX_LEN => {
                if clean != stem {
                    // Too short to relocate, but still worth sanitizing.
                    clean
                } else {
                    skipped.push(SkippedFile {
                        file: file_name,
                        reason: format!("stem shorter than {}-char prefix", PREFIX_LEN),
                    });
                    continue;
                }
            }
            None => clean,
        };

        let target_name = format!("{}.txt", target_stem);
        if target_name == file_name {
            unchanged += 1;
            continue;
        }

        let target = dir.join(&target_name);
        if target.exists() {
            skipped.push(SkippedFile {
                file: file_name,
                reason: format!("target '{}' already exists", target_name),
            });
            continue;
        }

        fs::rename(&path, &target).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("rename {}", file_name)))
        })?;

        renamed.push(RenamedFile {
            from: file_name,
            to: target_name,
        });
    }

    Ok(RenamePass {
        directory: dir.display().to_string(),
        summary: RenameSummary {
            scanned,
            renamed: renamed.len(),
            unchanged,
            skipped: skipped.len(),
        },
        renamed,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_allowed_characters() {
        assert_eq!(sanitize_name("ep-1_final.v2.txt"), "ep-1_final.v2.txt");
    }

    #[test]
    fn sanitize_strips_outside_characters_preserving_order() {
        assert_eq!(sanitize_name("EP 12#3 (live!)"), "EP123live");
        assert_eq!(sanitize_name("über-cast"), "ber-cast");
    }

    #[test]
    fn relocate_moves_prefix_to_suffix() {
        assert_eq!(
            relocate_prefix("2024-01-01T00_EP123").as_deref(),
            Some("EP123_._2024-01-01T00")
        );
    }

    #[test]
    fn relocate_without_separator_keeps_rest_intact() {
        assert_eq!(
            relocate_prefix("2024-01-01T00EP123").as_deref(),
            Some("EP123_._2024-01-01T00")
        );
    }

    #[test]
    fn relocate_skips_marked_stems() {
        assert_eq!(relocate_prefix("EP123_._2024-01-01T00"), None);
    }

    #[test]
    fn relocate_skips_short_stems() {
        assert_eq!(relocate_prefix("EP1"), None);
        assert_eq!(relocate_prefix("2024-01-01T00"), None);
        assert_eq!(relocate_prefix("2024-01-01T00_"), None);
    }

    #[test]
    fn relocation_is_reversible() {
        let original = "2024-01-01T00_EP123";
        let relocated = relocate_prefix(original).unwrap();

        let (rest, prefix) = relocated.rsplit_once(PREFIX_MARKER).unwrap();
        assert_eq!(format!("{}_{}", prefix, rest), original);
    }

    #[test]
    fn normalize_dir_relocates_timestamp_prefix() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("2024-01-01T00_EP123.txt"), "transcript").unwrap();

        let pass = normalize_dir(dir.path()).unwrap();

        assert_eq!(pass.summary.renamed, 1);
        assert_eq!(pass.renamed[0].to, "EP123_._2024-01-01T00.txt");
        assert!(dir.path().join("EP123_._2024-01-01T00.txt").exists());
    }

    #[test]
    fn normalize_dir_sanitizes_before_relocating() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("2024-01-01T00_EP 12#3.txt"), "x").unwrap();

        let pass = normalize_dir(dir.path()).unwrap();

        assert_eq!(pass.renamed[0].to, "EP123_._2024-01-01T00.txt");
    }

    #[test]
    fn normalize_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("2024-01-01T00_EP123.txt"), "x").unwrap();

        normalize_dir(dir.path()).unwrap();
        let second = normalize_dir(dir.path()).unwrap();

        assert_eq!(second.summary.renamed, 0);
        assert_eq!(second.summary.unchanged, 1);
        assert!(dir.path().join("EP123_._2024-01-01T00.txt").exists());
    }

    #[test]
    fn normalize_dir_reports_short_stems() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let pass = normalize_dir(dir.path()).unwrap();

        assert_eq!(pass.summary.skipped, 1);
        assert!(pass.skipped[0].reason.contains("prefix"));
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn normalize_dir_reports_collisions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("2024-01-01T00_EP123.txt"), "new").unwrap();
        fs::write(dir.path().join("EP123_._2024-01-01T00.txt"), "old").unwrap();

        let pass = normalize_dir(dir.path()).unwrap();

        assert_eq!(pass.summary.renamed, 0);
        assert_eq!(pass.summary.skipped, 1);
        assert!(pass.skipped[0].reason.contains("already exists"));
    }

    #[test]
    fn normalize_dir_ignores_non_txt_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("2024-01-01T00_EP123.wav"), "x").unwrap();

        let pass = normalize_dir(dir.path()).unwrap();

        assert_eq!(pass.summary.scanned, 0);
        assert!(dir.path().join("2024-01-01T00_EP123.wav").exists());
    }

    #[test]
    fn normalize_dir_missing_directory_fails() {
        let err = normalize_dir(Path::new("/nonexistent/transcripts")).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }
}
