use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Serialize;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::utils::command::spawnable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SetupSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupIssue {
    pub severity: SetupSeverity,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupSummary {
    pub checks_run: usize,
    pub errors: usize,
    pub warnings: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupReport {
    pub command: String,
    pub ready: bool,
    pub summary: SetupSummary,
    pub issues: Vec<SetupIssue>,
}

/// Interpreter inside a virtual environment.
pub fn venv_python(venv_dir: &Path) -> PathBuf {
    #[cfg(windows)]
    {
        venv_dir.join("Scripts").join("python.exe")
    }

    #[cfg(not(windows))]
    {
        venv_dir.join("bin").join("python")
    }
}

struct Checker {
    issues: Vec<SetupIssue>,
    checks_run: usize,
}

impl Checker {
    fn new() -> Self {
        Self {
            issues: Vec::new(),
            checks_run: 0,
        }
    }

    fn push(
        &mut self,
        severity: SetupSeverity,
        code: &str,
        message: impl Into<String>,
        hint: Option<String>,
    ) {
        self.issues.push(SetupIssue {
            severity,
            code: code.to_string(),
            message: message.into(),
            hint,
        });
    }

    fn check_executable(&mut self, name: &str, probe_arg: &str, install_hint: &str) {
        self.checks_run += 1;
        if !spawnable(name, probe_arg) {
            self.push(
                SetupSeverity::Error,
                "MISSING_EXECUTABLE",
                format!("'{}' not found on PATH", name),
                Some(install_hint.to_string()),
            );
        }
    }

    fn check_gpu(&mut self) {
        self.checks_run += 1;
        if !spawnable("nvidia-smi", "-L") {
            self.push(
                SetupSeverity::Warning,
                "NO_GPU_TOOLING",
                "'nvidia-smi' not found; transcription will run on CPU",
                Some("Install the NVIDIA driver and CUDA toolkit for GPU transcription".to_string()),
            );
        }
    }

    fn check_venv(&mut self, config: &AppConfig) {
        self.checks_run += 1;
        let venv_dir = config.venv_path();
        let python = venv_python(&venv_dir);

        if !venv_dir.is_dir() {
            self.push(
                SetupSeverity::Error,
                "VENV_MISSING",
                format!("Virtual environment not found at {}", venv_dir.display()),
                Some("Run 'podscribe setup init' to create it".to_string()),
            );
        } else if !python.is_file() {
            self.push(
                SetupSeverity::Error,
                "VENV_BROKEN",
                format!(
                    "Virtual environment at {} has no interpreter",
                    venv_dir.display()
                ),
                Some("Delete the directory and run 'podscribe setup init' again".to_string()),
            );
        }
    }

    fn check_token(&mut self, config: &AppConfig) {
        self.checks_run += 1;
        let token_file = config.token_file_path();
        let has_env = std::env::var("HF_TOKEN").map(|v| !v.is_empty()).unwrap_or(false);

        if !has_env && !token_file.is_file() {
            self.push(
                SetupSeverity::Info,
                "NO_STORED_TOKEN",
                "No Hugging Face token found in the environment or token file",
                Some("Run 'podscribe auth login' before transcribing".to_string()),
            );
        }
    }

    fn finish(self, command: &str) -> SetupReport {
        let errors = self
            .issues
            .iter()
            .filter(|i| i.severity == SetupSeverity::Error)
            .count();
        let warnings = self
            .issues
            .iter()
            .filter(|i| i.severity == SetupSeverity::Warning)
            .count();

        SetupReport {
            command: command.to_string(),
            ready: errors == 0,
            summary: SetupSummary {
                checks_run: self.checks_run,
                errors,
                warnings,
            },
            issues: self.issues,
        }
    }
}

/// Inspect the environment the transcription pipeline needs. Pure inspection:
/// running it twice changes nothing.
pub fn check(config: &AppConfig) -> SetupReport {
    let mut checker = Checker::new();

    checker.check_executable("git", "--version", "Install git via your system package manager");
    checker.check_executable(
        "ffmpeg",
        "-version",
        "Install ffmpeg via your system package manager",
    );
    checker.check_executable(
        &config.python_bin,
        "--version",
        "Install Python 3 via your system package manager",
    );
    checker.check_gpu();
    checker.check_venv(config);
    checker.check_token(config);

    checker.finish("setup.check")
}

/// Fail when the report contains error-severity issues.
pub fn ensure_ready(report: &SetupReport) -> Result<()> {
    if report.ready {
        return Ok(());
    }

    let first = report
        .issues
        .iter()
        .find(|i| i.severity == SetupSeverity::Error);

    match first {
        Some(issue) => {
            let mut err = Error::setup_missing_dependency(issue.message.clone(), Some(issue.code.clone()));
            if let Some(hint) = &issue.hint {
                err = err.with_hint(hint.clone());
            }
            Err(err)
        }
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupInitOutput {
    pub command: String,
    pub venv_dir: String,
    pub created: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub installed: Vec<String>,
}

/// Create the virtual environment and install the pipeline's Python
/// dependencies into it. Both steps skip work that is already done.
pub fn init(config: &AppConfig) -> Result<SetupInitOutput> {
    let venv_dir = config.venv_path();
    let python = venv_python(&venv_dir);

    let created = if python.is_file() {
        crate::log_status!("setup", "Virtual environment already present, skipping creation");
        false
    } else {
        crate::log_status!("setup", "Creating virtual environment at {}", venv_dir.display());
        run_streaming(
            Command::new(&config.python_bin)
                .arg("-m")
                .arg("venv")
                .arg(&venv_dir),
            "python -m venv",
        )?;
        true
    };

    if !python.is_file() {
        return Err(Error::setup_venv_failed(format!(
            "Virtual environment at {} has no interpreter after creation",
            venv_dir.display()
        )));
    }

    let mut installed = Vec::new();
    if !config.pip_packages.is_empty() {
        crate::log_status!(
            "setup",
            "Installing {} packages into the virtual environment",
            config.pip_packages.len()
        );
        run_streaming(
            Command::new(&python)
                .arg("-m")
                .arg("pip")
                .arg("install")
                .args(&config.pip_packages),
            "pip install",
        )?;
        installed = config.pip_packages.clone();
    }

    Ok(SetupInitOutput {
        command: "setup.init".to_string(),
        venv_dir: venv_dir.display().to_string(),
        created,
        installed,
    })
}

/// Run a setup subprocess with progress streamed to the terminal.
fn run_streaming(command: &mut Command, context: &str) -> Result<()> {
    let status = command
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| Error::setup_venv_failed(format!("Failed to run {}: {}", context, e)))?;

    if !status.success() {
        return Err(Error::setup_venv_failed(format!(
            "{} exited with status {}",
            context,
            status.code().unwrap_or(-1)
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_venv(venv: &Path) -> AppConfig {
        AppConfig {
            venv_dir: venv.display().to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn missing_venv_is_an_error_issue() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_venv(&dir.path().join("no-such-venv"));

        let report = check(&config);

        assert!(report
            .issues
            .iter()
            .any(|i| i.code == "VENV_MISSING" && i.severity == SetupSeverity::Error));
        assert!(!report.ready);
    }

    #[test]
    fn venv_without_interpreter_is_broken() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_venv(dir.path());

        let report = check(&config);

        assert!(report.issues.iter().any(|i| i.code == "VENV_BROKEN"));
    }

    #[test]
    fn missing_interpreter_is_an_error_issue() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            python_bin: "nonexistent_python_xyz".to_string(),
            venv_dir: dir.path().display().to_string(),
            ..Default::default()
        };

        let report = check(&config);

        assert!(report
            .issues
            .iter()
            .any(|i| i.code == "MISSING_EXECUTABLE"
                && i.message.contains("nonexistent_python_xyz")));
    }

    #[test]
    fn ensure_ready_surfaces_first_error() {
        let report = SetupReport {
            command: "setup.check".to_string(),
            ready: false,
            summary: SetupSummary {
                checks_run: 1,
                errors: 1,
                warnings: 0,
            },
            issues: vec![SetupIssue {
                severity: SetupSeverity::Error,
                code: "MISSING_EXECUTABLE".to_string(),
                message: "'ffmpeg' not found on PATH".to_string(),
                hint: Some("Install ffmpeg".to_string()),
            }],
        };

        let err = ensure_ready(&report).unwrap_err();
        assert_eq!(err.code.as_str(), "setup.missing_dependency");
        assert!(err.message.contains("ffmpeg"));
    }

    #[test]
    fn ensure_ready_passes_clean_report() {
        let report = SetupReport {
            command: "setup.check".to_string(),
            ready: true,
            summary: SetupSummary {
                checks_run: 6,
                errors: 0,
                warnings: 1,
            },
            issues: Vec::new(),
        };

        assert!(ensure_ready(&report).is_ok());
    }
}
