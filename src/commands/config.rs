use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;

use podscribe::config::{self, AppConfig};

use super::CmdResult;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display configuration (merged defaults + file)
    Show,
    /// Set a configuration field
    Set {
        /// Field name (e.g., rss_url, repo_path, venv_dir)
        key: String,
        /// Value (JSON accepted, plain strings otherwise)
        value: String,
    },
    /// Reset configuration to built-in defaults (deletes config.json)
    Reset,
    /// Show the path to config.json
    Path,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<AppConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deleted: Option<bool>,
}

impl ConfigOutput {
    fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            config: None,
            path: None,
            exists: None,
            key: None,
            value: None,
            deleted: None,
        }
    }
}

pub fn run(args: ConfigArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show => show(),
        ConfigCommand::Set { key, value } => set(&key, &value),
        ConfigCommand::Reset => reset(),
        ConfigCommand::Path => path(),
    }
}

fn show() -> CmdResult<ConfigOutput> {
    let mut output = ConfigOutput::new("config.show");
    output.config = Some(config::load_config());
    Ok((output, 0))
}

fn set(key: &str, value_str: &str) -> CmdResult<ConfigOutput> {
    // Accept JSON values (arrays for pip_packages), plain strings otherwise.
    let value: Value = serde_json::from_str(value_str)
        .unwrap_or_else(|_| Value::String(value_str.to_string()));

    let current = config::load_config();
    let mut raw = serde_json::to_value(&current).map_err(|e| {
        podscribe::Error::internal_json(e.to_string(), Some("serialize config".to_string()))
    })?;

    let Some(obj) = raw.as_object_mut() else {
        return Err(podscribe::Error::internal_unexpected(
            "Config did not serialize to an object",
        ));
    };

    if !obj.contains_key(key) {
        let known = obj.keys().cloned().collect::<Vec<_>>().join(", ");
        return Err(podscribe::Error::validation_invalid_argument(
            "key",
            format!("Unknown config field (known fields: {})", known),
            Some(key.to_string()),
        ));
    }

    obj.insert(key.to_string(), value.clone());

    let updated: AppConfig = serde_json::from_value(raw).map_err(|e| {
        podscribe::Error::config_invalid_value(
            key,
            Some(value_str.to_string()),
            format!("Value does not fit the field: {}", e),
        )
    })?;

    config::save_config(&updated)?;

    let mut output = ConfigOutput::new("config.set");
    output.key = Some(key.to_string());
    output.value = Some(value);
    output.config = Some(updated);
    Ok((output, 0))
}

fn reset() -> CmdResult<ConfigOutput> {
    let deleted = config::reset_config()?;
    let mut output = ConfigOutput::new("config.reset");
    output.deleted = Some(deleted);
    Ok((output, 0))
}

fn path() -> CmdResult<ConfigOutput> {
    let mut output = ConfigOutput::new("config.path");
    output.path = Some(config::config_path()?);
    output.exists = Some(config::config_exists());
    Ok((output, 0))
}
