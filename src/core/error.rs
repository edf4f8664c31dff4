use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    ValidationMissingArgument,
    ValidationInvalidArgument,

    SetupMissingDependency,
    SetupVenvFailed,

    TokenMissing,
    TokenInvalid,

    HubRequestFailed,
    HubModelGated,

    PipelineFailed,

    GitCommandFailed,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::SetupMissingDependency => "setup.missing_dependency",
            ErrorCode::SetupVenvFailed => "setup.venv_failed",

            ErrorCode::TokenMissing => "token.missing",
            ErrorCode::TokenInvalid => "token.invalid",

            ErrorCode::HubRequestFailed => "hub.request_failed",
            ErrorCode::HubModelGated => "hub.model_gated",

            ErrorCode::PipelineFailed => "pipeline.failed",

            ErrorCode::GitCommandFailed => "git.command_failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingArgumentDetails {
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingDependencyDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMissingDetails {
    pub tried: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatedModelDetails {
    pub model_id: String,
    pub status: u16,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineFailedDetails {
    pub command: String,
    pub exit_code: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn validation_missing_argument(args: Vec<String>) -> Self {
        let details = serde_json::to_value(MissingArgumentDetails { args })
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Self::new(
            ErrorCode::ValidationMissingArgument,
            "Missing required argument",
            details,
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        let details = serde_json::to_value(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
            value,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = serde_json::to_value(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = serde_json::to_value(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ConfigInvalidValue,
            "Invalid configuration value",
            details,
        )
    }

    pub fn setup_missing_dependency(message: impl Into<String>, check: Option<String>) -> Self {
        let details = serde_json::to_value(MissingDependencyDetails { check })
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::SetupMissingDependency, message, details)
            .with_hint("Run 'podscribe setup check' for the full environment report")
    }

    pub fn setup_venv_failed(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::SetupVenvFailed,
            message,
            Value::Object(serde_json::Map::new()),
        )
    }

    pub fn token_missing(tried: Vec<String>) -> Self {
        let details = serde_json::to_value(TokenMissingDetails { tried })
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::TokenMissing,
            "No Hugging Face token available",
            details,
        )
        .with_hint("Run 'podscribe auth login' to store a token")
        .with_hint("Or set the HF_TOKEN environment variable")
    }

    pub fn token_invalid(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::TokenInvalid,
            message,
            Value::Object(serde_json::Map::new()),
        )
        .with_hint("Generate a new token at https://huggingface.co/settings/tokens")
    }

    pub fn hub_request_failed(message: impl Into<String>, details: Value) -> Self {
        Self::new(ErrorCode::HubRequestFailed, message, details)
    }

    pub fn hub_model_gated(model_id: impl Into<String>, status: u16) -> Self {
        let model_id = model_id.into();
        let details = serde_json::to_value(GatedModelDetails {
            model_id: model_id.clone(),
            status,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::HubModelGated,
            format!("No access to gated model '{}'", model_id),
            details,
        )
        .with_hint(format!(
            "Accept the model terms at https://huggingface.co/{}",
            model_id
        ))
    }

    pub fn pipeline_failed(command: impl Into<String>, exit_code: i32) -> Self {
        let details = serde_json::to_value(PipelineFailedDetails {
            command: command.into(),
            exit_code,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::PipelineFailed,
            format!("Transcription pipeline exited with status {}", exit_code),
            details,
        )
    }

    pub fn git_command_failed(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::GitCommandFailed,
            message,
            Value::Object(serde_json::Map::new()),
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = serde_json::to_value(InternalIoErrorDetails {
            error: error.into(),
            context,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = serde_json::to_value(InternalJsonErrorDetails {
            error: error.into(),
            context,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::internal_unexpected(message)
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_dotted_strings() {
        assert_eq!(ErrorCode::TokenMissing.as_str(), "token.missing");
        assert_eq!(ErrorCode::HubModelGated.as_str(), "hub.model_gated");
        assert_eq!(ErrorCode::PipelineFailed.as_str(), "pipeline.failed");
    }

    #[test]
    fn gated_error_carries_model_hint() {
        let err = Error::hub_model_gated("pyannote/speaker-diarization-3.1", 403);
        assert_eq!(err.code, ErrorCode::HubModelGated);
        assert!(err
            .hints
            .iter()
            .any(|h| h.message.contains("pyannote/speaker-diarization-3.1")));
        assert_eq!(err.details["status"], 403);
    }

    #[test]
    fn token_missing_records_sources_tried() {
        let err = Error::token_missing(vec!["flag".into(), "env".into(), "file".into()]);
        assert_eq!(err.details["tried"][1], "env");
        assert!(!err.hints.is_empty());
    }
}
