//! Hugging Face Hub client.
//!
//! Two requests only: token validation (`whoami-v2`) and the gated-model
//! access check that must pass before the diarization pipeline is worth
//! starting. Single attempt each, no retries.

use reqwest::blocking::{Client, Response};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{Error, Result};

fn http_error(e: reqwest::Error) -> Error {
    Error::hub_request_failed(
        format!("Hub request failed: {}", e),
        json!({ "error": e.to_string() }),
    )
}

fn api_error(status: u16, body: &str) -> Error {
    Error::hub_request_failed(
        format!("Hub API error: HTTP {}", status),
        json!({ "status": status, "body": body }),
    )
}

fn parse_error(msg: impl Into<String>) -> Error {
    Error::internal_json(msg, Some("parse hub response".to_string()))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoAmI {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelAccess {
    pub model_id: String,
    pub accessible: bool,
    /// Gating mode reported by the hub ("auto", "manual") when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gated: Option<String>,
}

/// Outcome of classifying a model-info response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStatus {
    Accessible,
    Gated,
    Failed,
}

/// 200 means the token can read the model; 401/403 mean the token is valid
/// syntax but the user has not accepted the model terms (or the token lacks
/// read scope). Anything else is a plain request failure.
pub fn classify_access_status(status: u16) -> AccessStatus {
    match status {
        200..=299 => AccessStatus::Accessible,
        401 | 403 => AccessStatus::Gated,
        _ => AccessStatus::Failed,
    }
}

/// Blocking client for the Hugging Face Hub API.
pub struct HubClient {
    client: Client,
    base_url: String,
}

impl HubClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Validate a token against `/api/whoami-v2`.
    pub fn whoami(&self, token: &str) -> Result<WhoAmI> {
        let url = format!("{}/api/whoami-v2", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .map_err(http_error)?;

        let status = response.status();
        if status.as_u16() == 401 {
            return Err(Error::token_invalid("Hub rejected the token (HTTP 401)"));
        }

        let body = parse_json_response(response)?;
        Ok(WhoAmI {
            name: body
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string),
            kind: body
                .get("type")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    /// Check that the token grants read access to a (gated) model.
    pub fn check_model_access(&self, model_id: &str, token: &str) -> Result<ModelAccess> {
        let url = format!("{}/api/models/{}", self.base_url, model_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .map_err(http_error)?;

        let status = response.status().as_u16();
        match classify_access_status(status) {
            AccessStatus::Accessible => {
                let body = parse_json_response(response)?;
                let gated = match body.get("gated") {
                    Some(Value::String(mode)) => Some(mode.clone()),
                    // The hub reports `false` for ungated models.
                    _ => None,
                };
                Ok(ModelAccess {
                    model_id: model_id.to_string(),
                    accessible: true,
                    gated,
                })
            }
            AccessStatus::Gated => Err(Error::hub_model_gated(model_id, status)),
            AccessStatus::Failed => {
                let body = response.text().unwrap_or_default();
                Err(api_error(status, &body))
            }
        }
    }
}

fn parse_json_response(response: Response) -> Result<Value> {
    let status = response.status();
    let body = response.text().map_err(http_error)?;

    if !status.is_success() {
        return Err(api_error(status.as_u16(), &body));
    }

    serde_json::from_str(&body).map_err(|e| parse_error(format!("Invalid JSON response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_statuses_are_accessible() {
        assert_eq!(classify_access_status(200), AccessStatus::Accessible);
    }

    #[test]
    fn auth_statuses_mean_gated() {
        assert_eq!(classify_access_status(401), AccessStatus::Gated);
        assert_eq!(classify_access_status(403), AccessStatus::Gated);
    }

    #[test]
    fn other_statuses_are_failures() {
        assert_eq!(classify_access_status(404), AccessStatus::Failed);
        assert_eq!(classify_access_status(500), AccessStatus::Failed);
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = HubClient::new("https://huggingface.co/");
        assert_eq!(client.base_url, "https://huggingface.co");
    }
}
