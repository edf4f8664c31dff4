use clap::{Args, Subcommand};
use serde::Serialize;

use podscribe::config;
use podscribe::hub::HubClient;
use podscribe::{log_status, token};

use super::CmdResult;

#[derive(Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    command: AuthCommand,
}

#[derive(Subcommand)]
enum AuthCommand {
    /// Validate a Hugging Face token and store it
    Login {
        /// Token (prompted for when omitted)
        #[arg(long)]
        token: Option<String>,
    },

    /// Show token and gated-model access status
    Status,

    /// Remove the stored token
    Logout,
}

#[derive(Serialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum AuthOutput {
    #[serde(rename_all = "camelCase")]
    Login {
        user: Option<String>,
        token: String,
        stored: bool,
    },
    #[serde(rename_all = "camelCase")]
    Status {
        authenticated: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        source: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        user: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        model: Option<podscribe::hub::ModelAccess>,
    },
    #[serde(rename_all = "camelCase")]
    Logout { removed: bool },
}

pub fn run(args: AuthArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<AuthOutput> {
    match args.command {
        AuthCommand::Login { token } => run_login(token),
        AuthCommand::Status => run_status(),
        AuthCommand::Logout => run_logout(),
    }
}

fn run_login(token_flag: Option<String>) -> CmdResult<AuthOutput> {
    let config = config::load_config();

    let (value, source) = match token_flag {
        Some(value) => (value, token::TokenSource::Flag),
        None => {
            if !crate::tty::require_tty_for_interactive() {
                return Err(podscribe::Error::token_missing(token::sources_tried()));
            }
            (
                crate::tty::prompt_secret("Hugging Face token: ")?,
                token::TokenSource::Prompt,
            )
        }
    };

    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(podscribe::Error::token_missing(token::sources_tried()));
    }

    if !token::looks_like_hub_token(&value) {
        log_status!("auth", "Token does not look like an hf_ token; storing anyway");
    }

    let client = HubClient::new(&config.hub_base_url);
    let whoami = client.whoami(&value)?;

    token::store(&config, &value)?;
    log_status!(
        "auth",
        "Token stored for {}",
        whoami.name.as_deref().unwrap_or("unknown user")
    );

    let resolved = token::ResolvedToken { value, source };

    Ok((
        AuthOutput::Login {
            user: whoami.name,
            token: resolved.masked(),
            stored: true,
        },
        0,
    ))
}

fn run_status() -> CmdResult<AuthOutput> {
    let config = config::load_config();
    let env = super::env_token();

    let Some(resolved) = token::resolve(None, env.as_deref(), &config)? else {
        return Ok((
            AuthOutput::Status {
                authenticated: false,
                source: None,
                user: None,
                model: None,
            },
            0,
        ));
    };

    let client = HubClient::new(&config.hub_base_url);
    let whoami = client.whoami(&resolved.value)?;
    let model = client.check_model_access(&config.diarization_model, &resolved.value)?;

    Ok((
        AuthOutput::Status {
            authenticated: true,
            source: Some(resolved.source.as_str().to_string()),
            user: whoami.name,
            model: Some(model),
        },
        0,
    ))
}

fn run_logout() -> CmdResult<AuthOutput> {
    let config = config::load_config();
    let removed = token::forget(&config)?;

    Ok((AuthOutput::Logout { removed }, 0))
}
