pub type CmdResult<T> = podscribe::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod auth;
pub mod config;
pub mod publish;
pub mod rename;
pub mod run;
pub mod setup;
pub mod transcribe;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (podscribe::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Setup(args) => dispatch!(args, global, setup),
        crate::Commands::Auth(args) => dispatch!(args, global, auth),
        crate::Commands::Transcribe(args) => dispatch!(args, global, transcribe),
        crate::Commands::Rename(args) => dispatch!(args, global, rename),
        crate::Commands::Publish(args) => dispatch!(args, global, publish),
        crate::Commands::Run(args) => dispatch!(args, global, run),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}

/// Read `HF_TOKEN` once at the command boundary so resolution order stays
/// explicit further down.
pub(crate) fn env_token() -> Option<String> {
    std::env::var("HF_TOKEN").ok().filter(|v| !v.is_empty())
}

/// Resolve a token with the interactive prompt as the final fallback.
///
/// Precedence: flag, environment, keychain, token file, prompt. When no
/// source yields a token and stdin is not a TTY this fails without invoking
/// anything.
pub(crate) fn resolve_token_or_prompt(
    explicit: Option<&str>,
    config: &podscribe::config::AppConfig,
) -> podscribe::Result<podscribe::token::ResolvedToken> {
    let env = env_token();
    if let Some(resolved) = podscribe::token::resolve(explicit, env.as_deref(), config)? {
        return Ok(resolved);
    }

    if !crate::tty::require_tty_for_interactive() {
        return Err(podscribe::Error::token_missing(
            podscribe::token::sources_tried(),
        ));
    }

    let value = crate::tty::prompt_secret("Hugging Face token: ")?;
    if value.is_empty() {
        return Err(podscribe::Error::token_missing(
            podscribe::token::sources_tried(),
        ));
    }

    Ok(podscribe::token::ResolvedToken {
        value,
        source: podscribe::token::TokenSource::Prompt,
    })
}
