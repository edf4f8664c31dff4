use clap::Args;

use podscribe::config;
use podscribe::hub::HubClient;
use podscribe::pipeline::{self, PipelineOutput};

use super::CmdResult;

#[derive(Args)]
pub struct TranscribeArgs {
    /// Podcast RSS feed URL (falls back to configured rss_url)
    #[arg(long)]
    pub rss: Option<String>,

    /// Transcript repository path (falls back to configured repo_path)
    #[arg(long)]
    pub repo: Option<String>,

    /// Hugging Face token (falls back to env, keychain, token file, prompt)
    #[arg(long)]
    pub token: Option<String>,

    /// Skip the gated-model access check before invoking the driver
    #[arg(long)]
    pub skip_access_check: bool,
}

pub fn run(
    args: TranscribeArgs,
    _global: &crate::commands::GlobalArgs,
) -> CmdResult<PipelineOutput> {
    let config = config::load_config();

    let rss = config.resolve_rss(args.rss.as_deref())?;
    let repo = config.resolve_repo(args.repo.as_deref())?;

    let token = super::resolve_token_or_prompt(args.token.as_deref(), &config)?;

    if !args.skip_access_check {
        let client = HubClient::new(&config.hub_base_url);
        client.check_model_access(&config.diarization_model, &token.value)?;
    }

    let output = pipeline::run(&config, &rss, &repo, Some(&token.value))?;
    Ok((output, 0))
}
