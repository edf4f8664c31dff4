use clap::Args;
use serde::Serialize;

use podscribe::config;
use podscribe::git;
use podscribe::hub::HubClient;
use podscribe::log_status;
use podscribe::pipeline::{self, PipelineOutput};
use podscribe::publish::{self, PublishOutput};
use podscribe::rename::{self, RenamePass};
use podscribe::setup::{self, SetupSummary};

use super::CmdResult;

#[derive(Args)]
pub struct RunArgs {
    /// Podcast RSS feed URL (falls back to configured rss_url)
    #[arg(long)]
    pub rss: Option<String>,

    /// Transcript repository path (falls back to configured repo_path)
    #[arg(long)]
    pub repo: Option<String>,

    /// Hugging Face token (falls back to env, keychain, token file, prompt)
    #[arg(long)]
    pub token: Option<String>,

    /// Stop after the rename stage
    #[arg(long)]
    pub skip_publish: bool,

    /// Commit without pushing
    #[arg(long)]
    pub no_push: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutput {
    pub setup: SetupSummary,
    pub token_source: String,
    pub pipeline: PipelineOutput,
    pub rename: RenamePass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish: Option<PublishOutput>,
}

/// The full linear workflow: setup check, credential resolution and gated
/// model check, driver invocation, filename normalization, commit-and-push.
/// Each stage must succeed before the next starts.
pub fn run(args: RunArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<RunOutput> {
    let config = config::load_config();

    let rss = config.resolve_rss(args.rss.as_deref())?;
    let repo = config.resolve_repo(args.repo.as_deref())?;

    log_status!("run", "Checking environment");
    let report = setup::check(&config);
    setup::ensure_ready(&report)?;

    if git::is_repo(&repo) && !git::is_workdir_clean(&repo) {
        log_status!("run", "Repository has uncommitted changes from outside this run");
    }

    log_status!("run", "Resolving Hugging Face token");
    let token = super::resolve_token_or_prompt(args.token.as_deref(), &config)?;
    log_status!("run", "Using token from {} ({})", token.source.as_str(), token.masked());

    let client = HubClient::new(&config.hub_base_url);
    client.check_model_access(&config.diarization_model, &token.value)?;

    let pipeline = pipeline::run(&config, &rss, &repo, Some(&token.value))?;

    log_status!("run", "Normalizing transcript filenames");
    let rename = rename::normalize_dir(&config.transcripts_path(&repo))?;

    let publish = if args.skip_publish {
        log_status!("run", "Publish stage skipped");
        None
    } else {
        Some(publish::publish(&repo, &config.transcripts_dir, !args.no_push)?)
    };

    Ok((
        RunOutput {
            setup: report.summary,
            token_source: token.source.as_str().to_string(),
            pipeline,
            rename,
            publish,
        },
        0,
    ))
}
