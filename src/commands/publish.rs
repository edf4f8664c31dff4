use clap::Args;

use podscribe::config;
use podscribe::publish::{self, PublishOutput};

use super::CmdResult;

#[derive(Args)]
pub struct PublishArgs {
    /// Transcript repository path (falls back to configured repo_path)
    #[arg(long)]
    pub repo: Option<String>,

    /// Commit without pushing
    #[arg(long)]
    pub no_push: bool,
}

pub fn run(args: PublishArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<PublishOutput> {
    let config = config::load_config();
    let repo = config.resolve_repo(args.repo.as_deref())?;

    let output = publish::publish(&repo, &config.transcripts_dir, !args.no_push)?;
    Ok((output, 0))
}
