use clap::Args;

use podscribe::config;
use podscribe::rename::{self, RenamePass};

use super::CmdResult;

#[derive(Args)]
pub struct RenameArgs {
    /// Transcript repository path (falls back to configured repo_path)
    #[arg(long)]
    pub repo: Option<String>,
}

pub fn run(args: RenameArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<RenamePass> {
    let config = config::load_config();
    let repo = config.resolve_repo(args.repo.as_deref())?;
    let dir = config.transcripts_path(&repo);

    let pass = rename::normalize_dir(&dir)?;
    podscribe::log_status!(
        "rename",
        "{} renamed, {} unchanged, {} skipped",
        pass.summary.renamed,
        pass.summary.unchanged,
        pass.summary.skipped
    );

    Ok((pass, 0))
}
