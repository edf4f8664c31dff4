use clap::{Args, Subcommand};
use serde::Serialize;

use podscribe::config;
use podscribe::setup::{self, SetupInitOutput, SetupReport};

use super::CmdResult;

#[derive(Args)]
pub struct SetupArgs {
    #[command(subcommand)]
    command: SetupCommand,
}

#[derive(Subcommand)]
enum SetupCommand {
    /// Report whether the transcription environment is ready
    Check {
        /// Exit nonzero on warnings as well as errors
        #[arg(long)]
        strict: bool,
    },
    /// Create the virtual environment and install pipeline dependencies
    Init,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum SetupOutput {
    Check(SetupReport),
    Init(SetupInitOutput),
}

pub fn run(args: SetupArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<SetupOutput> {
    match args.command {
        SetupCommand::Check { strict } => {
            let config = config::load_config();
            let report = setup::check(&config);

            let failing = report.summary.errors > 0
                || (strict && report.summary.warnings > 0);
            let exit_code = if failing { 1 } else { 0 };

            Ok((SetupOutput::Check(report), exit_code))
        }
        SetupCommand::Init => {
            let config = config::load_config();
            let output = setup::init(&config)?;
            Ok((SetupOutput::Init(output), 0))
        }
    }
}
