use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;
mod tty;

use commands::{auth, config, publish, rename, run, setup, transcribe};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "podscribe")]
#[command(version = VERSION)]
#[command(about = "CLI for podcast transcription workflow automation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check or prepare the transcription environment
    Setup(setup::SetupArgs),
    /// Manage the Hugging Face token
    Auth(auth::AuthArgs),
    /// Invoke the external transcription driver
    Transcribe(transcribe::TranscribeArgs),
    /// Normalize transcript filenames
    Rename(rename::RenameArgs),
    /// Commit and push changed transcripts
    Publish(publish::PublishArgs),
    /// Run the full workflow: setup, auth, transcribe, rename, publish
    Run(run::RunArgs),
    /// Manage podscribe configuration
    Config(config::ConfigArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    let (json_result, exit_code) = commands::run_json(cli.command, &global);
    output::print_json_result(json_result).ok();

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
