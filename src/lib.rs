pub mod cli;
pub mod commands;
pub mod error;
pub mod form;
pub mod notification;
pub mod shell;
pub mod state;
pub mod submission;
pub mod types;
pub mod webhook;

use std::process::ExitCode;

use clap::Parser;

/// Binary entry point: logging first, then the CLI.
pub async fn run() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = cli::Cli::parse();
    cli::run_cli(cli).await
}
