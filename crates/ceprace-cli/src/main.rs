mod cli;
mod error;
mod input;
mod output;

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use ceprace_core::RaceCoordinatorBuilder;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    let key = input::resolve_key(
        cli.cep.as_deref(),
        &mut io::stdin().lock(),
        &mut io::stdout(),
    )?;

    let coordinator = RaceCoordinatorBuilder::new()
        .with_env_overrides()
        .with_providers(&cli.provider_ids())
        .with_timeout(Duration::from_millis(cli.timeout_ms))
        .with_policy(cli.policy.into())
        .build();
    tracing::debug!(providers = ?coordinator.providers(), key = key.as_str(), "starting race");

    // Every race outcome, failures included, is a normal exit.
    let outcome = coordinator.race(&key).await;
    output::render(&outcome, cli.format, &mut io::stdout().lock())
}
