use std::process::ExitCode;

use clap::Parser;
use deploy_scripts::{
    cli::Cli,
    commands::{exit_code, load_env, log_env_load},
    constants::LOG_ENV_VAR,
};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // Loaded before parsing so that `.env` can supply argument defaults
    let env_file = load_env();
    let Cli { verbose, command } = Cli::parse();

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    log_env_load(&env_file);

    let res = command.run().await;
    if let Err(e) = &res {
        error!("{}", e);
    }

    ExitCode::from(exit_code(&res))
}
