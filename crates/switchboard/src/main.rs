//! Switchboard CLI binary.
//!
//! - Generate text through any configured provider
//! - Probe provider health and estimated usage

use clap::Parser;
use std::process::ExitCode;

mod cli;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, run_generate, show_usage};

    // Credentials may live in a local .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    switchboard::init_tracing(cli.verbose)?;

    let config = match &cli.config {
        Some(path) => switchboard::SwitchboardConfig::from_file(path)?,
        None => switchboard::SwitchboardConfig::load()?,
    };
    let ctx = switchboard::SwitchboardContext::builder(config).build()?;

    let succeeded = match cli.command {
        Commands::Generate(args) => run_generate(&ctx, args).await?,
        Commands::Usage { provider, format } => {
            show_usage(&ctx, &provider, format).await?;
            true
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
