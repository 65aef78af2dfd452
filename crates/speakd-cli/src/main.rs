//! CLI entry point.
//!
//! Playback commands print the acknowledgment as soon as the job is
//! scheduled, then hold the process open until the job finishes so the
//! audio is not cut off by process exit. Control commands act on
//! whatever engine processes exist and return immediately.

mod bootstrap;
mod help;
mod parser;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::bootstrap::{CliConfig, bootstrap};
use crate::parser::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = CliConfig::from_env()?;
    let service = bootstrap(&config);

    match cli.command {
        Commands::Speak { text } => {
            println!("{}", service.speak(&text)?);
            service.wait_idle().await;
        }
        Commands::Fast { text } => {
            println!("{}", service.speak_fast(&text)?);
            service.wait_idle().await;
        }
        Commands::Slow { text } => {
            println!("{}", service.speak_slow(&text)?);
            service.wait_idle().await;
        }
        Commands::Quiet { text } => {
            println!("{}", service.speak_quiet(&text)?);
            service.wait_idle().await;
        }
        Commands::Short { text } => {
            println!("{}", service.speak_short(&text)?);
            service.wait_idle().await;
        }
        Commands::Stop => println!("{}", service.stop_speech().await?),
        Commands::KillAll => println!("{}", service.kill_all_tts().await?),
        Commands::Status => println!("{}", service.get_tts_status()?),
        Commands::Silence => println!("{}", service.emergency_silence().await?),
        Commands::Test => {
            println!("{}", service.test_tts()?);
            service.wait_idle().await;
        }
        Commands::Guide => println!("{}", help::GUIDE),
    }

    Ok(())
}
