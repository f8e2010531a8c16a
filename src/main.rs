//! Application entry point for approval.
//!
//! Loads configuration, opens the stored session and runs one command.

use std::sync::Arc;

use anyhow::Result;
use approval::cli;
use approval::cli::Cli;
use approval::config::Config;
use approval::logging::setup_logging;
use approval::service::Services;
use approval::session::FileSession;
use approval::session::SessionStore;
use clap::Parser;
use dotenv::dotenv;
use log::debug;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let config = load_config()?;
    let session = setup_session(&config)?;
    let services = setup_services(&config, session)?;

    let output = cli::run(cli.command, &services).await?;
    println!("{output}");
    Ok(())
}

fn load_config() -> Result<Config> {
    let mut config = Config::new();
    config.load()?;
    setup_logging(&config)?;
    debug!("Using API at {}", config.api_base);
    Ok(config)
}

fn setup_session(config: &Config) -> Result<Arc<dyn SessionStore>> {
    debug!("Opening session at {}", config.session_path.to_string_lossy());
    Ok(Arc::new(FileSession::open(&config.session_path)?))
}

fn setup_services(config: &Config, session: Arc<dyn SessionStore>) -> Result<Services> {
    debug!("Setting up Services...");
    Ok(Services::new(config, session)?)
}
