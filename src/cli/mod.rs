use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};

pub mod chat;
pub mod serve;

use crate::core::AppConfig;

#[derive(Subcommand)]
enum Command {
    /// Run the web chat server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Chat with SPARK in the terminal
    Chat {
        /// Name shown next to your messages
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            crate::api::init_tracing(&format!(
                "{}=debug,tower_http=debug,axum::rejection=trace",
                env!("CARGO_CRATE_NAME")
            ));
            let config = load_config()?;
            serve::run(host, port, config).await?;
        }
        Some(Command::Chat { name }) => {
            crate::api::init_tracing(&format!("{}=warn", env!("CARGO_CRATE_NAME")));
            let config = load_config()?;
            chat::run(config, name).await?;
        }
        None => {}
    }

    Ok(())
}

/// Configuration problems end the process before anything is served.
fn load_config() -> Result<AppConfig> {
    AppConfig::load().map_err(|e| {
        tracing::error!("Configuration error: {}", e);
        anyhow!("🚨 Configuration Error: {}\n{}", e, e.remediation())
    })
}
