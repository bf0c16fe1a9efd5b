//! kinetic CLI: run the inference gateway or inspect the resolved key pool.
//! Config from env and optional CLI args.

use anyhow::Result;
use clap::{Parser, Subcommand};
use kinetic_core::init_tracing;
use kinetic_gateway::config::EXTRA_KEY_SLOTS;
use kinetic_gateway::{serve, ApiKeyPool, GatewayConfig};

#[derive(Parser)]
#[command(name = "kinetic")]
#[command(about = "Kinetic inference gateway CLI: serve, keys", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP gateway (config from env; flags override HOST/PORT).
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the resolved API key pool, redacted, in fail-over order.
    Keys,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            let mut config = GatewayConfig::load()?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            init_tracing(&config.log_file)?;
            serve(config).await
        }
        Commands::Keys => handle_keys(),
    }
}

/// Handle the keys command.
///
/// Loads config from env, filters the pool the same way the gateway does, and
/// prints each usable key redacted with its fail-over position. No network.
fn handle_keys() -> Result<()> {
    let config = GatewayConfig::load()?;
    let pool = ApiKeyPool::new(config.api_keys);

    if pool.is_empty() {
        println!(
            "No API keys configured. Set GROQ_API_KEY (and optionally \
             GROQ_API_KEY_1..GROQ_API_KEY_{EXTRA_KEY_SLOTS}) in .env or the environment."
        );
        return Ok(());
    }

    println!("{} key(s), tried in this order:", pool.len());
    for (position, key) in pool.iter().enumerate() {
        println!("  {}. {}", position + 1, groq_client::redact_key(key));
    }
    Ok(())
}
