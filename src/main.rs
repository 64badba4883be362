//! multirelay configuration tool.
//!
//! Loads a relay config through the full pipeline and reports on it:
//!
//! ```text
//! multirelay --config relay.toml check
//! multirelay --config relay.toml show
//! multirelay --config relay.toml endpoint api
//! multirelay --config relay.toml watch
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use multirelay::config::watcher::ConfigWatcher;
use multirelay::config::SharedConfig;
use multirelay::observability::logging;

#[derive(Parser)]
#[command(name = "multirelay")]
#[command(about = "Load and inspect multi-endpoint relay configuration", long_about = None)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(short, long, default_value = "multirelay.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, default and validate the config (default)
    Check,
    /// Print the finalized config as JSON
    Show,
    /// Look up one endpoint by name
    Endpoint { name: String },
    /// Keep the config loaded and reload it whenever the file changes
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logging depends on LogLevel, so nothing is logged until the first load succeeds.
    let shared = Arc::new(SharedConfig::load(&cli.config)?);
    let config = shared.current();
    logging::init(&config.log_level)?;

    tracing::info!(
        path = %cli.config.display(),
        port = %config.port,
        endpoints = config.endpoints.len(),
        "Configuration loaded"
    );

    match cli.command.unwrap_or(Commands::Check) {
        Commands::Check => {
            println!("{}: ok ({} endpoints)", cli.config.display(), config.endpoints.len());
        }
        Commands::Show => {
            println!("{}", serde_json::to_string_pretty(&*config)?);
        }
        Commands::Endpoint { name } => {
            let endpoint = shared.endpoint(&name)?;
            println!("{}", serde_json::to_string_pretty(&endpoint)?);
        }
        Commands::Watch => watch(shared).await?,
    }

    Ok(())
}

async fn watch(shared: Arc<SharedConfig>) -> Result<(), Box<dyn std::error::Error>> {
    let (watcher, mut swapped) = ConfigWatcher::new(shared);
    let _watcher = watcher.run()?;

    loop {
        tokio::select! {
            Some(config) = swapped.recv() => {
                tracing::info!(
                    port = %config.port,
                    endpoints = config.endpoints.len(),
                    "Serving reloaded configuration"
                );
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watcher");
                break;
            }
        }
    }

    Ok(())
}
