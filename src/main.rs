use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use chatrelay::adapters;
use chatrelay::config::Config;
use chatrelay::dispatch::{dispatch, InboundRequest};
use chatrelay::handlers::HandlerRegistry;
use chatrelay::logging;
use chatrelay::server::{run_server, AppState};

#[derive(Parser)]
#[command(name = "chatrelay")]
#[command(about = "Relays third-party webhook notifications into chat-platform messages")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook relay server
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 8080)]
        port: u16,
        /// Optional TOML config file with icon/emoji URL settings
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Normalize a payload file and deliver it once (for manual testing)
    Send {
        /// Source key, e.g. magnumci
        #[arg(long)]
        source: String,
        /// Destination platform, e.g. glip or slack
        #[arg(long)]
        adapter: String,
        /// Webhook token or full webhook URL
        #[arg(long)]
        destination: String,
        /// Path to the payload file
        #[arg(long)]
        file: PathBuf,
        /// Optional TOML config file with icon/emoji URL settings
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List registered webhook sources
    Sources,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Ok(Config::load(path.to_str().ok_or_else(|| {
            anyhow::anyhow!("config path is not valid UTF-8")
        })?)?),
        None => Ok(Config::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, config } => {
            let state = Arc::new(AppState {
                registry: HandlerRegistry::new(),
                config: load_config(config.as_ref())?,
            });
            info!(
                sources = state.registry.list_sources().len(),
                "handler registry initialized"
            );
            run_server(state, port).await?;
        }
        Commands::Send {
            source,
            adapter,
            destination,
            file,
            config,
        } => {
            let registry = HandlerRegistry::new();
            let config = load_config(config.as_ref())?;
            let body = std::fs::read(&file)?;
            let request = InboundRequest::new(Some("application/json".to_string()), body);

            let adapter = adapters::new_adapter(&adapter, &destination)?;
            let response =
                dispatch(&registry, &config, &source, adapter.as_ref(), &request).await?;

            println!("status: {}", response.status);
            if !response.body.is_empty() {
                println!("{}", response.body);
            }
        }
        Commands::Sources => {
            let registry = HandlerRegistry::new();
            for key in registry.list_sources() {
                let handler = registry.get(key).expect("listed key is registered");
                println!(
                    "{:<12} {:<12} {}",
                    handler.key, handler.display_name, handler.documentation_url
                );
            }
        }
    }

    Ok(())
}
