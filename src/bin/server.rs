//! Route guide server binary

use clap::{Parser, Subcommand};
use routeguide::{Config, GuideServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "routeguide-server")]
#[command(about = "Route guide gRPC server")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./routeguide.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Serve {
        /// Bind address for gRPC
        #[arg(long)]
        bind: Option<String>,

        /// Feature database (JSON)
        #[arg(long)]
        db: Option<PathBuf>,

        /// ListFeatures channel capacity
        #[arg(long)]
        stream_buffer: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config from file and environment, then override with CLI arguments
    let mut config = Config::load(cli.config.as_deref())?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve {
            bind,
            db,
            stream_buffer,
        } => {
            if let Some(bind) = bind {
                config.server.bind_addr = bind.parse()?;
            }
            if let Some(db) = db {
                config.server.db_path = Some(db);
            }
            if let Some(stream_buffer) = stream_buffer {
                config.server.stream_buffer = stream_buffer;
            }

            let server = GuideServer::open(config.server)?;
            server.serve().await?;
        }
    }

    Ok(())
}
