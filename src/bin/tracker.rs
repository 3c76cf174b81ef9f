use anyhow::Context;
use clap::{Parser, Subcommand};
use container_tracker::{utils, Config, Tracker};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Container tracking: vessel positions, ETA projection, weather and status summaries
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to $CONFIG_FILE or config/default.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Position provider override: mock, aishub or custom
    #[arg(long, global = true)]
    provider: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Current position and projected route of one container
    Track {
        container_id: String,
    },
    /// Current weather at a coordinate
    Weather {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },
    /// Position, weather and natural-language summary of one container
    Summary {
        container_id: String,
    },
    /// Every container of the configured fleet
    Shipments,
    /// Fleet-wide indicators
    Kpis,
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            dotenv::dotenv().ok();
            let mut config = Config::from_file(path)?;
            config.apply_overrides(|key| std::env::var(key).ok());
            config
        }
        None => Config::load()?,
    };

    if let Some(kind) = &args.provider {
        config.provider.kind = kind.clone();
    }

    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    utils::init_from_config(&config.logging)?;
    info!("Provider: {}", config.provider.kind);

    let tracker = Tracker::from_config(&config).context("initializing tracker")?;

    match args.command {
        Command::Track { container_id } => {
            print_json(&tracker.track(&container_id).await?)?;
        }
        Command::Weather { lat, lon } => {
            print_json(&tracker.weather(lat, lon).await?)?;
        }
        Command::Summary { container_id } => {
            print_json(&tracker.brief(&container_id).await?)?;
        }
        Command::Shipments => {
            print_json(&tracker.shipments().await?)?;
        }
        Command::Kpis => {
            print_json(&tracker.kpis().await?)?;
        }
    }

    Ok(())
}
