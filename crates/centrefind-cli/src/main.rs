mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "centrefind")]
#[command(about = "Find the nearest facilities to an address or coordinate")]
struct Cli {
    /// Sources file to load instead of `CENTREFIND_SOURCES_PATH`
    #[arg(long, global = true)]
    sources: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Select the nearest distinct facilities to a point or known address
    Nearest {
        /// Query latitude in degrees
        #[arg(long, allow_hyphen_values = true, requires = "lon", conflicts_with = "address")]
        lat: Option<f64>,

        /// Query longitude in degrees
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,

        /// Address to resolve through the configured gazetteer
        #[arg(long, required_unless_present = "lat")]
        address: Option<String>,

        /// Number of facilities to return (defaults to `CENTREFIND_DEFAULT_K`)
        #[arg(short, long)]
        k: Option<usize>,

        /// Minimum gap in miles between accepted distances
        #[arg(long)]
        min_separation: Option<f64>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the consolidated facility table
    Consolidate {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Validate the sources file and every source table it names
    CheckConfig,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = centrefind_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let sources_path = cli
        .sources
        .clone()
        .unwrap_or_else(|| config.sources_path.clone());

    match cli.command {
        Some(Commands::Nearest {
            lat,
            lon,
            address,
            k,
            min_separation,
            json,
        }) => {
            let target = match (lat, lon, address) {
                (Some(lat), Some(lon), _) => commands::QueryTarget::Point { lat, lon },
                (_, _, Some(address)) => commands::QueryTarget::Address(address),
                _ => anyhow::bail!("provide --lat and --lon, or --address"),
            };
            commands::run_nearest(
                &config,
                &sources_path,
                &commands::NearestArgs {
                    target,
                    k: k.unwrap_or(config.default_k),
                    min_separation_miles: min_separation.unwrap_or(config.min_separation_miles),
                    json,
                },
            )?;
        }
        Some(Commands::Consolidate { json }) => commands::run_consolidate(&sources_path, json)?,
        Some(Commands::CheckConfig) => commands::run_check_config(&config, &sources_path)?,
        None => println!("centrefind: run `centrefind --help` for commands"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
