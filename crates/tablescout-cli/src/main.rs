mod lookup;
mod offline;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tablescout-cli")]
#[command(about = "Restaurant search and identity resolution")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database utilities
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Search the store and the provider for a restaurant
    Search {
        /// Free-text query, e.g. "pizza place in Seattle"
        query: String,
        /// User latitude
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// User longitude
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
        /// Include name similarity and relevance in the output
        #[arg(long)]
        scores: bool,
    },
    /// List restaurants around a point, nearest first
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Search radius in miles
        #[arg(long, default_value = "5")]
        radius_miles: f64,
    },
    /// Find store restaurants serving a dish, cuisine or meal
    Dish {
        term: String,
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },
    /// Fetch a provider place and check whether the store already has it
    Existing {
        /// Provider place id
        place_id: String,
    },
    /// Parse a free-form address
    ParseAddress { address: String },
    /// Split a query into business name and location
    Analyze { query: String },
    /// Show the synonym and category expansion of a term
    Expand { term: String },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Db {
            command: DbCommands::Ping,
        }) => lookup::run_db_ping().await?,
        Some(Commands::Search {
            query,
            lat,
            lon,
            scores,
        }) => lookup::run_search(&query, lookup::user_position(lat, lon)?, scores).await?,
        Some(Commands::Nearby {
            lat,
            lon,
            radius_miles,
        }) => lookup::run_nearby(lat, lon, radius_miles).await?,
        Some(Commands::Dish { term, lat, lon }) => {
            lookup::run_dish(&term, lookup::user_position(lat, lon)?).await?;
        }
        Some(Commands::Existing { place_id }) => lookup::run_existing(&place_id).await?,
        Some(Commands::ParseAddress { address }) => offline::run_parse_address(&address)?,
        Some(Commands::Analyze { query }) => offline::run_analyze(&query)?,
        Some(Commands::Expand { term }) => offline::run_expand(&term)?,
        None => println!("tablescout-cli ready; see --help"),
    }

    Ok(())
}

/// Logs go to stderr so stdout stays valid JSON. `RUST_LOG` wins over
/// `TABLESCOUT_LOG_LEVEL`.
fn init_tracing() -> anyhow::Result<()> {
    let level = std::env::var("TABLESCOUT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Pretty-print `value` as JSON on stdout.
fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
