//! Command-line interface
//!
//! Every tunable maps to a flag with a `TRIPLOAD_*` environment override;
//! defaults match the original deployment constants.

use crate::config::{self, LoaderConfig};
use crate::error::Result;
use crate::pipeline;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Batch loader for NYC taxi trip shards and weather data into MongoDB
#[derive(Parser, Debug)]
#[command(name = "tripload")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Object store location: gs://bucket or a local directory
    #[arg(long, env = "TRIPLOAD_STORE_URL", default_value = config::DEFAULT_STORE_URL)]
    pub store_url: String,

    /// Name prefix that trip shards must match
    #[arg(long, env = "TRIPLOAD_SHARD_PREFIX", default_value = config::DEFAULT_SHARD_PREFIX)]
    pub shard_prefix: String,

    /// File extension that trip shards must carry
    #[arg(long, env = "TRIPLOAD_SHARD_EXTENSION", default_value = config::DEFAULT_SHARD_EXTENSION)]
    pub shard_extension: String,

    /// Path to the local weather CSV file
    #[arg(long, env = "TRIPLOAD_WEATHER_CSV", default_value = config::DEFAULT_WEATHER_CSV)]
    pub weather_csv: PathBuf,

    /// MongoDB connection URI
    #[arg(long, env = "TRIPLOAD_MONGO_URI", default_value = config::DEFAULT_MONGO_URI)]
    pub mongo_uri: String,

    /// Logical database name
    #[arg(long, env = "TRIPLOAD_DATABASE", default_value = config::DEFAULT_DATABASE)]
    pub database: String,

    /// Collection receiving trip records
    #[arg(long, env = "TRIPLOAD_TRIPS_COLLECTION", default_value = config::DEFAULT_TRIPS_COLLECTION)]
    pub trips_collection: String,

    /// Collection receiving weather records
    #[arg(long, env = "TRIPLOAD_WEATHER_COLLECTION", default_value = config::DEFAULT_WEATHER_COLLECTION)]
    pub weather_collection: String,

    /// Maximum rows per insert batch
    #[arg(long, env = "TRIPLOAD_BATCH_SIZE", default_value_t = config::DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load trip shards from the object store into the trips collection
    Trips,

    /// Load the local weather CSV into the weather collection
    Weather,

    /// Load trips, then weather
    All,
}

impl Cli {
    /// Build the loader configuration from the parsed arguments
    pub fn config(&self) -> LoaderConfig {
        LoaderConfig {
            store_url: self.store_url.clone(),
            shard_prefix: self.shard_prefix.clone(),
            shard_extension: self.shard_extension.clone(),
            weather_csv: self.weather_csv.clone(),
            mongo_uri: self.mongo_uri.clone(),
            database: self.database.clone(),
            trips_collection: self.trips_collection.clone(),
            weather_collection: self.weather_collection.clone(),
            batch_size: self.batch_size,
        }
    }

    /// Run the selected pipeline and print the final report
    pub async fn run(&self) -> Result<()> {
        let config = self.config();

        match self.command {
            Commands::Trips => {
                let total = pipeline::load_trips(&config).await?;
                println!("Total records in {}: {total}", config.trips_collection);
            }
            Commands::Weather => {
                let total = pipeline::load_weather(&config).await?;
                println!("Total records in {}: {total}", config.weather_collection);
            }
            Commands::All => {
                let (trips, weather) = pipeline::load_all(&config).await?;
                println!("Total records in {}: {trips}", config.trips_collection);
                println!("Total records in {}: {weather}", config.weather_collection);
            }
        }

        Ok(())
    }
}
