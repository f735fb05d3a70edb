//! Loader configuration
//!
//! Every tunable of a run lives in [`LoaderConfig`]: the store location, the
//! shard filter, the MongoDB target, and the batch size. Defaults match the
//! original NYC taxi/weather deployment; the CLI layer overrides them from
//! flags or environment variables.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default object store URL (GCS bucket holding the raw shards)
pub const DEFAULT_STORE_URL: &str = "gs://dds-nyc-taxi-weather";

/// Default name prefix for trip shards within the store
pub const DEFAULT_SHARD_PREFIX: &str = "raw/taxi/yellow_";

/// Default shard file extension
pub const DEFAULT_SHARD_EXTENSION: &str = "parquet";

/// Default local weather CSV path
pub const DEFAULT_WEATHER_CSV: &str = "NYC_Central_Park_weather_1869-2022.csv";

/// Default MongoDB connection URI
pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017/";

/// Default logical database name
pub const DEFAULT_DATABASE: &str = "nyc_taxi_weather";

/// Default trips collection name
pub const DEFAULT_TRIPS_COLLECTION: &str = "taxi_trips";

/// Default weather collection name
pub const DEFAULT_WEATHER_COLLECTION: &str = "weather";

/// Default maximum rows per insert batch
pub const DEFAULT_BATCH_SIZE: usize = 100_000;

/// Configuration for one loader run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Object store location: `gs://bucket` or a local directory path
    pub store_url: String,

    /// Name prefix that trip shards must match (e.g. `raw/taxi/yellow_`)
    pub shard_prefix: String,

    /// File extension that trip shards must carry (without the dot)
    pub shard_extension: String,

    /// Path to the local weather CSV file
    pub weather_csv: PathBuf,

    /// MongoDB connection URI
    pub mongo_uri: String,

    /// Logical database name
    pub database: String,

    /// Collection receiving trip records
    pub trips_collection: String,

    /// Collection receiving weather records
    pub weather_collection: String,

    /// Maximum number of rows submitted in one insert
    pub batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            store_url: DEFAULT_STORE_URL.to_string(),
            shard_prefix: DEFAULT_SHARD_PREFIX.to_string(),
            shard_extension: DEFAULT_SHARD_EXTENSION.to_string(),
            weather_csv: PathBuf::from(DEFAULT_WEATHER_CSV),
            mongo_uri: DEFAULT_MONGO_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            trips_collection: DEFAULT_TRIPS_COLLECTION.to_string(),
            weather_collection: DEFAULT_WEATHER_COLLECTION.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl LoaderConfig {
    /// Validate the configuration before a run
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::invalid_config(
                "batch_size",
                "must be greater than zero",
            ));
        }
        if self.store_url.is_empty() {
            return Err(Error::invalid_config("store_url", "must not be empty"));
        }
        if self.database.is_empty() {
            return Err(Error::invalid_config("database", "must not be empty"));
        }
        if self.trips_collection.is_empty() {
            return Err(Error::invalid_config(
                "trips_collection",
                "must not be empty",
            ));
        }
        if self.weather_collection.is_empty() {
            return Err(Error::invalid_config(
                "weather_collection",
                "must not be empty",
            ));
        }
        Ok(())
    }
}
