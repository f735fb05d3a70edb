//! The two loader pipelines
//!
//! Both run the same linear sequence per file: fetch, parse, normalize,
//! write in windows, report the authoritative count. Files are processed one
//! at a time in listing order; nothing runs concurrently. Every error
//! propagates and aborts the run, leaving already-committed windows in place.

use crate::config::LoaderConfig;
use crate::error::Result;
use crate::normalize::normalize_table;
use crate::sink::MongoSink;
use crate::storage::ShardStore;
use crate::table::{read_csv, read_parquet};
use arrow::array::RecordBatch;
use object_store::path::Path as ObjectPath;
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::info;

/// Load every matching trip shard into the trips collection
///
/// Drops the collection first, then processes shards in listing order.
/// Returns the final authoritative document count.
pub async fn load_trips(config: &LoaderConfig) -> Result<u64> {
    config.validate()?;

    let store = ShardStore::from_url(&config.store_url)?;
    let shards = store
        .list_shards(&config.shard_prefix, &config.shard_extension)
        .await?;

    let sink =
        MongoSink::connect(&config.mongo_uri, &config.database, &config.trips_collection).await?;
    sink.reset().await?;

    info!(shards = shards.len(), "found trip shards to load");

    for shard in &shards {
        info!(shard = %shard, "loading shard");
        let table = fetch_shard_table(&store, shard).await?;
        let table = normalize_table(&table)?;
        let written = sink.write_table(&table, config.batch_size).await?;
        let running_total = sink.count().await?;
        info!(shard = %shard, rows = written, total = running_total, "finished shard");
    }

    let total = sink.count().await?;
    info!(total, collection = sink.name(), "trip load complete");
    Ok(total)
}

/// Load the local weather CSV into the weather collection
///
/// Drops the collection first. Returns the final authoritative count.
pub async fn load_weather(config: &LoaderConfig) -> Result<u64> {
    config.validate()?;

    let sink = MongoSink::connect(
        &config.mongo_uri,
        &config.database,
        &config.weather_collection,
    )
    .await?;
    sink.reset().await?;

    info!(path = %config.weather_csv.display(), "loading weather file");
    let table = read_csv(&config.weather_csv)?;
    let table = normalize_table(&table)?;
    let written = sink.write_table(&table, config.batch_size).await?;

    let total = sink.count().await?;
    info!(
        rows = written,
        total,
        collection = sink.name(),
        "weather load complete"
    );
    Ok(total)
}

/// Run both pipelines in sequence: trips first, then weather
pub async fn load_all(config: &LoaderConfig) -> Result<(u64, u64)> {
    let trips = load_trips(config).await?;
    let weather = load_weather(config).await?;
    Ok((trips, weather))
}

/// Download one shard into a scratch file and parse it
///
/// The scratch file lives exactly as long as this call: [`NamedTempFile`]
/// removes it on drop, whether parsing succeeds or fails.
pub async fn fetch_shard_table(store: &ShardStore, shard: &ObjectPath) -> Result<RecordBatch> {
    let bytes = store.fetch(shard).await?;

    let mut scratch = NamedTempFile::new()?;
    scratch.write_all(&bytes)?;
    scratch.flush()?;

    read_parquet(scratch.path())
}
