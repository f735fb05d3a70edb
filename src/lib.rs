//! # Tripload
//!
//! Batch loader for NYC taxi trip shards and weather data into MongoDB.
//!
//! Two pipelines share one linear shape, run strictly in sequence with no
//! parallelism:
//!
//! ```text
//! ┌────────────┐   ┌───────────────┐   ┌────────────┐   ┌────────────────┐
//! │ Enumerate  │ → │ Fetch & Parse │ → │ Normalize  │ → │ Chunked Writer │
//! │ gs://…/…_* │   │ scratch file  │   │ decimal→f64│   │ insert_many ×N │
//! │ or one CSV │   │ Parquet / CSV │   │ ts→millis  │   │ count per file │
//! └────────────┘   └───────────────┘   └────────────┘   └────────────────┘
//! ```
//!
//! - **Trips**: Parquet shards listed by name prefix from a GCS bucket, each
//!   downloaded to a scratch file, parsed with the Arrow Parquet reader, and
//!   inserted into the trips collection in windows of at most `batch_size`
//!   rows.
//! - **Weather**: one local CSV, schema inferred, the `DATE` column coerced
//!   to a timestamp (unparseable values become null), inserted the same way.
//!
//! A run drops its target collection before loading anything, so the result
//! is exactly that run's rows. Every error aborts the run; there is no retry
//! and no rollback of windows already inserted.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the loader
pub mod error;

/// Loader configuration and defaults
pub mod config;

/// Source object store (GCS or local filesystem)
pub mod storage;

/// Reading source files into Arrow tables
pub mod table;

/// Type normalization for BSON encoding
pub mod normalize;

/// Table to BSON document conversion
pub mod encode;

/// Chunked MongoDB writer
pub mod sink;

/// The trip and weather pipelines
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::LoaderConfig;
pub use error::{Error, Result};
pub use pipeline::{load_all, load_trips, load_weather};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
