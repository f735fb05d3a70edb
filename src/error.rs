//! Error types for the loader
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the loader
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    // ============================================================================
    // Storage Errors
    // ============================================================================
    #[error("Object store error: {0}")]
    Storage(#[from] object_store::Error),

    #[error("Invalid store URL '{url}': {message}")]
    StoreUrl { url: String, message: String },

    // ============================================================================
    // Parse Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    // ============================================================================
    // Encoding Errors
    // ============================================================================
    #[error("Cannot encode column '{column}' of type {data_type} as BSON")]
    Encode { column: String, data_type: String },

    #[error("Value out of range in column '{column}': {message}")]
    ValueRange { column: String, message: String },

    // ============================================================================
    // Database Errors
    // ============================================================================
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a store URL error
    pub fn store_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an encoding error
    pub fn encode(column: impl Into<String>, data_type: impl ToString) -> Self {
        Self::Encode {
            column: column.into(),
            data_type: data_type.to_string(),
        }
    }

    /// Create a value range error
    pub fn value_range(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValueRange {
            column: column.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for the loader
pub type Result<T> = std::result::Result<T, Error>;
