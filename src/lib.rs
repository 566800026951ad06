//! Rating-Harvest: an incremental GraphQL harvester
//!
//! This crate lists every entity under a scope from a cursor-paginated GraphQL
//! API, fetches each entity's sub-records through their own pagination stream,
//! and checkpoints the aggregate result to disk after every entity.

pub mod checkpoint;
pub mod config;
pub mod harvest;
pub mod model;
pub mod upstream;

use thiserror::Error;

/// Main error type for Rating-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Malformed response to {query}: {message}")]
    MalformedResponse { query: &'static str, message: String },

    #[error("Value for {field} cannot be encoded: {message}")]
    Encoding { field: String, message: String },

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] checkpoint::CheckpointError),
}

impl HarvestError {
    /// Network failure or non-success HTTP status
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::HttpStatus { .. })
    }

    /// Decodable response that did not have the expected shape
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Rating-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use checkpoint::{CheckpointStore, JsonFileStore};
pub use config::Config;
pub use harvest::{CrawlPhase, Harvester};
pub use model::{CrawlEntry, CrawlResult, Entity, SubRecord};
pub use upstream::GraphqlClient;
