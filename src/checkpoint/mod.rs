//! Checkpoint module for persisting harvest snapshots
//!
//! This module handles durable storage of the aggregate result, including:
//! - The `CheckpointStore` trait the harvester writes through
//! - An atomically replaced JSON file implementation
//! - One-shot backup of the previous run's snapshot

mod json_file;
mod traits;

pub use json_file::{backup, JsonFileStore};
pub use traits::{CheckpointError, CheckpointResult, CheckpointStore};
