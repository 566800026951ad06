//! Harvest module: listing and orchestration
//!
//! This module contains the two listers built on the pagination driver and
//! the `Harvester` that runs a whole scope:
//! - Entity listing under a scope
//! - Per-entity sub-record listing
//! - Failure isolation and per-entity checkpointing

mod entities;
mod harvester;
mod ratings;

pub use entities::{encode_scope_id, EntityListQuery, EntityLister};
pub use harvester::{CrawlPhase, Harvester};
pub use ratings::{SubRecordLister, SubRecordQuery};

use crate::checkpoint::CheckpointStore;
use crate::config::Config;
use crate::model::CrawlResult;
use crate::upstream::GraphqlClient;
use crate::HarvestError;

/// Runs a complete harvest with the given configuration
///
/// # Example
///
/// ```no_run
/// use rating_harvest::checkpoint::JsonFileStore;
/// use rating_harvest::config::Config;
/// use rating_harvest::harvest::harvest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let mut store = JsonFileStore::new(&config.output.snapshot_path);
/// let result = harvest(&config, &mut store).await?;
/// println!("{} entities", result.len());
/// # Ok(())
/// # }
/// ```
pub async fn harvest<S>(config: &Config, store: &mut S) -> Result<CrawlResult, HarvestError>
where
    S: CheckpointStore + ?Sized,
{
    let client = GraphqlClient::from_config(config)?;
    let mut harvester = Harvester::new(client, config.crawl.clone());
    harvester.run(config.crawl.scope_id, store).await
}
