//! Harvested data model
//!
//! - `Entity`: a listed top-level record (a professor)
//! - `SubRecord`: one rating belonging to an entity
//! - `CrawlResult`: the ordered aggregate that gets checkpointed

mod entity;
mod result;

pub use entity::{Entity, SubRecord};
pub use result::{CrawlEntry, CrawlResult};
