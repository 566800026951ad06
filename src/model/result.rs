use crate::model::{Entity, SubRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One entity with every sub-record harvested for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlEntry {
    #[serde(flatten)]
    pub entity: Entity,

    #[serde(rename = "comments")]
    pub subrecords: Vec<SubRecord>,
}

/// Ordered aggregate of harvested entities
///
/// Append-only: entries keep listing order and entity ids are unique.
/// Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlResult {
    entries: Vec<CrawlEntry>,
    ids: HashSet<String>,
}

impl CrawlResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry
    ///
    /// # Returns
    ///
    /// * `true` - The entry was appended
    /// * `false` - An entry with the same entity id already exists
    pub fn push(&mut self, entity: Entity, subrecords: Vec<SubRecord>) -> bool {
        if !self.ids.insert(entity.id.clone()) {
            return false;
        }
        self.entries.push(CrawlEntry { entity, subrecords });
        true
    }

    pub fn entries(&self) -> &[CrawlEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, entity_id: &str) -> bool {
        self.ids.contains(entity_id)
    }

    /// Total number of sub-records across all entries
    pub fn subrecord_count(&self) -> usize {
        self.entries.iter().map(|e| e.subrecords.len()).sum()
    }
}

impl Serialize for CrawlResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CrawlResult {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<CrawlEntry>::deserialize(deserializer)?;
        let mut result = CrawlResult::new();
        for entry in entries {
            if !result.push(entry.entity, entry.subrecords) {
                return Err(serde::de::Error::custom("duplicate entity id in snapshot"));
            }
        }
        Ok(result)
    }
}
