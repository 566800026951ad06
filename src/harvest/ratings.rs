//! Sub-record listing: every rating left on one professor

use crate::model::SubRecord;
use crate::upstream::{decode, fetch_pages, Connection, GraphqlClient, PagedQuery};
use crate::HarvestError;
use serde::Deserialize;
use serde_json::{json, Value};

const RATINGS_LIST_QUERY: &str = r#"
query RatingsListQuery($id: ID!, $first: Int!, $after: String) {
  node(id: $id) {
    ... on Teacher {
      ratings(first: $first, after: $after) {
        pageInfo {
          hasNextPage
          endCursor
        }
        edges {
          node {
            comment
            difficultyRating
            clarityRating
            helpfulRating
            wouldTakeAgain
            grade
            class
            date
            ratingTags
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct RatingsData {
    node: Option<RatingsNode>,
}

/// `node` resolves to `{}` when the id is not a teacher
#[derive(Debug, Deserialize)]
struct RatingsNode {
    ratings: Option<Connection<SubRecord>>,
}

/// Paged ratings for one entity
#[derive(Debug, Clone)]
pub struct SubRecordQuery {
    entity_id: String,
    page_size: u32,
}

impl SubRecordQuery {
    pub fn new(entity_id: impl Into<String>, page_size: u32) -> Self {
        Self {
            entity_id: entity_id.into(),
            page_size,
        }
    }
}

impl PagedQuery for SubRecordQuery {
    type Node = SubRecord;

    fn name(&self) -> &'static str {
        "RatingsListQuery"
    }

    fn document(&self) -> &'static str {
        RATINGS_LIST_QUERY
    }

    fn variables(&self, after: Option<&str>) -> Value {
        json!({
            "id": self.entity_id,
            "first": self.page_size,
            "after": after
        })
    }

    fn referer(&self, origin: &str) -> String {
        format!("{}/professor", origin)
    }

    fn connection(&self, data: Value) -> Result<Option<Connection<SubRecord>>, HarvestError> {
        let data: RatingsData = decode(self.name(), data)?;
        Ok(data.node.and_then(|node| node.ratings))
    }
}

/// Lists the sub-records of one entity at a time
pub struct SubRecordLister<'a> {
    client: &'a GraphqlClient,
    page_size: u32,
}

impl<'a> SubRecordLister<'a> {
    pub fn new(client: &'a GraphqlClient, page_size: u32) -> Self {
        Self { client, page_size }
    }

    /// Fetches every sub-record of `entity_id`, in upstream order
    ///
    /// An id the upstream cannot resolve yields an empty list.
    pub async fn list_subrecords(&self, entity_id: &str) -> Result<Vec<SubRecord>, HarvestError> {
        let records = fetch_pages(self.client, SubRecordQuery::new(entity_id, self.page_size))
            .collect_all()
            .await?;
        tracing::info!("Got {} comments", records.len());
        Ok(records)
    }
}
