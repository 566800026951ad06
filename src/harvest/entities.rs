//! Entity listing: every professor under a school

use crate::model::Entity;
use crate::upstream::{decode, fetch_pages, Connection, GraphqlClient, PagedQuery};
use crate::HarvestError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashSet;

const SEARCH_TEACHERS_QUERY: &str = r#"
query NewSearchTeachersQuery(
  $query: TeacherSearchQuery!,
  $first: Int!,
  $after: String
) {
  newSearch {
    teachers(query: $query, first: $first, after: $after) {
      edges {
        cursor
        node {
          id
          firstName
          lastName
          department
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}
"#;

/// Encodes a legacy school id into the opaque id the search query expects
///
/// ```
/// use rating_harvest::harvest::encode_scope_id;
///
/// assert_eq!(encode_scope_id(4928), "U2Nob29sLTQ5Mjg=");
/// ```
pub fn encode_scope_id(scope_id: u64) -> String {
    STANDARD.encode(format!("School-{}", scope_id))
}

/// Raw entity node as returned by the search query
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherNode {
    id: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    department: Option<String>,
}

impl From<TeacherNode> for Entity {
    fn from(node: TeacherNode) -> Self {
        let name = format!(
            "{} {}",
            node.first_name.unwrap_or_default(),
            node.last_name.unwrap_or_default()
        );
        Entity {
            id: node.id,
            name: name.trim().to_string(),
            category: node.department.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchData {
    new_search: NewSearch,
}

#[derive(Debug, Deserialize)]
struct NewSearch {
    teachers: Connection<TeacherNode>,
}

/// Paged search for all teachers in one school
#[derive(Debug, Clone)]
pub struct EntityListQuery {
    scope_id: u64,
    encoded_scope: String,
    page_size: u32,
}

impl EntityListQuery {
    pub fn new(scope_id: u64, page_size: u32) -> Self {
        Self {
            scope_id,
            encoded_scope: encode_scope_id(scope_id),
            page_size,
        }
    }
}

impl PagedQuery for EntityListQuery {
    type Node = TeacherNode;

    fn name(&self) -> &'static str {
        "NewSearchTeachersQuery"
    }

    fn document(&self) -> &'static str {
        SEARCH_TEACHERS_QUERY
    }

    fn variables(&self, after: Option<&str>) -> Value {
        json!({
            "query": {
                "text": "",
                "schoolID": self.encoded_scope,
                "fallback": false
            },
            "first": self.page_size,
            "after": after
        })
    }

    fn referer(&self, origin: &str) -> String {
        format!("{}/search/professors/{}?q=*", origin, self.scope_id)
    }

    fn connection(&self, data: Value) -> Result<Option<Connection<TeacherNode>>, HarvestError> {
        let data: SearchData = decode(self.name(), data)?;
        Ok(Some(data.new_search.teachers))
    }
}

/// Lists every entity in a scope
pub struct EntityLister<'a> {
    client: &'a GraphqlClient,
    page_size: u32,
}

impl<'a> EntityLister<'a> {
    pub fn new(client: &'a GraphqlClient, page_size: u32) -> Self {
        Self { client, page_size }
    }

    /// Drains the whole entity stream before returning
    ///
    /// Repeated ids keep their first position. An empty scope is an empty
    /// list, not an error.
    pub async fn list_entities(&self, scope_id: u64) -> Result<Vec<Entity>, HarvestError> {
        let nodes = fetch_pages(self.client, EntityListQuery::new(scope_id, self.page_size))
            .collect_all()
            .await?;

        let mut seen = HashSet::with_capacity(nodes.len());
        let mut entities = Vec::with_capacity(nodes.len());
        for node in nodes {
            if !seen.insert(node.id.clone()) {
                tracing::debug!("Skipping duplicate entity {}", node.id);
                continue;
            }
            entities.push(Entity::from(node));
        }

        tracing::info!("Listed {} entities for scope {}", entities.len(), scope_id);
        Ok(entities)
    }
}
