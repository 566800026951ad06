//! GraphQL response contracts
//!
//! Responses are decoded into typed shapes instead of walked as loose JSON:
//! a missing key is reported as `MalformedResponse`, never read as "no data".

use crate::HarvestError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for a single GraphQL operation
#[derive(Debug, Serialize)]
pub struct GraphqlRequest<'a> {
    pub query: &'a str,
    pub variables: &'a Value,
}

/// Top-level `{data, errors}` envelope
#[derive(Debug, Deserialize)]
pub struct GraphqlEnvelope {
    #[serde(default)]
    pub data: Option<Value>,

    #[serde(default)]
    pub errors: Option<Vec<GraphqlErrorMessage>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlErrorMessage {
    #[serde(default)]
    pub message: String,
}

impl GraphqlEnvelope {
    /// Returns `data`, or a `MalformedResponse` when it is null or absent
    pub fn into_data(self, query: &'static str) -> Result<Value, HarvestError> {
        match self.data {
            Some(data) if !data.is_null() => Ok(data),
            _ => {
                let detail = self
                    .errors
                    .unwrap_or_default()
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; ");
                let message = if detail.is_empty() {
                    "response has no data".to_string()
                } else {
                    format!("response has no data: {}", detail)
                };
                Err(HarvestError::MalformedResponse { query, message })
            }
        }
    }
}

/// A relay-style connection: one page of edges plus paging state
#[derive(Debug, Deserialize)]
pub struct Connection<N> {
    pub edges: Vec<Edge<N>>,

    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
}

impl<N> Connection<N> {
    pub fn into_nodes(self) -> Vec<N> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct Edge<N> {
    pub node: N,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,

    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// Decodes a `data` payload into a query's contract
pub fn decode<T: DeserializeOwned>(query: &'static str, data: Value) -> Result<T, HarvestError> {
    serde_json::from_value(data).map_err(|e| HarvestError::MalformedResponse {
        query,
        message: e.to_string(),
    })
}
