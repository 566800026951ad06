//! GraphQL HTTP client
//!
//! This module handles every outbound request, including:
//! - Building the reqwest client with timeouts and compression
//! - Attaching static headers plus a rotated User-Agent and per-query Referer
//! - Spacing requests through the shared `RateLimiter`
//! - Classifying failures into transport and malformed-response errors

use crate::config::{Config, UpstreamConfig};
use crate::upstream::headers::{build_static_headers, encode_header_value, UserAgentRotation};
use crate::upstream::rate_limit::RateLimiter;
use crate::upstream::response::{GraphqlEnvelope, GraphqlRequest};
use crate::HarvestError;
use reqwest::header::{HeaderMap, REFERER, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Longest error body kept in an `HttpStatus` error
const MAX_ERROR_BODY: usize = 512;

/// Builds the underlying HTTP client
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Client for a single GraphQL endpoint
pub struct GraphqlClient {
    http: Client,
    endpoint: String,
    origin: String,
    headers: HeaderMap,
    user_agents: UserAgentRotation,
    rate_limiter: RateLimiter,
}

impl GraphqlClient {
    /// Creates a client, validating every header value up front
    ///
    /// # Returns
    ///
    /// * `Ok(GraphqlClient)` - Ready to issue requests
    /// * `Err(HarvestError::Encoding)` - A header value cannot be sent
    /// * `Err(HarvestError::Http)` - The HTTP client could not be built
    pub fn new(config: &UpstreamConfig, rate_limiter: RateLimiter) -> Result<Self, HarvestError> {
        let headers = build_static_headers(config)?;
        let user_agents = UserAgentRotation::new(&config.user_agents)?;
        let http = build_http_client().map_err(|source| HarvestError::Http {
            url: config.endpoint.clone(),
            source,
        })?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            origin: config.origin.trim_end_matches('/').to_string(),
            headers,
            user_agents,
            rate_limiter,
        })
    }

    /// Creates a client from the full configuration
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        Self::new(
            &config.upstream,
            RateLimiter::from_millis(config.crawl.rate_limit_ms),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Origin without a trailing slash
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Executes one GraphQL operation and returns its `data` payload
    ///
    /// # Arguments
    ///
    /// * `operation` - Operation name, used in logs and errors
    /// * `document` - The GraphQL query text
    /// * `variables` - Variables object for this request
    /// * `referer` - Referer header value for this request
    pub async fn execute(
        &self,
        operation: &'static str,
        document: &str,
        variables: &Value,
        referer: &str,
    ) -> Result<Value, HarvestError> {
        let referer = encode_header_value(REFERER.as_str(), referer)?;

        self.rate_limiter.acquire().await;
        tracing::debug!("POST {} ({})", self.endpoint, operation);

        let response = self
            .http
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .header(USER_AGENT, self.user_agents.next_value())
            .header(REFERER, referer)
            .json(&GraphqlRequest {
                query: document,
                variables,
            })
            .send()
            .await
            .map_err(|source| self.http_error(source))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            truncate_at_char_boundary(&mut body, MAX_ERROR_BODY);
            return Err(HarvestError::HttpStatus {
                url: self.endpoint.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| self.http_error(source))?;

        let envelope: GraphqlEnvelope =
            serde_json::from_str(&body).map_err(|e| HarvestError::MalformedResponse {
                query: operation,
                message: format!("body is not a GraphQL response: {}", e),
            })?;

        envelope.into_data(operation)
    }

    fn http_error(&self, source: reqwest::Error) -> HarvestError {
        HarvestError::Http {
            url: self.endpoint.clone(),
            source,
        }
    }
}

fn truncate_at_char_boundary(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}
