//! Request header construction
//!
//! Header values must be representable in ISO-8859-1 without control
//! characters. Everything is converted once, when the client is built, so an
//! unencodable credential fails the run before any request goes out.

use crate::config::UpstreamConfig;
use crate::{ConfigError, HarvestError};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, COOKIE, ORIGIN,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Converts a string into a header value, byte-per-character in ISO-8859-1
pub fn encode_header_value(field: &str, value: &str) -> Result<HeaderValue, HarvestError> {
    let mut bytes = Vec::with_capacity(value.len());
    for ch in value.chars() {
        let code = u32::from(ch);
        if code > 0xFF {
            return Err(HarvestError::Encoding {
                field: field.to_string(),
                message: format!("character {:?} is outside ISO-8859-1", ch),
            });
        }
        bytes.push(code as u8);
    }

    HeaderValue::from_bytes(&bytes).map_err(|e| HarvestError::Encoding {
        field: field.to_string(),
        message: e.to_string(),
    })
}

/// Builds the headers sent with every request
///
/// User-Agent and Referer vary per request and are added by the client.
/// An empty cookie is omitted rather than sent blank.
pub fn build_static_headers(config: &UpstreamConfig) -> Result<HeaderMap, HarvestError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let fields: [(HeaderName, &str); 2] = [
        (AUTHORIZATION, config.authorization.as_str()),
        (ORIGIN, config.origin.as_str()),
    ];
    for (name, value) in fields {
        let encoded = encode_header_value(name.as_str(), value)?;
        headers.insert(name, encoded);
    }

    if !config.cookie.is_empty() {
        headers.insert(COOKIE, encode_header_value(COOKIE.as_str(), &config.cookie)?);
    } else {
        tracing::warn!("No cookie configured; upstream may reject requests");
    }

    Ok(headers)
}

/// Round-robin pool of User-Agent values
#[derive(Debug)]
pub struct UserAgentRotation {
    values: Vec<HeaderValue>,
    next: AtomicUsize,
}

impl UserAgentRotation {
    pub fn new(user_agents: &[String]) -> Result<Self, HarvestError> {
        if user_agents.is_empty() {
            return Err(ConfigError::Validation(
                "user-agents must contain at least one entry".to_string(),
            )
            .into());
        }

        let values = user_agents
            .iter()
            .map(|ua| encode_header_value("user-agent", ua))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            values,
            next: AtomicUsize::new(0),
        })
    }

    /// Returns the next User-Agent in the pool
    pub fn next_value(&self) -> HeaderValue {
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.values.len();
        self.values[index].clone()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
