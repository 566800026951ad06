//! Upstream GraphQL access
//!
//! This module contains everything that talks to the API:
//! - HTTP client with header validation and User-Agent rotation
//! - Request spacing via a shared rate limiter
//! - Typed response contracts
//! - The generic cursor-pagination driver

mod client;
mod headers;
mod paginator;
mod rate_limit;
mod response;

pub use client::{build_http_client, GraphqlClient};
pub use headers::{build_static_headers, encode_header_value, UserAgentRotation};
pub use paginator::{fetch_pages, PagedQuery, Paginator};
pub use rate_limit::RateLimiter;
pub use response::{decode, Connection, Edge, GraphqlEnvelope, GraphqlRequest, PageInfo};
