use serde::Deserialize;

/// Main configuration structure for Rating-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// GraphQL endpoint and request identity
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// GraphQL endpoint every query is POSTed to
    pub endpoint: String,

    /// Value of the Origin header; also the base of the Referer header
    pub origin: String,

    /// Static Authorization header value
    pub authorization: String,

    /// Session cookie; may be empty
    pub cookie: String,

    /// Pool of User-Agent values rotated per request
    #[serde(rename = "user-agents")]
    pub user_agents: Vec<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.ratemyprofessors.com/graphql".to_string(),
            origin: "https://www.ratemyprofessors.com".to_string(),
            authorization: "Basic dGVzdDp0ZXN0".to_string(),
            cookie: String::new(),
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15".to_string(),
                "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0".to_string(),
            ],
        }
    }
}

/// Crawl tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Legacy numeric id of the scope (school) to harvest
    #[serde(rename = "scope-id")]
    pub scope_id: u64,

    /// Page size for the entity-list stream
    #[serde(rename = "entity-page-size")]
    pub entity_page_size: u32,

    /// Page size for each sub-record stream
    #[serde(rename = "subrecord-page-size")]
    pub subrecord_page_size: u32,

    /// Minimum time between outbound requests (milliseconds)
    #[serde(rename = "rate-limit-ms")]
    pub rate_limit_ms: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            scope_id: 4928,
            entity_page_size: 50,
            subrecord_page_size: 20,
            rate_limit_ms: 1500,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON snapshot rewritten after every entity
    #[serde(rename = "snapshot-path")]
    pub snapshot_path: String,

    /// Directory the previous snapshot is copied into before a run
    #[serde(rename = "backup-dir")]
    pub backup_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            snapshot_path: "data/all_prof_data.json".to_string(),
            backup_dir: "data/data_copy".to_string(),
        }
    }
}
