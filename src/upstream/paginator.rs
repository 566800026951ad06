//! Cursor-pagination driver
//!
//! A `Paginator` walks one pagination stream: it sends the current cursor,
//! hands back the page's nodes, and advances to `endCursor` until the
//! upstream reports `hasNextPage = false`. Pages are only requested when the
//! caller asks for the next one.

use crate::upstream::client::GraphqlClient;
use crate::upstream::response::Connection;
use crate::HarvestError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// One paginated GraphQL query
pub trait PagedQuery {
    type Node: DeserializeOwned;

    /// Operation name, used in logs and errors
    fn name(&self) -> &'static str;

    /// The GraphQL document
    fn document(&self) -> &'static str;

    /// Variables for the request at `after` (`None` = start of stream)
    fn variables(&self, after: Option<&str>) -> Value;

    /// Referer header value for this query
    fn referer(&self, origin: &str) -> String;

    /// Extracts the connection from a `data` payload
    ///
    /// `Ok(None)` means the queried root resolved to nothing, which ends the
    /// stream with no items.
    fn connection(&self, data: Value) -> Result<Option<Connection<Self::Node>>, HarvestError>;
}

/// Lazy page stream over a single `PagedQuery`
pub struct Paginator<'a, Q: PagedQuery> {
    client: &'a GraphqlClient,
    query: Q,
    cursor: Option<String>,
    exhausted: bool,
    pages_fetched: u32,
    items_fetched: usize,
}

impl<'a, Q: PagedQuery> Paginator<'a, Q> {
    pub fn new(client: &'a GraphqlClient, query: Q) -> Self {
        Self {
            client,
            query,
            cursor: None,
            exhausted: false,
            pages_fetched: 0,
            items_fetched: 0,
        }
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Cursor the next request will send
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    pub fn items_fetched(&self) -> usize {
        self.items_fetched
    }

    /// Rewinds to the start of the stream
    pub fn reset(&mut self) {
        self.cursor = None;
        self.exhausted = false;
        self.pages_fetched = 0;
        self.items_fetched = 0;
    }

    /// Fetches the next page
    ///
    /// # Returns
    ///
    /// * `Ok(Some(items))` - The next page's nodes (possibly empty)
    /// * `Ok(None)` - The stream is exhausted; no request was sent
    /// * `Err(HarvestError)` - Transport failure or malformed page; the
    ///   cursor is left where it was
    pub async fn next_page(&mut self) -> Result<Option<Vec<Q::Node>>, HarvestError> {
        if self.exhausted {
            return Ok(None);
        }

        let name = self.query.name();
        let variables = self.query.variables(self.cursor.as_deref());
        let referer = self.query.referer(self.client.origin());
        let data = self
            .client
            .execute(name, self.query.document(), &variables, &referer)
            .await?;
        self.pages_fetched += 1;

        let Some(connection) = self.query.connection(data)? else {
            tracing::debug!("{}: root resolved to null, ending stream", name);
            self.exhausted = true;
            return Ok(None);
        };

        let page_info = connection.page_info.clone();
        if page_info.has_next_page {
            match page_info.end_cursor {
                None => {
                    return Err(HarvestError::MalformedResponse {
                        query: name,
                        message: "hasNextPage is true but endCursor is missing".to_string(),
                    });
                }
                Some(ref next) if self.cursor.as_deref() == Some(next.as_str()) => {
                    return Err(HarvestError::MalformedResponse {
                        query: name,
                        message: format!("endCursor {:?} did not advance", next),
                    });
                }
                Some(next) => self.cursor = Some(next),
            }
        } else {
            self.exhausted = true;
        }

        let items = connection.into_nodes();
        self.items_fetched += items.len();
        tracing::info!(
            "{}: page {} returned {} items ({} total)",
            name,
            self.pages_fetched,
            items.len(),
            self.items_fetched
        );

        Ok(Some(items))
    }

    /// Drains the stream into one ordered list
    pub async fn collect_all(mut self) -> Result<Vec<Q::Node>, HarvestError> {
        let mut all = Vec::new();
        while let Some(batch) = self.next_page().await? {
            all.extend(batch);
        }
        Ok(all)
    }
}

/// Starts a lazy page stream for `query`
pub fn fetch_pages<Q: PagedQuery>(client: &GraphqlClient, query: Q) -> Paginator<'_, Q> {
    Paginator::new(client, query)
}
