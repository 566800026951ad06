//! Integration tests for the pagination driver
//!
//! A minimal query over a `{"items": <connection>}` root drives `Paginator`
//! directly against a wiremock endpoint.

use rating_harvest::config::Config;
use rating_harvest::upstream::{decode, fetch_pages, Connection, PagedQuery};
use rating_harvest::{GraphqlClient, HarvestError};
use serde::Deserialize;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ITEMS_QUERY: &str = r#"query ItemsQuery($first: Int!, $after: String) {
  items(first: $first, after: $after) {
    edges { node { n } }
    pageInfo { hasNextPage endCursor }
  }
}"#;

#[derive(Deserialize)]
struct ItemsData {
    items: Option<Connection<Value>>,
}

struct ItemsQuery;

impl PagedQuery for ItemsQuery {
    type Node = Value;

    fn name(&self) -> &'static str {
        "ItemsQuery"
    }

    fn document(&self) -> &'static str {
        ITEMS_QUERY
    }

    fn variables(&self, after: Option<&str>) -> Value {
        json!({"first": 2, "after": after})
    }

    fn referer(&self, origin: &str) -> String {
        format!("{}/items", origin)
    }

    fn connection(&self, data: Value) -> Result<Option<Connection<Value>>, HarvestError> {
        let data: ItemsData = decode(self.name(), data)?;
        Ok(data.items)
    }
}

fn create_client(server: &MockServer) -> GraphqlClient {
    let mut config = Config::default();
    config.upstream.endpoint = format!("{}/graphql", server.uri());
    config.upstream.origin = "https://items.example.com".to_string();
    config.upstream.user_agents = vec!["TestAgent/1.0".to_string()];
    config.crawl.rate_limit_ms = 0;
    GraphqlClient::from_config(&config).expect("Failed to build client")
}

fn items_page(values: &[u32], has_next: bool, end_cursor: Option<&str>) -> Value {
    let edges: Vec<Value> = values.iter().map(|n| json!({"node": {"n": n}})).collect();
    json!({
        "data": {
            "items": {
                "edges": edges,
                "pageInfo": {"hasNextPage": has_next, "endCursor": end_cursor}
            }
        }
    })
}

async fn mount_page(server: &MockServer, after: Option<&str>, body: Value) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({"variables": {"after": after}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn request_afters(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .expect("Request recording is disabled")
        .iter()
        .map(|request| {
            let body: Value =
                serde_json::from_slice(&request.body).expect("Request body is not JSON");
            body["variables"]["after"].clone()
        })
        .collect()
}

fn numbers(items: &[Value]) -> Vec<u64> {
    items.iter().map(|item| item["n"].as_u64().unwrap()).collect()
}

#[tokio::test]
async fn test_next_page_fetches_one_page_per_call() {
    let server = MockServer::start().await;
    mount_page(&server, None, items_page(&[1, 2], true, Some("c1"))).await;
    mount_page(&server, Some("c1"), items_page(&[3], false, None)).await;

    let client = create_client(&server);
    let mut pages = fetch_pages(&client, ItemsQuery);
    assert_eq!(pages.cursor(), None);

    let first = pages.next_page().await.unwrap().unwrap();
    assert_eq!(numbers(&first), vec![1, 2]);
    assert_eq!(pages.pages_fetched(), 1);
    assert_eq!(pages.cursor(), Some("c1"));
    assert_eq!(request_afters(&server).await.len(), 1);

    let second = pages.next_page().await.unwrap().unwrap();
    assert_eq!(numbers(&second), vec![3]);
    assert_eq!(pages.pages_fetched(), 2);
    assert_eq!(pages.items_fetched(), 3);
    assert!(pages.is_exhausted());
    assert_eq!(request_afters(&server).await.len(), 2);
}

#[tokio::test]
async fn test_exhausted_stream_sends_no_request() {
    let server = MockServer::start().await;
    mount_page(&server, None, items_page(&[1], false, None)).await;

    let client = create_client(&server);
    let mut pages = fetch_pages(&client, ItemsQuery);

    assert!(pages.next_page().await.unwrap().is_some());
    assert!(pages.next_page().await.unwrap().is_none());
    assert!(pages.next_page().await.unwrap().is_none());

    assert_eq!(pages.pages_fetched(), 1);
    assert_eq!(request_afters(&server).await, vec![Value::Null]);
}

#[tokio::test]
async fn test_reset_restarts_from_null_cursor() {
    let server = MockServer::start().await;
    mount_page(&server, None, items_page(&[1, 2], true, Some("c1"))).await;
    mount_page(&server, Some("c1"), items_page(&[3], false, None)).await;

    let client = create_client(&server);
    let mut pages = fetch_pages(&client, ItemsQuery);
    while pages.next_page().await.unwrap().is_some() {}
    assert!(pages.is_exhausted());

    pages.reset();
    assert!(!pages.is_exhausted());
    assert_eq!(pages.cursor(), None);
    assert_eq!(pages.pages_fetched(), 0);
    assert_eq!(pages.items_fetched(), 0);

    let again = pages.next_page().await.unwrap().unwrap();
    assert_eq!(numbers(&again), vec![1, 2]);
    assert_eq!(
        request_afters(&server).await,
        vec![Value::Null, json!("c1"), Value::Null]
    );
}

#[tokio::test]
async fn test_non_advancing_cursor_is_malformed() {
    let server = MockServer::start().await;
    mount_page(&server, None, items_page(&[1], true, Some("c1"))).await;
    mount_page(&server, Some("c1"), items_page(&[2], true, Some("c1"))).await;

    let client = create_client(&server);
    let mut pages = fetch_pages(&client, ItemsQuery);
    pages.next_page().await.unwrap();

    let err = pages.next_page().await.unwrap_err();
    assert!(err.is_malformed(), "unexpected error: {err}");
    assert!(err.to_string().contains("did not advance"));
    assert_eq!(pages.cursor(), Some("c1"));
    assert!(!pages.is_exhausted());
}

#[tokio::test]
async fn test_null_root_on_later_page_ends_stream() {
    let server = MockServer::start().await;
    mount_page(&server, None, items_page(&[1, 2], true, Some("c1"))).await;
    mount_page(&server, Some("c1"), json!({"data": {"items": null}})).await;

    let client = create_client(&server);
    let items = fetch_pages(&client, ItemsQuery).collect_all().await.unwrap();
    assert_eq!(numbers(&items), vec![1, 2]);

    let mut pages = fetch_pages(&client, ItemsQuery);
    assert!(pages.next_page().await.unwrap().is_some());
    assert!(pages.next_page().await.unwrap().is_none());
    assert!(pages.is_exhausted());
    assert_eq!(pages.items_fetched(), 2);
}

#[tokio::test]
async fn test_collect_all_keeps_page_order() {
    let server = MockServer::start().await;
    mount_page(&server, None, items_page(&[1, 2], true, Some("c1"))).await;
    mount_page(&server, Some("c1"), items_page(&[], true, Some("c2"))).await;
    mount_page(&server, Some("c2"), items_page(&[3, 4], false, Some("c3"))).await;

    let client = create_client(&server);
    let items = fetch_pages(&client, ItemsQuery).collect_all().await.unwrap();

    assert_eq!(numbers(&items), vec![1, 2, 3, 4]);
    assert_eq!(
        request_afters(&server).await,
        vec![Value::Null, json!("c1"), json!("c2")]
    );
}
