//! Integration tests exercising the full search pipeline: query
//! construction, HTTP fetch against a mock server, and feed parsing.

use std::sync::Arc;

use arxiv_helper_mcp::arxiv::{build_query, parse, ArxivClient, ArxivError};
use arxiv_helper_mcp::config::ArxivConfig;
use arxiv_helper_mcp::mcp::tools::format_search_results;
use arxiv_helper_mcp::mcp::McpServer;
use arxiv_helper_mcp::models::{SearchRequest, SortBy, SortOrder};
use arxiv_helper_mcp::utils::HttpClient;

const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom"
      xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/"
      xmlns:arxiv="http://arxiv.org/schemas/atom">
  <title>ArXiv Query: search_query=ti:transformers</title>
  <updated>2024-05-01T00:00:00-04:00</updated>
  <opensearch:totalResults>2</opensearch:totalResults>
  <opensearch:startIndex>0</opensearch:startIndex>
  <opensearch:itemsPerPage>2</opensearch:itemsPerPage>
  <entry>
    <id>http://arxiv.org/abs/2301.00001v1</id>
    <title>Attention Is
        All You Need</title>
    <summary>We propose a new   architecture.</summary>
    <published>2023-01-01T00:00:00Z</published>
    <updated>2023-01-02T00:00:00Z</updated>
    <author><name>Ada Lovelace</name></author>
    <author><name>Alan Turing</name></author>
    <arxiv:primary_category term="cs.LG"/>
    <category term="cs.LG"/>
    <category term="cs.AI"/>
    <link rel="alternate" type="text/html" href="http://arxiv.org/abs/2301.00001v1"/>
    <link title="pdf" rel="related" type="application/pdf" href="http://arxiv.org/pdf/2301.00001v1"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2301.00002v3</id>
    <title>Second Paper</title>
    <summary>Another abstract.</summary>
    <published>2023-02-01T00:00:00Z</published>
    <author><name>Grace Hopper</name></author>
    <category term="math.CO"/>
  </entry>
</feed>"#;

fn test_config(api_url: String) -> ArxivConfig {
    ArxivConfig {
        api_url,
        ..Default::default()
    }
}

#[test]
fn test_build_query_structured_request() {
    let request = SearchRequest::new()
        .title("transformers")
        .category("cs.AI")
        .sort_by(SortBy::SubmittedDate)
        .sort_order(SortOrder::Descending)
        .max_results(5);

    let built = build_query(&request, &ArxivConfig::default()).unwrap();

    assert_eq!(built.search_query, "ti:transformers AND cat:cs.AI");
    assert!(built.query_string.contains("start=0"));
    assert!(built.query_string.contains("max_results=5"));
    assert!(built.query_string.contains("sortBy=submittedDate"));
    assert!(built.query_string.contains("sortOrder=descending"));
}

#[test]
fn test_build_query_is_deterministic() {
    let request = SearchRequest::new()
        .title("quantum computing")
        .author("Shor")
        .start(10);
    let config = ArxivConfig::default();

    let first = build_query(&request, &config).unwrap();
    let second = build_query(&request, &config).unwrap();

    assert_eq!(first.query_string, second.query_string);
}

#[test]
fn test_build_query_rejects_negative_start() {
    let request = SearchRequest::new().title("x").start(-1);
    let result = build_query(&request, &ArxivConfig::default());

    assert!(matches!(result, Err(ArxivError::InvalidRequest(_))));
}

#[test]
fn test_parse_preserves_feed_order() {
    let parsed = parse(FEED).unwrap();

    assert_eq!(parsed.meta.total_results, 2);
    assert_eq!(parsed.papers.len(), 2);
    assert_eq!(parsed.papers[0].id, "2301.00001v1");
    assert_eq!(parsed.papers[1].id, "2301.00002v3");
    assert_eq!(parsed.papers[0].title, "Attention Is All You Need");
    assert_eq!(parsed.papers[0].summary, "We propose a new architecture.");
}

#[test]
fn test_parse_rejects_non_feed_body() {
    assert!(matches!(parse("not xml at all"), Err(ArxivError::Parse(_))));
    assert!(matches!(
        parse("<html><body>503</body></html>"),
        Err(ArxivError::Parse(_))
    ));
}

#[tokio::test]
async fn test_search_end_to_end() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/query")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("search_query".into(), "ti:transformers".into()),
            mockito::Matcher::UrlEncoded("start".into(), "0".into()),
            mockito::Matcher::UrlEncoded("max_results".into(), "10".into()),
            mockito::Matcher::UrlEncoded("sortBy".into(), "relevance".into()),
            mockito::Matcher::UrlEncoded("sortOrder".into(), "descending".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/atom+xml")
        .with_body(FEED)
        .create_async()
        .await;

    let config = test_config(format!("{}/api/query", server.url()));
    let client = ArxivClient::new(config);

    let request = SearchRequest::new().title("transformers");
    let response = client.search(&request).await.unwrap();

    mock.assert_async().await;

    assert_eq!(response.papers.len(), 2);
    assert_eq!(response.query, "ti:transformers");
    assert_eq!(response.meta.total_results, 2);
    assert!(!response.has_more());

    let text = format_search_results(&response);
    assert!(text.contains("Found 2 papers (showing 1-2 of 2 total results)."));
    assert!(text.contains("arXiv Id: 2301.00001v1"));
    assert!(text.contains("Authors: Ada Lovelace, Alan Turing"));
}

#[tokio::test]
async fn test_search_with_custom_http_client() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", mockito::Matcher::Any)
        .match_header("x-test-client", "custom")
        .with_status(200)
        .with_body(FEED)
        .create_async()
        .await;

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert("x-test-client", "custom".parse().unwrap());
    let reqwest_client = reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .unwrap();

    let config = test_config(format!("{}/api/query", server.url()));
    let http = HttpClient::from_client(Arc::new(reqwest_client));
    let client = ArxivClient::with_client(Arc::new(http), config);

    let request = SearchRequest::new().title("transformers");
    let response = client.search(&request).await.unwrap();

    assert_eq!(response.papers.len(), 2);
}

#[tokio::test]
async fn test_search_reports_api_error() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", mockito::Matcher::Any)
        .with_status(400)
        .with_body("Bad Request")
        .create_async()
        .await;

    let config = test_config(format!("{}/api/query", server.url()));
    let client = ArxivClient::new(config);

    let request = SearchRequest::new().title("x");
    let result = client.search(&request).await;

    assert!(matches!(result, Err(ArxivError::Api(_))));
}

#[tokio::test]
async fn test_search_validation_error_before_fetch() {
    // No mock registered: a validation failure must never hit the network.
    let config = test_config("http://127.0.0.1:1/api/query".to_string());
    let client = ArxivClient::new(config);

    let request = SearchRequest::new();
    let result = client.search(&request).await;

    assert!(matches!(result, Err(ArxivError::InvalidRequest(_))));
}

#[tokio::test]
async fn test_search_pagination_hint() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", mockito::Matcher::Any)
        .with_status(200)
        .with_body(FEED.replace(
            "<opensearch:totalResults>2</opensearch:totalResults>",
            "<opensearch:totalResults>40</opensearch:totalResults>",
        ))
        .create_async()
        .await;

    let config = test_config(format!("{}/api/query", server.url()));
    let client = ArxivClient::new(config);

    let request = SearchRequest::new().title("transformers").max_results(2);
    let response = client.search(&request).await.unwrap();

    assert!(response.has_more());
    assert_eq!(response.next_start(), Some(2));

    let text = format_search_results(&response);
    assert!(text.contains("More results available (use start=2 for next page)"));
}

#[test]
fn test_mcp_server_construction() {
    let client = Arc::new(ArxivClient::new(ArxivConfig::default()));
    let server = McpServer::new(client);

    let debug = format!("{:?}", server);
    assert!(debug.contains("paper_search"));
}

#[test]
fn test_tool_registry_exposes_search_tool() {
    let client = Arc::new(ArxivClient::new(ArxivConfig::default()));
    let registry = arxiv_helper_mcp::mcp::ToolRegistry::from_client(client);

    let tool = registry.get("paper_search").unwrap();
    assert!(tool.input_schema["properties"]["query"].is_object());
    assert!(tool.input_schema["properties"]["max_results"].is_object());
}
