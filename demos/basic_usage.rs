//! Basic usage of the arXiv helper library without the MCP layer.
//!
//! Run with: cargo run --example basic_usage

use arxiv_helper_mcp::arxiv::ArxivClient;
use arxiv_helper_mcp::config::ArxivConfig;
use arxiv_helper_mcp::models::{SearchRequest, SortBy};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let client = ArxivClient::new(ArxivConfig::default());

    // Structured search: title keywords within a category, newest first
    let request = SearchRequest::new()
        .title("attention")
        .category("cs.LG")
        .sort_by(SortBy::SubmittedDate)
        .max_results(5);

    let response = client.search(&request).await?;

    println!(
        "Found {} of {} total results for '{}'",
        response.papers.len(),
        response.meta.total_results,
        response.query
    );

    for paper in &response.papers {
        println!(
            "\n{} [{}]",
            paper.title,
            paper.primary_category.as_deref().unwrap_or("?")
        );
        println!("  {}", paper.author_line());
        println!("  {}", paper.abs_url().unwrap_or("-"));
    }

    if let Some(next) = response.next_start() {
        println!("\nMore results available (use start={})", next);
    }

    // Raw query strings work too, and take precedence over fields
    let raw = SearchRequest::new()
        .raw_query("au:hinton AND cat:cs.NE")
        .max_results(3);

    let response = client.search(&raw).await?;
    println!("\nRaw query matched {} papers", response.meta.total_results);

    Ok(())
}
