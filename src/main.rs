use anyhow::Result;
use arxiv_helper_mcp::arxiv::ArxivClient;
use arxiv_helper_mcp::config::{find_config_file, get_config, load_config};
use arxiv_helper_mcp::mcp::server::McpServer;
use arxiv_helper_mcp::mcp::tools::format_search_results;
use arxiv_helper_mcp::models::{BoolOp, SearchRequest, SortBy, SortOrder};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// arXiv Helper MCP - Search for papers on arXiv
#[derive(Parser, Debug)]
#[command(name = "arxiv-helper-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP server for searching papers on arXiv", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Sort field for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SortField {
    /// Sort by relevance
    Relevance,
    /// Sort by submission date
    Submitted,
    /// Sort by last updated date
    Updated,
}

impl From<SortField> for SortBy {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Relevance => SortBy::Relevance,
            SortField::Submitted => SortBy::SubmittedDate,
            SortField::Updated => SortBy::UpdatedDate,
        }
    }
}

/// Sort order
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Order {
    /// Ascending order
    Asc,
    /// Descending order
    Desc,
}

impl From<Order> for SortOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Asc => SortOrder::Ascending,
            Order::Desc => SortOrder::Descending,
        }
    }
}

/// Boolean operator joining structured search fields
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Operator {
    And,
    Or,
}

impl From<Operator> for BoolOp {
    fn from(op: Operator) -> Self {
        match op {
            Operator::And => BoolOp::And,
            Operator::Or => BoolOp::Or,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the MCP server (default; stdio unless --http is given)
    Serve {
        /// Listen address for HTTP/SSE mode, e.g. 127.0.0.1:3000
        #[arg(long)]
        http: Option<String>,
    },

    /// Search arXiv once from the command line
    #[command(alias = "s")]
    Search {
        /// Raw arXiv query string (takes precedence over field options)
        query: Option<String>,

        /// Search in paper titles
        #[arg(long, short)]
        title: Option<String>,

        /// Search for a specific author
        #[arg(long, short)]
        author: Option<String>,

        /// Search in paper abstracts
        #[arg(long)]
        r#abstract: Option<String>,

        /// arXiv category filter (e.g., cs.AI, math.CO)
        #[arg(long, short)]
        category: Option<String>,

        /// Boolean operator for structured fields
        #[arg(long, value_enum, default_value_t = Operator::And)]
        operator: Operator,

        /// Sort by field
        #[arg(long, value_enum, default_value_t = SortField::Relevance)]
        sort_by: SortField,

        /// Sort order
        #[arg(long, value_enum, default_value_t = Order::Desc)]
        order: Order,

        /// Starting index for pagination
        #[arg(long, default_value_t = 0)]
        start: i64,

        /// Maximum number of results
        #[arg(long, short, default_value_t = 10)]
        max_results: usize,

        /// Print results as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity. Logs go to stderr only:
    // in stdio mode, stdout belongs to the MCP transport.
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("arxiv_helper_mcp={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration from file if specified or found in default locations
    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(&config_path)?
    } else {
        get_config()
    };

    let client = Arc::new(ArxivClient::new(config));

    match cli.command {
        None | Some(Commands::Serve { http: None }) => {
            let server = McpServer::new(client);
            server.run().await?;
        }
        Some(Commands::Serve { http: Some(addr) }) => {
            let server = McpServer::new(client);
            let (bound, handle) = server.run_http(&addr).await?;
            tracing::info!("Listening on {}", bound);
            handle.await?;
        }
        Some(Commands::Search {
            query,
            title,
            author,
            r#abstract,
            category,
            operator,
            sort_by,
            order,
            start,
            max_results,
            json,
        }) => {
            let mut request = SearchRequest::new()
                .operator(operator.into())
                .sort_by(sort_by.into())
                .sort_order(order.into())
                .start(start)
                .max_results(max_results);

            if let Some(query) = query {
                request = request.raw_query(query);
            }
            if let Some(title) = title {
                request = request.title(title);
            }
            if let Some(author) = author {
                request = request.author(author);
            }
            if let Some(text) = r#abstract {
                request = request.abstract_text(text);
            }
            if let Some(category) = category {
                request = request.category(category);
            }

            let response = client.search(&request).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&response.papers)?);
            } else {
                println!("{}", format_search_results(&response));
            }
        }
    }

    Ok(())
}
