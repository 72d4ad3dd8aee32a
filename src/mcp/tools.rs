//! MCP tool registry and the paper_search tool.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::arxiv::ArxivClient;
use crate::models::{BoolOp, Paper, SearchField, SearchRequest, SearchResponse, SortBy, SortOrder};

/// An MCP tool that can be called by the client
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "paper_search")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: serde_json::Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

/// Handler for executing a tool
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with the given arguments
    async fn execute(&self, args: Value) -> Result<Value, String>;
}

/// Registry for all MCP tools
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    /// Create a new tool registry for the given arXiv client
    pub fn from_client(client: Arc<ArxivClient>) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
        };

        registry.register(Tool {
            name: "paper_search".to_string(),
            description: "Searches arXiv using its public API. \
Provide structured fields (title, author, abstract, category, journal_ref, report_number) \
combined with the boolean operator, or a complete raw arXiv query string via 'query' \
(which takes precedence). Field prefixes for raw queries: ti: (title), au: (author), \
abs: (abstract), cat: (category), jr: (journal reference), rn: (report number). \
Example raw query: \"ti:attention AND cat:cs.AI\"."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Raw arXiv query string (takes precedence if provided)"
                    },
                    "title": {
                        "type": "string",
                        "description": "Search in paper titles"
                    },
                    "author": {
                        "type": "string",
                        "description": "Search for a specific author"
                    },
                    "abstract": {
                        "type": "string",
                        "description": "Search in paper abstracts"
                    },
                    "category": {
                        "type": "string",
                        "description": "arXiv category (e.g., cs.AI, math.CO)"
                    },
                    "journal_ref": {
                        "type": "string",
                        "description": "Journal reference"
                    },
                    "report_number": {
                        "type": "string",
                        "description": "Report number"
                    },
                    "operator": {
                        "type": "string",
                        "description": "Boolean operator for structured fields",
                        "enum": ["AND", "OR"],
                        "default": "AND"
                    },
                    "sort_by": {
                        "type": "string",
                        "description": "Sort criteria",
                        "enum": ["relevance", "submittedDate", "lastUpdatedDate"],
                        "default": "relevance"
                    },
                    "sort_order": {
                        "type": "string",
                        "description": "Sort order",
                        "enum": ["ascending", "descending"],
                        "default": "descending"
                    },
                    "start": {
                        "type": "integer",
                        "description": "Starting index for pagination",
                        "default": 0
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of results",
                        "default": 10
                    }
                }
            }),
            handler: Arc::new(PaperSearchHandler { client }),
        });

        registry
    }

    /// Register a tool
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get all tools
    pub fn all(&self) -> Vec<&Tool> {
        self.tools.values().collect()
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, String> {
        let tool = self
            .get(name)
            .ok_or_else(|| format!("Tool '{}' not found", name))?;

        tool.handler.execute(args).await
    }
}

/// Handler for the paper_search tool
#[derive(Debug)]
pub struct PaperSearchHandler {
    pub client: Arc<ArxivClient>,
}

#[async_trait::async_trait]
impl ToolHandler for PaperSearchHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let request = match request_from_args(&args) {
            Ok(request) => request,
            Err(reason) => return Ok(Value::String(format!("Error: {}", reason))),
        };

        match self.client.search(&request).await {
            Ok(response) => Ok(Value::String(format_search_results(&response))),
            Err(e) => {
                tracing::error!(error = %e, "paper search failed");
                Ok(Value::String(format!("Error: {}", e)))
            }
        }
    }
}

/// Translate tool arguments into a SearchRequest. Enum-valued arguments
/// that don't match a variant are reported back as validation failures.
fn request_from_args(args: &Value) -> Result<SearchRequest, String> {
    let str_arg = |key: &str| args.get(key).and_then(Value::as_str).unwrap_or("");

    let mut request = SearchRequest::new();

    let raw = str_arg("query");
    if !raw.trim().is_empty() {
        request = request.raw_query(raw);
    }

    let fields = [
        ("title", SearchField::Title),
        ("author", SearchField::Author),
        ("abstract", SearchField::Abstract),
        ("category", SearchField::Category),
        ("journal_ref", SearchField::JournalRef),
        ("report_number", SearchField::ReportNumber),
    ];
    for (key, field) in fields {
        let value = str_arg(key);
        if !value.trim().is_empty() {
            request = request.term(field, value);
        }
    }

    let operator: BoolOp = match args.get("operator").and_then(Value::as_str) {
        Some(s) => s.parse()?,
        None => BoolOp::And,
    };
    let sort_by: SortBy = match args.get("sort_by").and_then(Value::as_str) {
        Some(s) => s.parse()?,
        None => SortBy::Relevance,
    };
    let sort_order: SortOrder = match args.get("sort_order").and_then(Value::as_str) {
        Some(s) => s.parse()?,
        None => SortOrder::Descending,
    };

    let start = args.get("start").and_then(Value::as_i64).unwrap_or(0);
    let max_results = match args.get("max_results") {
        None | Some(Value::Null) => 10,
        Some(value) => match value.as_u64() {
            Some(n) => n as usize,
            None => {
                return Err(format!(
                    "max_results must be a non-negative integer, got {}",
                    value
                ))
            }
        },
    };

    Ok(request
        .operator(operator)
        .sort_by(sort_by)
        .sort_order(sort_order)
        .start(start)
        .max_results(max_results))
}

/// Format one paper for the text response
pub fn format_paper(paper: &Paper) -> String {
    format!(
        "\narXiv Id: {}\nPaper Title: {}\nAuthors: {}\nPublished: {}\nSummary: {}\nCategory: {}\n",
        paper.id,
        paper.title,
        paper.author_line(),
        paper.published.as_deref().unwrap_or("unknown"),
        paper.summary,
        paper.primary_category.as_deref().unwrap_or("unknown"),
    )
}

/// Format a full search response, including pagination hints
pub fn format_search_results(response: &SearchResponse) -> String {
    if response.papers.is_empty() {
        return "No papers found matching your search criteria.".to_string();
    }

    let count = response.papers.len() as u64;
    let start = response.meta.start_index;

    let mut text = format!(
        "Found {} papers (showing {}-{} of {} total results).\n\n",
        count,
        start + 1,
        start + count,
        response.meta.total_results
    );

    let blocks: Vec<String> = response.papers.iter().map(format_paper).collect();
    text.push_str(&blocks.join("\n---\n"));

    if let Some(next) = response.next_start() {
        text.push_str(&format!(
            "\n\n--- More results available (use start={} for next page) ---",
            next
        ));
    }

    text
}
