//! Search request and response models.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::Paper;

/// A searchable arXiv field, mapped to its query prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    Title,
    Author,
    Abstract,
    Category,
    JournalRef,
    ReportNumber,
    All,
}

impl SearchField {
    /// The prefix the arXiv API expects for this field
    pub fn prefix(self) -> &'static str {
        match self {
            SearchField::Title => "ti",
            SearchField::Author => "au",
            SearchField::Abstract => "abs",
            SearchField::Category => "cat",
            SearchField::JournalRef => "jr",
            SearchField::ReportNumber => "rn",
            SearchField::All => "all",
        }
    }
}

/// Boolean operator joining the field terms of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BoolOp {
    #[default]
    And,
    Or,
}

impl BoolOp {
    /// The operator keyword in arXiv query syntax
    pub fn api_value(self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
        }
    }
}

impl FromStr for BoolOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AND" => Ok(BoolOp::And),
            "OR" => Ok(BoolOp::Or),
            other => Err(format!("invalid operator '{}' (expected AND or OR)", other)),
        }
    }
}

/// Sort field for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    Relevance,
    SubmittedDate,
    UpdatedDate,
}

impl SortBy {
    /// The `sortBy` value the arXiv API expects
    pub fn api_value(self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::SubmittedDate => "submittedDate",
            SortBy::UpdatedDate => "lastUpdatedDate",
        }
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "relevance" => Ok(SortBy::Relevance),
            "submittedDate" => Ok(SortBy::SubmittedDate),
            "lastUpdatedDate" => Ok(SortBy::UpdatedDate),
            other => Err(format!(
                "invalid sort_by '{}' (expected relevance, submittedDate, or lastUpdatedDate)",
                other
            )),
        }
    }
}

/// Sort order for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    /// The `sortOrder` value the arXiv API expects
    pub fn api_value(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ascending" => Ok(SortOrder::Ascending),
            "descending" => Ok(SortOrder::Descending),
            other => Err(format!(
                "invalid sort_order '{}' (expected ascending or descending)",
                other
            )),
        }
    }
}

/// Parameters for one arXiv search
///
/// Immutable once constructed; build a fresh request per call. A non-empty
/// [`raw_query`](Self::raw_query) takes precedence over the structured
/// field terms, mirroring the API's own query syntax.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Raw arXiv query string; overrides `terms` when non-empty
    pub raw_query: Option<String>,

    /// Ordered (field, term) pairs combined with `operator`
    pub terms: Vec<(SearchField, String)>,

    /// Category filter, e.g. "cs.AI" (shorthand for a Category term)
    pub category: Option<String>,

    /// Boolean operator joining the field terms
    pub operator: BoolOp,

    /// Sort field
    pub sort_by: SortBy,

    /// Sort order
    pub sort_order: SortOrder,

    /// Maximum number of results; clamped to the configured ceiling
    pub max_results: usize,

    /// Pagination offset; negative values are rejected
    pub start: i64,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            raw_query: None,
            terms: Vec::new(),
            category: None,
            operator: BoolOp::And,
            sort_by: SortBy::Relevance,
            sort_order: SortOrder::Descending,
            max_results: 10,
            start: 0,
        }
    }
}

impl SearchRequest {
    /// Create an empty search request
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a raw query string that bypasses the structured fields
    pub fn raw_query(mut self, query: impl Into<String>) -> Self {
        self.raw_query = Some(query.into());
        self
    }

    /// Add a (field, term) pair
    pub fn term(mut self, field: SearchField, value: impl Into<String>) -> Self {
        self.terms.push((field, value.into()));
        self
    }

    /// Add a title term
    pub fn title(self, value: impl Into<String>) -> Self {
        self.term(SearchField::Title, value)
    }

    /// Add an author term
    pub fn author(self, value: impl Into<String>) -> Self {
        self.term(SearchField::Author, value)
    }

    /// Add an abstract term
    pub fn abstract_text(self, value: impl Into<String>) -> Self {
        self.term(SearchField::Abstract, value)
    }

    /// Set the category filter
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the boolean operator
    pub fn operator(mut self, op: BoolOp) -> Self {
        self.operator = op;
        self
    }

    /// Set the sort field
    pub fn sort_by(mut self, sort: SortBy) -> Self {
        self.sort_by = sort;
        self
    }

    /// Set the sort order
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// Set the maximum number of results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Set the pagination offset
    pub fn start(mut self, start: i64) -> Self {
        self.start = start;
        self
    }
}

/// Output of [`crate::arxiv::build_query`]
///
/// Carries the effective `max_results` next to the query string so callers
/// can detect that the requested value was clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    /// URL-encoded query string, ready to append to the API endpoint
    pub query_string: String,

    /// The un-encoded search_query expression, e.g. "ti:transformers AND cat:cs.AI"
    pub search_query: String,

    /// The max_results actually encoded, after clamping
    pub max_results: usize,
}

/// Feed-level metadata from the opensearch extension elements
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedMeta {
    /// Feed title, e.g. "ArXiv Query: ..."
    pub title: String,

    /// Feed updated timestamp (RFC 3339)
    pub updated: String,

    /// Total matches on the server, may exceed the returned page
    pub total_results: u64,

    /// Offset of the first returned entry
    pub start_index: u64,

    /// Page size the server applied
    pub items_per_page: u64,
}

/// Search response containing papers and feed metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Papers in feed (i.e. server sort) order
    pub papers: Vec<Paper>,

    /// Feed-level metadata
    pub meta: FeedMeta,

    /// The search_query expression that was executed
    pub query: String,

    /// Effective max_results after clamping
    pub max_results: usize,
}

impl SearchResponse {
    /// Whether the server holds more results beyond this page
    pub fn has_more(&self) -> bool {
        self.meta.start_index + (self.papers.len() as u64) < self.meta.total_results
    }

    /// Offset to request the next page, if one exists
    pub fn next_start(&self) -> Option<u64> {
        self.has_more()
            .then(|| self.meta.start_index + self.max_results as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_builder() {
        let request = SearchRequest::new()
            .title("transformers")
            .author("Vaswani")
            .category("cs.AI")
            .sort_by(SortBy::SubmittedDate)
            .sort_order(SortOrder::Descending)
            .max_results(5);

        assert_eq!(request.terms.len(), 2);
        assert_eq!(request.terms[0].0, SearchField::Title);
        assert_eq!(request.terms[1].1, "Vaswani");
        assert_eq!(request.category, Some("cs.AI".to_string()));
        assert_eq!(request.max_results, 5);
        assert_eq!(request.start, 0);
    }

    #[test]
    fn test_sort_by_from_str() {
        assert_eq!("relevance".parse::<SortBy>().unwrap(), SortBy::Relevance);
        assert_eq!(
            "submittedDate".parse::<SortBy>().unwrap(),
            SortBy::SubmittedDate
        );
        assert_eq!(
            "lastUpdatedDate".parse::<SortBy>().unwrap(),
            SortBy::UpdatedDate
        );
        assert!("newest".parse::<SortBy>().is_err());
    }

    #[test]
    fn test_sort_order_from_str() {
        assert_eq!(
            "ascending".parse::<SortOrder>().unwrap(),
            SortOrder::Ascending
        );
        assert!("downwards".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_bool_op_from_str() {
        assert_eq!("and".parse::<BoolOp>().unwrap(), BoolOp::And);
        assert_eq!("OR".parse::<BoolOp>().unwrap(), BoolOp::Or);
        assert!("XOR".parse::<BoolOp>().is_err());
    }

    #[test]
    fn test_field_prefixes() {
        assert_eq!(SearchField::Title.prefix(), "ti");
        assert_eq!(SearchField::Author.prefix(), "au");
        assert_eq!(SearchField::Abstract.prefix(), "abs");
        assert_eq!(SearchField::Category.prefix(), "cat");
        assert_eq!(SearchField::JournalRef.prefix(), "jr");
        assert_eq!(SearchField::ReportNumber.prefix(), "rn");
    }

    #[test]
    fn test_response_pagination() {
        let response = SearchResponse {
            papers: vec![Paper::new("1".into(), "a".into())],
            meta: FeedMeta {
                total_results: 3,
                start_index: 0,
                items_per_page: 1,
                ..Default::default()
            },
            query: "all:test".to_string(),
            max_results: 1,
        };

        assert!(response.has_more());
        assert_eq!(response.next_start(), Some(1));
    }
}
