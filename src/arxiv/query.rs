//! arXiv query construction.
//!
//! Pure string transformation from a [`SearchRequest`] to the query-string
//! portion of an arXiv API URL. No I/O happens here; the output is fully
//! determined by the request and the configuration.

use crate::arxiv::ArxivError;
use crate::config::ArxivConfig;
use crate::models::{BuiltQuery, SearchField, SearchRequest};

/// Substrings that force quoting of a term (arXiv query metacharacters
/// and boolean keywords, matched the way the API treats them)
const RESERVED: &[&str] = &[":", "+", "-", "(", ")", "[", "]", "AND", "OR", "NOT"];

/// Build the query string for a search request.
///
/// Returns the URL-encoded query string together with the effective
/// `max_results`, which may be lower than requested when the configured
/// ceiling applies. Validation failures are reported before any string
/// construction.
pub fn build_query(
    request: &SearchRequest,
    config: &ArxivConfig,
) -> Result<BuiltQuery, ArxivError> {
    if request.start < 0 {
        return Err(ArxivError::InvalidRequest(format!(
            "start must be non-negative, got {}",
            request.start
        )));
    }

    if request.max_results == 0 {
        return Err(ArxivError::InvalidRequest(
            "max_results must be positive".to_string(),
        ));
    }

    let search_query = build_search_expression(request)?;

    let max_results = if request.max_results > config.max_results_ceiling {
        tracing::warn!(
            requested = request.max_results,
            ceiling = config.max_results_ceiling,
            "max_results capped at ceiling"
        );
        config.max_results_ceiling
    } else {
        request.max_results
    };

    let query_string = format!(
        "search_query={}&start={}&max_results={}&sortBy={}&sortOrder={}",
        urlencoding::encode(&search_query),
        request.start,
        max_results,
        request.sort_by.api_value(),
        request.sort_order.api_value()
    );

    Ok(BuiltQuery {
        query_string,
        search_query,
        max_results,
    })
}

/// Build the search_query expression from the structured fields, unless a
/// raw query overrides them.
fn build_search_expression(request: &SearchRequest) -> Result<String, ArxivError> {
    if let Some(raw) = &request.raw_query {
        let raw = raw.trim();
        if !raw.is_empty() {
            return Ok(raw.to_string());
        }
    }

    let mut parts = Vec::new();

    for (field, term) in &request.terms {
        let term = term.trim();
        if term.is_empty() {
            continue;
        }
        // Categories like cs.AI are identifiers, never quoted
        let formatted = match field {
            SearchField::Category => term.to_string(),
            _ => format_term(term),
        };
        parts.push(format!("{}:{}", field.prefix(), formatted));
    }

    if let Some(category) = &request.category {
        let category = category.trim();
        if !category.is_empty() {
            parts.push(format!("cat:{}", category));
        }
    }

    if parts.is_empty() {
        return Err(ArxivError::InvalidRequest(
            "must provide a raw query or at least one search field".to_string(),
        ));
    }

    Ok(parts.join(&format!(" {} ", request.operator.api_value())))
}

/// Format a term value, quoting it when needed for exact phrase matching
fn format_term(value: &str) -> String {
    let value = value.trim();

    // Already properly quoted
    if value.len() > 2 && value.starts_with('"') && value.ends_with('"') {
        return value.to_string();
    }

    // Strip stray quotes to avoid double-quoting
    let value = value.trim_matches('"');

    // Phrases and anything containing query metacharacters get quotes
    if value.contains(' ') || RESERVED.iter().any(|r| value.contains(r)) {
        return format!("\"{}\"", value);
    }

    // Bare reserved words would be parsed as operators
    if matches!(value.to_uppercase().as_str(), "AND" | "OR" | "NOT") {
        return format!("\"{}\"", value);
    }

    value.to_string()
}
