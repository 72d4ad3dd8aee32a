//! Paper model representing one entry from an arXiv query result.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The kind of link attached to a paper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// The abstract page on arxiv.org
    Abstract,
    /// Direct PDF link
    Pdf,
    /// DOI resolver link, when the paper has one
    Doi,
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkKind::Abstract => write!(f, "abstract"),
            LinkKind::Pdf => write!(f, "pdf"),
            LinkKind::Doi => write!(f, "doi"),
        }
    }
}

/// A paper parsed from the arXiv Atom feed
///
/// Produced only by [`crate::arxiv::parse`] and never mutated afterwards.
/// Titles and summaries are whitespace-normalized (runs of whitespace
/// collapsed to a single space, then trimmed); dates are RFC 3339 strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    /// arXiv identifier, e.g. "2301.12345v1" (version retained)
    pub id: String,

    /// Paper title
    pub title: String,

    /// Authors in feed order, one entry per `<author>` element
    pub authors: Vec<String>,

    /// Abstract text
    pub summary: String,

    /// Publication date (RFC 3339)
    pub published: Option<String>,

    /// Last updated date (RFC 3339)
    pub updated: Option<String>,

    /// Primary category, e.g. "cs.AI"
    pub primary_category: Option<String>,

    /// All categories in feed order
    pub categories: Vec<String>,

    /// Links keyed by kind; absent kinds simply have no entry
    pub links: HashMap<LinkKind, String>,

    /// Digital Object Identifier, when assigned
    pub doi: Option<String>,

    /// Journal reference, when published
    pub journal_ref: Option<String>,

    /// Author comment (page count, venue, etc.)
    pub comment: Option<String>,
}

impl Paper {
    /// Create a new paper with required fields
    pub fn new(id: String, title: String) -> Self {
        Self {
            id,
            title,
            authors: Vec::new(),
            summary: String::new(),
            published: None,
            updated: None,
            primary_category: None,
            categories: Vec::new(),
            links: HashMap::new(),
            doi: None,
            journal_ref: None,
            comment: None,
        }
    }

    /// URL of the abstract page, if the feed provided one
    pub fn abs_url(&self) -> Option<&str> {
        self.links.get(&LinkKind::Abstract).map(String::as_str)
    }

    /// Direct PDF URL, if the feed provided one
    pub fn pdf_url(&self) -> Option<&str> {
        self.links.get(&LinkKind::Pdf).map(String::as_str)
    }

    /// Check if the paper has a downloadable PDF
    pub fn has_pdf(&self) -> bool {
        self.links.contains_key(&LinkKind::Pdf)
    }

    /// Authors joined for display
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }
}

/// Builder for constructing Paper objects
#[derive(Debug, Clone)]
pub struct PaperBuilder {
    paper: Paper,
}

impl PaperBuilder {
    /// Create a new builder with required fields
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            paper: Paper::new(id.into(), title.into()),
        }
    }

    /// Add an author
    pub fn author(mut self, name: impl Into<String>) -> Self {
        self.paper.authors.push(name.into());
        self
    }

    /// Set all authors at once
    pub fn authors(mut self, authors: Vec<String>) -> Self {
        self.paper.authors = authors;
        self
    }

    /// Set the abstract text
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.paper.summary = summary.into();
        self
    }

    /// Set publication date
    pub fn published(mut self, date: impl Into<String>) -> Self {
        self.paper.published = Some(date.into());
        self
    }

    /// Set last updated date
    pub fn updated(mut self, date: impl Into<String>) -> Self {
        self.paper.updated = Some(date.into());
        self
    }

    /// Set the primary category
    pub fn primary_category(mut self, category: impl Into<String>) -> Self {
        self.paper.primary_category = Some(category.into());
        self
    }

    /// Add a category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.paper.categories.push(category.into());
        self
    }

    /// Add a link
    pub fn link(mut self, kind: LinkKind, url: impl Into<String>) -> Self {
        self.paper.links.insert(kind, url.into());
        self
    }

    /// Set the DOI
    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.paper.doi = Some(doi.into());
        self
    }

    /// Set the journal reference
    pub fn journal_ref(mut self, journal_ref: impl Into<String>) -> Self {
        self.paper.journal_ref = Some(journal_ref.into());
        self
    }

    /// Set the author comment
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.paper.comment = Some(comment.into());
        self
    }

    /// Build the Paper
    pub fn build(self) -> Paper {
        self.paper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_builder() {
        let paper = PaperBuilder::new("2301.12345v1", "Test Paper")
            .author("John Doe")
            .author("Jane Smith")
            .summary("This is a test abstract.")
            .primary_category("cs.AI")
            .category("cs.AI")
            .category("cs.LG")
            .link(LinkKind::Abstract, "http://arxiv.org/abs/2301.12345v1")
            .link(LinkKind::Pdf, "http://arxiv.org/pdf/2301.12345v1")
            .doi("10.1234/test.1234")
            .build();

        assert_eq!(paper.id, "2301.12345v1");
        assert_eq!(paper.title, "Test Paper");
        assert_eq!(paper.authors, vec!["John Doe", "Jane Smith"]);
        assert_eq!(paper.author_line(), "John Doe, Jane Smith");
        assert_eq!(paper.primary_category.as_deref(), Some("cs.AI"));
        assert_eq!(paper.doi, Some("10.1234/test.1234".to_string()));
        assert!(paper.has_pdf());
        assert_eq!(paper.pdf_url(), Some("http://arxiv.org/pdf/2301.12345v1"));
        assert_eq!(paper.abs_url(), Some("http://arxiv.org/abs/2301.12345v1"));
    }

    #[test]
    fn test_missing_links_are_absent() {
        let paper = PaperBuilder::new("2301.12345", "Test").build();

        assert!(!paper.has_pdf());
        assert!(paper.abs_url().is_none());
        assert!(!paper.links.contains_key(&LinkKind::Doi));
    }
}
