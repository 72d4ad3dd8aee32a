//! arXiv Atom feed parsing.
//!
//! Maps the feed document onto typed [`Paper`] records with an explicit
//! per-field schema-mapping step: an entry either produces a record or a
//! named failure, and failures skip that entry only. A body that is not an
//! Atom document at all fails the whole call.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::HashSet;

use crate::arxiv::ArxivError;
use crate::models::{FeedMeta, LinkKind, Paper};

/// Parse result: feed-level metadata plus papers in document order
#[derive(Debug, Clone)]
pub struct ParsedFeed {
    /// Feed metadata, including opensearch pagination totals
    pub meta: FeedMeta,

    /// Well-formed entries, in the order the feed listed them
    pub papers: Vec<Paper>,
}

/// Why a single entry was skipped
#[derive(Debug, PartialEq, Eq)]
enum EntryError {
    MissingId,
    MissingTitle,
}

impl std::fmt::Display for EntryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryError::MissingId => write!(f, "missing entry id"),
            EntryError::MissingTitle => write!(f, "missing entry title"),
        }
    }
}

/// Collapse every run of whitespace (including newlines from the feed's
/// line wrapping) into a single space and trim the ends. Idempotent.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text element currently being captured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    FeedTitle,
    FeedUpdated,
    TotalResults,
    StartIndex,
    ItemsPerPage,
    EntryId,
    EntryTitle,
    EntrySummary,
    EntryPublished,
    EntryUpdated,
    AuthorName,
    EntryDoi,
    EntryJournalRef,
    EntryComment,
}

/// One `<link>` element as found in an entry
#[derive(Debug, Default)]
struct RawLink {
    rel: Option<String>,
    title: Option<String>,
    href: String,
}

/// Accumulator for one `<entry>` element
#[derive(Debug, Default)]
struct RawEntry {
    id: String,
    title: String,
    summary: String,
    authors: Vec<String>,
    published: String,
    updated: String,
    primary_category: Option<String>,
    categories: Vec<String>,
    links: Vec<RawLink>,
    doi: String,
    journal_ref: String,
    comment: String,
}

/// Parse an arXiv Atom feed body into papers.
///
/// Entries missing their id or title are skipped with a warning; all other
/// well-formed entries are returned in document order with unique ids. A
/// body that cannot be located as an Atom `<feed>` document (empty string,
/// non-XML, wrong root element) fails with [`ArxivError::Parse`].
pub fn parse(feed_body: &str) -> Result<ParsedFeed, ArxivError> {
    let mut reader = Reader::from_str(feed_body);
    let mut buf = Vec::new();

    let mut meta = FeedMeta::default();
    let mut papers: Vec<Paper> = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    let mut saw_root = false;
    let mut in_entry = false;
    let mut in_author = false;
    let mut capture: Option<Capture> = None;
    let mut entry = RawEntry::default();
    let mut entry_index = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = local_name(e);

                if !saw_root {
                    if name != "feed" {
                        return Err(ArxivError::Parse(format!(
                            "expected Atom <feed> root, found <{}>",
                            name
                        )));
                    }
                    saw_root = true;
                    buf.clear();
                    continue;
                }

                if name == "entry" {
                    in_entry = true;
                    entry = RawEntry::default();
                    buf.clear();
                    continue;
                }

                if in_entry {
                    match name.as_str() {
                        "id" => capture = Some(Capture::EntryId),
                        "title" => capture = Some(Capture::EntryTitle),
                        "summary" => capture = Some(Capture::EntrySummary),
                        "published" => capture = Some(Capture::EntryPublished),
                        "updated" => capture = Some(Capture::EntryUpdated),
                        "author" => in_author = true,
                        "name" if in_author => capture = Some(Capture::AuthorName),
                        "doi" => capture = Some(Capture::EntryDoi),
                        "journal_ref" => capture = Some(Capture::EntryJournalRef),
                        "comment" => capture = Some(Capture::EntryComment),
                        "link" => {
                            if let Some(link) = read_link(e) {
                                entry.links.push(link);
                            }
                        }
                        "category" => {
                            if let Some(term) = get_attr(e, "term") {
                                entry.categories.push(term);
                            }
                        }
                        "primary_category" => {
                            if let Some(term) = get_attr(e, "term") {
                                entry.primary_category = Some(term);
                            }
                        }
                        _ => {}
                    }
                } else {
                    match name.as_str() {
                        "title" => capture = Some(Capture::FeedTitle),
                        "updated" => capture = Some(Capture::FeedUpdated),
                        "totalResults" => capture = Some(Capture::TotalResults),
                        "startIndex" => capture = Some(Capture::StartIndex),
                        "itemsPerPage" => capture = Some(Capture::ItemsPerPage),
                        _ => {}
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = local_name(e);

                if !saw_root {
                    return Err(ArxivError::Parse(format!(
                        "expected Atom <feed> root, found <{}/>",
                        name
                    )));
                }

                if in_entry {
                    match name.as_str() {
                        "link" => {
                            if let Some(link) = read_link(e) {
                                entry.links.push(link);
                            }
                        }
                        "category" => {
                            if let Some(term) = get_attr(e, "term") {
                                entry.categories.push(term);
                            }
                        }
                        "primary_category" => {
                            if let Some(term) = get_attr(e, "term") {
                                entry.primary_category = Some(term);
                            }
                        }
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(field) = capture {
                    let text = e.unescape().unwrap_or_default();
                    append_text(&mut meta, &mut entry, field, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(field) = capture {
                    let text = String::from_utf8_lossy(&e).to_string();
                    append_text(&mut meta, &mut entry, field, &text);
                }
            }
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match name.as_str() {
                    "entry" => {
                        in_entry = false;
                        entry_index += 1;
                        match map_entry(std::mem::take(&mut entry)) {
                            Ok(paper) => {
                                if seen_ids.insert(paper.id.clone()) {
                                    papers.push(paper);
                                } else {
                                    tracing::warn!(
                                        id = %paper.id,
                                        index = entry_index - 1,
                                        "skipping entry with duplicate id"
                                    );
                                }
                            }
                            Err(reason) => {
                                tracing::warn!(
                                    index = entry_index - 1,
                                    %reason,
                                    "skipping malformed feed entry"
                                );
                            }
                        }
                    }
                    "author" => in_author = false,
                    _ => {}
                }
                capture = None;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ArxivError::Parse(format!("invalid XML: {}", e)));
            }
        }
        buf.clear();
    }

    if !saw_root {
        return Err(ArxivError::Parse(
            "body is not an XML document".to_string(),
        ));
    }

    Ok(ParsedFeed { meta, papers })
}

/// Route captured text into the right accumulator field
fn append_text(meta: &mut FeedMeta, entry: &mut RawEntry, field: Capture, text: &str) {
    match field {
        Capture::FeedTitle => meta.title.push_str(text),
        Capture::FeedUpdated => meta.updated.push_str(text),
        Capture::TotalResults => meta.total_results = parse_count(text, meta.total_results),
        Capture::StartIndex => meta.start_index = parse_count(text, meta.start_index),
        Capture::ItemsPerPage => meta.items_per_page = parse_count(text, meta.items_per_page),
        Capture::EntryId => entry.id.push_str(text),
        Capture::EntryTitle => entry.title.push_str(text),
        Capture::EntrySummary => entry.summary.push_str(text),
        Capture::EntryPublished => entry.published.push_str(text),
        Capture::EntryUpdated => entry.updated.push_str(text),
        Capture::AuthorName => {
            let name = text.trim();
            if !name.is_empty() {
                entry.authors.push(name.to_string());
            }
        }
        Capture::EntryDoi => entry.doi.push_str(text),
        Capture::EntryJournalRef => entry.journal_ref.push_str(text),
        Capture::EntryComment => entry.comment.push_str(text),
    }
}

fn parse_count(text: &str, previous: u64) -> u64 {
    text.trim().parse().unwrap_or(previous)
}

/// Map an accumulated entry onto a typed Paper, or name the field that
/// makes it malformed.
fn map_entry(raw: RawEntry) -> Result<Paper, EntryError> {
    let raw_id = raw.id.trim();
    if raw_id.is_empty() {
        return Err(EntryError::MissingId);
    }

    // Entry ids are abs-page URLs like http://arxiv.org/abs/2301.12345v1
    let id = raw_id.split("/abs/").last().unwrap_or(raw_id).to_string();

    let title = normalize_whitespace(&raw.title);
    if title.is_empty() {
        return Err(EntryError::MissingTitle);
    }

    let mut paper = Paper::new(id, title);
    paper.summary = normalize_whitespace(&raw.summary);
    paper.authors = raw.authors;
    paper.published = normalize_date(&raw.published);
    paper.updated = normalize_date(&raw.updated);

    // arXiv marks the primary category explicitly; the first plain
    // category is the fallback
    paper.primary_category = raw
        .primary_category
        .or_else(|| raw.categories.first().cloned());
    paper.categories = raw.categories;

    for link in raw.links {
        if let Some(kind) = classify_link(&link) {
            paper.links.insert(kind, link.href);
        }
    }

    let doi = raw.doi.trim();
    if !doi.is_empty() {
        paper.doi = Some(doi.to_string());
    }
    let journal_ref = normalize_whitespace(&raw.journal_ref);
    if !journal_ref.is_empty() {
        paper.journal_ref = Some(journal_ref);
    }
    let comment = normalize_whitespace(&raw.comment);
    if !comment.is_empty() {
        paper.comment = Some(comment);
    }

    Ok(paper)
}

/// Decide what a `<link>` element points at. Unknown relations are dropped.
fn classify_link(link: &RawLink) -> Option<LinkKind> {
    if link.rel.as_deref() == Some("alternate") {
        return Some(LinkKind::Abstract);
    }
    match link.title.as_deref() {
        Some("pdf") => Some(LinkKind::Pdf),
        Some("doi") => Some(LinkKind::Doi),
        _ => None,
    }
}

/// Canonicalize a feed timestamp to RFC 3339; a non-conforming value is
/// kept verbatim rather than dropped.
fn normalize_date(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    match chrono::DateTime::parse_from_rfc3339(s) {
        Ok(dt) => Some(dt.to_rfc3339()),
        Err(_) => Some(s.to_string()),
    }
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_string()
}

/// Get attribute value from a BytesStart element
fn get_attr(e: &BytesStart<'_>, attr_name: &str) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == attr_name.as_bytes())
        .and_then(|a| {
            std::str::from_utf8(a.value.as_ref())
                .ok()
                .map(|s| s.to_string())
        })
}

fn read_link(e: &BytesStart<'_>) -> Option<RawLink> {
    let href = get_attr(e, "href")?;
    Some(RawLink {
        rel: get_attr(e, "rel"),
        title: get_attr(e, "title"),
        href,
    })
}
