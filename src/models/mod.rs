//! Core data structures shared across the crate.

mod paper;
mod search;

pub use paper::{LinkKind, Paper, PaperBuilder};
pub use search::{
    BoolOp, BuiltQuery, FeedMeta, SearchField, SearchRequest, SearchResponse, SortBy, SortOrder,
};
