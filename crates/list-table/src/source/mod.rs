//! # Record Source Adapter
//!
//! The list table never touches storage directly. Everything it displays comes through
//! the [`RecordSource`] trait: given a post type, a status, a sort key, a direction and a
//! page window, the source returns one page of [`Record`]s plus the authoritative
//! `total_items` / `total_pages` counts.
//!
//! The engine only relies on this contract. Filtering and sorting are the source's job;
//! the engine merely guarantees that the sort key it hands over is one of the table's
//! declared sortable keys (or the table's explicit default).
//!
//! Two implementations ship with the crate:
//!
//! - [`MemorySource`] - a `Vec<Record>` that filters, sorts and pages in memory.
//! - [`MockSource`](crate::mock::MockSource) - expectation-driven, for tests.

pub mod memory;

pub use memory::MemorySource;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{self, Display};

/// Identifier of a single record (the checkbox value in the `cb` column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row's worth of data.
///
/// Fields are kept as loose JSON values: the source decides the shape, and the renderer
/// decides what is safe to print.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: u64) -> Self {
        Self {
            id: RecordId(id),
            fields: Map::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn flip(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    /// Case-insensitive parse of `asc` / `desc`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parameters handed to [`RecordSource::query`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub post_type: String,
    pub post_status: String,
    /// Validated sort key. May name several fields separated by whitespace
    /// (e.g. `"menu_order title"`).
    pub sort_key: String,
    pub sort_dir: SortOrder,
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
}

/// One page of results with the source's authoritative counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPage {
    pub records: Vec<Record>,
    pub total_items: u64,
    pub total_pages: u64,
}

/// Errors raised by a record source.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum SourceError {
    #[error("Record source unavailable: {0}")]
    Unavailable(String),
    #[error("Record query failed: {0}")]
    Query(String),
}

/// Contract consumed by the list table engine.
///
/// Implementations must treat `page` values past the last page as an empty result, not
/// as an error.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn query(&self, query: &RecordQuery) -> Result<RecordPage, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_order_parses_loosely() {
        assert_eq!(SortOrder::parse("DESC"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse(" asc "), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse("sideways"), None);
        assert_eq!(SortOrder::Asc.flip(), SortOrder::Desc);
    }

    #[test]
    fn record_builder_sets_fields() {
        let record = Record::new(7).with("post_title", "Hello").with("menu_order", 3);
        assert_eq!(record.id, RecordId(7));
        assert_eq!(record.get("post_title"), Some(&Value::from("Hello")));
        assert_eq!(record.get("menu_order"), Some(&Value::from(3)));
        assert!(record.get("missing").is_none());
    }
}
