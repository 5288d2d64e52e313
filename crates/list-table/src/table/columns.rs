//! Column definitions and sort-key resolution.

use crate::source::SortOrder;
use std::collections::BTreeSet;

/// Key of the checkbox column.
pub const CHECKBOX_COLUMN: &str = "cb";

/// A displayed column: slug plus header label (the label may contain markup).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub key: String,
    pub label: String,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }

    pub fn checkbox() -> Self {
        Self::new(CHECKBOX_COLUMN, r#"<input type="checkbox" />"#)
    }

    pub fn is_checkbox(&self) -> bool {
        self.key == CHECKBOX_COLUMN
    }
}

/// A sortable column: the displayed column key, the underlying sort key handed to the
/// record source, and whether the column starts out sorted (descending first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortableColumn {
    pub key: String,
    pub sort_key: String,
    pub initially_sorted: bool,
}

impl SortableColumn {
    pub fn new(key: impl Into<String>, sort_key: impl Into<String>, initially_sorted: bool) -> Self {
        Self {
            key: key.into(),
            sort_key: sort_key.into(),
            initially_sorted,
        }
    }
}

/// The column model of one table instance: all columns in display order, the hidden
/// subset and the sortable subset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnHeaders {
    pub columns: Vec<Column>,
    pub hidden: BTreeSet<String>,
    pub sortable: Vec<SortableColumn>,
}

/// The sort that is actually in effect for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSort {
    pub sort_key: String,
    pub order: SortOrder,
}

impl ColumnHeaders {
    pub fn new(columns: Vec<Column>, hidden: BTreeSet<String>, sortable: Vec<SortableColumn>) -> Self {
        Self {
            columns,
            hidden,
            sortable,
        }
    }

    pub fn is_hidden(&self, column_key: &str) -> bool {
        self.hidden.contains(column_key)
    }

    pub fn sortable_for(&self, column_key: &str) -> Option<&SortableColumn> {
        self.sortable.iter().find(|s| s.key == column_key)
    }

    /// Maps a requested `orderby` onto a declared sort key.
    ///
    /// The request may name either a sortable column key or its underlying sort key.
    /// Anything else resolves to `default`.
    pub fn resolve_sort_key(&self, requested: &str, default: &str) -> String {
        let requested = requested.trim();
        self.sortable
            .iter()
            .find(|s| s.key == requested || s.sort_key == requested)
            .map(|s| s.sort_key.clone())
            .unwrap_or_else(|| default.to_string())
    }
}
