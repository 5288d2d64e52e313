//! The [`TableDefinition`] trait: everything a deployment customises about a table.

use super::{Column, ColumnHeaders, SortableColumn, TableConfig};
use crate::render::BulkAction;
use crate::source::Record;
use std::collections::BTreeSet;

/// Describes one table type.
///
/// Only [`type_name`](TableDefinition::type_name), [`defaults`](TableDefinition::defaults)
/// and [`columns`](TableDefinition::columns) are required. The provided methods are
/// extension points with empty defaults.
pub trait TableDefinition: Send + Sync {
    /// Identity of the table type; echoed in the full-page form as `wplt_class` so that
    /// an AJAX request can instantiate the same type again.
    fn type_name(&self) -> &str;

    /// Configuration before request overrides. `orderby`/`order` here are the default
    /// sort used whenever the request asks for something that is not sortable.
    fn defaults(&self) -> TableConfig;

    /// Columns in display order. Include [`Column::checkbox`] for a `cb` column.
    fn columns(&self) -> Vec<Column>;

    fn sortable_columns(&self) -> Vec<SortableColumn> {
        Vec::new()
    }

    fn hidden_columns(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    fn bulk_actions(&self) -> Vec<BulkAction> {
        Vec::new()
    }

    /// Column-specific cell markup. Returning `None` falls through to the checkbox /
    /// scalar defaults.
    fn render_column(&self, _column: &str, _record: &Record, _config: &TableConfig) -> Option<String> {
        None
    }

    /// Filter UI rendered above the table when `show_filter` is set.
    fn filter_markup(&self, _config: &TableConfig) -> String {
        String::new()
    }

    /// Builds the column model. Called once per table instance.
    fn column_headers(&self) -> ColumnHeaders {
        ColumnHeaders::new(self.columns(), self.hidden_columns(), self.sortable_columns())
    }
}
