//! Body rows.

use super::escape_html;
use crate::source::Record;
use crate::table::ColumnHeaders;
use serde_json::Value;

/// Printed for fields that are missing or not plain scalars.
pub const PLACEHOLDER: &str = "undefined";

/// Text of the empty-table row.
pub const NO_ITEMS: &str = "No items found.";

/// Column-specific cell rendering supplied by a table definition.
pub trait CellRenderer {
    /// Markup for `column` of `record`, or `None` to fall through to the defaults.
    fn cell(&self, column: &str, record: &Record) -> Option<String>;
}

/// A [`CellRenderer`] that never overrides anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCustomCells;

impl CellRenderer for NoCustomCells {
    fn cell(&self, _column: &str, _record: &Record) -> Option<String> {
        None
    }
}

/// The generic cell: the escaped scalar field named like the column, or [`PLACEHOLDER`].
pub fn default_cell(record: &Record, column: &str) -> String {
    match record.get(column) {
        Some(Value::String(s)) => escape_html(s),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

fn checkbox_cell(record: &Record, singular: &str) -> String {
    format!(
        r#"<input type="checkbox" name="{}[]" value="{}" />"#,
        escape_html(singular),
        record.id
    )
}

/// Renders one `<tr>`.
///
/// Cell precedence: the definition's custom renderer, then the checkbox for the `cb`
/// column, then [`default_cell`]. Cells of hidden columns carry the `hidden` class.
pub fn render_row(record: &Record, headers: &ColumnHeaders, singular: &str, cells: &dyn CellRenderer) -> String {
    let mut out = String::from("<tr>");
    for column in &headers.columns {
        let custom = cells.cell(&column.key, record);
        let hidden = if headers.is_hidden(&column.key) { " hidden" } else { "" };
        if column.is_checkbox() {
            let content = custom.unwrap_or_else(|| checkbox_cell(record, singular));
            out.push_str(&format!(
                r#"<th scope="row" class="check-column{}">{}</th>"#,
                hidden, content
            ));
            continue;
        }
        let content = custom.unwrap_or_else(|| default_cell(record, &column.key));
        let key = escape_html(&column.key);
        out.push_str(&format!(
            r#"<td class="{key} column-{key}{hidden}" data-colname="{}">{}</td>"#,
            escape_html(&column.label),
            content
        ));
    }
    out.push_str("</tr>");
    out
}

pub fn render_rows(records: &[Record], headers: &ColumnHeaders, singular: &str, cells: &dyn CellRenderer) -> String {
    records
        .iter()
        .map(|r| render_row(r, headers, singular, cells))
        .collect()
}

/// Like [`render_rows`], but an empty record set yields a single "no items" row spanning
/// every column, hidden ones included.
pub fn render_rows_or_placeholder(
    records: &[Record],
    headers: &ColumnHeaders,
    singular: &str,
    cells: &dyn CellRenderer,
) -> String {
    if records.is_empty() {
        return format!(
            r#"<tr class="no-items"><td class="colspanchange" colspan="{}">{}</td></tr>"#,
            headers.columns.len(),
            NO_ITEMS
        );
    }
    render_rows(records, headers, singular, cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn headers() -> ColumnHeaders {
        ColumnHeaders::new(
            vec![
                Column::checkbox(),
                Column::new("post_title", "Title"),
                Column::new("meta", "Meta"),
            ],
            BTreeSet::new(),
            Vec::new(),
        )
    }

    struct Shouting;

    impl CellRenderer for Shouting {
        fn cell(&self, column: &str, record: &Record) -> Option<String> {
            (column == "post_title").then(|| default_cell(record, column).to_uppercase())
        }
    }

    #[test]
    fn scalars_render_and_complex_values_degrade() {
        let record = Record::new(5)
            .with("post_title", "<b>Hi</b>")
            .with("meta", json!({"nested": [1, 2]}));
        let html = render_row(&record, &headers(), "post", &NoCustomCells);

        assert!(html.contains(r#"<th scope="row" class="check-column"><input type="checkbox" name="post[]" value="5" /></th>"#));
        assert!(html.contains(r#"<td class="post_title column-post_title" data-colname="Title">&lt;b&gt;Hi&lt;/b&gt;</td>"#));
        assert!(html.contains(r#"data-colname="Meta">undefined</td>"#));
        assert!(!html.contains("nested"));
    }

    #[test]
    fn numbers_and_missing_fields() {
        let record = Record::new(1).with("post_title", 42);
        let html = render_row(&record, &headers(), "post", &NoCustomCells);
        assert!(html.contains(">42</td>"));
        assert!(html.contains(r#"data-colname="Meta">undefined</td>"#));
    }

    #[test]
    fn custom_cells_take_precedence() {
        let record = Record::new(1).with("post_title", "quiet");
        let html = render_row(&record, &headers(), "post", &Shouting);
        assert!(html.contains(">QUIET</td>"));
    }

    #[test]
    fn hidden_columns_stay_in_the_markup() {
        let mut headers = headers();
        headers.hidden.insert("meta".to_string());
        let html = render_row(&Record::new(2).with("post_title", "x"), &headers, "post", &NoCustomCells);
        assert!(html.contains(r#"<td class="meta column-meta hidden" data-colname="Meta">undefined</td>"#));

        let empty = render_rows_or_placeholder(&[], &headers, "post", &NoCustomCells);
        assert!(empty.contains(r#"colspan="3""#));
    }

    #[test]
    fn empty_sets_render_a_placeholder_row_unless_suppressed() {
        let html = render_rows_or_placeholder(&[], &headers(), "post", &NoCustomCells);
        assert_eq!(
            html,
            r#"<tr class="no-items"><td class="colspanchange" colspan="3">No items found.</td></tr>"#
        );
        assert_eq!(render_rows(&[], &headers(), "post", &NoCustomCells), "");
    }
}
