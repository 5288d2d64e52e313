//! # Renderer
//!
//! Pure functions that turn the column model, records and pagination state into markup
//! fragments. Nothing here performs I/O or reads request state, so every fragment can be
//! unit-tested on its own.
//!
//! | fragment | function |
//! |----------|----------|
//! | header cells | [`render_header`] |
//! | one body row | [`render_row`] |
//! | body rows (+ empty placeholder) | [`render_rows`], [`render_rows_or_placeholder`] |
//! | pagination controls | [`render_pagination`] |
//! | bulk action selector | [`render_bulk_actions`] |
//!
//! Column labels and custom cell output come from table definitions and are trusted
//! markup. Record field values are always escaped.

pub mod header;
pub mod i18n;
pub mod pagination;
pub mod rows;

pub use header::render_header;
pub use i18n::{format_number, items_label};
pub use pagination::{render_bulk_actions, render_pagination, render_tablenav, BulkAction, Position};
pub use rows::{
    default_cell, render_row, render_rows, render_rows_or_placeholder, CellRenderer, NoCustomCells,
    NO_ITEMS, PLACEHOLDER,
};

/// Escapes text for use in element content and double-quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Builds a relative `?key=value&...` link, URL-encoding every pair.
pub(crate) fn query_link<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (k, v) in pairs {
        serializer.append_pair(k, v);
    }
    format!("?{}", serializer.finish())
}

/// Query arguments every sort and pagination link carries, so following a link keeps
/// the table type, filters and page size of the current view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkBase {
    args: Vec<(String, String)>,
}

impl LinkBase {
    pub fn new(args: Vec<(String, String)>) -> Self {
        Self { args }
    }

    pub fn args(&self) -> &[(String, String)] {
        &self.args
    }

    /// The base arguments followed by `overrides`. A base argument named in
    /// `overrides` is replaced, not repeated.
    pub fn href<'a>(&'a self, overrides: &[(&'a str, &'a str)]) -> String {
        let base = self
            .args
            .iter()
            .filter(|(k, _)| overrides.iter().all(|(o, _)| *o != k.as_str()))
            .map(|(k, v)| (k.as_str(), v.as_str()));
        query_link(base.chain(overrides.iter().copied()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<script>alert("x" & 'y')</script>"#),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#039;y&#039;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn link_base_is_kept_and_overridden() {
        let base = LinkBase::new(vec![
            ("wplt_class".to_string(), "posts".to_string()),
            ("paged".to_string(), "9".to_string()),
        ]);
        assert_eq!(base.href(&[("paged", "2")]), "?wplt_class=posts&paged=2");
        assert_eq!(LinkBase::default().href(&[("order", "asc")]), "?order=asc");
    }

    #[test]
    fn query_links_are_encoded() {
        assert_eq!(
            query_link([("orderby", "menu_order title"), ("order", "asc")]),
            "?orderby=menu_order+title&order=asc"
        );
    }
}
