//! Pagination controls, bulk action selector and the table navigation bar.

use super::{escape_html, items_label, LinkBase};
use crate::table::PaginationState;

/// Which copy of the navigation bar is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Top,
    Bottom,
}

impl Position {
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Top => "top",
            Position::Bottom => "bottom",
        }
    }
}

/// An entry of the bulk action selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkAction {
    pub key: String,
    pub label: String,
}

impl BulkAction {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

struct Nav<'a> {
    state: &'a PaginationState,
    base: &'a LinkBase,
}

impl Nav<'_> {
    fn href(&self, page: u64) -> String {
        let page = page.to_string();
        self.base.href(&[
            ("paged", page.as_str()),
            ("orderby", self.state.orderby.as_str()),
            ("order", self.state.order.as_str()),
        ])
    }

    fn link(&self, class: &str, page: u64, label: &str, glyph: &str, disabled: bool) -> String {
        if disabled {
            return format!(
                r#"<span class="tablenav-pages-navspan button disabled" aria-hidden="true">{}</span>"#,
                glyph
            );
        }
        format!(
            r#"<a class="{} button" href="{}"><span class="screen-reader-text">{}</span><span aria-hidden="true">{}</span></a>"#,
            class,
            escape_html(&self.href(page)),
            label,
            glyph
        )
    }
}

/// Renders the `tablenav-pages` block for one position. Page links keep the arguments
/// of `base`.
pub fn render_pagination(state: &PaginationState, base: &LinkBase, position: Position) -> String {
    let nav = Nav { state, base };
    let current = u64::from(state.current_page);
    let total = state.total_pages;

    let page_class = match total {
        0 => " no-pages",
        1 => " one-page",
        _ => "",
    };

    let mut links = String::new();
    links.push_str(&nav.link("first-page", 1, "First page", "&laquo;", current <= 2));
    links.push_str(&nav.link(
        "prev-page",
        current.saturating_sub(1).max(1),
        "Previous page",
        "&lsaquo;",
        current <= 1,
    ));

    let total_html = format!(r#"<span class="total-pages">{}</span>"#, super::format_number(total));
    match position {
        Position::Top => links.push_str(&format!(
            concat!(
                r#"<span class="paging-input">"#,
                r#"<label for="current-page-selector" class="screen-reader-text">Current Page</label>"#,
                r#"<input class="current-page" id="current-page-selector" type="text" name="paged" value="{}" size="{}" aria-describedby="table-paging" />"#,
                r#"<span class="tablenav-paging-text"> of {}</span></span>"#
            ),
            current,
            total.to_string().len(),
            total_html
        )),
        Position::Bottom => links.push_str(&format!(
            r#"<span class="screen-reader-text">Current Page</span><span id="table-paging" class="paging-input"><span class="tablenav-paging-text">{} of {}</span></span>"#,
            current, total_html
        )),
    }

    links.push_str(&nav.link(
        "next-page",
        (current + 1).min(state.last_page()),
        "Next page",
        "&rsaquo;",
        current >= total,
    ));
    links.push_str(&nav.link(
        "last-page",
        state.last_page(),
        "Last page",
        "&raquo;",
        current + 1 >= total,
    ));

    format!(
        r#"<div class="tablenav-pages{}"><span class="displaying-num">{}</span><span class="pagination-links">{}</span></div>"#,
        page_class,
        items_label(state.total_items),
        links
    )
}

/// Renders the bulk action selector, or nothing when there are no bulk actions.
pub fn render_bulk_actions(actions: &[BulkAction], position: Position) -> String {
    if actions.is_empty() {
        return String::new();
    }
    let (name, suffix) = match position {
        Position::Top => ("action", ""),
        Position::Bottom => ("action2", "2"),
    };
    let selector = format!("bulk-action-selector-{}", position.as_str());

    let options: String = actions
        .iter()
        .map(|a| format!(r#"<option value="{}">{}</option>"#, escape_html(&a.key), escape_html(&a.label)))
        .collect();

    format!(
        concat!(
            r#"<div class="alignleft actions bulkactions">"#,
            r#"<label for="{sel}" class="screen-reader-text">Select bulk action</label>"#,
            r#"<select name="{name}" id="{sel}"><option value="-1">Bulk Actions</option>{options}</select>"#,
            r#"<input type="submit" id="doaction{suffix}" class="button action" value="Apply" />"#,
            r#"</div>"#
        ),
        sel = selector,
        name = name,
        options = options,
        suffix = suffix
    )
}

/// Wraps bulk actions and pagination into the `tablenav` bar.
pub fn render_tablenav(bulk_actions: &str, pagination: &str, position: Position) -> String {
    format!(
        r#"<div class="tablenav {}">{}{}<br class="clear" /></div>"#,
        position.as_str(),
        bulk_actions,
        pagination
    )
}
