//! Column header cells.

use super::{escape_html, LinkBase};
use crate::source::SortOrder;
use crate::table::{ActiveSort, ColumnHeaders};

/// Renders the header cells (without the surrounding `<tr>`).
///
/// `with_id` adds `id` attributes; the footer copy of the header is rendered without
/// them so ids stay unique in the page. Hidden columns are rendered with the `hidden`
/// class so a client-side column toggle can show them again. Sort links keep the
/// arguments of `base`.
pub fn render_header(headers: &ColumnHeaders, current: &ActiveSort, base: &LinkBase, with_id: bool) -> String {
    let mut out = String::new();
    for column in &headers.columns {
        let id = if with_id {
            format!(r#" id="{}""#, escape_html(&column.key))
        } else {
            String::new()
        };
        let hidden = if headers.is_hidden(&column.key) { " hidden" } else { "" };

        if column.is_checkbox() {
            out.push_str(&format!(
                r#"<td{} class="manage-column column-cb check-column{}">{}</td>"#,
                id, hidden, column.label
            ));
            continue;
        }

        let mut classes = vec!["manage-column".to_string(), format!("column-{}", escape_html(&column.key))];
        let label = match headers.sortable_for(&column.key) {
            Some(sortable) => {
                let link_order = if sortable.sort_key == current.sort_key {
                    classes.push("sorted".to_string());
                    classes.push(current.order.as_str().to_string());
                    current.order.flip()
                } else if sortable.initially_sorted {
                    classes.push("sortable".to_string());
                    classes.push("asc".to_string());
                    SortOrder::Desc
                } else {
                    classes.push("sortable".to_string());
                    classes.push("desc".to_string());
                    SortOrder::Asc
                };
                let href = base.href(&[
                    ("orderby", sortable.sort_key.as_str()),
                    ("order", link_order.as_str()),
                ]);
                format!(
                    r#"<a href="{}"><span>{}</span><span class="sorting-indicator"></span></a>"#,
                    escape_html(&href),
                    column.label
                )
            }
            None => column.label.clone(),
        };
        if !hidden.is_empty() {
            classes.push("hidden".to_string());
        }

        out.push_str(&format!(
            r#"<th scope="col"{} class="{}">{}</th>"#,
            id,
            classes.join(" "),
            label
        ));
    }
    out
}
