//! The "posts" table shipped with the server.

use list_table::render::{escape_html, BulkAction};
use list_table::table::{Column, SortableColumn, TableConfig, TableDefinition};
use list_table::Record;
use serde_json::Value;

pub const POSTS_TABLE: &str = "posts";

const STATUSES: [&str; 3] = ["any", "publish", "draft"];

#[derive(Debug, Clone, Copy, Default)]
pub struct PostsTable;

impl TableDefinition for PostsTable {
    fn type_name(&self) -> &str {
        POSTS_TABLE
    }

    fn defaults(&self) -> TableConfig {
        let mut config = TableConfig::new("post").labels("post", "posts");
        config.show_filter = true;
        config
    }

    fn columns(&self) -> Vec<Column> {
        vec![
            Column::checkbox(),
            Column::new("post_title", "Title"),
            Column::new("post_status", "Status"),
            Column::new("post_date", "Date"),
        ]
    }

    fn sortable_columns(&self) -> Vec<SortableColumn> {
        vec![
            SortableColumn::new("post_title", "post_title", false),
            SortableColumn::new("post_date", "post_date", true),
        ]
    }

    fn bulk_actions(&self) -> Vec<BulkAction> {
        vec![BulkAction::new("trash", "Move to Trash")]
    }

    fn render_column(&self, column: &str, record: &Record, _config: &TableConfig) -> Option<String> {
        if column != "post_title" {
            return None;
        }
        let title = record.get("post_title").and_then(Value::as_str)?;
        Some(format!(
            r#"<strong><a class="row-title" href="?post={}">{}</a></strong>"#,
            record.id,
            escape_html(title)
        ))
    }

    fn filter_markup(&self, config: &TableConfig) -> String {
        let options: String = STATUSES
            .iter()
            .map(|status| {
                let selected = if *status == config.post_status { r#" selected="selected""# } else { "" };
                format!(r#"<option value="{status}"{selected}>{status}</option>"#)
            })
            .collect();
        format!(
            r#"<div class="alignleft actions"><select name="post_status">{}</select><input type="submit" class="button" value="Filter" /></div>"#,
            options
        )
    }
}

/// Sample posts for the in-memory source.
pub fn demo_posts(count: u64) -> Vec<Record> {
    (1..=count)
        .map(|i| {
            Record::new(i)
                .with("post_type", "post")
                .with("post_status", if i % 3 == 0 { "draft" } else { "publish" })
                .with("post_title", format!("Sample post {}", i))
                .with("post_date", format!("2024-{:02}-{:02}", (i % 12) + 1, (i % 28) + 1))
                .with("menu_order", 0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_links_and_escapes() {
        let record = Record::new(7).with("post_title", "A <b> title");
        let html = PostsTable
            .render_column("post_title", &record, &PostsTable.defaults())
            .unwrap();
        assert_eq!(html, r#"<strong><a class="row-title" href="?post=7">A &lt;b&gt; title</a></strong>"#);
        assert!(PostsTable.render_column("post_date", &record, &PostsTable.defaults()).is_none());
    }

    #[test]
    fn filter_marks_current_status() {
        let mut config = PostsTable.defaults();
        config.post_status = "draft".to_string();
        let html = PostsTable.filter_markup(&config);
        assert!(html.contains(r#"<option value="draft" selected="selected">draft</option>"#));
        assert!(html.contains(r#"<option value="any">any</option>"#));
    }

    #[test]
    fn demo_posts_are_posts() {
        let posts = demo_posts(5);
        assert_eq!(posts.len(), 5);
        assert!(posts.iter().all(|p| p.get("post_type").and_then(Value::as_str) == Some("post")));
    }
}
