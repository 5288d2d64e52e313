//! In-memory record source.

use super::{Record, RecordPage, RecordQuery, RecordSource, SortOrder, SourceError};
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use tracing::debug;

/// Status value that matches every record.
pub const ANY_STATUS: &str = "any";

/// A [`RecordSource`] backed by a plain vector.
///
/// Records are matched on their `post_type` and `post_status` fields, sorted by the
/// whitespace-separated field names in the sort key (ties broken by id) and sliced
/// into pages.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<Record>,
}

impl MemorySource {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn matches(record: &Record, query: &RecordQuery) -> bool {
        let type_ok = record
            .get("post_type")
            .and_then(Value::as_str)
            .is_some_and(|t| t == query.post_type);
        let status_ok = query.post_status == ANY_STATUS
            || record
                .get("post_status")
                .and_then(Value::as_str)
                .is_some_and(|s| s == query.post_status);
        type_ok && status_ok
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn query(&self, query: &RecordQuery) -> Result<RecordPage, SourceError> {
        if query.per_page == 0 {
            return Err(SourceError::Query("per_page must be positive".to_string()));
        }

        let mut matched: Vec<&Record> = self
            .records
            .iter()
            .filter(|r| Self::matches(r, query))
            .collect();

        let keys: Vec<&str> = query.sort_key.split_whitespace().collect();
        matched.sort_by(|a, b| {
            let ord = keys
                .iter()
                .map(|k| compare_values(a.get(k), b.get(k)))
                .find(|o| o.is_ne())
                .unwrap_or_else(|| a.id.cmp(&b.id));
            match query.sort_dir {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        let total_items = matched.len() as u64;
        let per_page = u64::from(query.per_page);
        let total_pages = total_items.div_ceil(per_page);
        let offset = u64::from(query.page.max(1) - 1) * per_page;

        let records: Vec<Record> = matched
            .into_iter()
            .skip(offset as usize)
            .take(query.per_page as usize)
            .cloned()
            .collect();

        debug!(
            post_type = %query.post_type,
            page = query.page,
            returned = records.len(),
            total_items,
            "Memory query"
        );

        Ok(RecordPage {
            records,
            total_items,
            total_pages,
        })
    }
}

/// Orders two optional JSON values: missing first, then numbers, strings, bools.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.to_lowercase().cmp(&y.to_lowercase()),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => rank(x).cmp(&rank(y)),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Bool(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
