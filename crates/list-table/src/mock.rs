//! # Mock Record Source
//!
//! [`MockSource`] implements [`RecordSource`] from a queue of expectations. Each call to
//! `query` pops the next expectation and returns its canned response, recording the
//! query it was given. Use it to test table and dispatcher behaviour without a data set,
//! and to inject source failures that are awkward to produce otherwise.
//!
//! ```rust
//! use list_table::mock::MockSource;
//! use list_table::source::{RecordQuery, RecordSource, SourceError};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockSource::new();
//!     mock.expect_query().return_err(SourceError::Unavailable("db down".into()));
//!
//!     let query = RecordQuery::default();
//!     let result = mock.query(&query).await;
//!     assert!(matches!(result, Err(SourceError::Unavailable(_))));
//!     assert_eq!(mock.call_count(), 1);
//!     mock.verify();
//! }
//! ```

use crate::source::{Record, RecordPage, RecordQuery, RecordSource, SourceError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

type Expectations = Arc<Mutex<VecDeque<Result<RecordPage, SourceError>>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A record source with expectation tracking for fluent testing.
///
/// Clones share expectations and the query log, so a clone can be handed to the table
/// services while the original is kept for assertions.
#[derive(Clone, Default)]
pub struct MockSource {
    expectations: Expectations,
    queries: Arc<Mutex<Vec<RecordQuery>>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects one more `query` call.
    pub fn expect_query(&self) -> QueryExpectationBuilder {
        QueryExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Every query received so far, oldest first.
    pub fn queries(&self) -> Vec<RecordQuery> {
        lock(&self.queries).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.queries).len()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

impl std::fmt::Debug for MockSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSource")
            .field("pending", &lock(&self.expectations).len())
            .field("calls", &self.call_count())
            .finish()
    }
}

#[async_trait]
impl RecordSource for MockSource {
    async fn query(&self, query: &RecordQuery) -> Result<RecordPage, SourceError> {
        lock(&self.queries).push(query.clone());
        match lock(&self.expectations).pop_front() {
            Some(response) => response,
            None => panic!("Unexpected query: {:?}", query),
        }
    }
}

/// Builder for `query` expectations.
pub struct QueryExpectationBuilder {
    expectations: Expectations,
}

impl QueryExpectationBuilder {
    /// Sets the expectation to return a successful page.
    pub fn return_ok(self, page: RecordPage) {
        lock(&self.expectations).push_back(Ok(page));
    }

    /// Shorthand for a page of `records` out of `total_items` split into `total_pages`.
    pub fn return_records(self, records: Vec<Record>, total_items: u64, total_pages: u64) {
        self.return_ok(RecordPage {
            records,
            total_items,
            total_pages,
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: SourceError) {
        lock(&self.expectations).push_back(Err(error));
    }
}
