//! # List Table
//!
//! Server-side paginated, sortable list tables that a browser can refresh over AJAX,
//! plus the action dispatcher that serves those refreshes.
//!
//! ## Architecture Overview
//!
//! A request flows through four layers:
//!
//! 1. **Dispatch** ([`Dispatcher`]) - resolves the `action` parameter to a handler and
//!    wraps the outcome in a JSON envelope
//! 2. **Engine** ([`ListTable`]) - merges request overrides onto the table's defaults,
//!    checks the CSRF token and asks the record source for one page
//! 3. **Record source** ([`RecordSource`]) - the only thing that touches data
//! 4. **Renderer** ([`render`]) - pure functions producing header, rows and pagination
//!    markup
//!
//! ```text
//! RequestParameters ──> Dispatcher ──> ListTableAction ──> ListTable::render_ajax
//!                                                              │
//!                                         CsrfGuard::verify <──┤
//!                                       RecordSource::query <──┤
//!                                                  render::* <──┘
//!                                                              │
//!         {"success":true,"data":{rows, pagination, column_headers, ...}}
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use list_table::{
//!     Column, Dispatcher, MemorySource, Record, RequestParameters, SharedSecretGuard,
//!     SortableColumn, TableConfig, TableDefinition, TableRegistry, TableServices,
//! };
//! use list_table::csrf::{CsrfGuard, NONCE_ACTION, NONCE_FIELD};
//! use std::sync::Arc;
//!
//! struct Books;
//!
//! impl TableDefinition for Books {
//!     fn type_name(&self) -> &str { "books" }
//!     fn defaults(&self) -> TableConfig {
//!         let mut config = TableConfig::new("book").labels("book", "books");
//!         config.orderby = "post_title".into();
//!         config
//!     }
//!     fn columns(&self) -> Vec<Column> {
//!         vec![Column::checkbox(), Column::new("post_title", "Title")]
//!     }
//!     fn sortable_columns(&self) -> Vec<SortableColumn> {
//!         vec![SortableColumn::new("post_title", "post_title", false)]
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = MemorySource::new(vec![
//!         Record::new(1).with("post_type", "book").with("post_title", "Dune"),
//!     ]);
//!     let guard = Arc::new(SharedSecretGuard::new("secret"));
//!     let services = TableServices::new(Arc::new(source), guard.clone());
//!     let registry = Arc::new(TableRegistry::new().with(Books));
//!     let dispatcher = Dispatcher::builder().with_list_table(registry, services).build();
//!
//!     let params = RequestParameters::new()
//!         .with("action", "wplt_list_table")
//!         .with(NONCE_FIELD, guard.issue(NONCE_ACTION));
//!     let response = dispatcher.dispatch(params).await;
//!     let body = response.json().unwrap();
//!     assert_eq!(body["success"], true);
//!     assert_eq!(body["data"]["total_items_i18n"], "1 item");
//! }
//! ```
//!
//! ## Testing
//!
//! [`mock::MockSource`] stands in for a record source with queued responses, so engine
//! and dispatcher behaviour (including source failures) can be tested without data.

pub mod ajax;
pub mod csrf;
pub mod mock;
pub mod params;
pub mod render;
pub mod source;
pub mod table;

// Re-export core types for convenience
pub use ajax::{ActionHandler, AjaxError, AjaxResponse, Dispatcher, DispatcherBuilder, HandlerOutput};
pub use csrf::{CsrfGuard, SharedSecretGuard};
pub use params::RequestParameters;
pub use source::{MemorySource, Record, RecordId, RecordPage, RecordQuery, RecordSource, SortOrder, SourceError};
pub use table::{
    Column, ListTable, PaginationState, RenderEnvelope, SortableColumn, TableConfig, TableDefinition,
    TableError, TableRegistry, TableServices,
};
