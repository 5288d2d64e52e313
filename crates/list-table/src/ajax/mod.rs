//! # AJAX Dispatch
//!
//! Request routing by `action` name and the JSON envelope protocol:
//!
//! ```text
//! success: {"success": true,  "data": <handler value>}
//! failure: {"success": false, "data": "<message>"}
//! ```
//!
//! Every response is HTTP 200 with `application/json; charset=UTF-8`.

pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod list_table;

pub use dispatcher::{Dispatcher, DispatcherBuilder, Resolver, ACTION_FIELD, ACTION_PREFIX};
pub use envelope::{AjaxResponse, JSON_CONTENT_TYPE};
pub use error::AjaxError;
pub use handler::{handler_fn, ActionHandler, FnHandler, HandlerOutput};
pub use list_table::{ListTableAction, LIST_TABLE_ACTION};
