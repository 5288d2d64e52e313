//! Error types for the list table engine.

use crate::source::SourceError;
use thiserror::Error;

/// Errors that can occur while preparing or rendering a table.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TableError {
    /// The CSRF token was missing or did not verify.
    #[error("Forbidden")]
    Forbidden,

    /// An AJAX refresh was requested for a table declared with `ajax: false`.
    #[error("List table type {0:?} does not accept AJAX requests")]
    AjaxDisabled(String),

    /// The record source failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The requested table type is empty or not registered.
    #[error("Unknown list table type: {0:?}")]
    UnknownType(String),

    /// A render entry point was called before `prepare`.
    #[error("Table rendered before it was prepared")]
    NotPrepared,
}
