//! Error types for AJAX dispatch.
//!
//! The `Display` text of every variant is what the client sees in the error envelope.

use crate::source::SourceError;
use crate::table::TableError;

#[derive(Debug, thiserror::Error)]
pub enum AjaxError {
    /// Missing, unregistered or unresolvable action.
    #[error("Incorrect Request")]
    InvalidAction,

    /// The requested table type is empty or not registered.
    #[error("Required list table type does not exist")]
    InvalidConfiguration,

    #[error("Forbidden")]
    Forbidden,

    #[error(transparent)]
    AdapterFailure(#[from] SourceError),

    #[error("{0}")]
    Handler(String),

    #[error("Failed to encode response: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl From<TableError> for AjaxError {
    fn from(error: TableError) -> Self {
        match error {
            TableError::Forbidden | TableError::AjaxDisabled(_) => AjaxError::Forbidden,
            TableError::Source(e) => AjaxError::AdapterFailure(e),
            TableError::UnknownType(_) => AjaxError::InvalidConfiguration,
            TableError::NotPrepared => AjaxError::Handler(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_facing_messages() {
        assert_eq!(AjaxError::InvalidAction.to_string(), "Incorrect Request");
        assert_eq!(
            AjaxError::from(TableError::UnknownType("x".into())).to_string(),
            "Required list table type does not exist"
        );
        assert_eq!(AjaxError::from(TableError::Forbidden).to_string(), "Forbidden");
        assert_eq!(AjaxError::from(TableError::AjaxDisabled("x".into())).to_string(), "Forbidden");
        assert_eq!(
            AjaxError::from(TableError::Source(SourceError::Unavailable("db".into()))).to_string(),
            "Record source unavailable: db"
        );
    }
}
