//! The JSON envelope written back to the client.

use serde_json::{json, Value};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// A terminal response. The transport writes it as-is and does nothing further with
/// the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AjaxResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl AjaxResponse {
    /// `{"success":true,"data":<data>}`
    pub fn success(data: Value) -> Self {
        Self::raw(json!({ "success": true, "data": data }).to_string())
    }

    /// `{"success":false,"data":"<message>"}`
    pub fn error(message: impl Into<String>) -> Self {
        Self::raw(json!({ "success": false, "data": message.into() }).to_string())
    }

    /// A handler-supplied JSON body, written verbatim.
    pub fn raw(body: String) -> Self {
        Self {
            status: 200,
            content_type: JSON_CONTENT_TYPE,
            body,
        }
    }

    /// Parses the body back into JSON. Test and client helper.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}
