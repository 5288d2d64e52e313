//! Action handlers.

use super::AjaxError;
use crate::params::RequestParameters;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;

/// What a handler produced.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutput {
    /// Wrapped as `{"success":true,"data":...}`.
    Data(Value),
    /// A complete JSON body sent without an envelope.
    Raw(String),
}

impl HandlerOutput {
    pub fn data<T: Serialize>(value: &T) -> Result<Self, AjaxError> {
        Ok(HandlerOutput::Data(serde_json::to_value(value)?))
    }
}

/// Something the dispatcher can invoke for an action.
///
/// Handlers receive an owned copy of the request parameters and run on their own task.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(&self, params: RequestParameters) -> Result<HandlerOutput, AjaxError>;
}

/// Adapts an async closure into an [`ActionHandler`].
pub struct FnHandler<F>(F);

/// Wraps `f` so it can be registered with the dispatcher.
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(RequestParameters) -> Fut + Send + Sync,
    Fut: Future<Output = Result<HandlerOutput, AjaxError>> + Send + 'static,
{
    FnHandler(f)
}

#[async_trait]
impl<F, Fut> ActionHandler for FnHandler<F>
where
    F: Fn(RequestParameters) -> Fut + Send + Sync,
    Fut: Future<Output = Result<HandlerOutput, AjaxError>> + Send + 'static,
{
    async fn handle(&self, params: RequestParameters) -> Result<HandlerOutput, AjaxError> {
        (self.0)(params).await
    }
}
