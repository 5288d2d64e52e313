//! The built-in `wplt_list_table` action: re-renders a list table for an AJAX refresh.

use super::{ActionHandler, AjaxError, DispatcherBuilder, HandlerOutput};
use crate::params::RequestParameters;
use crate::table::{TableRegistry, TableServices};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Action name of the list table refresh.
pub const LIST_TABLE_ACTION: &str = "wplt_list_table";

/// Instantiates the requested table type and returns its [`RenderEnvelope`](crate::table::RenderEnvelope).
#[derive(Debug, Clone)]
pub struct ListTableAction {
    registry: Arc<TableRegistry>,
    services: TableServices,
}

impl ListTableAction {
    pub fn new(registry: Arc<TableRegistry>, services: TableServices) -> Self {
        Self { registry, services }
    }
}

#[async_trait]
impl ActionHandler for ListTableAction {
    async fn handle(&self, params: RequestParameters) -> Result<HandlerOutput, AjaxError> {
        let mut table = self.registry.instantiate(&params, self.services.clone())?;
        debug!(table = %table.type_name(), "Rendering list table");
        let envelope = table.render_ajax(&params).await?;
        HandlerOutput::data(&envelope)
    }
}

impl DispatcherBuilder {
    /// Registers the `wplt_list_table` action and its built-in handler.
    pub fn with_list_table(self, registry: Arc<TableRegistry>, services: TableServices) -> Self {
        self.action(LIST_TABLE_ACTION)
            .method(LIST_TABLE_ACTION, ListTableAction::new(registry, services))
    }
}
