//! Table type registry: maps the `wplt_class` request field to a [`TableDefinition`].

use super::{ListTable, TableDefinition, TableError, TableServices};
use crate::params::RequestParameters;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Request field naming the table type an AJAX request wants rendered.
pub const TABLE_TYPE_FIELD: &str = "wplt_class";

/// Explicit registry of table types.
///
/// Only registered types can be instantiated, so a request can never name arbitrary code.
#[derive(Default, Clone)]
pub struct TableRegistry {
    definitions: BTreeMap<String, Arc<dyn TableDefinition>>,
    default_type: Option<String>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition under its [`type_name`](TableDefinition::type_name).
    /// The first registered type becomes the default.
    pub fn register(&mut self, definition: Arc<dyn TableDefinition>) {
        let name = definition.type_name().to_string();
        debug!(table = %name, "Registered table type");
        if self.default_type.is_none() {
            self.default_type = Some(name.clone());
        }
        self.definitions.insert(name, definition);
    }

    pub fn with(mut self, definition: impl TableDefinition + 'static) -> Self {
        self.register(Arc::new(definition));
        self
    }

    /// Type used when a request carries no `wplt_class` at all.
    pub fn set_default(&mut self, type_name: impl Into<String>) {
        self.default_type = Some(type_name.into());
    }

    pub fn default_type(&self) -> Option<&str> {
        self.default_type.as_deref()
    }

    pub fn get(&self, type_name: &str) -> Option<Arc<dyn TableDefinition>> {
        self.definitions.get(type_name).cloned()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Picks the definition a request asks for.
    ///
    /// An absent field selects the default type. A present but empty or unregistered
    /// name is an error.
    pub fn resolve(&self, params: &RequestParameters) -> Result<Arc<dyn TableDefinition>, TableError> {
        let requested = match params.get(TABLE_TYPE_FIELD) {
            Some(name) => name.trim(),
            None => self.default_type.as_deref().unwrap_or_default(),
        };
        if requested.is_empty() {
            return Err(TableError::UnknownType(requested.to_string()));
        }
        self.get(requested)
            .ok_or_else(|| TableError::UnknownType(requested.to_string()))
    }

    /// Resolves the requested type and builds a fresh, unprepared table.
    pub fn instantiate(&self, params: &RequestParameters, services: TableServices) -> Result<ListTable, TableError> {
        Ok(ListTable::new(self.resolve(params)?, services))
    }
}

impl std::fmt::Debug for TableRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableRegistry")
            .field("types", &self.definitions.keys().collect::<Vec<_>>())
            .field("default_type", &self.default_type)
            .finish()
    }
}
