//! # List Table Engine
//!
//! Configuration, column model, pagination state and the per-request [`ListTable`].

pub mod columns;
pub mod config;
pub mod definition;
pub mod engine;
pub mod error;
pub mod pagination;
pub mod registry;

pub use columns::{ActiveSort, Column, ColumnHeaders, SortableColumn, CHECKBOX_COLUMN};
pub use config::{ConfigValue, Field, MergeReport, TableConfig, DEFAULT_ORDERBY, DEFAULT_PER_PAGE};
pub use definition::TableDefinition;
pub use engine::{ListTable, PaginationFragments, PerPageHook, RenderEnvelope, TableServices, NO_PLACEHOLDER_FIELD};
pub use error::TableError;
pub use pagination::PaginationState;
pub use registry::{TableRegistry, TABLE_TYPE_FIELD};
