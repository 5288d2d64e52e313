//! # List Table Engine
//!
//! A [`ListTable`] is created fresh for every request. It owns the table definition,
//! the shared services (record source, CSRF guard, per-page hook) and, once
//! [`prepare`](ListTable::prepare) has run, the current page of records and its
//! [`PaginationState`].
//!
//! ```text
//! new(definition, services)
//!     └─ prepare(params) ──┬─ render_full()      -> form + table markup
//!                          └─ (render_ajax(params) checks CSRF, prepares, renders fragments)
//! ```
//!
//! State is always rebuilt from the definition's defaults plus the explicit request
//! parameters. Nothing survives between requests.

use super::{ActiveSort, ColumnHeaders, PaginationState, TableConfig, TableDefinition, TableError, TABLE_TYPE_FIELD};
use crate::csrf::{self, CsrfGuard, NONCE_ACTION, NONCE_FIELD};
use crate::params::RequestParameters;
use crate::render::{
    escape_html, format_number, items_label, render_bulk_actions, render_header, render_pagination,
    render_rows, render_rows_or_placeholder, render_tablenav, CellRenderer, LinkBase, Position,
};
use crate::source::{Record, RecordQuery, RecordSource};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Request parameter that suppresses the empty-table placeholder row.
pub const NO_PLACEHOLDER_FIELD: &str = "no_placeholder";

/// Deployment policy for the page size: `(requested per_page, post_type) -> per_page`.
pub type PerPageHook = Arc<dyn Fn(u32, &str) -> u32 + Send + Sync>;

/// Services shared by every table instance. Cheap to clone.
#[derive(Clone)]
pub struct TableServices {
    pub source: Arc<dyn RecordSource>,
    pub csrf: Arc<dyn CsrfGuard>,
    pub per_page: Option<PerPageHook>,
}

impl TableServices {
    pub fn new(source: Arc<dyn RecordSource>, csrf: Arc<dyn CsrfGuard>) -> Self {
        Self {
            source,
            csrf,
            per_page: None,
        }
    }

    pub fn with_per_page_hook(mut self, hook: impl Fn(u32, &str) -> u32 + Send + Sync + 'static) -> Self {
        self.per_page = Some(Arc::new(hook));
        self
    }

    fn per_page_for(&self, per_page: u32, post_type: &str) -> u32 {
        let filtered = match &self.per_page {
            Some(hook) => hook(per_page, post_type),
            None => per_page,
        };
        filtered.max(1)
    }
}

impl std::fmt::Debug for TableServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableServices")
            .field("per_page_hook", &self.per_page.is_some())
            .finish_non_exhaustive()
    }
}

/// Top and bottom pagination fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationFragments {
    pub top: String,
    pub bottom: String,
}

/// Payload of a successful AJAX refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderEnvelope {
    pub rows: String,
    pub pagination: PaginationFragments,
    pub column_headers: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_items_i18n: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages_i18n: Option<String>,
}

#[derive(Debug)]
struct Prepared {
    records: Vec<Record>,
    pagination: PaginationState,
    links: LinkBase,
}

/// Routes column-specific rendering to the definition.
struct DefinitionCells<'a> {
    definition: &'a dyn TableDefinition,
    config: &'a TableConfig,
}

impl CellRenderer for DefinitionCells<'_> {
    fn cell(&self, column: &str, record: &Record) -> Option<String> {
        self.definition.render_column(column, record, self.config)
    }
}

/// One table instance, scoped to a single request.
pub struct ListTable {
    definition: Arc<dyn TableDefinition>,
    services: TableServices,
    config: TableConfig,
    headers: ColumnHeaders,
    prepared: Option<Prepared>,
}

impl ListTable {
    pub fn new(definition: Arc<dyn TableDefinition>, services: TableServices) -> Self {
        let config = definition.defaults();
        let headers = definition.column_headers();
        Self {
            definition,
            services,
            config,
            headers,
            prepared: None,
        }
    }

    pub fn type_name(&self) -> &str {
        self.definition.type_name()
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn headers(&self) -> &ColumnHeaders {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        self.prepared.as_ref().map(|p| p.records.as_slice()).unwrap_or(&[])
    }

    pub fn pagination(&self) -> Option<&PaginationState> {
        self.prepared.as_ref().map(|p| &p.pagination)
    }

    /// Arguments carried by the sort and pagination links of the prepared view.
    pub fn link_base(&self) -> Option<&LinkBase> {
        self.prepared.as_ref().map(|p| &p.links)
    }

    pub fn active_sort(&self) -> ActiveSort {
        ActiveSort {
            sort_key: self.config.orderby.clone(),
            order: self.config.order,
        }
    }

    /// Rebuilds the configuration from defaults plus `params`, queries the record source
    /// and stores the resulting page.
    ///
    /// The per-page hook's result is the page size handed to the source. The sort key
    /// handed to the source is always a declared sortable key or the default `orderby`.
    pub async fn prepare(&mut self, params: &RequestParameters) -> Result<&PaginationState, TableError> {
        let table = self.definition.type_name().to_string();
        let defaults = self.definition.defaults();
        let mut config = defaults.clone();

        let report = config.merge_request(params);
        if !report.rejected.is_empty() {
            debug!(%table, rejected = ?report.rejected, "Ignored malformed overrides");
        }

        config.per_page = self.services.per_page_for(config.per_page, &config.post_type);
        let sort_key = self.headers.resolve_sort_key(&config.orderby, &defaults.orderby);
        if sort_key != config.orderby {
            debug!(%table, requested = %config.orderby, %sort_key, "orderby not sortable, using default");
        }
        config.orderby = sort_key;

        let query = RecordQuery {
            post_type: config.post_type.clone(),
            post_status: config.post_status.clone(),
            sort_key: config.orderby.clone(),
            sort_dir: config.order,
            page: config.paged,
            per_page: config.per_page,
        };
        debug!(%table, ?query, "Query");

        let page = self.services.source.query(&query).await.map_err(|e| {
            warn!(%table, error = %e, "Record source failed");
            TableError::from(e)
        })?;

        info!(
            %table,
            page = config.paged,
            returned = page.records.len(),
            total_items = page.total_items,
            "Prepared"
        );

        let pagination = PaginationState {
            total_items: page.total_items,
            total_pages: page.total_pages,
            current_page: config.paged,
            per_page: config.per_page,
            orderby: config.orderby.clone(),
            order: config.order,
        };
        let mut link_args = vec![(TABLE_TYPE_FIELD.to_string(), table)];
        link_args.extend(config.changed_from(&defaults));

        self.config = config;
        let prepared = self.prepared.insert(Prepared {
            records: page.records,
            pagination,
            links: LinkBase::new(link_args),
        });
        Ok(&prepared.pagination)
    }

    /// Full-page render: the form wrapper with the CSRF token and the hidden state
    /// fields an AJAX refresh needs, optional filter UI, then the table itself.
    pub fn render_full(&self) -> Result<String, TableError> {
        let prepared = self.prepared.as_ref().ok_or(TableError::NotPrepared)?;
        let config = &self.config;
        let token = self.services.csrf.issue(NONCE_ACTION);

        let mut out = format!(
            r#"<form name="{}" class="wplt_container" method="get" data-ajax="{}">"#,
            escape_html(&config.name),
            config.ajax
        );
        out.push_str(&format!(
            r#"<input type="hidden" id="{field}" name="{field}" value="{}" />"#,
            escape_html(&token),
            field = NONCE_FIELD
        ));
        for (name, value) in [
            (TABLE_TYPE_FIELD, self.definition.type_name()),
            ("order", config.order.as_str()),
            ("orderby", config.orderby.as_str()),
        ] {
            out.push_str(&format!(
                r#"<input type="hidden" id="{name}" name="{name}" value="{}" />"#,
                escape_html(value)
            ));
        }

        if config.show_filter {
            out.push_str(&self.definition.filter_markup(config));
        }

        out.push_str(&self.display(prepared));
        out.push_str("</form>");
        Ok(out)
    }

    fn display(&self, prepared: &Prepared) -> String {
        let config = &self.config;
        let bulk = self.definition.bulk_actions();
        let sort = self.active_sort();
        let cells = DefinitionCells {
            definition: self.definition.as_ref(),
            config,
        };

        let mut out = render_tablenav(
            &render_bulk_actions(&bulk, Position::Top),
            &render_pagination(&prepared.pagination, &prepared.links, Position::Top),
            Position::Top,
        );
        out.push_str(&format!(
            r#"<table class="wp-list-table widefat fixed striped {}"><thead><tr>{}</tr></thead>"#,
            escape_html(&config.plural),
            render_header(&self.headers, &sort, &prepared.links, true)
        ));
        out.push_str(&format!(
            r#"<tbody id="the-list" data-wp-lists="list:{}">{}</tbody>"#,
            escape_html(&config.singular),
            render_rows_or_placeholder(&prepared.records, &self.headers, &config.singular, &cells)
        ));
        out.push_str(&format!(
            "<tfoot><tr>{}</tr></tfoot></table>",
            render_header(&self.headers, &sort, &prepared.links, false)
        ));
        out.push_str(&render_tablenav(
            &render_bulk_actions(&bulk, Position::Bottom),
            &render_pagination(&prepared.pagination, &prepared.links, Position::Bottom),
            Position::Bottom,
        ));
        out
    }

    /// AJAX render: refuses tables whose definition turns AJAX off, verifies the CSRF
    /// token (before touching the record source), re-prepares from `params` and renders
    /// every fragment independently.
    ///
    /// The `ajax` flag is read from the definition's defaults, so a request cannot turn
    /// it back on.
    pub async fn render_ajax(&mut self, params: &RequestParameters) -> Result<RenderEnvelope, TableError> {
        if !self.definition.defaults().ajax {
            warn!(table = %self.definition.type_name(), "AJAX refresh refused, table has ajax disabled");
            return Err(TableError::AjaxDisabled(self.definition.type_name().to_string()));
        }

        let verified = csrf::token_from(params)
            .is_some_and(|token| self.services.csrf.verify(NONCE_ACTION, token));
        if !verified {
            warn!(table = %self.definition.type_name(), "CSRF check failed");
            return Err(TableError::Forbidden);
        }

        self.prepare(params).await?;
        let prepared = self.prepared.as_ref().ok_or(TableError::NotPrepared)?;
        let config = &self.config;
        let cells = DefinitionCells {
            definition: self.definition.as_ref(),
            config,
        };

        let rows = if params.flag(NO_PLACEHOLDER_FIELD) {
            render_rows(&prepared.records, &self.headers, &config.singular, &cells)
        } else {
            render_rows_or_placeholder(&prepared.records, &self.headers, &config.singular, &cells)
        };
        let pagination = &prepared.pagination;

        Ok(RenderEnvelope {
            rows,
            pagination: PaginationFragments {
                top: render_pagination(pagination, &prepared.links, Position::Top),
                bottom: render_pagination(pagination, &prepared.links, Position::Bottom),
            },
            column_headers: render_header(&self.headers, &self.active_sort(), &prepared.links, true),
            total_items_i18n: Some(items_label(pagination.total_items)),
            total_pages: Some(pagination.total_pages),
            total_pages_i18n: Some(format_number(pagination.total_pages)),
        })
    }
}

impl std::fmt::Debug for ListTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListTable")
            .field("type_name", &self.definition.type_name())
            .field("config", &self.config)
            .field("prepared", &self.prepared.is_some())
            .finish_non_exhaustive()
    }
}
