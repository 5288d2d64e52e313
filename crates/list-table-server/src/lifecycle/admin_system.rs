use crate::config::ServerConfig;
use crate::posts::{demo_posts, PostsTable};
use list_table::ajax::{handler_fn, AjaxResponse, Dispatcher, HandlerOutput};
use list_table::csrf::{CsrfGuard, NONCE_ACTION};
use list_table::table::{TableError, TableRegistry, TableServices};
use list_table::{MemorySource, RecordSource, RequestParameters, SharedSecretGuard};
use std::sync::Arc;
use tracing::{info, instrument};

/// Lists the registered table types. Registered as an external handler.
pub const TABLE_TYPES_ACTION: &str = "wplt_table_types";

/// Everything a request needs, wired together once at startup.
///
/// Cheap to share behind an `Arc`; nothing in here changes after construction.
pub struct AdminSystem {
    dispatcher: Dispatcher,
    registry: Arc<TableRegistry>,
    services: TableServices,
    guard: Arc<SharedSecretGuard>,
    max_body_bytes: usize,
}

impl AdminSystem {
    /// Builds the system over an in-memory source seeded with `config.demo_records` posts.
    pub fn new(config: &ServerConfig) -> Self {
        let source = MemorySource::new(demo_posts(config.demo_records));
        info!(records = source.len(), "Seeded in-memory record source");
        Self::with_source(config, Arc::new(source))
    }

    pub fn with_source(config: &ServerConfig, source: Arc<dyn RecordSource>) -> Self {
        let guard = Arc::new(SharedSecretGuard::new(config.nonce_secret.clone()));
        let max_per_page = config.max_per_page.max(1);
        let services = TableServices::new(source, guard.clone())
            .with_per_page_hook(move |per_page, _post_type| per_page.min(max_per_page));
        let registry = Arc::new(TableRegistry::new().with(PostsTable));

        let types: Vec<String> = registry.type_names().map(str::to_string).collect();
        let extra_actions = config.actions.clone();
        let dispatcher = Dispatcher::builder()
            .with_list_table(registry.clone(), services.clone())
            .handler(
                TABLE_TYPES_ACTION,
                handler_fn(move |_params| {
                    let types = types.clone();
                    async move { HandlerOutput::data(&types) }
                }),
            )
            .filter_actions(move |actions| actions.extend(extra_actions))
            .build();

        info!(actions = ?dispatcher.actions().collect::<Vec<_>>(), max_per_page, "Admin system ready");
        Self {
            dispatcher,
            registry,
            services,
            guard,
            max_body_bytes: config.max_body_bytes,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Cap on the POST body of an AJAX request.
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// A token valid for list table AJAX requests.
    pub fn issue_token(&self) -> String {
        self.guard.issue(NONCE_ACTION)
    }

    pub async fn handle_ajax(&self, params: RequestParameters) -> AjaxResponse {
        self.dispatcher.dispatch(params).await
    }

    /// Renders the full admin page for the table type the request names.
    #[instrument(skip_all)]
    pub async fn render_page(&self, params: &RequestParameters) -> Result<String, TableError> {
        let mut table = self.registry.instantiate(params, self.services.clone())?;
        table.prepare(params).await?;
        let form = table.render_full()?;
        Ok(format!(
            concat!(
                "<!DOCTYPE html><html><head><meta charset=\"utf-8\" /><title>{title}</title></head>",
                "<body class=\"wp-admin\"><div class=\"wrap\"><h1>{title}</h1>{form}</div></body></html>"
            ),
            title = list_table::render::escape_html(&table.config().plural),
            form = form
        ))
    }
}
