//! # Action Dispatcher
//!
//! Maps the `action` request parameter onto a registered handler and turns the result
//! into an [`AjaxResponse`].
//!
//! Two handler tables exist:
//!
//! - **dispatcher methods**, the dispatcher's own built-in handlers, always stored under
//!   `action_<name>`;
//! - **external handlers**, registered by the host under any symbol name.
//!
//! Only names in the registered action set are dispatchable. For such a name the
//! resolvers in [`Resolver::ORDER`] are consulted and the first match is the only handler
//! invoked. Nothing is ever looked up outside these tables.

use super::{ActionHandler, AjaxError, AjaxResponse, HandlerOutput};
use crate::params::RequestParameters;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Request parameter naming the action.
pub const ACTION_FIELD: &str = "action";

/// Prefix of dispatcher method names and of the preferred external handler name.
pub const ACTION_PREFIX: &str = "action_";

type ActionFilter = Box<dyn FnOnce(&mut BTreeSet<String>) + Send>;

/// One handler lookup strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolver {
    /// Built-in handler `action_<name>`.
    DispatcherMethod,
    /// External handler `action_<name>`.
    PrefixedHandler,
    /// External handler `<name>`.
    ExactHandler,
}

impl Resolver {
    /// Resolution order; first match wins.
    pub const ORDER: [Resolver; 3] = [
        Resolver::DispatcherMethod,
        Resolver::PrefixedHandler,
        Resolver::ExactHandler,
    ];

    fn lookup(self, dispatcher: &Dispatcher, action: &str) -> Option<Arc<dyn ActionHandler>> {
        let prefixed = || format!("{}{}", ACTION_PREFIX, action);
        match self {
            Resolver::DispatcherMethod => dispatcher.methods.get(&prefixed()).cloned(),
            Resolver::PrefixedHandler => dispatcher.handlers.get(&prefixed()).cloned(),
            Resolver::ExactHandler => dispatcher.handlers.get(action).cloned(),
        }
    }
}

/// Routes AJAX requests to handlers. Immutable once built; share it behind an `Arc`.
#[derive(Clone)]
pub struct Dispatcher {
    actions: BTreeSet<String>,
    methods: HashMap<String, Arc<dyn ActionHandler>>,
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Adds `action` to the dispatchable set. Returns `false` for a duplicate.
    pub fn register(&mut self, action: impl Into<String>) -> bool {
        self.actions.insert(action.into())
    }

    pub fn is_registered(&self, action: &str) -> bool {
        self.actions.contains(action)
    }

    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(String::as_str)
    }

    /// Finds the handler for a registered action.
    pub fn resolve(&self, action: &str) -> Option<(Resolver, Arc<dyn ActionHandler>)> {
        Resolver::ORDER
            .into_iter()
            .find_map(|resolver| resolver.lookup(self, action).map(|h| (resolver, h)))
    }

    /// Handles one request. Every failure, including a handler panic, comes back as an
    /// error envelope.
    #[instrument(skip_all, fields(action = params.get(ACTION_FIELD).unwrap_or_default()))]
    pub async fn dispatch(&self, params: RequestParameters) -> AjaxResponse {
        match self.try_dispatch(params).await {
            Ok(HandlerOutput::Data(data)) => AjaxResponse::success(data),
            Ok(HandlerOutput::Raw(body)) => AjaxResponse::raw(body),
            Err(e) => {
                warn!(error = %e, "Dispatch failed");
                AjaxResponse::error(e.to_string())
            }
        }
    }

    async fn try_dispatch(&self, params: RequestParameters) -> Result<HandlerOutput, AjaxError> {
        let action = params
            .get(ACTION_FIELD)
            .filter(|a| !a.is_empty())
            .ok_or(AjaxError::InvalidAction)?
            .to_string();

        if !self.actions.contains(&action) {
            debug!(%action, "Action not registered");
            return Err(AjaxError::InvalidAction);
        }

        let (resolver, handler) = self.resolve(&action).ok_or_else(|| {
            debug!(%action, "No handler resolves");
            AjaxError::InvalidAction
        })?;
        info!(%action, ?resolver, "Dispatching");

        let task = tokio::spawn(async move { handler.handle(params).await });
        match task.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => Err(AjaxError::Handler(format!("Handler for {} panicked", action))),
            Err(e) => Err(AjaxError::Handler(e.to_string())),
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("actions", &self.actions)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects actions, handlers and action filters, then builds a [`Dispatcher`].
#[derive(Default)]
pub struct DispatcherBuilder {
    actions: BTreeSet<String>,
    methods: HashMap<String, Arc<dyn ActionHandler>>,
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
    filters: Vec<ActionFilter>,
}

impl DispatcherBuilder {
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.actions.insert(action.into());
        self
    }

    pub fn actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions.extend(actions.into_iter().map(Into::into));
        self
    }

    /// Installs a built-in handler for `action`, stored as `action_<action>`.
    pub fn method(mut self, action: &str, handler: impl ActionHandler + 'static) -> Self {
        self.methods
            .insert(format!("{}{}", ACTION_PREFIX, action), Arc::new(handler));
        self
    }

    /// Installs an external handler under `symbol`.
    pub fn handler(mut self, symbol: impl Into<String>, handler: impl ActionHandler + 'static) -> Self {
        self.handlers.insert(symbol.into(), Arc::new(handler));
        self
    }

    /// Gets the final say over the dispatchable action set. Filters run in order at
    /// [`build`](Self::build).
    pub fn filter_actions(mut self, filter: impl FnOnce(&mut BTreeSet<String>) + Send + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn build(self) -> Dispatcher {
        let mut actions = self.actions;
        for filter in self.filters {
            filter(&mut actions);
        }
        debug!(?actions, "Dispatcher built");
        Dispatcher {
            actions,
            methods: self.methods,
            handlers: self.handlers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ajax::handler_fn;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(tag: &'static str, counter: Arc<AtomicUsize>) -> impl ActionHandler {
        handler_fn(move |_params| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, AjaxError>(HandlerOutput::Data(json!(tag)))
            }
        })
    }

    fn request(action: &str) -> RequestParameters {
        RequestParameters::new().with(ACTION_FIELD, action)
    }

    #[tokio::test]
    async fn resolution_prefers_method_then_prefixed_then_exact() {
        let calls: Vec<_> = (0..3).map(|_| Arc::new(AtomicUsize::new(0))).collect();
        let dispatcher = Dispatcher::builder()
            .action("a")
            .method("a", counting("method", calls[0].clone()))
            .handler("action_a", counting("prefixed", calls[1].clone()))
            .handler("a", counting("exact", calls[2].clone()))
            .build();

        let response = dispatcher.dispatch(request("a")).await;
        assert_eq!(response.json().unwrap(), json!({"success": true, "data": "method"}));
        let counts: Vec<_> = calls.iter().map(|c| c.load(Ordering::SeqCst)).collect();
        assert_eq!(counts, vec![1, 0, 0]);
    }

    #[tokio::test]
    async fn prefixed_handler_wins_over_exact() {
        let prefixed = Arc::new(AtomicUsize::new(0));
        let exact = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::builder()
            .action("a")
            .handler("action_a", counting("prefixed", prefixed.clone()))
            .handler("a", counting("exact", exact.clone()))
            .build();

        let response = dispatcher.dispatch(request("a")).await;
        assert_eq!(response.json().unwrap()["data"], "prefixed");
        assert_eq!(prefixed.load(Ordering::SeqCst), 1);
        assert_eq!(exact.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn action_names_match_exactly() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::builder()
            .action("exact")
            .handler("exact", counting("exact", calls.clone()))
            .build();

        for name in [" exact ", "exact\n", "EXACT"] {
            let response = dispatcher.dispatch(request(name)).await;
            assert_eq!(
                response.json().unwrap(),
                json!({"success": false, "data": "Incorrect Request"})
            );
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let response = dispatcher.dispatch(request("exact")).await;
        assert_eq!(response.json().unwrap()["success"], true);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_unregistered_and_unresolved_actions_are_rejected() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::builder()
            .action("orphan")
            .handler("hidden", counting("hidden", calls.clone()))
            .build();

        for params in [
            RequestParameters::new(),
            request(""),
            request("hidden"),
            request("orphan"),
            request("nonexistent"),
        ] {
            let response = dispatcher.dispatch(params).await;
            assert_eq!(
                response.json().unwrap(),
                json!({"success": false, "data": "Incorrect Request"})
            );
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn handler_errors_and_panics_become_error_envelopes() {
        let dispatcher = Dispatcher::builder()
            .actions(["fails", "explodes"])
            .handler("fails", handler_fn(|_| async { Err::<HandlerOutput, _>(AjaxError::Handler("nope".into())) }))
            .handler(
                "explodes",
                handler_fn(|_| async {
                    if true {
                        panic!("boom");
                    }
                    Ok::<_, AjaxError>(HandlerOutput::Raw(String::new()))
                }),
            )
            .build();

        let failed = dispatcher.dispatch(request("fails")).await;
        assert_eq!(failed.json().unwrap(), json!({"success": false, "data": "nope"}));

        let panicked = dispatcher.dispatch(request("explodes")).await;
        assert_eq!(panicked.status, 200);
        let body = panicked.json().unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["data"], "Handler for explodes panicked");
    }

    #[tokio::test]
    async fn raw_output_is_written_verbatim() {
        let dispatcher = Dispatcher::builder()
            .action("custom")
            .handler(
                "custom",
                handler_fn(|_| async { Ok::<_, AjaxError>(HandlerOutput::Raw(r#"{"custom":1}"#.to_string())) }),
            )
            .build();

        assert_eq!(dispatcher.dispatch(request("custom")).await.body, r#"{"custom":1}"#);
    }

    #[test]
    fn register_and_filter_shape_the_action_set() {
        let mut dispatcher = Dispatcher::builder()
            .actions(["keep", "drop"])
            .filter_actions(|set| {
                set.remove("drop");
                set.insert("added".to_string());
            })
            .build();

        assert!(dispatcher.is_registered("keep"));
        assert!(dispatcher.is_registered("added"));
        assert!(!dispatcher.is_registered("drop"));
        assert!(dispatcher.register("late"));
        assert!(!dispatcher.register("late"));
    }
}
