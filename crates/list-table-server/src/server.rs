//! # HTTP Transport
//!
//! A small hyper (HTTP/1.1) server in front of the [`AdminSystem`]:
//!
//! | path | method | response |
//! |------|--------|----------|
//! | `/admin-ajax.php` | GET, POST (form body) | JSON envelope from the dispatcher, always 200 |
//! | `/` | GET | full admin page with the table form |
//! | anything else | any | 404 |
//!
//! POST bodies are capped at [`AdminSystem::max_body_bytes`]. An oversized or broken body
//! still gets a JSON error envelope.
//!
//! One task per connection. The accept loop stops when the shutdown future resolves;
//! connections already accepted run to completion.

use crate::lifecycle::AdminSystem;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use list_table::table::TableError;
use list_table::{AjaxResponse, RequestParameters};
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

pub const AJAX_PATH: &str = "/admin-ajax.php";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const HTML_CONTENT_TYPE: &str = "text/html; charset=UTF-8";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=UTF-8";

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Binds `addr`.
pub async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr).await.map_err(|source| ServerError::Bind {
        addr: addr.to_string(),
        source,
    })
}

/// Accepts connections until `shutdown` resolves.
pub async fn serve(listener: TcpListener, system: Arc<AdminSystem>, shutdown: impl Future<Output = ()>) {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Listening");
    }
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested, no longer accepting connections");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "Accept failed");
                    continue;
                }
            },
        };

        let system = system.clone();
        tokio::spawn(async move {
            let service = service_fn(move |req| route(req, system.clone()));
            if let Err(e) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                debug!(%peer, error = %e, "Connection closed with error");
            }
        });
    }
}

async fn route(req: Request<Incoming>, system: Arc<AdminSystem>) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    debug!(%method, %path, "Request");

    let response = if path == AJAX_PATH && (method == Method::GET || method == Method::POST) {
        let ajax = match read_params(req, system.max_body_bytes()).await {
            Ok(params) => system.handle_ajax(params).await,
            Err(e) => {
                warn!(error = %e, "Unreadable request body");
                AjaxResponse::error(body_error_message(&e))
            }
        };
        respond(
            StatusCode::from_u16(ajax.status).unwrap_or(StatusCode::OK),
            ajax.content_type,
            ajax.body,
        )
    } else if path == "/" && method == Method::GET {
        let params = query_params(&req);
        match system.render_page(&params).await {
            Ok(html) => respond(StatusCode::OK, HTML_CONTENT_TYPE, html),
            Err(e) => page_error(e),
        }
    } else {
        respond(StatusCode::NOT_FOUND, TEXT_CONTENT_TYPE, "Not Found".to_string())
    };
    Ok(response)
}

fn query_params(req: &Request<Incoming>) -> RequestParameters {
    RequestParameters::from_query(req.uri().query().unwrap_or_default())
}

/// Query string, overlaid by a form-encoded body for POST. The body is read up to
/// `limit` bytes.
async fn read_params(req: Request<Incoming>, limit: usize) -> Result<RequestParameters, BoxError> {
    let mut params = query_params(&req);
    if *req.method() == Method::POST {
        let body = Limited::new(req.into_body(), limit).collect().await?.to_bytes();
        params.merge(RequestParameters::from_query(&String::from_utf8_lossy(&body)));
    }
    Ok(params)
}

fn body_error_message(error: &BoxError) -> &'static str {
    if error.is::<LengthLimitError>() {
        "Request body too large"
    } else {
        "Malformed request body"
    }
}

fn page_error(error: TableError) -> Response<Full<Bytes>> {
    let status = match error {
        TableError::UnknownType(_) => StatusCode::NOT_FOUND,
        TableError::Forbidden | TableError::AjaxDisabled(_) => StatusCode::FORBIDDEN,
        TableError::Source(_) | TableError::NotPrepared => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!(error = %error, %status, "Page render failed");
    respond(status, TEXT_CONTENT_TYPE, error.to_string())
}

fn respond(status: StatusCode, content_type: &'static str, body: String) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
