use list_table::csrf::NONCE_FIELD;
use list_table_server::config::ServerConfig;
use list_table_server::lifecycle::AdminSystem;
use list_table_server::server;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

// --- Harness ---

struct TestServer {
    addr: SocketAddr,
    system: Arc<AdminSystem>,
    stop: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn start(config: ServerConfig) -> Self {
        let listener = server::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let system = Arc::new(AdminSystem::new(&config));
        let (stop, stopped) = oneshot::channel::<()>();
        let handle = tokio::spawn(server::serve(listener, system.clone(), async move {
            let _ = stopped.await;
        }));
        Self {
            addr,
            system,
            stop: Some(stop),
            handle,
        }
    }

    async fn send(&self, request: String) -> (u16, String, String) {
        self.exchange(request, false).await
    }

    /// Writes `request`, then closes the write half before reading the response.
    async fn send_and_close(&self, request: String) -> (u16, String, String) {
        self.exchange(request, true).await
    }

    async fn exchange(&self, request: String, close_write: bool) -> (u16, String, String) {
        let mut stream = TcpStream::connect(self.addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        if close_write {
            stream.shutdown().await.unwrap();
        }
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        let raw = String::from_utf8(raw).unwrap();

        let (head, body) = raw.split_once("\r\n\r\n").unwrap();
        let status = head.split_whitespace().nth(1).unwrap().parse().unwrap();
        (status, head.to_string(), body.to_string())
    }

    async fn get(&self, target: &str) -> (u16, String, String) {
        self.send(format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            target
        ))
        .await
    }

    async fn post(&self, target: &str, form: &str) -> (u16, String, String) {
        self.send(format!(
            concat!(
                "POST {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n",
                "Content-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\r\n{}"
            ),
            target,
            form.len(),
            form
        ))
        .await
    }

    async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.handle.await.unwrap();
    }
}

fn config() -> ServerConfig {
    ServerConfig {
        nonce_secret: "test-secret".to_string(),
        max_per_page: 10,
        demo_records: 47,
        ..ServerConfig::default()
    }
}

// --- Tests ---

#[tokio::test]
async fn test_ajax_refresh_over_http() {
    let server = TestServer::start(config()).await;
    let target = format!(
        "/admin-ajax.php?action=wplt_list_table&{}={}&paged=2",
        NONCE_FIELD,
        server.system.issue_token()
    );

    let (status, head, body) = server.get(&target).await;
    assert_eq!(status, 200);
    assert!(head.to_ascii_lowercase().contains("content-type: application/json; charset=utf-8"));

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["total_items_i18n"], "47 items");
    // per_page is clamped to max_per_page = 10
    assert_eq!(json["data"]["total_pages"], 5);
    assert_eq!(json["data"]["rows"].as_str().unwrap().matches("<tr>").count(), 10);

    server.stop().await;
}

#[tokio::test]
async fn test_post_body_overrides_query() {
    let server = TestServer::start(config()).await;
    let form = format!(
        "action=wplt_list_table&{}={}&post_status=draft",
        NONCE_FIELD,
        server.system.issue_token()
    );

    let (status, _, body) = server.post("/admin-ajax.php?action=nonexistent", &form).await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["success"], true);
    // every third post is a draft
    assert_eq!(json["data"]["total_items_i18n"], "15 items");

    server.stop().await;
}

#[tokio::test]
async fn test_errors_are_json_envelopes_with_status_200() {
    let server = TestServer::start(config()).await;

    let (status, _, body) = server.get("/admin-ajax.php?action=nonexistent").await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json, serde_json::json!({"success": false, "data": "Incorrect Request"}));

    let (status, _, body) = server.get("/admin-ajax.php?action=wplt_list_table").await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["data"], "Forbidden");

    server.stop().await;
}

#[tokio::test]
async fn test_oversized_body_is_a_json_envelope() {
    let server = TestServer::start(ServerConfig {
        max_body_bytes: 64,
        ..config()
    })
    .await;
    let form = format!("action=wplt_list_table&padding={}", "x".repeat(200));

    let (status, head, body) = server.post("/admin-ajax.php", &form).await;
    assert_eq!(status, 200);
    assert!(head.to_ascii_lowercase().contains("content-type: application/json"));
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json, serde_json::json!({"success": false, "data": "Request body too large"}));

    server.stop().await;
}

#[tokio::test]
async fn test_truncated_body_is_a_json_envelope() {
    let server = TestServer::start(config()).await;
    let request = concat!(
        "POST /admin-ajax.php HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n",
        "Content-Type: application/x-www-form-urlencoded\r\nContent-Length: 100\r\n\r\n",
        "action=w"
    );

    let (status, head, body) = server.send_and_close(request.to_string()).await;
    assert_eq!(status, 200);
    assert!(head.to_ascii_lowercase().contains("content-type: application/json"));
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json, serde_json::json!({"success": false, "data": "Malformed request body"}));

    server.stop().await;
}

#[tokio::test]
async fn test_page_links_keep_filters_and_page_size() {
    let server = TestServer::start(config()).await;

    let (status, _, body) = server.get("/?post_status=draft&per_page=5").await;
    assert_eq!(status, 200);
    // 15 drafts over 5 per page
    assert!(body.contains(concat!(
        r#"<a class="next-page button" href="?wplt_class=posts&amp;per_page=5&amp;post_status=draft"#,
        r#"&amp;paged=2&amp;orderby=menu_order+title&amp;order=asc">"#
    )));

    server.stop().await;
}

#[tokio::test]
async fn test_configured_external_action() {
    let server = TestServer::start(config()).await;
    let (status, _, body) = server.get("/admin-ajax.php?action=wplt_table_types").await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json, serde_json::json!({"success": true, "data": ["posts"]}));
    server.stop().await;

    let server = TestServer::start(ServerConfig {
        actions: Vec::new(),
        ..config()
    })
    .await;
    let (_, _, body) = server.get("/admin-ajax.php?action=wplt_table_types").await;
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["data"], "Incorrect Request");
    server.stop().await;
}

#[tokio::test]
async fn test_full_page_and_not_found() {
    let server = TestServer::start(config()).await;

    let (status, head, body) = server.get("/?orderby=post_date&order=desc").await;
    assert_eq!(status, 200);
    assert!(head.to_ascii_lowercase().contains("content-type: text/html"));
    assert!(body.contains(r#"<form name="post_table" class="wplt_container" method="get""#));
    assert!(body.contains(&server.system.issue_token()));
    assert!(body.contains(r#"name="wplt_class" value="posts""#));
    assert!(body.contains(r#"name="orderby" value="post_date""#));
    assert!(body.contains(r#"<select name="post_status">"#));

    let (status, _, _) = server.get("/?wplt_class=nope").await;
    assert_eq!(status, 404);

    let (status, _, _) = server.get("/wp-login.php").await;
    assert_eq!(status, 404);

    server.stop().await;
}
