//! End-to-end tests against a live server on an ephemeral port.

use std::path::Path;
use std::time::Duration;

use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::sync::oneshot;

use config_vault::api;
use config_vault::config::{ServerSettings, StorePaths};
use config_vault::storage::Storage;

struct TestServer {
    base: String,
    client: reqwest::Client,
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    async fn start(dir: &Path) -> Self {
        let storage = Storage::new(StorePaths::with_base_dir(dir.to_path_buf())).unwrap();
        let listener = api::bind(&ServerSettings::new("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(api::serve(listener, storage, async move {
            let _ = rx.await;
        }));

        Self {
            base: format!("http://{addr}"),
            client: reqwest::Client::new(),
            _shutdown: tx,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn call(&self, method: reqwest::Method, path: &str, body: Option<&str>) -> (u16, Value) {
        let mut req = self.client.request(method, self.url(path));
        if let Some(body) = body {
            req = req
                .header("content-type", "application/json")
                .body(body.to_string());
        }
        let resp = req.send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        self.call(reqwest::Method::GET, path, None).await
    }
}

async fn seeded_server() -> (TestServer, TempDir) {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("config.json"),
        r#"{"theme":"dark","limits":{"max":10}}"#,
    )
    .unwrap();
    let server = TestServer::start(temp.path()).await;
    (server, temp)
}

#[tokio::test]
async fn patch_section_then_read_whole_document() {
    let (server, _temp) = seeded_server().await;

    let (status, body) = server
        .call(reqwest::Method::PATCH, "/api/config/limits", Some(r#"{"max":20}"#))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"], json!({"max": 20}));

    let (status, body) = server.get("/api/config").await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({"success": true, "data": {"theme": "dark", "limits": {"max": 20}}})
    );
}

#[tokio::test]
async fn read_section_and_missing_section() {
    let (server, _temp) = seeded_server().await;

    let (status, body) = server.get("/api/config/theme").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"], json!("dark"));

    let (status, body) = server.get("/api/config/nope").await;
    assert_eq!(status, 404);
    assert_eq!(
        body,
        json!({"success": false, "error": "Section 'nope' not found"})
    );

    let (status, _) = server
        .call(reqwest::Method::PATCH, "/api/config/nope", Some("1"))
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn put_replaces_and_rejects_non_objects() {
    let (server, _temp) = seeded_server().await;

    let (status, body) = server
        .call(reqwest::Method::PUT, "/api/config", Some(r#"{"a":{"b":[1,2]}}"#))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], json!("Config updated successfully"));
    assert_eq!(body["data"], json!({"a": {"b": [1, 2]}}));

    for bad in ["42", "null", "[1,2]", "{broken"] {
        let (status, body) = server
            .call(reqwest::Method::PUT, "/api/config", Some(bad))
            .await;
        assert_eq!(status, 400, "{bad}");
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].is_string());
    }

    let (_, body) = server.get("/api/config").await;
    assert_eq!(body["data"], json!({"a": {"b": [1, 2]}}));
}

#[tokio::test]
async fn backup_list_and_restore() {
    let (server, _temp) = seeded_server().await;

    let mut created = Vec::new();
    for _ in 0..3 {
        let (status, body) = server
            .call(reqwest::Method::POST, "/api/config/backup", None)
            .await;
        assert_eq!(status, 200);
        assert_eq!(body["message"], json!("Backup created successfully"));
        created.push(body["filename"].as_str().unwrap().to_string());
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let (status, body) = server.get("/api/backups").await;
    assert_eq!(status, 200);
    let listed: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["filename"].as_str().unwrap().to_string())
        .collect();
    created.reverse();
    assert_eq!(listed, created);

    server
        .call(reqwest::Method::PUT, "/api/config", Some(r#"{"a":1}"#))
        .await;

    let (status, body) = server
        .call(
            reqwest::Method::POST,
            &format!("/api/config/restore/{}", created[0]),
            None,
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"], json!({"theme": "dark", "limits": {"max": 10}}));

    let (_, body) = server.get("/api/config").await;
    assert_eq!(body["data"], json!({"theme": "dark", "limits": {"max": 10}}));
}

#[tokio::test]
async fn restore_unknown_or_escaping_backup_is_404() {
    let (server, _temp) = seeded_server().await;

    for name in ["does-not-exist.json", "..%2Fconfig.json"] {
        let (status, body) = server
            .call(
                reqwest::Method::POST,
                &format!("/api/config/restore/{name}"),
                None,
            )
            .await;
        assert_eq!(status, 404, "{name}");
        assert_eq!(body["success"], json!(false));
    }

    let (_, body) = server.get("/api/config").await;
    assert_eq!(body["data"], json!({"theme": "dark", "limits": {"max": 10}}));
}

#[tokio::test]
async fn missing_document_is_500_with_cause() {
    let temp = TempDir::new().unwrap();
    let server = TestServer::start(temp.path()).await;

    let (status, body) = server.get("/api/config").await;
    assert_eq!(status, 500);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to read config file:"));

    let (status, _) = server
        .call(reqwest::Method::POST, "/api/config/backup", None)
        .await;
    assert_eq!(status, 500);

    let (status, body) = server.get("/api/backups").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn unknown_route_and_health() {
    let (server, _temp) = seeded_server().await;

    let (status, body) = server.get("/api/nothing-here").await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({"success": false, "error": "Not found"}));

    let (status, body) = server.get("/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], json!("ok"));
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let (server, _temp) = seeded_server().await;

    let resp = server
        .client
        .get(server.url("/api/config"))
        .header("origin", "http://admin.example")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");

    let resp = server
        .client
        .request(reqwest::Method::OPTIONS, server.url("/api/config/limits"))
        .header("origin", "http://admin.example")
        .header("access-control-request-method", "PATCH")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert!(resp.headers().contains_key("access-control-allow-methods"));
}
