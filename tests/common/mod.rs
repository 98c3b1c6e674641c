#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use storefront_api::{
    AppState,
    app,
    config::{AppConfig, CorsConfig, DatabaseConfig, ServerConfig, UploadConfig},
    store::{MemoryStore, Store},
};
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "storefront-test-boundary";

/// Router over a fresh in-memory store with upload and public dirs in a temp dir.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub dir: TempDir,
    pub upload_dir: std::path::PathBuf,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_upload_limit(1024)
    }

    pub fn with_upload_limit(max_file_size: usize) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let upload_dir = dir.path().join("uploads");
        let public_dir = dir.path().join("public");
        std::fs::create_dir_all(&upload_dir).expect("create upload dir");
        std::fs::create_dir_all(&public_dir).expect("create public dir");
        std::fs::write(public_dir.join("index.html"), "<h1>admin</h1>").expect("write index");

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                max_body_size: 1024 * 1024,
                public_dir,
            },
            database: DatabaseConfig {
                url: "postgres://unused".to_string(),
                max_connections: 1,
            },
            cors: CorsConfig::default(),
            uploads: UploadConfig {
                dir: upload_dir.clone(),
                max_file_size,
            },
        };

        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone() as Arc<dyn Store>, config.uploads.clone());
        let router = app::router(state, &config).expect("build router");

        Self {
            router,
            store,
            dir,
            upload_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes()
            .to_vec();
        (status, body)
    }

    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = self.send(request).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("response is JSON")
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send_json(empty(Method::GET, uri)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send_json(empty(Method::DELETE, uri)).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send_json(json(Method::POST, uri, body)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send_json(json(Method::PUT, uri, body)).await
    }

    pub fn stored_uploads(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.upload_dir)
            .expect("list upload dir")
            .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn empty(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

pub fn json(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

pub fn urlencoded(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

pub struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
}

pub fn multipart(
    method: Method,
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<FilePart<'_>>,
) -> Request<Body> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    if let Some(file) = file {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                file.field, file.file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        body.extend_from_slice(file.data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .expect("build request")
}
