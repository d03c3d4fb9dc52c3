//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use pv_api::{AppState, build_app};
use pv_core::config::AppConfig;
use pv_database::MemoryReportStore;
use pv_delivery::{HandoverSheetRenderer, LocalDocumentStorage, MemoryMailer};

const TEST_CONFIG: &str = r#"
[database]
backend = "memory"
url = "postgres://unused"

[mail]
enabled = true
transport = "memory"
sender = "pv@chantier.example.fr"
subject_prefix = "PV Matériel Loué"

[storage]
max_document_bytes = 1024
"#;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Store behind the router, for direct inspection
    pub store: MemoryReportStore,
    /// Mailer behind the router
    pub mailer: MemoryMailer,
    _documents: TempDir,
}

/// Response of a test request
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Bytes,
    /// Parsed JSON body, `Null` when the body is not JSON
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success body.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

impl TestApp {
    /// Create a new test application over empty in-memory collaborators
    pub async fn new() -> Self {
        let config = AppConfig::from_toml(TEST_CONFIG).expect("Failed to parse test config");
        let documents_dir = TempDir::new().expect("Failed to create documents dir");
        let documents = LocalDocumentStorage::new(
            documents_dir.path().to_str().expect("utf-8 temp path"),
        )
        .await
        .expect("Failed to init document storage");

        let store = MemoryReportStore::new();
        let mailer = MemoryMailer::new();

        let state = AppState::new(
            config,
            Arc::new(store.clone()),
            Arc::new(HandoverSheetRenderer::new()),
            Arc::new(mailer.clone()),
            Arc::new(documents),
        );

        Self {
            router: build_app(state),
            store,
            mailer,
            _documents: documents_dir,
        }
    }

    /// Make a JSON request
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body = body
            .map(|b| serde_json::to_vec(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        self.raw_request(method, path, "application/json", body).await
    }

    /// Make a request with an arbitrary body
    pub async fn raw_request(
        &self,
        method: &str,
        path: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }

    /// Save a form as a new report and return its id
    pub async fn create_report(&self, form: Value) -> String {
        let response = self
            .request("POST", "/api/reports", Some(json!({ "form_data": form })))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.data()["id"]
            .as_str()
            .expect("id in save response")
            .to_string()
    }

    /// Dispatch a form, optionally for an existing report
    pub async fn send_report(&self, id: Option<&str>, form: Value) -> TestResponse {
        let mut body = json!({ "form_data": form });
        if let Some(id) = id {
            body["id"] = json!(id);
        }
        self.request("POST", "/api/reports/send", Some(body)).await
    }
}

/// A form for the given site with a driver address
pub fn form(site: &str) -> Value {
    json!({
        "chantier": site,
        "email_conducteur": "paul.martin@chantier.example.fr",
        "email_entreprise": "contact@bouygues.example.fr",
        "fournisseur": "Loxam",
        "materiel_type": "Nacelle élévatrice",
        "date_reception": "2024-03-01",
        "carrosserie_reception": "bon"
    })
}
