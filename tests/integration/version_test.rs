//! Integration tests for the version archive.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};

use helpers::{TestApp, form};

fn with_observation(site: &str, text: &str) -> Value {
    let mut f = form(site);
    f["observations"] = json!(text);
    f
}

#[tokio::test]
async fn test_save_send_send_scenario() {
    let app = TestApp::new().await;

    // P1 saved as a draft, then P2 and P3 dispatched.
    let id = app
        .create_report(with_observation("Chantier R1", "P1"))
        .await;
    let p2 = app
        .send_report(Some(&id), with_observation("Chantier R1", "P2"))
        .await;
    assert_eq!(p2.status, StatusCode::OK, "{}", p2.body);
    let p3 = app
        .send_report(Some(&id), with_observation("Chantier R1", "P3"))
        .await;
    assert_eq!(p3.status, StatusCode::OK, "{}", p3.body);
    assert_eq!(p3.data()["archived_version"], json!(2));

    let list = app
        .request("GET", &format!("/api/reports/{id}/versions"), None)
        .await;
    assert_eq!(list.status, StatusCode::OK);
    let numbers: Vec<i64> = list
        .data()
        .as_array()
        .expect("version list")
        .iter()
        .map(|v| v["version_number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![3, 2, 1]);
    assert_eq!(list.data()[0]["is_current"], json!(true));
    assert_eq!(list.data()[1]["is_current"], json!(false));

    for (n, expected) in [(1, "P1"), (2, "P2"), (3, "P3")] {
        let version = app
            .request("GET", &format!("/api/reports/{id}/versions/{n}"), None)
            .await;
        assert_eq!(version.status, StatusCode::OK, "version {n}");
        assert_eq!(
            version.data()["payload"]["form_data"]["observations"],
            json!(expected),
            "version {n}"
        );
        assert_eq!(version.data()["current_version"], json!(3));
    }

    let v2 = app
        .request("GET", &format!("/api/reports/{id}/versions/2"), None)
        .await;
    assert_eq!(v2.data()["payload"]["version_info"]["number"], json!(2));
}

#[tokio::test]
async fn test_load_version_out_of_range() {
    let app = TestApp::new().await;
    let id = app.create_report(form("Site A")).await;

    for n in ["0", "2", "-1", "3000000000"] {
        let response = app
            .request("GET", &format!("/api/reports/{id}/versions/{n}"), None)
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "version {n}");
    }

    let invalid = app
        .request("GET", &format!("/api/reports/{id}/versions/latest"), None)
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_versions_of_unknown_report() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "GET",
            "/api/reports/0b7e4c9a-3f52-4d1e-9a57-2a0c6f1d8e44/versions",
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_removes_archived_versions() {
    let app = TestApp::new().await;
    let id = app.create_report(form("Site B")).await;
    let sent = app.send_report(Some(&id), form("Site B")).await;
    assert_eq!(sent.status, StatusCode::OK);

    let deleted = app.request("DELETE", &format!("/api/reports/{id}"), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.data()["document_removed"], json!(false));

    let versions = app
        .request("GET", &format!("/api/reports/{id}/versions/1"), None)
        .await;
    assert_eq!(versions.status, StatusCode::NOT_FOUND);

    let stats = app.request("GET", "/api/stats", None).await;
    assert_eq!(stats.data()["archived_versions"], json!(0));
}
