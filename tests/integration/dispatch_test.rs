//! Integration tests for dispatching reports and the versioning it triggers.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use pv_database::ReportStore;

use helpers::{TestApp, form};

#[tokio::test]
async fn test_send_new_report_creates_version_one() {
    let app = TestApp::new().await;

    let response = app.send_report(None, form("Chantier Confluence")).await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    let data = response.data();
    assert_eq!(data["archived_version"], json!(null));
    assert_eq!(data["report"]["current_version"], json!(1));
    assert!(data["report"]["last_sent_at"].is_string());
    assert_eq!(
        data["recipients"],
        json!([
            "paul.martin@chantier.example.fr",
            "contact@bouygues.example.fr"
        ])
    );
    assert_eq!(data["report"]["payload"]["version_info"]["number"], json!(1));

    let sent = app.mailer.sent().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].subject.contains("Chantier Confluence"));
    assert!(sent[0].attachment.is_some());
}

#[tokio::test]
async fn test_resend_archives_previous_state() {
    let app = TestApp::new().await;
    let id = app.create_report(form("Site A")).await;

    let mut second = form("Site A");
    second["signature_reception"] = json!("data:image/png;base64,AAAA");
    let response = app.send_report(Some(&id), second).await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.data()["archived_version"], json!(1));
    assert_eq!(response.data()["report"]["current_version"], json!(2));
    assert_eq!(response.data()["report"]["status"], json!("reception_only"));

    let archived = app
        .request("GET", &format!("/api/reports/{id}/versions/1"), None)
        .await;
    assert_eq!(archived.status, StatusCode::OK);
    assert_eq!(archived.data()["is_current"], json!(false));
    assert_eq!(archived.data()["created_by"], json!("email_send"));
    assert_eq!(
        archived.data()["payload"]["form_data"]["signature_reception"],
        json!(null)
    );
}

#[tokio::test]
async fn test_explicit_recipients_and_comment() {
    let app = TestApp::new().await;
    let id = app.create_report(form("Site B")).await;

    let response = app
        .request(
            "POST",
            "/api/reports/send",
            Some(json!({
                "id": id,
                "form_data": form("Site B"),
                "recipients": ["chef@chantier.example.fr, CHEF@chantier.example.fr"],
                "comment": "Retour anticipé"
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.data()["recipients"], json!(["chef@chantier.example.fr"]));

    let versions = app
        .request("GET", &format!("/api/reports/{id}/versions"), None)
        .await;
    assert_eq!(versions.data()[1]["comment"], json!("Retour anticipé"));
}

#[tokio::test]
async fn test_send_rejects_invalid_recipient() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/reports/send",
            Some(json!({ "form_data": form("Site C"), "recipients": ["not-an-address"] })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.mailer.sent().await.is_empty());
}

#[tokio::test]
async fn test_send_without_any_recipient_fails() {
    let app = TestApp::new().await;

    let response = app
        .send_report(None, json!({ "chantier": "Site sans contact" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.stats().await.unwrap().total, 0);
}

#[tokio::test]
async fn test_failed_delivery_changes_nothing() {
    let app = TestApp::new().await;
    let id = app.create_report(form("Site D")).await;
    app.mailer.set_reject(true);

    let response = app.send_report(Some(&id), form("Site D modifié")).await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["error"], json!("EXTERNAL_SERVICE_ERROR"));

    let report = app.request("GET", &format!("/api/reports/{id}"), None).await;
    assert_eq!(report.data()["current_version"], json!(1));
    assert_eq!(report.data()["site_name"], json!("Site D"));
    assert_eq!(report.data()["last_sent_at"], json!(null));

    let versions = app
        .request("GET", &format!("/api/reports/{id}/versions"), None)
        .await;
    assert_eq!(versions.data().as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_store_failure_after_send_is_reported() {
    let app = TestApp::new().await;
    let id = app.create_report(form("Site E")).await;
    app.store.set_fail_writes(true);

    let response = app.send_report(Some(&id), form("Site E")).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], json!("DATABASE_ERROR"));
    let message = response.body["message"].as_str().unwrap();
    assert!(message.contains("could not be recorded"));
    assert_eq!(app.mailer.sent().await.len(), 1);

    app.store.set_fail_writes(false);
    let report = app.request("GET", &format!("/api/reports/{id}"), None).await;
    assert_eq!(report.data()["current_version"], json!(1));
}
