//! Integration tests for saving, listing, loading and deleting reports.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{TestApp, form};

#[tokio::test]
async fn test_health_reports_collaborators() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], json!(true));
    assert_eq!(response.data()["status"], json!("ok"));
    assert_eq!(response.data()["store"], json!("memory"));
    assert_eq!(response.data()["mail_configured"], json!(true));
    assert_eq!(response.data()["mail_transport"], json!("memory"));
}

#[tokio::test]
async fn test_save_new_report_starts_at_version_one() {
    let app = TestApp::new().await;

    let id = app.create_report(form("Chantier Confluence - Lyon 2ème")).await;

    let response = app.request("GET", &format!("/api/reports/{id}"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    let report = response.data();
    assert_eq!(report["current_version"], json!(1));
    assert_eq!(report["site_name"], json!("Chantier Confluence - Lyon 2ème"));
    assert_eq!(report["status"], json!("empty"));
    assert_eq!(report["supplier"], json!("Loxam"));
    assert_eq!(report["last_sent_at"], json!(null));
    assert_eq!(report["payload"]["form_data"]["carrosserie_reception"], json!("bon"));
    assert_eq!(report["inspection_status"], json!("none"));
}

#[tokio::test]
async fn test_resave_overwrites_without_versioning() {
    let app = TestApp::new().await;
    let id = app.create_report(form("Site A")).await;

    let mut updated = form("Site A");
    updated["signature_reception"] = json!("data:image/png;base64,AAAA");
    let response = app
        .request(
            "PUT",
            &format!("/api/reports/{id}"),
            Some(json!({ "form_data": updated })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["created"], json!(false));
    assert_eq!(response.data()["report"]["current_version"], json!(1));
    assert_eq!(response.data()["report"]["status"], json!("reception_only"));

    let versions = app
        .request("GET", &format!("/api/reports/{id}/versions"), None)
        .await;
    let entries = versions.data().as_array().expect("version list");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["is_current"], json!(true));
}

#[tokio::test]
async fn test_save_with_unknown_id_creates_report() {
    let app = TestApp::new().await;
    let id = "0b7e4c9a-3f52-4d1e-9a57-2a0c6f1d8e44";

    let response = app
        .request(
            "POST",
            "/api/reports",
            Some(json!({ "id": id, "form_data": form("Site B") })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data()["id"], json!(id));
    assert_eq!(response.data()["created"], json!(true));
}

#[tokio::test]
async fn test_save_requires_site_name() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/reports",
            Some(json!({ "form_data": { "chantier": "   " } })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], json!(false));
    assert_eq!(response.body["error"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_malformed_json_is_validation_error() {
    let app = TestApp::new().await;

    let response = app
        .raw_request("POST", "/api/reports", "application/json", b"{not json".to_vec())
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_load_unknown_and_invalid_ids() {
    let app = TestApp::new().await;

    let missing = app
        .request(
            "GET",
            "/api/reports/0b7e4c9a-3f52-4d1e-9a57-2a0c6f1d8e44",
            None,
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["error"], json!("NOT_FOUND"));

    let invalid = app.request("GET", "/api/reports/pv-42", None).await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_filters_by_status_and_search() {
    let app = TestApp::new().await;
    app.create_report(form("Chantier Confluence")).await;
    let mut signed = form("Tour Part-Dieu");
    signed["signature_reception"] = json!("data:image/png;base64,AAAA");
    signed["signature_retour"] = json!("data:image/png;base64,BBBB");
    app.create_report(signed).await;

    let all = app.request("GET", "/api/reports", None).await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.data()["total_items"], json!(2));
    // Most recently updated first.
    assert_eq!(all.data()["items"][0]["site_name"], json!("Tour Part-Dieu"));

    let complete = app
        .request("GET", "/api/reports?status=complete", None)
        .await;
    assert_eq!(complete.data()["total_items"], json!(1));
    assert_eq!(complete.data()["items"][0]["status"], json!("complete"));

    let search = app
        .request("GET", "/api/reports?q=confluence&per_page=10", None)
        .await;
    assert_eq!(search.data()["total_items"], json!(1));
    assert_eq!(
        search.data()["items"][0]["site_name"],
        json!("Chantier Confluence")
    );

    let bad_status = app.request("GET", "/api/reports?status=signed", None).await;
    assert_eq!(bad_status.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_query_is_validation_error() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/reports?page=abc", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], json!(false));
    assert_eq!(response.body["error"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let app = TestApp::new().await;
    app.create_report(form("Lot 2 Gerland")).await;
    app.create_report(form("Lot_2 Vaise")).await;

    let response = app.request("GET", "/api/reports?q=lot_2", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["total_items"], json!(1));
    assert_eq!(response.data()["items"][0]["site_name"], json!("Lot_2 Vaise"));
}

#[tokio::test]
async fn test_download_saves_then_returns_document() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/reports/download",
            Some(json!({ "form_data": form("Site C") })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let content_type = response.headers["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
    let disposition = response.headers["content-disposition"].to_str().unwrap();
    assert!(disposition.starts_with("attachment;"));
    assert!(disposition.contains("PV_Materiel_"));

    let id = response.headers["x-report-id"].to_str().unwrap().to_string();
    let text = String::from_utf8(response.bytes.to_vec()).unwrap();
    assert!(text.contains("Site C"));

    let saved = app.request("GET", &format!("/api/reports/{id}"), None).await;
    assert_eq!(saved.status, StatusCode::OK);
    assert_eq!(saved.data()["current_version"], json!(1));
}

#[tokio::test]
async fn test_inspection_document_upload_fetch_and_delete() {
    let app = TestApp::new().await;
    let id = app.create_report(form("Site D")).await;
    let path = format!("/api/reports/{id}/inspection-document");

    let upload = app
        .raw_request("PUT", &path, "application/pdf", b"%PDF-1.4 vgp".to_vec())
        .await;
    assert_eq!(upload.status, StatusCode::OK, "{}", upload.body);
    assert_eq!(
        upload.data()["report"]["inspection_document"],
        json!(format!("vgp/{id}.pdf"))
    );
    assert_eq!(
        upload.data()["report"]["payload"]["form_data"]["vgp_document_path"],
        json!(format!("vgp/{id}.pdf"))
    );

    let fetched = app.request("GET", &path, None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.headers["content-type"], "application/pdf");
    assert_eq!(&fetched.bytes[..], b"%PDF-1.4 vgp");

    let deleted = app.request("DELETE", &format!("/api/reports/{id}"), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.data()["document_removed"], json!(true));

    let gone = app.request("GET", &format!("/api/reports/{id}"), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inspection_document_reference_is_server_owned() {
    let app = TestApp::new().await;
    let owner = app.create_report(form("Site Owner")).await;
    let owner_path = format!("/api/reports/{owner}/inspection-document");
    let key = format!("vgp/{owner}.pdf");
    let upload = app
        .raw_request("PUT", &owner_path, "application/pdf", b"%PDF-1.4 owner".to_vec())
        .await;
    assert_eq!(upload.status, StatusCode::OK, "{}", upload.body);

    let mut foreign = form("Site Other");
    foreign["vgp_document_path"] = json!(key);
    let other = app
        .request("POST", "/api/reports", Some(json!({ "form_data": foreign })))
        .await;
    assert_eq!(other.status, StatusCode::CREATED);
    assert!(other.data()["report"]["inspection_document"].is_null());
    let other_id = other.data()["id"].as_str().unwrap().to_string();

    let resaved = app
        .request(
            "PUT",
            &format!("/api/reports/{owner}"),
            Some(json!({ "form_data": form("Site Owner") })),
        )
        .await;
    assert_eq!(resaved.status, StatusCode::OK);
    assert_eq!(resaved.data()["report"]["inspection_document"], json!(key));

    let other_deleted = app
        .request("DELETE", &format!("/api/reports/{other_id}"), None)
        .await;
    assert_eq!(other_deleted.data()["document_removed"], json!(false));

    let still_there = app.request("GET", &owner_path, None).await;
    assert_eq!(still_there.status, StatusCode::OK);
    assert_eq!(&still_there.bytes[..], b"%PDF-1.4 owner");

    let owner_deleted = app
        .request("DELETE", &format!("/api/reports/{owner}"), None)
        .await;
    assert_eq!(owner_deleted.data()["document_removed"], json!(true));
}

#[tokio::test]
async fn test_inspection_document_rejects_bad_uploads() {
    let app = TestApp::new().await;
    let id = app.create_report(form("Site E")).await;
    let path = format!("/api/reports/{id}/inspection-document");

    let wrong_type = app
        .raw_request("PUT", &path, "text/plain", b"hello".to_vec())
        .await;
    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);

    let too_large = app
        .raw_request("PUT", &path, "image/png", vec![0u8; 2048])
        .await;
    assert_eq!(too_large.status, StatusCode::BAD_REQUEST);

    let none_yet = app.request("GET", &path, None).await;
    assert_eq!(none_yet.status, StatusCode::NOT_FOUND);

    let png = app
        .raw_request("PUT", &path, "image/png", b"\x89PNG".to_vec())
        .await;
    assert_eq!(png.status, StatusCode::OK);
    let fetched = app.request("GET", &path, None).await;
    assert_eq!(fetched.headers["content-type"], "image/png");
}

#[tokio::test]
async fn test_stats_counts_statuses_and_inspections() {
    let app = TestApp::new().await;
    app.create_report(form("Site F")).await;
    let mut inspected = form("Site G");
    inspected["signature_reception"] = json!("data:image/png;base64,AAAA");
    inspected["vgp_date"] = json!("2000-01-01");
    app.create_report(inspected).await;

    let response = app.request("GET", "/api/stats", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let stats = response.data();
    assert_eq!(stats["total"], json!(2));
    assert_eq!(stats["empty"], json!(1));
    assert_eq!(stats["reception_only"], json!(1));
    assert_eq!(stats["with_inspection"], json!(1));
    assert_eq!(stats["inspection"]["expired"], json!(1));
    assert_eq!(stats["inspection"]["none"], json!(1));
}
