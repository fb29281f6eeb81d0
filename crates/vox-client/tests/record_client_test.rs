//! Contract tests for RecordClient and HealthClient.
//!
//! These tests use wiremock to simulate the admin backend. Every path and
//! envelope shape follows the REST contract:
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `/api/{collection}` | `list_*` |
//! | GET    | `/api/{collection}/{id}` | `get_*` |
//! | PUT    | `/api/{collection}/{id}` | `update_*` |
//! | POST   | `/api/{collection}` | `create_*` |
//! | GET    | `/api/system/health` | `health_*` |

use vox_client::{ApiClient, ApiConfig, ErrorKind, RecordApi};
use vox_core::RecordId;
use vox_records::{CaseStatus, Dispute, Incident, ServiceStatus, Trial};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build an ApiClient pointed at a wiremock server.
async fn test_client(mock_server: &MockServer) -> ApiClient {
    let config = ApiConfig::new(&mock_server.uri(), "test-token").unwrap();
    ApiClient::new(ApiConfig {
        max_retries: 0,
        ..config
    })
    .unwrap()
}

/// A client that times out after one second and retries transport errors.
async fn impatient_client(mock_server: &MockServer, max_retries: u32) -> ApiClient {
    let config = ApiConfig::new(&mock_server.uri(), "test-token").unwrap();
    ApiClient::new(ApiConfig {
        timeout_secs: 1,
        max_retries,
        ..config
    })
    .unwrap()
}

fn dispute_json(id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "customerName": "John Doe",
        "customerEmail": "john@doe.dev",
        "transactionId": "txn_1",
        "amountMinor": 4999,
        "currency": "USD",
        "reason": "Duplicate charge",
        "status": status,
        "priority": "high",
        "createdDate": "2026-01-10T08:00:00Z"
    })
}

// ── GET /api/{collection} ────────────────────────────────────────────

#[tokio::test]
async fn list_sends_bearer_token_and_decodes_bare_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/disputes"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": [dispute_json("DSP-1", "open"), dispute_json("DSP-2", "resolved")]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let disputes: Vec<Dispute> = client.records::<Dispute>().list().await.unwrap();
    assert_eq!(disputes.len(), 2);
    assert_eq!(disputes[1].status, CaseStatus::Resolved);
}

#[tokio::test]
async fn list_decodes_paginated_items() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/trials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": {
                "items": [{
                    "id": "TRL-1",
                    "customerName": "Acme Dental",
                    "customerEmail": "it@acmedental.com",
                    "plan": "pro",
                    "startDate": "2026-01-01T00:00:00Z",
                    "endDate": "2026-01-15T00:00:00Z",
                    "status": "active"
                }],
                "pagination": { "page": 1, "limit": 20, "total": 1, "totalPages": 1 }
            }
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let trials: Vec<Trial> = client.records::<Trial>().list().await.unwrap();
    assert_eq!(trials.len(), 1);
    assert_eq!(trials[0].extension_count, 0);
}

#[tokio::test]
async fn list_maps_401_to_authorization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/incidents"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "success": false,
            "error": { "code": "UNAUTHORIZED", "message": "Session expired" }
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let err = client.records::<Incident>().list().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert_eq!(err.code(), "UNAUTHORIZED");
    assert_eq!(err.message(), "Session expired");
}

// ── GET /api/{collection}/{id} ───────────────────────────────────────

#[tokio::test]
async fn get_returns_none_on_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/disputes/DSP-404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let id = RecordId::new("DSP-404").unwrap();
    assert!(client.records::<Dispute>().get(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn get_returns_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/disputes/DSP-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": dispute_json("DSP-7", "escalated")
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let id = RecordId::new("DSP-7").unwrap();
    let dispute = client.records::<Dispute>().get(&id).await.unwrap().unwrap();
    assert_eq!(dispute.status, CaseStatus::Escalated);
}

// ── PUT /api/{collection}/{id} ───────────────────────────────────────

#[tokio::test]
async fn update_puts_full_record_to_item_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/disputes/DSP-1"))
        .and(body_partial_json(serde_json::json!({ "id": "DSP-1", "status": "resolved" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": dispute_json("DSP-1", "resolved")
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let dispute: Dispute = serde_json::from_value(dispute_json("DSP-1", "resolved")).unwrap();
    client.records::<Dispute>().update(&dispute).await.unwrap();
}

#[tokio::test]
async fn update_surfaces_string_error_as_unknown() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/disputes/DSP-1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "success": false,
            "error": "Database unavailable"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let dispute: Dispute = serde_json::from_value(dispute_json("DSP-1", "closed")).unwrap();
    let err = client.records::<Dispute>().update(&dispute).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unknown);
    assert_eq!(err.message(), "Database unavailable");
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let client = ApiClient::new(ApiConfig::local_mock(1, "test-token").unwrap()).unwrap();
    let dispute: Dispute = serde_json::from_value(dispute_json("DSP-1", "closed")).unwrap();
    let err = client.records::<Dispute>().update(&dispute).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(err.code(), "NETWORK_ERROR");
}

// ── POST /api/{collection} ───────────────────────────────────────────

#[tokio::test]
async fn create_posts_to_collection_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/disputes"))
        .and(body_partial_json(serde_json::json!({ "id": "DSP-9" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "success": true })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let dispute: Dispute = serde_json::from_value(dispute_json("DSP-9", "open")).unwrap();
    client.records::<Dispute>().create(&dispute).await.unwrap();
}

#[tokio::test]
async fn create_timing_out_is_sent_once() {
    let mock_server = MockServer::start().await;

    // The backend commits the record but answers too late.
    Mock::given(method("POST"))
        .and(path("/api/disputes"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(serde_json::json!({ "success": true }))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = impatient_client(&mock_server, 2).await;
    let dispute: Dispute = serde_json::from_value(dispute_json("DSP-9", "open")).unwrap();
    let err = client.records::<Dispute>().create(&dispute).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn update_timing_out_is_resent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/disputes/DSP-9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "success": true }))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = impatient_client(&mock_server, 1).await;
    let dispute: Dispute = serde_json::from_value(dispute_json("DSP-9", "open")).unwrap();
    assert!(client.records::<Dispute>().update(&dispute).await.is_err());
}

// ── GET /api/system/health ───────────────────────────────────────────

#[tokio::test]
async fn health_decodes_services_and_overall() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/system/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": {
                "services": [
                    { "name": "api", "status": "operational", "latencyMs": 42, "uptimePercent": 99.98 },
                    { "name": "telephony", "status": "down" }
                ],
                "checkedAt": "2026-03-01T12:00:00Z"
            }
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let health = client.health().check().await.unwrap();
    assert_eq!(health.services.len(), 2);
    assert_eq!(health.overall(), ServiceStatus::Down);
}
