//! Records decode from and encode to the backend's camelCase JSON.

use serde_json::json;
use vox_core::{Actor, Timestamp};
use vox_records::{
    apply_status, CaseStatus, ComplianceRequest, ComplianceStatus, Dispute, Priority, Record,
    TierAssignment, TimelineKind,
};

#[test]
fn dispute_decodes_from_backend_json() {
    let dispute: Dispute = serde_json::from_value(json!({
        "id": "DSP-1001",
        "customerName": "John Doe",
        "customerEmail": "john@doe.dev",
        "transactionId": "txn_8812",
        "amountMinor": 12900,
        "currency": "USD",
        "reason": "Charged twice for March",
        "status": "investigating",
        "priority": "urgent",
        "createdDate": "2026-02-11T09:30:00Z"
    }))
    .unwrap();

    assert_eq!(dispute.status, CaseStatus::Investigating);
    assert_eq!(dispute.priority(), Some(Priority::Urgent));
    assert!(dispute.timeline.is_empty());
    assert_eq!(dispute.display_amount(), "129.00 USD");
}

#[test]
fn status_change_round_trips_through_json() {
    let mut request: ComplianceRequest = serde_json::from_value(json!({
        "id": "DSR-7",
        "requesterName": "Lena Fischer",
        "requesterEmail": "lena@example.de",
        "requestType": "access",
        "status": "pending",
        "priority": "medium",
        "submittedDate": "2026-02-01T00:00:00Z",
        "dueDate": "2026-03-03T00:00:00Z"
    }))
    .unwrap();

    let actor = Actor::new("dana").unwrap();
    apply_status(&mut request, ComplianceStatus::InProgress, &actor, None, Timestamp::now()).unwrap();

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["status"], "in_progress");
    assert_eq!(value["timeline"][0]["type"], "status_change");
    assert_eq!(value["timeline"][0]["user"], "dana");

    let back: ComplianceRequest = serde_json::from_value(value).unwrap();
    assert_eq!(back, request);
    assert_eq!(back.timeline[0].kind, TimelineKind::StatusChange);
}

#[test]
fn unknown_status_is_rejected() {
    let result: Result<TierAssignment, _> = serde_json::from_value(json!({
        "id": "TIR-1",
        "userName": "Sam",
        "userEmail": "sam@example.com",
        "tier": "pro",
        "status": "archived"
    }));
    assert!(result.is_err());
}
