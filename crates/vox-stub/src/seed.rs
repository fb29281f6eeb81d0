//! Mock data served by a freshly started stub.
//!
//! Dates are relative to start-up so trials stay active and compliance
//! deadlines stay meaningful.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{json, Value};
use vox_client::ProfileSettings;
use vox_records::{ServiceHealth, ServiceStatus};

/// Emails owned by other admins; saving a profile with one of these fails.
pub const TAKEN_EMAILS: [&str; 2] = ["ops@voxline.io", "billing@voxline.io"];

fn at(now: DateTime<Utc>, days: i64) -> String {
    (now + Duration::days(days)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Seed records per collection, newest first.
pub fn records(now: DateTime<Utc>) -> Vec<(&'static str, Vec<Value>)> {
    vec![
        (
            "disputes",
            vec![
                json!({
                    "id": "DSP-1042",
                    "customerName": "Acme Dental",
                    "customerEmail": "billing@acmedental.com",
                    "transactionId": "txn_8f2a91",
                    "amountMinor": 12900,
                    "currency": "USD",
                    "reason": "Charged twice for March",
                    "status": "open",
                    "priority": "high",
                    "createdDate": at(now, -2)
                }),
                json!({
                    "id": "DSP-1039",
                    "customerName": "Northwind Legal",
                    "customerEmail": "accounts@northwind.law",
                    "transactionId": "txn_77c0d4",
                    "amountMinor": 4500,
                    "currency": "USD",
                    "reason": "International minutes not used",
                    "status": "investigating",
                    "priority": "medium",
                    "createdDate": at(now, -6),
                    "notes": "Waiting on carrier CDRs"
                }),
                json!({
                    "id": "DSP-1017",
                    "customerName": "Blue Fern Cafe",
                    "customerEmail": "owner@bluefern.cafe",
                    "transactionId": "txn_1b93ee",
                    "amountMinor": 2900,
                    "currency": "EUR",
                    "reason": "Cancelled before renewal",
                    "status": "resolved",
                    "priority": "low",
                    "createdDate": at(now, -20),
                    "resolvedDate": at(now, -15)
                }),
            ],
        ),
        (
            "incidents",
            vec![
                json!({
                    "id": "INC-311",
                    "title": "Outbound calls failing in eu-west",
                    "description": "SIP 503 from upstream carrier on ~8% of calls",
                    "severity": "critical",
                    "status": "investigating",
                    "affectedServices": ["telephony", "sip-trunking"],
                    "assignee": "ops-oncall",
                    "reportedBy": "monitoring",
                    "createdDate": at(now, 0)
                }),
                json!({
                    "id": "INC-309",
                    "title": "Voicemail transcription delayed",
                    "description": "Queue backlog after deploy",
                    "severity": "medium",
                    "status": "open",
                    "affectedServices": ["voicemail"],
                    "reportedBy": "support",
                    "createdDate": at(now, -1)
                }),
                json!({
                    "id": "INC-301",
                    "title": "Dashboard login slow",
                    "severity": "low",
                    "status": "closed",
                    "affectedServices": ["web-app"],
                    "reportedBy": "support",
                    "createdDate": at(now, -9),
                    "resolvedDate": at(now, -8)
                }),
            ],
        ),
        (
            "trials",
            vec![
                json!({
                    "id": "TRL-220",
                    "customerName": "Harbor Realty",
                    "customerEmail": "it@harborrealty.com",
                    "plan": "pro",
                    "startDate": at(now, -10),
                    "endDate": at(now, 4),
                    "status": "active"
                }),
                json!({
                    "id": "TRL-214",
                    "customerName": "Pine & Oak Studio",
                    "customerEmail": "hello@pineoak.design",
                    "plan": "starter",
                    "startDate": at(now, -21),
                    "endDate": at(now, 7),
                    "status": "extended",
                    "extensionCount": 1
                }),
                json!({
                    "id": "TRL-198",
                    "customerName": "Quartz Clinics",
                    "customerEmail": "admin@quartzclinics.org",
                    "plan": "enterprise",
                    "startDate": at(now, -45),
                    "endDate": at(now, -31),
                    "status": "converted",
                    "convertedDate": at(now, -32)
                }),
            ],
        ),
        (
            "tiers",
            vec![
                json!({
                    "id": "TIR-88",
                    "userName": "Sam Lee",
                    "userEmail": "sam@harborrealty.com",
                    "tier": "starter",
                    "requestedTier": "pro",
                    "status": "pending"
                }),
                json!({
                    "id": "TIR-71",
                    "userName": "Priya Nair",
                    "userEmail": "priya@quartzclinics.org",
                    "tier": "enterprise",
                    "status": "active",
                    "updatedDate": at(now, -30)
                }),
            ],
        ),
        (
            "customers",
            vec![
                json!({
                    "id": "CUS-5102",
                    "name": "Harbor Realty",
                    "email": "it@harborrealty.com",
                    "company": "Harbor Realty LLC",
                    "phone": "+1 415 555 0142",
                    "plan": "pro",
                    "status": "prospect",
                    "createdDate": at(now, -10)
                }),
                json!({
                    "id": "CUS-4870",
                    "name": "Quartz Clinics",
                    "email": "admin@quartzclinics.org",
                    "plan": "enterprise",
                    "status": "active",
                    "createdDate": at(now, -45)
                }),
                json!({
                    "id": "CUS-4411",
                    "name": "Old Mill Bakery",
                    "email": "orders@oldmill.bakery",
                    "status": "churned",
                    "createdDate": at(now, -200),
                    "churnedDate": at(now, -60)
                }),
            ],
        ),
        (
            "compliance-requests",
            vec![
                json!({
                    "id": "DSR-640",
                    "requesterName": "Jordan Blake",
                    "requesterEmail": "jordan.blake@example.com",
                    "requestType": "deletion",
                    "status": "pending",
                    "priority": "high",
                    "submittedDate": at(now, -3),
                    "dueDate": at(now, 27)
                }),
                json!({
                    "id": "DSR-612",
                    "requesterName": "Alex Kim",
                    "requesterEmail": "alex.kim@example.com",
                    "requestType": "access",
                    "status": "in_progress",
                    "priority": "medium",
                    "submittedDate": at(now, -33),
                    "dueDate": at(now, -3)
                }),
            ],
        ),
    ]
}

pub fn services() -> Vec<ServiceHealth> {
    let service = |name: &str, status, latency_ms, uptime_percent| ServiceHealth {
        name: name.to_string(),
        status,
        latency_ms: Some(latency_ms),
        uptime_percent: Some(uptime_percent),
    };
    vec![
        service("telephony", ServiceStatus::Degraded, 180, 99.71),
        service("sip-trunking", ServiceStatus::Operational, 42, 99.98),
        service("voicemail", ServiceStatus::Operational, 65, 99.95),
        service("web-app", ServiceStatus::Operational, 120, 99.99),
        service("billing", ServiceStatus::Operational, 88, 99.97),
    ]
}

pub fn profile() -> ProfileSettings {
    ProfileSettings {
        full_name: "Dana Admin".to_string(),
        email: "dana@voxline.io".to_string(),
        phone: "+1 415 555 0100".to_string(),
        company: "Voxline".to_string(),
        timezone: "America/Los_Angeles".to_string(),
    }
}
