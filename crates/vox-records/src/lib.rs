//! # vox-records -- Admin Console Domain Records
//!
//! Every admin feature in the console manages one collection of records.
//! This crate defines those records and the rules that govern them.
//!
//! ## Features
//!
//! - **Billing disputes** (`dispute.rs`): chargebacks and billing complaints.
//! - **Incidents** (`incident.rs`): platform incidents with severity.
//! - **Trials** (`trial.rs`): trial windows with extension handling.
//! - **User tiers** (`tier.rs`): plan tier assignments and upgrade requests.
//! - **Customers** (`customer.rs`): customer records.
//! - **Compliance** (`compliance.rs`): data-privacy (access, deletion, ...) requests.
//! - **System health** (`health.rs`): read-only service status aggregation.
//!
//! ## Shared Rules
//!
//! All records implement [`Record`]. A status change goes through
//! [`apply_status`], which appends exactly one [`TimelineEntry`] describing
//! the old → new transition and maintains the record's terminal date.
//! Timelines are append-only. [`filter()`] derives a read-only view and
//! never mutates its input.

#[macro_use]
mod macros;

pub mod compliance;
pub mod customer;
pub mod dispute;
pub mod filter;
pub mod health;
pub mod incident;
pub mod record;
pub mod tier;
pub mod timeline;
pub mod trial;

pub use compliance::{ComplianceDraft, ComplianceRequest, ComplianceStatus, RequestType};
pub use customer::{Customer, CustomerDraft, CustomerStatus};
pub use dispute::{Dispute, DisputeDraft};
pub use filter::{filter, RecordFilter, Selection};
pub use health::{ServiceHealth, ServiceStatus, SystemHealth};
pub use incident::{Incident, IncidentDraft, Severity};
pub use record::{
    apply_status, edit_notes, Annotated, CaseStatus, Creatable, Priority, Record, RecordError,
    RecordStatus, WireEnum,
};
pub use tier::{approve_tier_request, change_tier, Tier, TierAssignment, TierStatus};
pub use timeline::{TimelineEntry, TimelineKind};
pub use trial::{extend_trial, Trial, TrialStatus, MAX_EXTENSION_DAYS};
