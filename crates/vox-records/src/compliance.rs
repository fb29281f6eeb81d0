//! # Data-Privacy Compliance Requests
//!
//! Subject requests under privacy regulation (access, deletion,
//! rectification, portability). Each request carries a statutory due date;
//! by default one month (30 days) from submission.

use serde::{Deserialize, Serialize};
use vox_core::{Actor, FieldErrors, FieldRule, FieldSource, RecordId, Schema, Timestamp, Validate};

use crate::record::{Annotated, Creatable, Priority, Record, RecordStatus, WireEnum};
use crate::timeline::TimelineEntry;

/// Days allowed to answer a request.
pub const RESPONSE_WINDOW_DAYS: u32 = 30;

wire_enum! {
    /// Kind of data-subject request.
    pub enum RequestType ("request type") {
        Access => "access",
        Deletion => "deletion",
        Rectification => "rectification",
        Portability => "portability",
    }
}

wire_enum! {
    /// Compliance request status.
    pub enum ComplianceStatus ("compliance status") {
        Pending => "pending",
        InProgress => "in_progress",
        Completed => "completed",
        Rejected => "rejected",
    }
}

impl RecordStatus for ComplianceStatus {
    fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }
}

/// A data-subject request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRequest {
    pub id: RecordId,
    pub requester_name: String,
    pub requester_email: String,
    pub request_type: RequestType,
    pub status: ComplianceStatus,
    pub priority: Priority,
    pub submitted_date: Timestamp,
    pub due_date: Timestamp,
    #[serde(default)]
    pub completion_date: Option<Timestamp>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
}

impl ComplianceRequest {
    /// Open requests past their due date.
    pub fn is_overdue(&self, now: Timestamp) -> bool {
        !self.status.is_terminal() && self.due_date < now
    }
}

impl Record for ComplianceRequest {
    type Status = ComplianceStatus;

    const COLLECTION: &'static str = "compliance-requests";
    const LABEL: &'static str = "Compliance request";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn status(&self) -> ComplianceStatus {
        self.status
    }

    fn put_status(&mut self, status: ComplianceStatus) {
        self.status = status;
    }

    fn timeline(&self) -> &[TimelineEntry] {
        &self.timeline
    }

    fn timeline_mut(&mut self) -> &mut Vec<TimelineEntry> {
        &mut self.timeline
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.requester_name.as_str(),
            self.requester_email.as_str(),
            self.request_type.as_str(),
        ]
    }

    fn priority(&self) -> Option<Priority> {
        Some(self.priority)
    }

    fn set_terminal_date(&mut self, at: Option<Timestamp>) {
        self.completion_date = at;
    }
}

impl Annotated for ComplianceRequest {
    fn notes(&self) -> &str {
        &self.notes
    }

    fn notes_mut(&mut self) -> &mut String {
        &mut self.notes
    }
}

/// Input of the "Log privacy request" form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceDraft {
    pub requester_name: String,
    pub requester_email: String,
    /// Wire name of a [`RequestType`].
    pub request_type: String,
    /// Wire name of a [`Priority`]; blank means `medium`.
    #[serde(default)]
    pub priority: String,
}

impl ComplianceDraft {
    fn schema() -> Schema {
        Schema::new()
            .field("requesterName", vec![FieldRule::Required, FieldRule::MaxLength(120)])
            .field("requesterEmail", vec![FieldRule::Required, FieldRule::Email])
            .field(
                "requestType",
                vec![FieldRule::Required, FieldRule::OneOf(RequestType::NAMES)],
            )
            .field("priority", vec![FieldRule::OneOf(Priority::NAMES)])
    }
}

impl FieldSource for ComplianceDraft {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "requesterName" => Some(&self.requester_name),
            "requesterEmail" => Some(&self.requester_email),
            "requestType" => Some(&self.request_type),
            "priority" => Some(&self.priority),
            _ => None,
        }
    }
}

impl Validate for ComplianceDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let errors = Self::schema().validate(self);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Creatable for ComplianceRequest {
    type Draft = ComplianceDraft;

    const ID_PREFIX: &'static str = "DSR";

    fn from_draft(
        draft: ComplianceDraft,
        id: RecordId,
        _actor: &Actor,
        at: Timestamp,
    ) -> Result<Self, FieldErrors> {
        let field_error = |field: &str, message: String| {
            let mut errors = FieldErrors::new();
            errors.insert(field, message);
            errors
        };
        let request_type = draft
            .request_type
            .parse::<RequestType>()
            .map_err(|e| field_error("requestType", e.to_string()))?;
        let priority = if draft.priority.trim().is_empty() {
            Priority::Medium
        } else {
            draft
                .priority
                .parse::<Priority>()
                .map_err(|e| field_error("priority", e.to_string()))?
        };
        Ok(Self {
            id,
            requester_name: draft.requester_name.trim().to_string(),
            requester_email: draft.requester_email.trim().to_string(),
            request_type,
            status: ComplianceStatus::Pending,
            priority,
            submitted_date: at,
            due_date: at.plus_days(RESPONSE_WINDOW_DAYS),
            completion_date: None,
            notes: String::new(),
            timeline: Vec::new(),
        })
    }
}
