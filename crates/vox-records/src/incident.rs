//! # Incidents
//!
//! Platform incidents (call routing outages, degraded voice quality,
//! provider failures) tracked from report to resolution.

use serde::{Deserialize, Serialize};
use vox_core::{Actor, FieldErrors, FieldRule, FieldSource, RecordId, Schema, Timestamp, Validate};

use crate::record::{Annotated, CaseStatus, Creatable, Priority, Record, RecordStatus, WireEnum};
use crate::timeline::TimelineEntry;

wire_enum! {
    /// Incident severity.
    pub enum Severity ("severity") {
        Critical => "critical",
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

impl From<Severity> for Priority {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Critical => Priority::Critical,
            Severity::High => Priority::High,
            Severity::Medium => Priority::Medium,
            Severity::Low => Priority::Low,
        }
    }
}

/// A platform incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub severity: Severity,
    pub status: CaseStatus,
    #[serde(default)]
    pub affected_services: Vec<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    pub reported_by: String,
    pub created_date: Timestamp,
    #[serde(default)]
    pub resolved_date: Option<Timestamp>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
}

impl Record for Incident {
    type Status = CaseStatus;

    const COLLECTION: &'static str = "incidents";
    const LABEL: &'static str = "Incident";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn status(&self) -> CaseStatus {
        self.status
    }

    fn put_status(&mut self, status: CaseStatus) {
        self.status = status;
    }

    fn timeline(&self) -> &[TimelineEntry] {
        &self.timeline
    }

    fn timeline_mut(&mut self) -> &mut Vec<TimelineEntry> {
        &mut self.timeline
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.id.as_str(), self.title.as_str(), self.description.as_str()];
        fields.extend(self.affected_services.iter().map(String::as_str));
        if let Some(assignee) = &self.assignee {
            fields.push(assignee);
        }
        fields
    }

    fn priority(&self) -> Option<Priority> {
        Some(self.severity.into())
    }

    fn set_terminal_date(&mut self, at: Option<Timestamp>) {
        self.resolved_date = at;
    }
}

impl Annotated for Incident {
    fn notes(&self) -> &str {
        &self.notes
    }

    fn notes_mut(&mut self) -> &mut String {
        &mut self.notes
    }
}

/// Input of the "Create Incident" dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Wire name of a [`Severity`].
    pub severity: String,
    /// Wire name of the initial [`CaseStatus`]; blank means `open`.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub affected_services: Vec<String>,
    #[serde(default)]
    pub assignee: Option<String>,
}

impl IncidentDraft {
    fn schema() -> Schema {
        Schema::new()
            .field("title", vec![FieldRule::Required, FieldRule::MaxLength(200)])
            .field("description", vec![FieldRule::MaxLength(5000)])
            .field("severity", vec![FieldRule::Required, FieldRule::OneOf(Severity::NAMES)])
            .field("status", vec![FieldRule::OneOf(CaseStatus::NAMES)])
    }
}

impl FieldSource for IncidentDraft {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(&self.title),
            "description" => Some(&self.description),
            "severity" => Some(&self.severity),
            "status" => Some(&self.status),
            "assignee" => self.assignee.as_deref(),
            _ => None,
        }
    }
}

impl Validate for IncidentDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let errors = Self::schema().validate(self);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn parse_field<T: WireEnum>(field: &str, value: &str) -> Result<T, FieldErrors> {
    value.parse::<T>().map_err(|e| {
        let mut errors = FieldErrors::new();
        errors.insert(field, e.to_string());
        errors
    })
}

impl Creatable for Incident {
    type Draft = IncidentDraft;

    const ID_PREFIX: &'static str = "INC";

    fn from_draft(
        draft: IncidentDraft,
        id: RecordId,
        actor: &Actor,
        at: Timestamp,
    ) -> Result<Self, FieldErrors> {
        let severity = parse_field::<Severity>("severity", &draft.severity)?;
        let status = if draft.status.trim().is_empty() {
            CaseStatus::Open
        } else {
            parse_field::<CaseStatus>("status", &draft.status)?
        };
        Ok(Self {
            id,
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            severity,
            status,
            affected_services: draft
                .affected_services
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            assignee: draft
                .assignee
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
            reported_by: actor.as_str().to_string(),
            created_date: at,
            resolved_date: status.is_terminal().then_some(at),
            notes: String::new(),
            timeline: Vec::new(),
        })
    }
}
