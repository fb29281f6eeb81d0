//! # Billing Disputes
//!
//! Chargebacks and billing complaints raised by customers. Amounts are
//! integers in minor currency units; floats never represent money here.

use serde::{Deserialize, Serialize};
use vox_core::{Actor, FieldErrors, FieldRule, FieldSource, RecordId, Schema, Timestamp, Validate};

use crate::record::{Annotated, CaseStatus, Creatable, Priority, Record, WireEnum};
use crate::timeline::TimelineEntry;

/// A billing dispute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispute {
    pub id: RecordId,
    pub customer_name: String,
    pub customer_email: String,
    /// Payment processor transaction reference.
    pub transaction_id: String,
    /// Disputed amount in minor units (cents).
    pub amount_minor: i64,
    /// ISO 4217 code, e.g. `USD`.
    pub currency: String,
    pub reason: String,
    pub status: CaseStatus,
    pub priority: Priority,
    pub created_date: Timestamp,
    #[serde(default)]
    pub resolved_date: Option<Timestamp>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
}

impl Dispute {
    /// Amount formatted for display, e.g. `49.99 USD`.
    pub fn display_amount(&self) -> String {
        let sign = if self.amount_minor < 0 { "-" } else { "" };
        let abs = self.amount_minor.unsigned_abs();
        format!("{sign}{}.{:02} {}", abs / 100, abs % 100, self.currency)
    }
}

impl Record for Dispute {
    type Status = CaseStatus;

    const COLLECTION: &'static str = "disputes";
    const LABEL: &'static str = "Dispute";

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
        vec![
            self.id.as_str(),
            self.customer_name.as_str(),
            self.customer_email.as_str(),
            self.transaction_id.as_str(),
            self.reason.as_str(),
        ]
    }

    fn priority(&self) -> Option<Priority> {
        Some(self.priority)
    }

    fn set_terminal_date(&mut self, at: Option<Timestamp>) {
        self.resolved_date = at;
    }
}

impl Annotated for Dispute {
    fn notes(&self) -> &str {
        &self.notes
    }

    fn notes_mut(&mut self) -> &mut String {
        &mut self.notes
    }
}

/// Input of the "log dispute" form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeDraft {
    pub customer_name: String,
    pub customer_email: String,
    pub transaction_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub reason: String,
    /// Wire name of a [`Priority`]; blank means `medium`.
    #[serde(default)]
    pub priority: String,
}

impl DisputeDraft {
    fn schema() -> Schema {
        Schema::new()
            .field("customerName", vec![FieldRule::Required, FieldRule::MaxLength(120)])
            .field("customerEmail", vec![FieldRule::Required, FieldRule::Email])
            .field("transactionId", vec![FieldRule::Required])
            .field(
                "currency",
                vec![FieldRule::Required, FieldRule::MinLength(3), FieldRule::MaxLength(3)],
            )
            .field("reason", vec![FieldRule::Required, FieldRule::MaxLength(2000)])
            .field("priority", vec![FieldRule::OneOf(Priority::NAMES)])
    }
}

impl FieldSource for DisputeDraft {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "customerName" => Some(&self.customer_name),
            "customerEmail" => Some(&self.customer_email),
            "transactionId" => Some(&self.transaction_id),
            "currency" => Some(&self.currency),
            "reason" => Some(&self.reason),
            "priority" => Some(&self.priority),
            _ => None,
        }
    }
}

impl Validate for DisputeDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = Self::schema().validate(self);
        if self.amount_minor <= 0 {
            errors.insert("amountMinor", "Amount must be greater than zero");
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Creatable for Dispute {
    type Draft = DisputeDraft;

    const ID_PREFIX: &'static str = "DSP";

    fn from_draft(
        draft: DisputeDraft,
        id: RecordId,
        _actor: &Actor,
        at: Timestamp,
    ) -> Result<Self, FieldErrors> {
        let priority = if draft.priority.trim().is_empty() {
            Priority::Medium
        } else {
            draft.priority.parse::<Priority>().map_err(|e| {
                let mut errors = FieldErrors::new();
                errors.insert("priority", e.to_string());
                errors
            })?
        };
        Ok(Self {
            id,
            customer_name: draft.customer_name.trim().to_string(),
            customer_email: draft.customer_email.trim().to_string(),
            transaction_id: draft.transaction_id.trim().to_string(),
            amount_minor: draft.amount_minor,
            currency: draft.currency.trim().to_ascii_uppercase(),
            reason: draft.reason.trim().to_string(),
            status: CaseStatus::Open,
            priority,
            created_date: at,
            resolved_date: None,
            notes: String::new(),
            timeline: Vec::new(),
        })
    }
}
