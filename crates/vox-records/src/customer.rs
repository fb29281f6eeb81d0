//! # Customers
//!
//! Customer records: contact details, lifecycle status and free-text notes.

use serde::{Deserialize, Serialize};
use vox_core::{Actor, FieldErrors, FieldRule, FieldSource, RecordId, Schema, Timestamp, Validate};

use crate::record::{Annotated, Creatable, Record, RecordStatus};
use crate::timeline::TimelineEntry;

wire_enum! {
    /// Customer lifecycle status.
    pub enum CustomerStatus ("customer status") {
        Active => "active",
        Inactive => "inactive",
        Prospect => "prospect",
        Churned => "churned",
    }
}

impl RecordStatus for CustomerStatus {
    fn is_terminal(&self) -> bool {
        matches!(self, Self::Churned)
    }
}

/// A customer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    pub status: CustomerStatus,
    pub created_date: Timestamp,
    #[serde(default)]
    pub churned_date: Option<Timestamp>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
}

impl Record for Customer {
    type Status = CustomerStatus;

    const COLLECTION: &'static str = "customers";
    const LABEL: &'static str = "Customer";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn status(&self) -> CustomerStatus {
        self.status
    }

    fn put_status(&mut self, status: CustomerStatus) {
        self.status = status;
    }

    fn timeline(&self) -> &[TimelineEntry] {
        &self.timeline
    }

    fn timeline_mut(&mut self) -> &mut Vec<TimelineEntry> {
        &mut self.timeline
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.id.as_str(), self.name.as_str(), self.email.as_str()];
        fields.extend(self.company.as_deref());
        fields.extend(self.phone.as_deref());
        fields
    }

    fn set_terminal_date(&mut self, at: Option<Timestamp>) {
        self.churned_date = at;
    }
}

impl Annotated for Customer {
    fn notes(&self) -> &str {
        &self.notes
    }

    fn notes_mut(&mut self) -> &mut String {
        &mut self.notes
    }
}

/// Input of the "Add customer" form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
}

impl CustomerDraft {
    fn schema() -> Schema {
        Schema::new()
            .field("name", vec![FieldRule::Required, FieldRule::MaxLength(120)])
            .field("email", vec![FieldRule::Required, FieldRule::Email])
            .field("company", vec![FieldRule::MaxLength(120)])
            .field("phone", vec![FieldRule::Phone])
    }
}

impl FieldSource for CustomerDraft {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            "company" => self.company.as_deref(),
            "phone" => self.phone.as_deref(),
            "plan" => self.plan.as_deref(),
            _ => None,
        }
    }
}

impl Validate for CustomerDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let errors = Self::schema().validate(self);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Creatable for Customer {
    type Draft = CustomerDraft;

    const ID_PREFIX: &'static str = "CUS";

    fn from_draft(
        draft: CustomerDraft,
        id: RecordId,
        _actor: &Actor,
        at: Timestamp,
    ) -> Result<Self, FieldErrors> {
        Ok(Self {
            id,
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            company: non_blank(draft.company),
            phone: non_blank(draft.phone),
            plan: non_blank(draft.plan),
            status: CustomerStatus::Prospect,
            created_date: at,
            churned_date: None,
            notes: String::new(),
            timeline: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{apply_status, edit_notes, RecordError};
    use crate::timeline::TimelineKind;

    fn customer() -> Customer {
        Customer::from_draft(
            CustomerDraft {
                name: "John Doe".into(),
                email: "john@doe.dev".into(),
                company: Some("Doe Plumbing".into()),
                phone: Some("".into()),
                plan: None,
            },
            RecordId::new("CUS-1").unwrap(),
            &Actor::system(),
            Timestamp::now(),
        )
        .unwrap()
    }

    #[test]
    fn new_customers_start_as_prospects() {
        let c = customer();
        assert_eq!(c.status, CustomerStatus::Prospect);
        assert_eq!(c.phone, None);
        assert_eq!(c.company.as_deref(), Some("Doe Plumbing"));
    }

    #[test]
    fn draft_requires_name_and_valid_email() {
        let errors = CustomerDraft {
            email: "not-an-email".into(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.get("name"), Some("This field is required"));
        assert_eq!(errors.get("email"), Some("Enter a valid email address"));
    }

    #[test]
    fn churn_stamps_churned_date() {
        let mut c = customer();
        let at = Timestamp::now();
        apply_status(&mut c, CustomerStatus::Churned, &Actor::system(), None, at).unwrap();
        assert_eq!(c.churned_date, Some(at));
    }

    #[test]
    fn note_edit_appends_note_entry() {
        let mut c = customer();
        let actor = Actor::new("kim").unwrap();
        edit_notes(&mut c, "  Prefers email contact ", &actor, Timestamp::now()).unwrap();
        assert_eq!(c.notes, "Prefers email contact");
        assert_eq!(c.timeline.len(), 1);
        assert_eq!(c.timeline[0].kind, TimelineKind::Note);

        let err = edit_notes(&mut c, "Prefers email contact", &actor, Timestamp::now()).unwrap_err();
        assert!(matches!(err, RecordError::Unchanged { .. }));
        assert_eq!(c.timeline.len(), 1);
    }

    #[test]
    fn search_fields_skip_missing_optionals() {
        let c = customer();
        assert_eq!(c.search_fields(), vec!["CUS-1", "John Doe", "john@doe.dev", "Doe Plumbing"]);
    }
}
