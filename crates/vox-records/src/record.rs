//! # Record Traits and Transitions
//!
//! The generic shape shared by every feature's records, and the two
//! mutations every feature supports: status transitions and note edits.
//!
//! ## Transition Rule
//!
//! ```text
//! record.status = S_old
//!        │  apply_status(record, S_new, actor, notes, at)
//!        ▼
//! record.status = S_new
//! record.timeline = [..old entries, StatusChange(S_old -> S_new)]
//! record.terminal_date = Some(at)   if S_new.is_terminal()
//!                        None       otherwise
//! ```
//!
//! Any member of the status enum may follow any other; admins routinely
//! reopen closed items. Transitioning to the current status is rejected so
//! that every timeline entry describes a real change.

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use vox_core::{Actor, FieldErrors, RecordId, Timestamp, Validate, ValidationError};

use crate::timeline::{TimelineEntry, TimelineKind};

// ─── Wire Enums ──────────────────────────────────────────────────────

/// A closed enum that travels as a lowercase string.
///
/// Implemented by the `wire_enum!` macro for every status, priority and
/// category enum in this crate.
pub trait WireEnum:
    Copy
    + Eq
    + Hash
    + Debug
    + Display
    + FromStr<Err = ValidationError>
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Human name of the enum, used in error messages (`dispute status`).
    const KIND: &'static str;
    /// Every member, in declaration order.
    const VARIANTS: &'static [Self];
    /// Every member's wire string, in declaration order.
    const NAMES: &'static [&'static str];

    /// The wire string of this member.
    fn as_str(&self) -> &'static str;

    /// Parse a wire string (case-insensitive, surrounding whitespace ignored).
    fn parse_wire(s: &str) -> Result<Self, ValidationError> {
        let needle = s.trim().to_ascii_lowercase();
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.as_str() == needle)
            .ok_or_else(|| ValidationError::unknown_variant(Self::KIND, s, Self::NAMES))
    }
}

/// A record status enum.
pub trait RecordStatus: WireEnum {
    /// Whether reaching this status closes the record's work
    /// (and stamps its terminal date).
    fn is_terminal(&self) -> bool;
}

wire_enum! {
    /// Status of disputes and incidents.
    pub enum CaseStatus ("case status") {
        Open => "open",
        Investigating => "investigating",
        Resolved => "resolved",
        Escalated => "escalated",
        Closed => "closed",
    }
}

impl RecordStatus for CaseStatus {
    fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

wire_enum! {
    /// Work priority used by the priority filter.
    pub enum Priority ("priority") {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
        Critical => "critical",
    }
}

// ─── Record ──────────────────────────────────────────────────────────

/// A domain entity displayed and mutated by an admin feature.
pub trait Record:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The feature's closed status enum.
    type Status: RecordStatus;

    /// REST collection segment, e.g. `disputes`.
    const COLLECTION: &'static str;
    /// Human label used in timeline and notification text, e.g. `Dispute`.
    const LABEL: &'static str;

    fn id(&self) -> &RecordId;
    fn status(&self) -> Self::Status;

    /// Overwrite the status field without any bookkeeping.
    ///
    /// Callers outside this crate should use [`apply_status`].
    fn put_status(&mut self, status: Self::Status);

    fn timeline(&self) -> &[TimelineEntry];
    fn timeline_mut(&mut self) -> &mut Vec<TimelineEntry>;

    /// Text fields matched by the search box.
    fn search_fields(&self) -> Vec<&str>;

    /// Priority used by the priority filter, if the feature has one.
    fn priority(&self) -> Option<Priority> {
        None
    }

    /// Set or clear the date the record reached a terminal status.
    fn set_terminal_date(&mut self, _at: Option<Timestamp>) {}
}

/// Records carrying an editable free-text notes field.
pub trait Annotated: Record {
    fn notes(&self) -> &str;
    fn notes_mut(&mut self) -> &mut String;
}

/// Records the console can create from a client-side draft.
pub trait Creatable: Record {
    /// Create-form input.
    type Draft: Validate + Clone + Debug + Send + Sync;

    /// Prefix of client-generated identifiers, e.g. `INC`.
    const ID_PREFIX: &'static str;

    /// Build the new record. Does not append a timeline entry; callers add
    /// the `created` entry so that the actor is recorded uniformly.
    fn from_draft(
        draft: Self::Draft,
        id: RecordId,
        actor: &Actor,
        at: Timestamp,
    ) -> Result<Self, FieldErrors>;
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by record mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The mutation would not change anything.
    #[error("{label} {id} is unchanged: {what}")]
    Unchanged {
        label: &'static str,
        id: RecordId,
        what: String,
    },

    /// The mutation is not allowed in the record's current state.
    #[error("{label} {id}: {reason}")]
    InvalidAction {
        label: &'static str,
        id: RecordId,
        reason: String,
    },
}

// ─── Mutations ───────────────────────────────────────────────────────

/// Move a record to `to`, appending exactly one status-change timeline entry.
pub fn apply_status<R: Record>(
    record: &mut R,
    to: R::Status,
    actor: &Actor,
    notes: Option<&str>,
    at: Timestamp,
) -> Result<(), RecordError> {
    let from = record.status();
    if from == to {
        return Err(RecordError::Unchanged {
            label: R::LABEL,
            id: record.id().clone(),
            what: format!("status is already {to}"),
        });
    }
    record
        .timeline_mut()
        .push(TimelineEntry::status_change(from.as_str(), to.as_str(), notes, actor, at));
    record.put_status(to);
    record.set_terminal_date(to.is_terminal().then_some(at));
    Ok(())
}

/// Replace a record's notes, appending a note timeline entry.
pub fn edit_notes<R: Annotated>(
    record: &mut R,
    notes: &str,
    actor: &Actor,
    at: Timestamp,
) -> Result<(), RecordError> {
    let notes = notes.trim();
    if record.notes() == notes {
        return Err(RecordError::Unchanged {
            label: R::LABEL,
            id: record.id().clone(),
            what: "notes are identical".to_string(),
        });
    }
    let description = if notes.is_empty() {
        "Notes cleared".to_string()
    } else {
        notes.to_string()
    };
    *record.notes_mut() = notes.to_string();
    record.timeline_mut().push(TimelineEntry::new(
        TimelineKind::Note,
        "Notes updated",
        description,
        actor,
        at,
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for status in CaseStatus::VARIANTS {
            assert_eq!(status.as_str().parse::<CaseStatus>().unwrap(), *status);
        }
        assert_eq!(CaseStatus::NAMES.len(), CaseStatus::VARIANTS.len());
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(" Escalated ".parse::<CaseStatus>().unwrap(), CaseStatus::Escalated);
        assert_eq!("URGENT".parse::<Priority>().unwrap(), Priority::Urgent);
    }

    #[test]
    fn parse_unknown_lists_choices() {
        let err = "pending".parse::<CaseStatus>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("case status"));
        assert!(msg.contains("open, investigating, resolved, escalated, closed"));
    }

    #[test]
    fn serde_uses_wire_strings() {
        assert_eq!(serde_json::to_value(CaseStatus::Investigating).unwrap(), "investigating");
        let p: Priority = serde_json::from_value(serde_json::json!("high")).unwrap();
        assert_eq!(p, Priority::High);
    }

    #[test]
    fn terminal_case_statuses() {
        assert!(CaseStatus::Resolved.is_terminal());
        assert!(CaseStatus::Closed.is_terminal());
        assert!(!CaseStatus::Escalated.is_terminal());
        assert!(!CaseStatus::Open.is_terminal());
    }
}
