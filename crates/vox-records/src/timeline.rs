//! # Timeline Entries
//!
//! The audit log attached to a record. Entries are appended in
//! chronological order and never edited afterwards.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vox_core::{Actor, Timestamp};

/// Category of a timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineKind {
    /// The record was created.
    Created,
    /// The record's status changed.
    StatusChange,
    /// Free-text notes were edited.
    Note,
    /// Any other field edit (trial window, tier, assignment).
    Update,
}

/// One immutable audit-log item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub id: Uuid,
    pub timestamp: Timestamp,
    /// Short headline, e.g. `Status changed to resolved`.
    pub action: String,
    /// Longer detail, e.g. `open -> resolved: refund issued`.
    pub description: String,
    /// Actor name.
    pub user: String,
    #[serde(rename = "type")]
    pub kind: TimelineKind,
}

impl TimelineEntry {
    /// Build an entry stamped with a fresh id.
    pub fn new(
        kind: TimelineKind,
        action: impl Into<String>,
        description: impl Into<String>,
        actor: &Actor,
        at: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: at,
            action: action.into(),
            description: description.into(),
            user: actor.as_str().to_string(),
            kind,
        }
    }

    /// Entry recording an `old -> new` status transition.
    ///
    /// The action always contains the literal new status string.
    pub fn status_change(
        from: &str,
        to: &str,
        notes: Option<&str>,
        actor: &Actor,
        at: Timestamp,
    ) -> Self {
        let description = match notes.map(str::trim).filter(|n| !n.is_empty()) {
            Some(notes) => format!("{from} -> {to}: {notes}"),
            None => format!("{from} -> {to}"),
        };
        Self::new(
            TimelineKind::StatusChange,
            format!("Status changed to {to}"),
            description,
            actor,
            at,
        )
    }

    /// Entry recording record creation.
    pub fn created(kind: &str, actor: &Actor, at: Timestamp) -> Self {
        Self::new(
            TimelineKind::Created,
            format!("{kind} created"),
            format!("Created by {actor}"),
            actor,
            at,
        )
    }
}
