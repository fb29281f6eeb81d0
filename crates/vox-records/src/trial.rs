//! # Trial Extensions
//!
//! Free-trial windows. Admins extend trials on request; a trial ends by
//! converting to a paid plan or expiring.
//!
//! ```text
//! active ──extend──▶ extended ──extend──▶ extended
//!   │                   │
//!   ├──▶ converted ◀────┤
//!   └──▶ expired ◀──────┘   (expired ──extend──▶ extended)
//! ```

use serde::{Deserialize, Serialize};
use vox_core::{Actor, RecordId, Timestamp};

use crate::record::{apply_status, Annotated, Record, RecordError, RecordStatus};
use crate::timeline::{TimelineEntry, TimelineKind};

/// Longest single extension an admin may grant.
pub const MAX_EXTENSION_DAYS: u32 = 90;

wire_enum! {
    /// Trial status.
    pub enum TrialStatus ("trial status") {
        Active => "active",
        Expired => "expired",
        Extended => "extended",
        Converted => "converted",
    }
}

impl RecordStatus for TrialStatus {
    fn is_terminal(&self) -> bool {
        matches!(self, Self::Converted | Self::Expired)
    }
}

/// A customer's trial window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trial {
    pub id: RecordId,
    pub customer_name: String,
    pub customer_email: String,
    pub plan: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub status: TrialStatus,
    #[serde(default)]
    pub extension_count: u32,
    /// Set only while the trial is converted. Expiry leaves it empty.
    #[serde(default)]
    pub converted_date: Option<Timestamp>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
}

impl Trial {
    /// Whole days left in the window at `now` (zero once past the end).
    pub fn days_remaining(&self, now: Timestamp) -> i64 {
        let secs = (*self.end_date.as_datetime() - *now.as_datetime()).num_seconds();
        if secs <= 0 {
            0
        } else {
            (secs + 86_399) / 86_400
        }
    }
}

impl Record for Trial {
    type Status = TrialStatus;

    const COLLECTION: &'static str = "trials";
    const LABEL: &'static str = "Trial";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn status(&self) -> TrialStatus {
        self.status
    }

    fn put_status(&mut self, status: TrialStatus) {
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
            self.plan.as_str(),
        ]
    }

    fn set_terminal_date(&mut self, at: Option<Timestamp>) {
        self.converted_date = at.filter(|_| self.status == TrialStatus::Converted);
    }
}

impl Annotated for Trial {
    fn notes(&self) -> &str {
        &self.notes
    }

    fn notes_mut(&mut self) -> &mut String {
        &mut self.notes
    }
}

/// Extend a trial by `days`.
///
/// The new end date counts from the later of the current end date and `at`,
/// so extending an already-lapsed trial gives the customer the full period.
/// Converted trials cannot be extended.
pub fn extend_trial(
    trial: &mut Trial,
    days: u32,
    reason: Option<&str>,
    actor: &Actor,
    at: Timestamp,
) -> Result<(), RecordError> {
    if days == 0 || days > MAX_EXTENSION_DAYS {
        return Err(RecordError::InvalidAction {
            label: Trial::LABEL,
            id: trial.id.clone(),
            reason: format!("extension must be between 1 and {MAX_EXTENSION_DAYS} days, got {days}"),
        });
    }
    if trial.status == TrialStatus::Converted {
        return Err(RecordError::InvalidAction {
            label: Trial::LABEL,
            id: trial.id.clone(),
            reason: "converted trials cannot be extended".to_string(),
        });
    }

    if trial.status != TrialStatus::Extended {
        apply_status(trial, TrialStatus::Extended, actor, reason, at)?;
    }

    let base = trial.end_date.max(at);
    let new_end = base.plus_days(days);
    trial.timeline.push(TimelineEntry::new(
        TimelineKind::Update,
        format!("Trial extended by {days} days"),
        format!("end date {} -> {}", trial.end_date, new_end),
        actor,
        at,
    ));
    trial.end_date = new_end;
    trial.extension_count += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn trial(status: TrialStatus) -> Trial {
        Trial {
            id: RecordId::new("TRL-9").unwrap(),
            customer_name: "Acme Dental".into(),
            customer_email: "it@acmedental.com".into(),
            plan: "pro".into(),
            start_date: ts("2026-01-01T00:00:00Z"),
            end_date: ts("2026-01-15T00:00:00Z"),
            status,
            extension_count: 0,
            converted_date: None,
            notes: String::new(),
            timeline: Vec::new(),
        }
    }

    #[test]
    fn extending_active_trial_moves_end_date_and_status() {
        let mut t = trial(TrialStatus::Active);
        let at = ts("2026-01-10T00:00:00Z");
        extend_trial(&mut t, 7, Some("sales request"), &Actor::system(), at).unwrap();
        assert_eq!(t.status, TrialStatus::Extended);
        assert_eq!(t.end_date, ts("2026-01-22T00:00:00Z"));
        assert_eq!(t.extension_count, 1);
        assert_eq!(t.timeline.len(), 2);
        assert_eq!(t.timeline[0].kind, TimelineKind::StatusChange);
        assert_eq!(t.timeline[1].action, "Trial extended by 7 days");
    }

    #[test]
    fn extending_again_does_not_duplicate_status_entry() {
        let mut t = trial(TrialStatus::Extended);
        extend_trial(&mut t, 3, None, &Actor::system(), ts("2026-01-10T00:00:00Z")).unwrap();
        assert_eq!(t.timeline.len(), 1);
        assert_eq!(t.timeline[0].kind, TimelineKind::Update);
    }

    #[test]
    fn extending_lapsed_trial_counts_from_now() {
        let mut t = trial(TrialStatus::Expired);
        t.converted_date = Some(ts("2026-01-15T00:00:00Z"));
        let at = ts("2026-02-01T00:00:00Z");
        extend_trial(&mut t, 14, None, &Actor::system(), at).unwrap();
        assert_eq!(t.end_date, ts("2026-02-15T00:00:00Z"));
        assert_eq!(t.converted_date, None);
    }

    #[test]
    fn only_conversion_stamps_converted_date() {
        let at = ts("2026-01-15T00:00:00Z");

        let mut expired = trial(TrialStatus::Active);
        apply_status(&mut expired, TrialStatus::Expired, &Actor::system(), None, at).unwrap();
        assert_eq!(expired.status, TrialStatus::Expired);
        assert_eq!(expired.converted_date, None);

        let mut converted = trial(TrialStatus::Extended);
        apply_status(&mut converted, TrialStatus::Converted, &Actor::system(), None, at).unwrap();
        assert_eq!(converted.converted_date, Some(at));

        apply_status(&mut converted, TrialStatus::Expired, &Actor::system(), None, at).unwrap();
        assert_eq!(converted.converted_date, None);
    }

    #[test]
    fn converted_trials_cannot_be_extended() {
        let mut t = trial(TrialStatus::Converted);
        let before = t.clone();
        let err = extend_trial(&mut t, 7, None, &Actor::system(), Timestamp::now()).unwrap_err();
        assert!(matches!(err, RecordError::InvalidAction { .. }));
        assert_eq!(t, before);
    }

    #[test]
    fn extension_length_is_bounded() {
        let mut t = trial(TrialStatus::Active);
        assert!(extend_trial(&mut t, 0, None, &Actor::system(), Timestamp::now()).is_err());
        assert!(extend_trial(&mut t, MAX_EXTENSION_DAYS + 1, None, &Actor::system(), Timestamp::now()).is_err());
        assert_eq!(t.status, TrialStatus::Active);
    }

    #[test]
    fn days_remaining_rounds_up_and_floors_at_zero() {
        let t = trial(TrialStatus::Active);
        assert_eq!(t.days_remaining(ts("2026-01-14T12:00:00Z")), 1);
        assert_eq!(t.days_remaining(ts("2026-01-05T00:00:00Z")), 10);
        assert_eq!(t.days_remaining(ts("2026-02-01T00:00:00Z")), 0);
    }
}
