//! # User Tiers
//!
//! Plan tier assignments per user. Users may request a different tier;
//! a pending request is approved by an admin or the admin changes the tier
//! directly.

use serde::{Deserialize, Serialize};
use vox_core::{Actor, RecordId, Timestamp};

use crate::record::{apply_status, Record, RecordError, RecordStatus, WireEnum};
use crate::timeline::{TimelineEntry, TimelineKind};

wire_enum! {
    /// Plan tier.
    pub enum Tier ("tier") {
        Free => "free",
        Starter => "starter",
        Pro => "pro",
        Enterprise => "enterprise",
    }
}

wire_enum! {
    /// Status of a tier assignment.
    pub enum TierStatus ("tier status") {
        Active => "active",
        Pending => "pending",
        Suspended => "suspended",
    }
}

impl RecordStatus for TierStatus {
    fn is_terminal(&self) -> bool {
        false
    }
}

/// A user's tier assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierAssignment {
    pub id: RecordId,
    pub user_name: String,
    pub user_email: String,
    pub tier: Tier,
    /// Tier the user asked for, awaiting approval.
    #[serde(default)]
    pub requested_tier: Option<Tier>,
    pub status: TierStatus,
    #[serde(default)]
    pub updated_date: Option<Timestamp>,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
}

impl Record for TierAssignment {
    type Status = TierStatus;

    const COLLECTION: &'static str = "tiers";
    const LABEL: &'static str = "Tier assignment";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn status(&self) -> TierStatus {
        self.status
    }

    fn put_status(&mut self, status: TierStatus) {
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
            self.user_name.as_str(),
            self.user_email.as_str(),
            self.tier.as_str(),
        ]
    }
}

/// Move a user to `tier`. Clears a matching pending request.
pub fn change_tier(
    assignment: &mut TierAssignment,
    tier: Tier,
    actor: &Actor,
    at: Timestamp,
) -> Result<(), RecordError> {
    if assignment.tier == tier {
        return Err(RecordError::Unchanged {
            label: TierAssignment::LABEL,
            id: assignment.id.clone(),
            what: format!("tier is already {tier}"),
        });
    }
    assignment.timeline.push(TimelineEntry::new(
        TimelineKind::Update,
        format!("Tier changed to {tier}"),
        format!("{} -> {tier}", assignment.tier),
        actor,
        at,
    ));
    assignment.tier = tier;
    if assignment.requested_tier == Some(tier) {
        assignment.requested_tier = None;
    }
    assignment.updated_date = Some(at);
    Ok(())
}

/// Approve the pending tier request: apply the requested tier and
/// activate the assignment.
pub fn approve_tier_request(
    assignment: &mut TierAssignment,
    actor: &Actor,
    at: Timestamp,
) -> Result<(), RecordError> {
    let Some(requested) = assignment.requested_tier else {
        return Err(RecordError::InvalidAction {
            label: TierAssignment::LABEL,
            id: assignment.id.clone(),
            reason: "no tier request is pending".to_string(),
        });
    };
    if requested != assignment.tier {
        change_tier(assignment, requested, actor, at)?;
    }
    assignment.requested_tier = None;
    if assignment.status != TierStatus::Active {
        apply_status(assignment, TierStatus::Active, actor, Some("tier request approved"), at)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment() -> TierAssignment {
        TierAssignment {
            id: RecordId::new("TIR-3").unwrap(),
            user_name: "Sam Lee".into(),
            user_email: "sam@example.com".into(),
            tier: Tier::Starter,
            requested_tier: Some(Tier::Pro),
            status: TierStatus::Pending,
            updated_date: None,
            timeline: Vec::new(),
        }
    }

    #[test]
    fn change_tier_appends_entry_and_clears_matching_request() {
        let mut a = assignment();
        change_tier(&mut a, Tier::Pro, &Actor::system(), Timestamp::now()).unwrap();
        assert_eq!(a.tier, Tier::Pro);
        assert_eq!(a.requested_tier, None);
        assert_eq!(a.timeline.len(), 1);
        assert_eq!(a.timeline[0].description, "starter -> pro");
        assert!(a.updated_date.is_some());
    }

    #[test]
    fn change_to_same_tier_is_rejected() {
        let mut a = assignment();
        let err = change_tier(&mut a, Tier::Starter, &Actor::system(), Timestamp::now()).unwrap_err();
        assert!(matches!(err, RecordError::Unchanged { .. }));
        assert!(a.timeline.is_empty());
    }

    #[test]
    fn approving_request_applies_tier_and_activates() {
        let mut a = assignment();
        approve_tier_request(&mut a, &Actor::system(), Timestamp::now()).unwrap();
        assert_eq!(a.tier, Tier::Pro);
        assert_eq!(a.status, TierStatus::Active);
        assert_eq!(a.requested_tier, None);
        assert_eq!(a.timeline.len(), 2);
        assert!(a.timeline[1].action.contains("active"));
    }

    #[test]
    fn approving_without_request_fails() {
        let mut a = assignment();
        a.requested_tier = None;
        assert!(approve_tier_request(&mut a, &Actor::system(), Timestamp::now()).is_err());
    }
}
