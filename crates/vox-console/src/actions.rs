//! Feature-specific optimistic actions built on
//! [`RecordController::mutate`].

use vox_client::RecordApi;
use vox_core::RecordId;
use vox_records::{approve_tier_request, change_tier, extend_trial, Tier, TierAssignment, Trial};

use crate::controller::RecordController;
use crate::error::ConsoleError;

impl<A: RecordApi<Trial>> RecordController<Trial, A> {
    /// Extend a trial by `days`, marking it `extended`.
    pub async fn extend_trial(
        &self,
        id: &RecordId,
        days: u32,
        reason: Option<&str>,
    ) -> Result<Trial, ConsoleError> {
        self.mutate(id, &format!("Trial extended by {days} days"), |trial, actor, at| {
            extend_trial(trial, days, reason, actor, at)
        })
        .await
    }
}

impl<A: RecordApi<TierAssignment>> RecordController<TierAssignment, A> {
    /// Move a user to another tier.
    pub async fn change_tier(&self, id: &RecordId, tier: Tier) -> Result<TierAssignment, ConsoleError> {
        self.mutate(id, &format!("Tier changed to {tier}"), |assignment, actor, at| {
            change_tier(assignment, tier, actor, at)
        })
        .await
    }

    /// Grant the user's pending tier request.
    pub async fn approve_tier_request(&self, id: &RecordId) -> Result<TierAssignment, ConsoleError> {
        self.mutate(id, "Tier request approved", approve_tier_request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use vox_client::ApiError;
    use vox_core::Actor;
    use vox_records::{RecordError, TierStatus, TrialStatus};

    /// Accepts or rejects every update.
    struct Switch(AtomicBool);

    impl<R: vox_records::Record> RecordApi<R> for Switch {
        async fn list(&self) -> Result<Vec<R>, ApiError> {
            Ok(Vec::new())
        }

        async fn update(&self, _record: &R) -> Result<(), ApiError> {
            if self.0.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(ApiError::Unauthorized {
                    endpoint: "PUT".into(),
                    message: "expired".into(),
                })
            }
        }

        async fn create(&self, _record: &R) -> Result<(), ApiError> {
            Ok(())
        }
    }

    fn trial() -> Trial {
        serde_json::from_value(serde_json::json!({
            "id": "TRL-1",
            "customerName": "Acme Dental",
            "customerEmail": "it@acmedental.com",
            "plan": "pro",
            "startDate": "2026-01-01T00:00:00Z",
            "endDate": "2099-01-15T00:00:00Z",
            "status": "active"
        }))
        .unwrap()
    }

    fn assignment() -> TierAssignment {
        serde_json::from_value(serde_json::json!({
            "id": "TIR-1",
            "userName": "Sam Lee",
            "userEmail": "sam@example.com",
            "tier": "starter",
            "requestedTier": "enterprise",
            "status": "pending"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn extend_trial_updates_window_and_status() {
        let ctl = RecordController::new(Switch(AtomicBool::new(true)), Actor::system());
        ctl.seed(vec![trial()]).unwrap();
        let id = RecordId::new("TRL-1").unwrap();

        let extended = ctl.extend_trial(&id, 14, Some("onboarding delayed")).await.unwrap();
        assert_eq!(extended.status, TrialStatus::Extended);
        assert_eq!(extended.extension_count, 1);
        assert_eq!(extended.end_date, trial().end_date.plus_days(14));
        assert_eq!(ctl.take_notices()[0].title, "Trial extended by 14 days");
    }

    #[tokio::test]
    async fn rejected_extension_rolls_back() {
        let ctl = RecordController::new(Switch(AtomicBool::new(false)), Actor::system());
        ctl.seed(vec![trial()]).unwrap();
        let id = RecordId::new("TRL-1").unwrap();

        assert!(ctl.extend_trial(&id, 7, None).await.is_err());
        assert_eq!(ctl.get(&id).unwrap(), trial());
        assert_eq!(ctl.take_notices()[0].title, "Session expired");
    }

    #[tokio::test]
    async fn invalid_extension_sends_nothing() {
        let ctl = RecordController::new(Switch(AtomicBool::new(true)), Actor::system());
        ctl.seed(vec![trial()]).unwrap();
        let id = RecordId::new("TRL-1").unwrap();

        let err = ctl.extend_trial(&id, 0, None).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Record(RecordError::InvalidAction { .. })));
        assert!(ctl.take_notices().is_empty());
    }

    #[tokio::test]
    async fn tier_change_and_approval() {
        let ctl = RecordController::new(Switch(AtomicBool::new(true)), Actor::system());
        ctl.seed(vec![assignment()]).unwrap();
        let id = RecordId::new("TIR-1").unwrap();

        let approved = ctl.approve_tier_request(&id).await.unwrap();
        assert_eq!(approved.tier, Tier::Enterprise);
        assert_eq!(approved.status, TierStatus::Active);

        let changed = ctl.change_tier(&id, Tier::Pro).await.unwrap();
        assert_eq!(changed.tier, Tier::Pro);
        assert_eq!(changed.timeline.len(), 3);
    }
}
