//! # vox-console -- Admin console state
//!
//! Local state for every admin feature, kept in step with the backend by
//! optimistic updates:
//!
//! 1. Hold the feature's records in memory ([`RecordController`]).
//! 2. Derive the displayed subset from search/status/priority filters.
//! 3. Apply a user action locally at once, then call the backend.
//! 4. On failure, restore the pre-action snapshot and push an error
//!    [`Notice`].
//!
//! The profile settings form ([`ProfileForm`]) merges client-side
//! validation with the backend's `VALIDATION_ERROR` details.
//!
//! [`Console`] wires one controller per feature to an [`ApiClient`].

pub mod actions;
pub mod controller;
pub mod error;
pub mod form;
pub mod notice;

pub use controller::RecordController;
pub use error::ConsoleError;
pub use form::{profile_schema, ProfileForm};
pub use notice::{Notice, NoticeLevel};

use vox_client::{ApiClient, HealthClient, RecordClient, SettingsApi, SettingsClient};
use vox_core::Actor;
use vox_records::{ComplianceRequest, Customer, Dispute, Incident, SystemHealth, TierAssignment, Trial};

/// A controller talking to the backend over HTTP.
pub type HttpController<R> = RecordController<R, RecordClient<R>>;

/// Every admin feature of the console, sharing one backend client and
/// acting user.
#[derive(Debug)]
pub struct Console {
    disputes: HttpController<Dispute>,
    incidents: HttpController<Incident>,
    trials: HttpController<Trial>,
    tiers: HttpController<TierAssignment>,
    customers: HttpController<Customer>,
    compliance: HttpController<ComplianceRequest>,
    health: HealthClient,
    settings: SettingsClient,
}

impl Console {
    pub fn new(client: &ApiClient, actor: Actor) -> Self {
        Self {
            disputes: RecordController::new(client.records(), actor.clone()),
            incidents: RecordController::new(client.records(), actor.clone()),
            trials: RecordController::new(client.records(), actor.clone()),
            tiers: RecordController::new(client.records(), actor.clone()),
            customers: RecordController::new(client.records(), actor.clone()),
            compliance: RecordController::new(client.records(), actor),
            health: client.health(),
            settings: client.settings(),
        }
    }

    pub fn disputes(&self) -> &HttpController<Dispute> {
        &self.disputes
    }

    pub fn incidents(&self) -> &HttpController<Incident> {
        &self.incidents
    }

    pub fn trials(&self) -> &HttpController<Trial> {
        &self.trials
    }

    pub fn tiers(&self) -> &HttpController<TierAssignment> {
        &self.tiers
    }

    pub fn customers(&self) -> &HttpController<Customer> {
        &self.customers
    }

    pub fn compliance(&self) -> &HttpController<ComplianceRequest> {
        &self.compliance
    }

    /// Load every feature concurrently. Returns each collection's outcome.
    pub async fn load_all(&self) -> Vec<(&'static str, Result<usize, ConsoleError>)> {
        let (disputes, incidents, trials, tiers, customers, compliance) = tokio::join!(
            self.disputes.load(),
            self.incidents.load(),
            self.trials.load(),
            self.tiers.load(),
            self.customers.load(),
            self.compliance.load(),
        );
        vec![
            ("disputes", disputes),
            ("incidents", incidents),
            ("trials", trials),
            ("tiers", tiers),
            ("customers", customers),
            ("compliance-requests", compliance),
        ]
    }

    /// Current platform health.
    pub async fn system_health(&self) -> Result<SystemHealth, ConsoleError> {
        Ok(self.health.check().await?)
    }

    /// A read-only profile form loaded from the backend.
    pub async fn profile_form(&self) -> Result<ProfileForm, ConsoleError> {
        Ok(ProfileForm::new(self.settings.fetch_profile().await?))
    }

    pub fn settings(&self) -> &SettingsClient {
        &self.settings
    }

    /// Drain notices from every feature.
    pub fn take_notices(&self) -> Vec<Notice> {
        let mut notices = self.disputes.take_notices();
        notices.extend(self.incidents.take_notices());
        notices.extend(self.trials.take_notices());
        notices.extend(self.tiers.take_notices());
        notices.extend(self.customers.take_notices());
        notices.extend(self.compliance.take_notices());
        notices
    }

    /// Unmount every feature.
    pub fn unmount(&self) {
        self.disputes.unmount();
        self.incidents.unmount();
        self.trials.unmount();
        self.tiers.unmount();
        self.customers.unmount();
        self.compliance.unmount();
    }
}
