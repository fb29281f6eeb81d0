//! # System Health
//!
//! Read-only status of the platform services shown on the health panel.
//! The overall status is the worst component status.

use serde::{Deserialize, Serialize};
use vox_core::Timestamp;

wire_enum! {
    /// Status of one service.
    pub enum ServiceStatus ("service status") {
        Operational => "operational",
        Degraded => "degraded",
        Down => "down",
    }
}

impl ServiceStatus {
    fn rank(self) -> u8 {
        match self {
            Self::Operational => 0,
            Self::Degraded => 1,
            Self::Down => 2,
        }
    }
}

/// Health of one platform service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealth {
    pub name: String,
    pub status: ServiceStatus,
    #[serde(default)]
    pub latency_ms: Option<u64>,
    /// Display-only percentage, e.g. `99.95`.
    #[serde(default)]
    pub uptime_percent: Option<f64>,
}

/// Snapshot of every service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemHealth {
    #[serde(default)]
    pub services: Vec<ServiceHealth>,
    pub checked_at: Timestamp,
}

impl SystemHealth {
    /// Worst status across services; `operational` when there are none.
    pub fn overall(&self) -> ServiceStatus {
        self.services
            .iter()
            .map(|s| s.status)
            .max_by_key(|s| s.rank())
            .unwrap_or(ServiceStatus::Operational)
    }

    /// Services that are not fully operational.
    pub fn impaired(&self) -> impl Iterator<Item = &ServiceHealth> {
        self.services
            .iter()
            .filter(|s| s.status != ServiceStatus::Operational)
    }
}
