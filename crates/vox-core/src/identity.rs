//! # Identity Newtypes
//!
//! [`RecordId`] identifies a record within its feature collection and
//! [`Actor`] names the admin user performing an action.
//!
//! Record identifiers arrive from the backend in whatever form it chose
//! (numeric strings, prefixed strings), so they are opaque non-empty
//! strings. Records created in the console get a client-generated,
//! timestamp-based identifier from [`RecordId::generate`].

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::temporal::Timestamp;

/// Process-wide sequence that disambiguates ids generated in the same millisecond.
static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Identifier of a record within one feature collection.
///
/// Immutable after creation. Unique within its collection (enforced by the
/// console's record controller, not by this type).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Create a record identifier from an existing string.
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let s = s.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyRecordId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Generate a client-side identifier of the form `<prefix>-<unix millis>-<seq>`.
    pub fn generate(prefix: &str, at: Timestamp) -> Self {
        let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("{prefix}-{}-{seq}", at.unix_millis()))
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RecordId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl PartialEq<&str> for RecordId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The admin user on whose behalf an action is performed.
///
/// Recorded as the `user` of every timeline entry the console appends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Actor(String);

impl Actor {
    /// Create an actor from a display name or login.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyActor);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The actor used for entries produced by automation rather than a person.
    pub fn system() -> Self {
        Self("system".to_string())
    }

    /// Access the actor name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Actor {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Actor> for String {
    fn from(actor: Actor) -> Self {
        actor.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_rejects_blank() {
        assert_eq!(RecordId::new("   ").unwrap_err(), ValidationError::EmptyRecordId);
    }

    #[test]
    fn record_id_trims_input() {
        let id = RecordId::new("  DSP-001 ").unwrap();
        assert_eq!(id, "DSP-001");
    }

    #[test]
    fn generated_ids_carry_prefix_and_millis() {
        let at = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let id = RecordId::generate("INC", at);
        assert!(id.as_str().starts_with(&format!("INC-{}-", at.unix_millis())));
    }

    #[test]
    fn generated_ids_are_unique_within_a_millisecond() {
        let at = Timestamp::now();
        let a = RecordId::generate("INC", at);
        let b = RecordId::generate("INC", at);
        assert_ne!(a, b);
    }

    #[test]
    fn record_id_deserialization_validates() {
        let ok: RecordId = serde_json::from_str("\"CUS-7\"").unwrap();
        assert_eq!(ok, "CUS-7");
        assert!(serde_json::from_str::<RecordId>("\"\"").is_err());
    }

    #[test]
    fn actor_rejects_blank() {
        assert_eq!(Actor::new("").unwrap_err(), ValidationError::EmptyActor);
        assert_eq!(Actor::system().as_str(), "system");
    }
}
