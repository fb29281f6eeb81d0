//! In-memory storage backend.
//!
//! Each record collection is a `Vec` of raw JSON records in display order
//! (newest first), keyed by collection name in a `DashMap`. Records are
//! checked against their typed shape on write, so the stub never serves
//! something the client cannot decode.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use vox_client::ProfileSettings;
use vox_records::{
    ComplianceRequest, Customer, Dispute, Incident, Record, ServiceHealth, TierAssignment, Trial,
};

use crate::seed;

/// Every collection the stub serves.
pub const COLLECTIONS: [&str; 6] = [
    Dispute::COLLECTION,
    Incident::COLLECTION,
    Trial::COLLECTION,
    TierAssignment::COLLECTION,
    Customer::COLLECTION,
    ComplianceRequest::COLLECTION,
];

/// Why a write was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    UnknownCollection,
    NotFound,
    Duplicate,
    Malformed(String),
}

struct Inner {
    collections: DashMap<&'static str, Vec<Value>>,
    services: RwLock<Vec<ServiceHealth>>,
    profile: RwLock<ProfileSettings>,
    /// Emails belonging to other admins.
    taken_emails: Vec<String>,
    token: Option<String>,
}

/// Shared application state. Clones share the same data.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl AppState {
    /// Empty collections and a blank profile.
    pub fn new(token: Option<String>) -> Self {
        let collections = DashMap::new();
        for name in COLLECTIONS {
            collections.insert(name, Vec::new());
        }
        Self {
            inner: Arc::new(Inner {
                collections,
                services: RwLock::new(Vec::new()),
                profile: RwLock::new(ProfileSettings::default()),
                taken_emails: Vec::new(),
                token,
            }),
        }
    }

    /// Collections, services and profile filled with mock data.
    pub fn seeded(token: Option<String>) -> Self {
        let collections = DashMap::new();
        for (name, records) in seed::records(chrono::Utc::now()) {
            collections.insert(name, records);
        }
        Self {
            inner: Arc::new(Inner {
                collections,
                services: RwLock::new(seed::services()),
                profile: RwLock::new(seed::profile()),
                taken_emails: seed::TAKEN_EMAILS.iter().map(|e| e.to_string()).collect(),
                token,
            }),
        }
    }

    /// Whether `presented` is an acceptable bearer token.
    pub fn accepts(&self, presented: &str) -> bool {
        match &self.inner.token {
            Some(token) => token == presented,
            None => !presented.is_empty(),
        }
    }

    fn resolve(name: &str) -> Option<&'static str> {
        COLLECTIONS.iter().copied().find(|c| *c == name)
    }

    pub fn list(&self, collection: &str) -> Option<Vec<Value>> {
        let name = Self::resolve(collection)?;
        self.inner.collections.get(name).map(|records| records.value().clone())
    }

    pub fn get(&self, collection: &str, id: &str) -> Option<Value> {
        let name = Self::resolve(collection)?;
        let records = self.inner.collections.get(name)?;
        let found = records.iter().find(|r| record_id(r) == Some(id)).cloned();
        found
    }

    /// Prepend a new record.
    pub fn insert(&self, collection: &str, record: Value) -> Result<(), WriteError> {
        let name = Self::resolve(collection).ok_or(WriteError::UnknownCollection)?;
        check_shape(name, &record)?;
        let id = record_id(&record).map(str::to_string);
        let mut records = self
            .inner
            .collections
            .get_mut(name)
            .ok_or(WriteError::UnknownCollection)?;
        if records.iter().any(|r| record_id(r).map(str::to_string) == id) {
            return Err(WriteError::Duplicate);
        }
        records.insert(0, record);
        Ok(())
    }

    /// Replace the record with id `id`, keeping its position.
    pub fn replace(&self, collection: &str, id: &str, record: Value) -> Result<(), WriteError> {
        let name = Self::resolve(collection).ok_or(WriteError::UnknownCollection)?;
        if record_id(&record) != Some(id) {
            return Err(WriteError::Malformed("id does not match the URL".to_string()));
        }
        check_shape(name, &record)?;
        let mut records = self
            .inner
            .collections
            .get_mut(name)
            .ok_or(WriteError::UnknownCollection)?;
        let slot = records
            .iter_mut()
            .find(|r| record_id(r) == Some(id))
            .ok_or(WriteError::NotFound)?;
        *slot = record;
        Ok(())
    }

    pub fn services(&self) -> Vec<ServiceHealth> {
        self.inner.services.read().clone()
    }

    pub fn profile(&self) -> ProfileSettings {
        self.inner.profile.read().clone()
    }

    pub fn save_profile(&self, profile: ProfileSettings) {
        *self.inner.profile.write() = profile;
    }

    pub fn email_taken(&self, email: &str) -> bool {
        self.inner
            .taken_emails
            .iter()
            .any(|taken| taken.eq_ignore_ascii_case(email.trim()))
    }
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

fn conforms<R: DeserializeOwned>(record: &Value) -> Result<(), WriteError> {
    serde_json::from_value::<R>(record.clone())
        .map(drop)
        .map_err(|e| WriteError::Malformed(e.to_string()))
}

fn check_shape(collection: &str, record: &Value) -> Result<(), WriteError> {
    if collection == Dispute::COLLECTION {
        conforms::<Dispute>(record)
    } else if collection == Incident::COLLECTION {
        conforms::<Incident>(record)
    } else if collection == Trial::COLLECTION {
        conforms::<Trial>(record)
    } else if collection == TierAssignment::COLLECTION {
        conforms::<TierAssignment>(record)
    } else if collection == Customer::COLLECTION {
        conforms::<Customer>(record)
    } else if collection == ComplianceRequest::COLLECTION {
        conforms::<ComplianceRequest>(record)
    } else {
        Err(WriteError::UnknownCollection)
    }
}
