//! # Optimistic Record Controller
//!
//! Local state for one feature list, mutated optimistically:
//!
//! ```text
//! mutate(id)
//!   ├─ acquire per-id lock (second mutation of the same id waits)
//!   ├─ snapshot = records[id]
//!   ├─ records[id] = f(snapshot.clone())      <- visible immediately
//!   ├─ api.update(records[id]).await
//!   ├─ Ok  -> keep, success notice
//!   └─ Err -> records[id] = snapshot, error notice
//! ```
//!
//! The detail view stores only the selected id and reads through to the
//! list, so list and detail can never disagree.
//!
//! All methods take `&self`; the controller is shared across tasks via
//! `Arc`. The state lock is `parking_lot` and never held across `.await`.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::OwnedMutexGuard;
use vox_client::RecordApi;
use vox_core::{Actor, RecordId, Timestamp, Validate};
use vox_records::{
    apply_status, edit_notes, filter, Annotated, Creatable, Record, RecordError, RecordFilter,
    TimelineEntry,
};

use crate::error::ConsoleError;
use crate::notice::Notice;

#[derive(Debug)]
struct ListState<R> {
    records: Vec<R>,
    selected: Option<RecordId>,
}

/// One async lock per record id. Entries live only while a mutation of
/// that id holds or awaits the lock.
#[derive(Debug, Default)]
struct IdLocks {
    locks: Mutex<HashMap<RecordId, Arc<tokio::sync::Mutex<()>>>>,
}

impl IdLocks {
    async fn acquire(&self, id: &RecordId) -> IdGuard<'_> {
        let lock = self.locks.lock().entry(id.clone()).or_default().clone();
        IdGuard {
            locks: self,
            id: id.clone(),
            guard: Some(lock.lock_owned().await),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().len()
    }
}

struct IdGuard<'a> {
    locks: &'a IdLocks,
    id: RecordId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for IdGuard<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.locks.lock();
        if let Some(guard) = self.guard.take() {
            let lock = Arc::clone(OwnedMutexGuard::mutex(&guard));
            drop(guard);
            // The map and `lock` are the only owners: nobody is waiting.
            if Arc::strong_count(&lock) == 2 {
                locks.remove(&self.id);
            }
        }
    }
}

/// Optimistic local-state controller for the collection of `R`.
#[derive(Debug)]
pub struct RecordController<R: Record, A> {
    api: A,
    actor: Actor,
    state: RwLock<ListState<R>>,
    id_locks: IdLocks,
    notices: Mutex<Vec<Notice>>,
    mounted: AtomicBool,
}

impl<R: Record, A: RecordApi<R>> RecordController<R, A> {
    /// An empty, mounted controller acting as `actor`.
    pub fn new(api: A, actor: Actor) -> Self {
        Self {
            api,
            actor,
            state: RwLock::new(ListState {
                records: Vec::new(),
                selected: None,
            }),
            id_locks: IdLocks::default(),
            notices: Mutex::new(Vec::new()),
            mounted: AtomicBool::new(true),
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Freeze local state. Requests already in flight complete but their
    /// results are not applied; new mutations are refused.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        tracing::debug!(collection = R::COLLECTION, "controller unmounted");
    }

    fn ensure_mounted(&self) -> Result<(), ConsoleError> {
        if self.is_mounted() {
            Ok(())
        } else {
            Err(ConsoleError::Unmounted { label: R::LABEL })
        }
    }

    /// Fetch the collection and replace local state.
    ///
    /// On failure the previous state is kept and an error notice is pushed.
    pub async fn load(&self) -> Result<usize, ConsoleError> {
        self.ensure_mounted()?;
        let result = self.api.list().await;
        if !self.is_mounted() {
            return result.map(|r| r.len()).map_err(ConsoleError::from);
        }
        match result {
            Ok(records) => {
                let count = records.len();
                self.replace_all(records);
                tracing::info!(collection = R::COLLECTION, count, "records loaded");
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(collection = R::COLLECTION, error = %e, "failed to load records");
                self.notify(Notice::api_failure(
                    &format!("Could not load {}", R::COLLECTION),
                    &e,
                ));
                Err(e.into())
            }
        }
    }

    /// Install seed data, replacing local state. Rejects duplicate ids.
    pub fn seed(&self, records: Vec<R>) -> Result<(), ConsoleError> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.id().clone()) {
                return Err(ConsoleError::DuplicateId {
                    label: R::LABEL,
                    id: record.id().clone(),
                });
            }
        }
        self.replace_all(records);
        Ok(())
    }

    fn replace_all(&self, records: Vec<R>) {
        let mut state = self.state.write();
        let still_listed = state
            .selected
            .as_ref()
            .map_or(true, |selected| records.iter().any(|r| r.id() == selected));
        if !still_listed {
            state.selected = None;
        }
        state.records = records;
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Every record, in list order.
    pub fn records(&self) -> Vec<R> {
        self.state.read().records.clone()
    }

    pub fn get(&self, id: &RecordId) -> Option<R> {
        self.state.read().records.iter().find(|r| r.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().records.is_empty()
    }

    /// The displayed subset under `criteria`.
    pub fn view(&self, criteria: &RecordFilter<R::Status>) -> Vec<R> {
        let state = self.state.read();
        filter(&state.records, criteria).into_iter().cloned().collect()
    }

    // ── Selection ────────────────────────────────────────────────────

    /// Open the detail view for `id`.
    pub fn select(&self, id: &RecordId) -> Result<R, ConsoleError> {
        let mut state = self.state.write();
        let record = state
            .records
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| ConsoleError::NotFound {
                label: R::LABEL,
                id: id.clone(),
            })?;
        state.selected = Some(id.clone());
        Ok(record)
    }

    /// Current list entry for the selected id.
    pub fn selected(&self) -> Option<R> {
        let state = self.state.read();
        let id = state.selected.as_ref()?;
        state.records.iter().find(|r| r.id() == id).cloned()
    }

    pub fn clear_selection(&self) {
        self.state.write().selected = None;
    }

    // ── Notices ──────────────────────────────────────────────────────

    fn notify(&self, notice: Notice) {
        if self.is_mounted() {
            self.notices.lock().push(notice);
        }
    }

    /// Drain pending notifications, oldest first.
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Change a record's status optimistically.
    pub async fn update_status(
        &self,
        id: &RecordId,
        status: R::Status,
        notes: Option<&str>,
    ) -> Result<R, ConsoleError> {
        self.mutate(id, &format!("Status changed to {status}"), |record, actor, at| {
            apply_status(record, status, actor, notes, at)
        })
        .await
    }

    /// Apply `f` to record `id` optimistically, persist, and roll back on
    /// failure.
    ///
    /// `action` names the edit in notices, e.g. `Notes updated`. If `f`
    /// fails nothing is changed and no request is sent.
    pub async fn mutate<F>(&self, id: &RecordId, action: &str, f: F) -> Result<R, ConsoleError>
    where
        F: FnOnce(&mut R, &Actor, Timestamp) -> Result<(), RecordError>,
    {
        self.ensure_mounted()?;
        let _guard = self.id_locks.acquire(id).await;
        // Unmount may have happened while queued behind another mutation.
        self.ensure_mounted()?;

        let (snapshot, updated) = {
            let mut state = self.state.write();
            let slot = state
                .records
                .iter_mut()
                .find(|r| r.id() == id)
                .ok_or_else(|| ConsoleError::NotFound {
                    label: R::LABEL,
                    id: id.clone(),
                })?;
            let snapshot = slot.clone();
            let mut updated = snapshot.clone();
            f(&mut updated, &self.actor, Timestamp::now())?;
            *slot = updated.clone();
            (snapshot, updated)
        };

        let result = self.api.update(&updated).await;
        if !self.is_mounted() {
            return result.map(|()| updated).map_err(ConsoleError::from);
        }

        match result {
            Ok(()) => {
                tracing::info!(collection = R::COLLECTION, id = %id, action, "record updated");
                self.notify(Notice::success(action, format!("{} {id} updated", R::LABEL)));
                Ok(updated)
            }
            Err(e) => {
                self.restore(&updated, snapshot);
                tracing::warn!(
                    collection = R::COLLECTION,
                    id = %id,
                    action,
                    error = %e,
                    "update failed, local change rolled back"
                );
                self.notify(Notice::api_failure(
                    &format!("Could not update {} {id}", R::LABEL),
                    &e,
                ));
                Err(e.into())
            }
        }
    }

    /// Put `snapshot` back where `applied` sits, unless a reload replaced it.
    fn restore(&self, applied: &R, snapshot: R) {
        let mut state = self.state.write();
        if let Some(slot) = state.records.iter_mut().find(|r| r.id() == applied.id()) {
            if slot == applied {
                *slot = snapshot;
            }
        }
    }
}

impl<R: Creatable, A: RecordApi<R>> RecordController<R, A> {
    /// Validate `draft`, insert the new record at the front, and persist.
    ///
    /// Invalid drafts are rejected without touching state. If the backend
    /// rejects the record it is removed again.
    pub async fn create(&self, draft: R::Draft) -> Result<R, ConsoleError> {
        self.ensure_mounted()?;
        draft.validate().map_err(|errors| ConsoleError::Invalid {
            label: R::LABEL,
            errors,
        })?;

        let now = Timestamp::now();
        let id = RecordId::generate(R::ID_PREFIX, now);
        let mut record = R::from_draft(draft, id.clone(), &self.actor, now).map_err(|errors| {
            ConsoleError::Invalid {
                label: R::LABEL,
                errors,
            }
        })?;
        record
            .timeline_mut()
            .push(TimelineEntry::created(R::LABEL, &self.actor, now));

        {
            let mut state = self.state.write();
            if state.records.iter().any(|r| r.id() == &id) {
                return Err(ConsoleError::DuplicateId { label: R::LABEL, id });
            }
            state.records.insert(0, record.clone());
        }

        let result = self.api.create(&record).await;
        if !self.is_mounted() {
            return result.map(|()| record).map_err(ConsoleError::from);
        }

        match result {
            Ok(()) => {
                tracing::info!(collection = R::COLLECTION, id = %id, "record created");
                self.notify(Notice::success(
                    format!("{} created", R::LABEL),
                    format!("{} {id} created", R::LABEL),
                ));
                Ok(record)
            }
            Err(e) => {
                {
                    let mut state = self.state.write();
                    state.records.retain(|r| r.id() != &id);
                    if state.selected.as_ref() == Some(&id) {
                        state.selected = None;
                    }
                }
                tracing::warn!(collection = R::COLLECTION, id = %id, error = %e, "create failed, record removed");
                self.notify(Notice::api_failure(
                    &format!("Could not create {}", R::LABEL),
                    &e,
                ));
                Err(e.into())
            }
        }
    }
}

impl<R: Annotated, A: RecordApi<R>> RecordController<R, A> {
    /// Replace a record's notes optimistically.
    pub async fn edit_notes(&self, id: &RecordId, notes: &str) -> Result<R, ConsoleError> {
        self.mutate(id, "Notes updated", |record, actor, at| {
            edit_notes(record, notes, actor, at)
        })
        .await
    }
}
