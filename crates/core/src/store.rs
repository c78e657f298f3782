//! Directory state container.
//!
//! All shared directory state lives in one [`Store`]. It changes only through
//! [`Store::dispatch`], which runs the pure [`reduce`] transition and bumps a revision counter
//! that observers can watch to re-project. Readers work on snapshots.
//!
//! A failed request never clears data: records and reference lists stay at their last
//! known-good value and a transient notification is queued instead.

use crate::constants::NOTIFICATION_CAPACITY;
use crate::model::{DoctorRecord, ReferenceItem};
use crate::projection::{inputs_ready, project_rows};
use crate::search::SearchView;
use std::collections::VecDeque;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::watch;

/// The data-layer request an action reports on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    LoadDoctors,
    LoadSpecializations,
    LoadAffiliations,
    Create,
    Update(i64),
    Delete(i64),
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::LoadDoctors => write!(f, "load doctors"),
            Intent::LoadSpecializations => write!(f, "load specializations"),
            Intent::LoadAffiliations => write!(f, "load affiliations"),
            Intent::Create => write!(f, "create doctor"),
            Intent::Update(id) => write!(f, "update doctor {id}"),
            Intent::Delete(id) => write!(f, "delete doctor {id}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    DoctorsLoaded(Vec<DoctorRecord>),
    SpecializationsLoaded(Vec<ReferenceItem>),
    AffiliationsLoaded(Vec<ReferenceItem>),
    DoctorCreated(DoctorRecord),
    DoctorUpdated(DoctorRecord),
    DoctorDeleted(i64),
    RequestFailed { intent: Intent, message: String },
    NotificationDismissed(u64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient user-facing message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectoryState {
    pub doctors: Vec<DoctorRecord>,
    pub specializations: Vec<ReferenceItem>,
    pub affiliations: Vec<ReferenceItem>,
    pub notifications: VecDeque<Notification>,
    next_notification_id: u64,
}

impl DirectoryState {
    fn notify(&mut self, level: NotificationLevel, message: String) {
        self.next_notification_id += 1;
        self.notifications.push_back(Notification {
            id: self.next_notification_id,
            level,
            message,
        });
        while self.notifications.len() > NOTIFICATION_CAPACITY {
            self.notifications.pop_front();
        }
    }

    fn upsert(&mut self, record: DoctorRecord) {
        match self.doctors.iter_mut().find(|d| d.id == record.id) {
            Some(existing) => *existing = record,
            None => self.doctors.push(record),
        }
    }

    pub fn is_ready(&self) -> bool {
        inputs_ready(&self.doctors, &self.specializations, &self.affiliations)
    }
}

/// Apply `action` to `state`, returning the next state.
pub fn reduce(mut state: DirectoryState, action: Action) -> DirectoryState {
    match action {
        Action::DoctorsLoaded(doctors) => state.doctors = doctors,
        Action::SpecializationsLoaded(items) => state.specializations = items,
        Action::AffiliationsLoaded(items) => state.affiliations = items,
        Action::DoctorCreated(record) => {
            let message = format!("Doctor {} created", record.name_english);
            state.upsert(record);
            state.notify(NotificationLevel::Success, message);
        }
        Action::DoctorUpdated(record) => {
            let message = format!("Doctor {} updated", record.name_english);
            state.upsert(record);
            state.notify(NotificationLevel::Success, message);
        }
        Action::DoctorDeleted(id) => {
            state.doctors.retain(|d| d.id != id);
            state.notify(NotificationLevel::Success, "Doctor deleted".to_string());
        }
        Action::RequestFailed { intent, message } => {
            state.notify(
                NotificationLevel::Error,
                format!("Failed to {intent}: {message}"),
            );
        }
        Action::NotificationDismissed(id) => state.notifications.retain(|n| n.id != id),
    }
    state
}

/// Shared, injected owner of [`DirectoryState`].
#[derive(Debug)]
pub struct Store {
    state: RwLock<DirectoryState>,
    revision: watch::Sender<u64>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(DirectoryState::default())
    }
}

impl Store {
    pub fn new(initial: DirectoryState) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: RwLock::new(initial),
            revision,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, DirectoryState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, DirectoryState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reduce `action` into the state and notify subscribers. Every dispatch bumps the
    /// revision, even when the reducer leaves the state unchanged.
    pub fn dispatch(&self, action: Action) {
        tracing::trace!(?action, "dispatch");
        {
            let mut guard = self.write();
            let current = std::mem::take(&mut *guard);
            *guard = reduce(current, action);
        }
        self.revision.send_modify(|r| *r += 1);
    }

    /// # Returns
    /// An owned copy of the current state; later dispatches do not affect it.
    pub fn snapshot(&self) -> DirectoryState {
        self.read().clone()
    }

    /// Watch for state changes. The value is a revision counter bumped on every dispatch.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Project the current state and filter it by `query`.
    ///
    /// # Returns
    /// A view with `loading` set and no rows until all three lists have arrived.
    pub fn view(&self, query: &str, date_format: &str) -> SearchView {
        let state = self.read();
        let rows = project_rows(
            &state.doctors,
            &state.specializations,
            &state.affiliations,
            date_format,
        );
        SearchView::new(query, &rows, state.is_ready())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_DATE_FORMAT;
    use crate::test_support::{affs, record, specs};

    fn loaded() -> DirectoryState {
        let state = DirectoryState::default();
        let state = reduce(state, Action::DoctorsLoaded(vec![record(1, "Amy", 1, 10), record(2, "Bo", 2, 10)]));
        let state = reduce(state, Action::SpecializationsLoaded(specs()));
        reduce(state, Action::AffiliationsLoaded(affs()))
    }

    #[test]
    fn loads_replace_wholesale() {
        let state = loaded();
        assert!(state.is_ready());
        let state = reduce(state, Action::SpecializationsLoaded(vec![ReferenceItem::new(5, "ENT")]));
        assert_eq!(state.specializations, vec![ReferenceItem::new(5, "ENT")]);
    }

    #[test]
    fn failure_keeps_last_known_good() {
        let before = loaded();
        let after = reduce(
            before.clone(),
            Action::RequestFailed {
                intent: Intent::LoadDoctors,
                message: "timeout".into(),
            },
        );
        assert_eq!(after.doctors, before.doctors);
        let note = after.notifications.back().expect("notification queued");
        assert_eq!(note.level, NotificationLevel::Error);
        assert_eq!(note.message, "Failed to load doctors: timeout");
    }

    #[test]
    fn create_update_delete_transitions() {
        let state = reduce(loaded(), Action::DoctorCreated(record(3, "Cy", 1, 10)));
        assert_eq!(state.doctors.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1, 2, 3]);

        let state = reduce(state, Action::DoctorUpdated(record(2, "Bob", 2, 10)));
        assert_eq!(state.doctors[1].name_english, "Bob");
        assert_eq!(state.doctors.len(), 3);

        let state = reduce(state, Action::DoctorDeleted(1));
        assert_eq!(state.doctors.iter().map(|d| d.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn notifications_are_bounded_and_dismissable() {
        let mut state = DirectoryState::default();
        for i in 0..(NOTIFICATION_CAPACITY as i64 + 3) {
            state = reduce(state, Action::DoctorDeleted(i));
        }
        assert_eq!(state.notifications.len(), NOTIFICATION_CAPACITY);
        let first = state.notifications[0].id;
        let state = reduce(state, Action::NotificationDismissed(first));
        assert!(state.notifications.iter().all(|n| n.id != first));
    }

    #[test]
    fn store_dispatch_bumps_revision_and_view_waits_for_inputs() {
        let store = Store::default();
        let rx = store.subscribe();
        assert!(store.view("", DEFAULT_DATE_FORMAT).loading);

        store.dispatch(Action::DoctorsLoaded(vec![record(1, "Amy", 1, 10)]));
        store.dispatch(Action::SpecializationsLoaded(specs()));
        assert!(store.view("", DEFAULT_DATE_FORMAT).loading);
        store.dispatch(Action::AffiliationsLoaded(affs()));

        assert_eq!(*rx.borrow(), 3);
        assert_eq!(store.revision(), 3);
        let view = store.view("amy", DEFAULT_DATE_FORMAT);
        assert!(!view.loading);
        assert_eq!(view.rows.len(), 1);
    }
}
