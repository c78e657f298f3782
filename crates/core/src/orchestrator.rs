//! CRUD orchestration.
//!
//! Every intent is spawned onto the tokio runtime and returns its join handle straight away.
//! Results come back only as actions dispatched to the [`Store`]; callers never block on the
//! data layer. Failures turn into `RequestFailed` actions, so the store keeps its last
//! known-good data.
//!
//! Delete is two-step: [`Orchestrator::request_delete`] raises a confirmation, and only a
//! confirmed [`Orchestrator::respond`] issues the request.
//!
//! Loads issued by a [`DirectorySession`] stop when the session is dropped. Within a session a
//! slower, older load that finishes after a newer one still overwrites it.

use crate::confirmation::{ConfirmationGate, ConfirmationIntent, ConfirmationPrompt, ConfirmationResponse};
use crate::form::Submission;
use crate::gateway::DoctorGateway;
use crate::model::{DoctorPayload, DoctorRecord};
use crate::store::{Action, Intent, Store};
use crate::{DirectoryError, DirectoryResult};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A mutation parked behind a confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingMutation {
    DeleteDoctor(i64),
}

/// Queue the failure on the store and hand the error back.
fn report(store: &Store, intent: Intent, err: DirectoryError) -> DirectoryError {
    tracing::warn!(%intent, error = %err, "directory request failed");
    store.dispatch(Action::RequestFailed {
        intent,
        message: err.to_string(),
    });
    err
}

pub struct Orchestrator {
    gateway: Arc<dyn DoctorGateway>,
    store: Arc<Store>,
    confirmations: ConfirmationGate<PendingMutation>,
}

impl Orchestrator {
    /// Wire the orchestrator to a data source and the store it dispatches into.
    pub fn new(gateway: Arc<dyn DoctorGateway>, store: Arc<Store>) -> Self {
        Self {
            gateway,
            store,
            confirmations: ConfirmationGate::new(),
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Fetch doctors and both reference lists concurrently. Each list is dispatched as soon as
    /// it arrives. Once `cancel` fires nothing further is dispatched.
    pub fn load_all(&self, cancel: CancellationToken) -> JoinHandle<()> {
        let gateway = self.gateway.clone();
        let store = self.store.clone();

        tokio::spawn(async move {
            let doctors = async {
                match gateway.list_doctors().await {
                    Ok(v) => store.dispatch(Action::DoctorsLoaded(v)),
                    Err(e) => {
                        report(&store, Intent::LoadDoctors, e);
                    }
                }
            };
            let specializations = async {
                match gateway.list_specializations().await {
                    Ok(v) => store.dispatch(Action::SpecializationsLoaded(v)),
                    Err(e) => {
                        report(&store, Intent::LoadSpecializations, e);
                    }
                }
            };
            let affiliations = async {
                match gateway.list_affiliations().await {
                    Ok(v) => store.dispatch(Action::AffiliationsLoaded(v)),
                    Err(e) => {
                        report(&store, Intent::LoadAffiliations, e);
                    }
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => tracing::debug!("directory load cancelled"),
                _ = async { tokio::join!(doctors, specializations, affiliations) } => {
                    tracing::debug!("directory load finished");
                }
            }
        })
    }

    /// Start a screen session: loads everything under a fresh cancellation token.
    pub fn mount(&self) -> DirectorySession<'_> {
        let cancel = CancellationToken::new();
        let load = self.load_all(cancel.child_token());
        DirectorySession {
            orchestrator: self,
            cancel,
            load: Some(load),
        }
    }

    /// Send a create in the background.
    ///
    /// # Returns
    /// A handle that resolves once the store has been updated. On failure an error
    /// notification is dispatched instead; the handle itself carries no result.
    pub fn create(&self, payload: DoctorPayload) -> JoinHandle<()> {
        let gateway = self.gateway.clone();
        let store = self.store.clone();
        tokio::spawn(async move {
            let _ = apply_create(gateway.as_ref(), &store, payload).await;
        })
    }

    /// Background update of doctor `id`; see [`Self::create`] for the handle semantics.
    pub fn update(&self, id: i64, payload: DoctorPayload) -> JoinHandle<()> {
        let gateway = self.gateway.clone();
        let store = self.store.clone();
        tokio::spawn(async move {
            let _ = apply_update(gateway.as_ref(), &store, id, payload).await;
        })
    }

    /// Create and wait for the stored record. The store sees the same action as [`Self::create`].
    ///
    /// # Errors
    /// Returns the data source's error after dispatching the matching error notification.
    pub async fn create_doctor(&self, payload: DoctorPayload) -> DirectoryResult<DoctorRecord> {
        apply_create(self.gateway.as_ref(), &self.store, payload).await
    }

    /// Update doctor `id` and wait for the stored record.
    ///
    /// # Errors
    /// [`DirectoryError::NotFound`] if no such doctor exists, or any other data source error.
    /// Either way an error notification is dispatched first.
    pub async fn update_doctor(
        &self,
        id: i64,
        payload: DoctorPayload,
    ) -> DirectoryResult<DoctorRecord> {
        apply_update(self.gateway.as_ref(), &self.store, id, payload).await
    }

    /// Delete without raising a confirmation. For callers whose request already is the
    /// confirmation, such as an HTTP `DELETE`.
    ///
    /// # Errors
    /// Same as [`Self::update_doctor`].
    pub async fn delete_doctor(&self, id: i64) -> DirectoryResult<()> {
        apply_delete(self.gateway.as_ref(), &self.store, id).await
    }

    /// Issue whatever a successful form submit asked for.
    pub fn submit(&self, submission: Submission) -> JoinHandle<()> {
        match submission {
            Submission::Create(payload) => self.create(payload),
            Submission::Update { id, payload } => self.update(id, payload),
        }
    }

    /// Park a delete of doctor `id` behind a confirmation. Nothing is sent yet.
    pub fn request_delete(&self, id: i64, display_name: &str) {
        self.confirmations.raise(ConfirmationIntent {
            title: "Delete doctor".to_string(),
            subtitle: format!("Are you sure you want to delete {display_name}? This cannot be undone."),
            on_confirm: PendingMutation::DeleteDoctor(id),
        });
    }

    /// The prompt to render, if a confirmation is open.
    pub fn confirmation(&self) -> Option<ConfirmationPrompt> {
        self.confirmations.prompt()
    }

    /// Answer the open confirmation. A confirmed delete is issued exactly once and its handle
    /// returned; cancelling, or answering twice, issues nothing.
    pub fn respond(&self, response: ConfirmationResponse) -> Option<JoinHandle<()>> {
        match self.confirmations.respond(response)? {
            PendingMutation::DeleteDoctor(id) => Some(self.delete(id)),
        }
    }

    fn delete(&self, id: i64) -> JoinHandle<()> {
        let gateway = self.gateway.clone();
        let store = self.store.clone();
        tokio::spawn(async move {
            let _ = apply_delete(gateway.as_ref(), &store, id).await;
        })
    }
}

async fn apply_create(
    gateway: &dyn DoctorGateway,
    store: &Store,
    payload: DoctorPayload,
) -> DirectoryResult<DoctorRecord> {
    match gateway.create_doctor(payload).await {
        Ok(record) => {
            tracing::info!(id = record.id, "create completed");
            store.dispatch(Action::DoctorCreated(record.clone()));
            Ok(record)
        }
        Err(e) => Err(report(store, Intent::Create, e)),
    }
}

async fn apply_update(
    gateway: &dyn DoctorGateway,
    store: &Store,
    id: i64,
    payload: DoctorPayload,
) -> DirectoryResult<DoctorRecord> {
    match gateway.update_doctor(id, payload).await {
        Ok(record) => {
            tracing::info!(id, "update completed");
            store.dispatch(Action::DoctorUpdated(record.clone()));
            Ok(record)
        }
        Err(e) => Err(report(store, Intent::Update(id), e)),
    }
}

async fn apply_delete(gateway: &dyn DoctorGateway, store: &Store, id: i64) -> DirectoryResult<()> {
    match gateway.delete_doctor(id).await {
        Ok(()) => {
            tracing::info!(id, "delete completed");
            store.dispatch(Action::DoctorDeleted(id));
            Ok(())
        }
        Err(e) => Err(report(store, Intent::Delete(id), e)),
    }
}

/// A mounted directory screen. Dropping it cancels its in-flight loads.
pub struct DirectorySession<'a> {
    orchestrator: &'a Orchestrator,
    cancel: CancellationToken,
    load: Option<JoinHandle<()>>,
}

impl DirectorySession<'_> {
    /// Wait for the most recent load issued by this session.
    pub async fn finished(&mut self) {
        if let Some(load) = self.load.take() {
            if let Err(e) = load.await {
                tracing::warn!(error = %e, "directory load task failed");
            }
        }
    }

    /// Issue a fresh load. The previous one is not aborted.
    pub fn refresh(&mut self) {
        self.load = Some(self.orchestrator.load_all(self.cancel.child_token()));
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for DirectorySession<'_> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
