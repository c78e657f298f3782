//! In-process directory data layer.
//!
//! Holds doctors and both reference lists in memory, optionally seeded from a JSON file of the
//! form:
//!
//! ```text
//! {
//!   "specializations": [{"id": 1, "title": "Cardiology"}],
//!   "affiliations":    [{"id": 1, "title": "City Hospital"}],
//!   "doctors":         [{"id": 1, "name_english": "...", "doctor": {...}, "address": {...}}]
//! }
//! ```
//!
//! Ids for new doctors continue from the highest seeded id.

use crate::constants::{AFFILIATION_KIND, DOCTOR_KIND, SPECIALIZATION_KIND};
use crate::gateway::DoctorGateway;
use crate::model::{Address, DoctorPayload, DoctorProfile, DoctorRecord, ReferenceItem, ReferenceRef};
use crate::{DirectoryError, DirectoryResult};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Serialized form of the whole directory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySeed {
    #[serde(default)]
    pub specializations: Vec<ReferenceItem>,
    #[serde(default)]
    pub affiliations: Vec<ReferenceItem>,
    #[serde(default)]
    pub doctors: Vec<DoctorRecord>,
}

#[derive(Debug)]
struct Inner {
    data: DirectorySeed,
    next_id: i64,
}

#[derive(Debug)]
pub struct DirectoryRepository {
    inner: RwLock<Inner>,
}

impl Default for DirectoryRepository {
    fn default() -> Self {
        Self::from_seed(DirectorySeed::default())
    }
}

impl DirectoryRepository {
    pub fn from_seed(data: DirectorySeed) -> Self {
        let next_id = data.doctors.iter().map(|d| d.id).max().unwrap_or(0) + 1;
        Self {
            inner: RwLock::new(Inner { data, next_id }),
        }
    }

    /// Load a repository from a JSON seed file.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::SeedRead`] if the file cannot be read and
    /// [`DirectoryError::SeedParse`] if it is not a valid seed document.
    pub fn load(path: &Path) -> DirectoryResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(DirectoryError::SeedRead)?;
        let seed: DirectorySeed = serde_json::from_str(&raw).map_err(DirectoryError::SeedParse)?;
        tracing::info!(
            doctors = seed.doctors.len(),
            specializations = seed.specializations.len(),
            affiliations = seed.affiliations.len(),
            "loaded directory seed from {}",
            path.display()
        );
        Ok(Self::from_seed(seed))
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> DirectorySeed {
        self.read().data.clone()
    }

    pub fn to_json(&self) -> DirectoryResult<String> {
        serde_json::to_string_pretty(&self.read().data).map_err(DirectoryError::Serialization)
    }

    pub fn doctors(&self) -> Vec<DoctorRecord> {
        self.read().data.doctors.clone()
    }

    pub fn specializations(&self) -> Vec<ReferenceItem> {
        self.read().data.specializations.clone()
    }

    pub fn affiliations(&self) -> Vec<ReferenceItem> {
        self.read().data.affiliations.clone()
    }

    fn check_references(data: &DirectorySeed, payload: &DoctorPayload) -> DirectoryResult<()> {
        if !data.specializations.iter().any(|s| s.id == payload.specialization_id) {
            return Err(DirectoryError::NotFound {
                kind: SPECIALIZATION_KIND,
                id: payload.specialization_id,
            });
        }
        if !data.affiliations.iter().any(|a| a.id == payload.affiliation_id) {
            return Err(DirectoryError::NotFound {
                kind: AFFILIATION_KIND,
                id: payload.affiliation_id,
            });
        }
        Ok(())
    }

    fn record_from_payload(id: i64, created_at: String, payload: DoctorPayload) -> DoctorRecord {
        DoctorRecord {
            id,
            name_english: payload.name_english,
            name_arabic: payload.name_arabic,
            contact: payload.contact,
            email: payload.email,
            created_at,
            doctor: DoctorProfile {
                specialization: Some(ReferenceRef {
                    id: payload.specialization_id,
                }),
                affiliation: Some(ReferenceRef {
                    id: payload.affiliation_id,
                }),
            },
            address: Some(Address {
                line1: payload.address_line1,
                line2: payload.address_line2,
                city: Some(payload.city),
                state: Some(payload.state),
                country: Some(payload.country),
                zip_code: payload.zip_code,
            }),
        }
    }

    pub fn create(&self, payload: DoctorPayload) -> DirectoryResult<DoctorRecord> {
        let mut inner = self.write();
        Self::check_references(&inner.data, &payload)?;

        let id = inner.next_id;
        inner.next_id += 1;
        let record = Self::record_from_payload(id, Utc::now().to_rfc3339(), payload);
        inner.data.doctors.push(record.clone());
        tracing::info!(id, "doctor created");
        Ok(record)
    }

    /// Replace a doctor's fields, keeping its id and `created_at`.
    pub fn update(&self, id: i64, payload: DoctorPayload) -> DirectoryResult<DoctorRecord> {
        let mut inner = self.write();
        Self::check_references(&inner.data, &payload)?;

        let existing = inner
            .data
            .doctors
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(DirectoryError::NotFound {
                kind: DOCTOR_KIND,
                id,
            })?;
        let record = Self::record_from_payload(id, existing.created_at.clone(), payload);
        *existing = record.clone();
        tracing::info!(id, "doctor updated");
        Ok(record)
    }

    pub fn delete(&self, id: i64) -> DirectoryResult<()> {
        let mut inner = self.write();
        let before = inner.data.doctors.len();
        inner.data.doctors.retain(|d| d.id != id);
        if inner.data.doctors.len() == before {
            return Err(DirectoryError::NotFound {
                kind: DOCTOR_KIND,
                id,
            });
        }
        tracing::info!(id, "doctor deleted");
        Ok(())
    }
}

#[async_trait]
impl DoctorGateway for DirectoryRepository {
    async fn list_doctors(&self) -> DirectoryResult<Vec<DoctorRecord>> {
        Ok(self.doctors())
    }

    async fn list_specializations(&self) -> DirectoryResult<Vec<ReferenceItem>> {
        Ok(self.specializations())
    }

    async fn list_affiliations(&self) -> DirectoryResult<Vec<ReferenceItem>> {
        Ok(self.affiliations())
    }

    async fn create_doctor(&self, payload: DoctorPayload) -> DirectoryResult<DoctorRecord> {
        self.create(payload)
    }

    async fn update_doctor(
        &self,
        id: i64,
        payload: DoctorPayload,
    ) -> DirectoryResult<DoctorRecord> {
        self.update(id, payload)
    }

    async fn delete_doctor(&self, id: i64) -> DirectoryResult<()> {
        self.delete(id)
    }
}
