//! Data layer boundary.
//!
//! The core reads three lists and issues three mutations; how they travel (in-process,
//! JSON over HTTP) is the implementor's concern.

use crate::model::{DoctorPayload, DoctorRecord, ReferenceItem};
use crate::DirectoryResult;
use async_trait::async_trait;

#[async_trait]
pub trait DoctorGateway: Send + Sync {
    async fn list_doctors(&self) -> DirectoryResult<Vec<DoctorRecord>>;

    async fn list_specializations(&self) -> DirectoryResult<Vec<ReferenceItem>>;

    async fn list_affiliations(&self) -> DirectoryResult<Vec<ReferenceItem>>;

    async fn create_doctor(&self, payload: DoctorPayload) -> DirectoryResult<DoctorRecord>;

    async fn update_doctor(&self, id: i64, payload: DoctorPayload)
        -> DirectoryResult<DoctorRecord>;

    async fn delete_doctor(&self, id: i64) -> DirectoryResult<()>;
}
