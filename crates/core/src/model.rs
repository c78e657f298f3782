//! Directory data model.
//!
//! `DoctorRecord` is the raw entity as the data layer hands it over, with its nested `doctor`
//! and `address` objects. `DisplayRow` is the flat shape the table consumes; rows are produced
//! by [`crate::projection`] and never edited in place.

use serde::{Deserialize, Serialize};

/// `{id, title}` entry of a lookup list (specializations, affiliations).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
    pub id: i64,
    pub title: String,
}

impl ReferenceItem {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// Foreign-key reference as nested in a source record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRef {
    pub id: i64,
}

/// The `doctor` sub-object of a source record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorProfile {
    #[serde(default)]
    pub specialization: Option<ReferenceRef>,
    #[serde(default)]
    pub affiliation: Option<ReferenceRef>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
}

/// Raw doctor entity as stored by the data layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorRecord {
    pub id: i64,
    pub name_english: String,
    #[serde(default)]
    pub name_arabic: Option<String>,
    pub contact: String,
    pub email: String,
    /// As received: RFC 3339 timestamp or plain `YYYY-MM-DD` date.
    pub created_at: String,
    #[serde(default)]
    pub doctor: DoctorProfile,
    #[serde(default)]
    pub address: Option<Address>,
}

impl DoctorRecord {
    pub fn specialization_id(&self) -> Option<i64> {
        self.doctor.specialization.map(|r| r.id)
    }

    pub fn affiliation_id(&self) -> Option<i64> {
        self.doctor.affiliation.map(|r| r.id)
    }
}

/// Flattened, human-readable row consumed by the table renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRow {
    /// Positional, 1-based.
    pub id: usize,
    pub doctor_id: i64,
    pub name_english: String,
    pub name_arabic: String,
    pub contact: String,
    pub email: String,
    pub specialization_id: Option<i64>,
    pub specialization_title: String,
    pub affiliation_id: Option<i64>,
    pub affiliation_title: String,
    pub address: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
    pub created_at: String,
}

/// Normalized create/update body sent to the data layer.
///
/// `city`, `state` and `country` are always strings (empty when absent) while `zip_code` is
/// `null` when absent. The data layer depends on that exact shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorPayload {
    pub name_english: String,
    pub name_arabic: Option<String>,
    pub contact: String,
    pub email: String,
    pub specialization_id: i64,
    pub affiliation_id: i64,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: Option<String>,
}
