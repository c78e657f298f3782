//! REST request and response bodies.
//!
//! These mirror the core model field for field. Keeping them separate lets the core stay free
//! of OpenAPI derives and lets the wire shape change without touching core logic.

use mdr_core::{
    Address, DisplayRow, DoctorRecord, FieldErrors, FormState, ReferenceItem, SearchView,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReferenceItemRes {
    pub id: i64,
    pub title: String,
}

impl From<ReferenceItem> for ReferenceItemRes {
    fn from(item: ReferenceItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListReferenceRes {
    pub items: Vec<ReferenceItemRes>,
}

impl From<Vec<ReferenceItem>> for ListReferenceRes {
    fn from(items: Vec<ReferenceItem>) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReferenceRefRes {
    pub id: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DoctorProfileRes {
    pub specialization: Option<ReferenceRefRes>,
    pub affiliation: Option<ReferenceRefRes>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AddressRes {
    pub line1: String,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
}

impl From<Address> for AddressRes {
    fn from(a: Address) -> Self {
        Self {
            line1: a.line1,
            line2: a.line2,
            city: a.city,
            state: a.state,
            country: a.country,
            zip_code: a.zip_code,
        }
    }
}

/// A doctor as stored, with nested `doctor` and `address` objects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DoctorRes {
    pub id: i64,
    pub name_english: String,
    pub name_arabic: Option<String>,
    pub contact: String,
    pub email: String,
    pub created_at: String,
    pub doctor: DoctorProfileRes,
    pub address: Option<AddressRes>,
}

impl From<DoctorRecord> for DoctorRes {
    fn from(r: DoctorRecord) -> Self {
        Self {
            id: r.id,
            name_english: r.name_english,
            name_arabic: r.name_arabic,
            contact: r.contact,
            email: r.email,
            created_at: r.created_at,
            doctor: DoctorProfileRes {
                specialization: r.doctor.specialization.map(|s| ReferenceRefRes { id: s.id }),
                affiliation: r.doctor.affiliation.map(|a| ReferenceRefRes { id: a.id }),
            },
            address: r.address.map(Into::into),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListDoctorsRes {
    pub doctors: Vec<DoctorRes>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DisplayRowRes {
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

impl From<DisplayRow> for DisplayRowRes {
    fn from(r: DisplayRow) -> Self {
        Self {
            id: r.id,
            doctor_id: r.doctor_id,
            name_english: r.name_english,
            name_arabic: r.name_arabic,
            contact: r.contact,
            email: r.email,
            specialization_id: r.specialization_id,
            specialization_title: r.specialization_title,
            affiliation_id: r.affiliation_id,
            affiliation_title: r.affiliation_title,
            address: r.address,
            address_line1: r.address_line1,
            address_line2: r.address_line2,
            city: r.city,
            state: r.state,
            country: r.country,
            zip_code: r.zip_code,
            created_at: r.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DoctorRowsRes {
    pub loading: bool,
    pub rows: Vec<DisplayRowRes>,
}

impl From<SearchView> for DoctorRowsRes {
    fn from(view: SearchView) -> Self {
        Self {
            loading: view.loading,
            rows: view.rows.into_iter().map(Into::into).collect(),
        }
    }
}

/// Create/update body: the raw form inputs, validated server-side.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DoctorFormReq {
    pub name_english: String,
    pub name_arabic: String,
    pub contact: String,
    pub email: String,
    pub specialization_id: String,
    pub affiliation_id: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

impl DoctorFormReq {
    /// Form state for this request; `doctor_id` selects edit mode.
    pub fn into_form(self, doctor_id: Option<i64>) -> FormState {
        FormState {
            doctor_id,
            name_english: self.name_english,
            name_arabic: self.name_arabic,
            contact: self.contact,
            email: self.email,
            specialization_id: self.specialization_id,
            affiliation_id: self.affiliation_id,
            address_line1: self.address_line1,
            address_line2: self.address_line2,
            city: self.city,
            state: self.state,
            country: self.country,
            zip_code: self.zip_code,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DoctorMutationRes {
    pub doctor: DoctorRes,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteDoctorRes {
    pub success: bool,
}

/// Field name to message, returned with `422 Unprocessable Entity`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorRes {
    pub errors: BTreeMap<String, String>,
}

impl From<FieldErrors> for ValidationErrorRes {
    fn from(errors: FieldErrors) -> Self {
        Self {
            errors: errors.as_map().clone(),
        }
    }
}
