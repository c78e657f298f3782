//! Fixtures shared by the unit tests.

use crate::model::{
    Address, DoctorPayload, DoctorProfile, DoctorRecord, ReferenceItem, ReferenceRef,
};

pub(crate) fn record(id: i64, name: &str, spec: i64, aff: i64) -> DoctorRecord {
    DoctorRecord {
        id,
        name_english: name.into(),
        name_arabic: None,
        contact: "+971 50 123 4567".into(),
        email: format!("doc{id}@clinic.example"),
        created_at: "2024-03-05T09:30:00Z".into(),
        doctor: DoctorProfile {
            specialization: Some(ReferenceRef { id: spec }),
            affiliation: Some(ReferenceRef { id: aff }),
        },
        address: Some(Address {
            line1: "12 Harbour Rd".into(),
            line2: None,
            city: Some("Dubai".into()),
            state: Some("".into()),
            country: Some("United Arab Emirates".into()),
            zip_code: None,
        }),
    }
}

pub(crate) fn specs() -> Vec<ReferenceItem> {
    vec![
        ReferenceItem::new(1, "Cardiology"),
        ReferenceItem::new(2, "Neurology"),
    ]
}

pub(crate) fn affs() -> Vec<ReferenceItem> {
    vec![ReferenceItem::new(10, "City Hospital")]
}

pub(crate) fn payload(spec: i64, aff: i64) -> DoctorPayload {
    DoctorPayload {
        name_english: "Sara Youssef".into(),
        name_arabic: None,
        contact: "0501234567".into(),
        email: "sara@clinic.example".into(),
        specialization_id: spec,
        affiliation_id: aff,
        address_line1: "3 Creek Ln".into(),
        address_line2: None,
        city: "".into(),
        state: "".into(),
        country: "".into(),
        zip_code: None,
    }
}
