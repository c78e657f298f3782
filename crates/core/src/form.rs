//! Doctor form controller.
//!
//! Holds the in-progress edit buffer, validates it on submit and turns a valid form into the
//! payload the data layer expects. A form is in edit mode exactly when it carries the backing
//! doctor id.

use crate::model::{DisplayRow, DoctorPayload};
use crate::validation::{self, FieldErrors, ValidatedDoctor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// In-progress edit buffer. Every input is kept as the raw string the user typed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormState {
    pub doctor_id: Option<i64>,
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

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

impl FormState {
    /// All-empty template for a new doctor.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Seed an edit buffer from a projected row.
    pub fn from_row(row: &DisplayRow) -> Self {
        let id_text = |id: Option<i64>| id.map(|v| v.to_string()).unwrap_or_default();
        Self {
            doctor_id: Some(row.doctor_id),
            name_english: row.name_english.clone(),
            name_arabic: row.name_arabic.clone(),
            contact: row.contact.clone(),
            email: row.email.clone(),
            specialization_id: id_text(row.specialization_id),
            affiliation_id: id_text(row.affiliation_id),
            address_line1: row.address_line1.clone(),
            address_line2: row.address_line2.clone(),
            city: row.city.clone(),
            state: row.state.clone(),
            country: row.country.clone(),
            zip_code: row.zip_code.clone(),
        }
    }

    pub fn mode(&self) -> FormMode {
        match self.doctor_id {
            Some(id) => FormMode::Edit(id),
            None => FormMode::Create,
        }
    }

    fn slot_mut(&mut self, field: &str) -> Option<&mut String> {
        let slot = match field {
            validation::NAME_ENGLISH => &mut self.name_english,
            validation::NAME_ARABIC => &mut self.name_arabic,
            validation::CONTACT => &mut self.contact,
            validation::EMAIL => &mut self.email,
            validation::SPECIALIZATION_ID => &mut self.specialization_id,
            validation::AFFILIATION_ID => &mut self.affiliation_id,
            validation::ADDRESS_LINE1 => &mut self.address_line1,
            validation::ADDRESS_LINE2 => &mut self.address_line2,
            validation::CITY => &mut self.city,
            validation::STATE => &mut self.state,
            validation::COUNTRY => &mut self.country,
            validation::ZIP_CODE => &mut self.zip_code,
            _ => return None,
        };
        Some(slot)
    }

    /// Field name to current value, for the rendering layer.
    pub fn values(&self) -> BTreeMap<&'static str, &str> {
        BTreeMap::from([
            (validation::NAME_ENGLISH, self.name_english.as_str()),
            (validation::NAME_ARABIC, self.name_arabic.as_str()),
            (validation::CONTACT, self.contact.as_str()),
            (validation::EMAIL, self.email.as_str()),
            (validation::SPECIALIZATION_ID, self.specialization_id.as_str()),
            (validation::AFFILIATION_ID, self.affiliation_id.as_str()),
            (validation::ADDRESS_LINE1, self.address_line1.as_str()),
            (validation::ADDRESS_LINE2, self.address_line2.as_str()),
            (validation::CITY, self.city.as_str()),
            (validation::STATE, self.state.as_str()),
            (validation::COUNTRY, self.country.as_str()),
            (validation::ZIP_CODE, self.zip_code.as_str()),
        ])
    }
}

/// Build the create/update body from a validated form.
///
/// `city`, `state` and `country` become `""` when absent while `zip_code` becomes `None`,
/// matching what the data layer accepts.
pub fn build_payload(doctor: ValidatedDoctor) -> DoctorPayload {
    DoctorPayload {
        name_english: doctor.name_english.into_inner(),
        name_arabic: doctor.name_arabic,
        contact: doctor.contact.to_string(),
        email: doctor.email.to_string(),
        specialization_id: doctor.specialization_id,
        affiliation_id: doctor.affiliation_id,
        address_line1: doctor.address_line1.into_inner(),
        address_line2: doctor.address_line2,
        city: doctor.city.unwrap_or_default(),
        state: doctor.state.map(|s| s.to_string()).unwrap_or_default(),
        country: doctor.country.map(|c| c.to_string()).unwrap_or_default(),
        zip_code: doctor.zip_code.map(|z| z.to_string()),
    }
}

/// What a successful submit asks the orchestrator to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    Create(DoctorPayload),
    Update { id: i64, payload: DoctorPayload },
}

/// Edit buffer plus the errors from the last submit.
#[derive(Clone, Debug, Default)]
pub struct FormController {
    state: FormState,
    errors: FieldErrors,
}

impl FormController {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn edit(row: &DisplayRow) -> Self {
        Self {
            state: FormState::from_row(row),
            errors: FieldErrors::default(),
        }
    }

    pub fn with_state(state: FormState) -> Self {
        Self {
            state,
            errors: FieldErrors::default(),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.state.mode()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn values(&self) -> BTreeMap<&'static str, &str> {
        self.state.values()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Update one field. Returns `false` for an unknown field name.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> bool {
        match self.state.slot_mut(field) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Replace the buffer with `seed` and drop any errors.
    pub fn reset(&mut self, seed: FormState) {
        self.state = seed;
        self.errors = FieldErrors::default();
    }

    /// Validate and, on success, produce the intent to issue.
    ///
    /// On failure the errors are kept on the controller for the rendering layer and also
    /// returned.
    pub fn submit(&mut self) -> Result<Submission, FieldErrors> {
        match validation::validate(&self.state) {
            Ok(valid) => {
                self.errors = FieldErrors::default();
                let payload = build_payload(valid);
                Ok(match self.state.mode() {
                    FormMode::Create => Submission::Create(payload),
                    FormMode::Edit(id) => Submission::Update { id, payload },
                })
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_DATE_FORMAT;
    use crate::projection::project_rows;
    use crate::test_support::{affs, record, specs};

    fn filled(controller: &mut FormController) {
        for (field, value) in [
            ("name_english", "Omar Saleh"),
            ("contact", "050-123-4567"),
            ("email", "omar@clinic.example"),
            ("specialization_id", "2"),
            ("affiliation_id", "10"),
            ("address_line1", "1 Palm St"),
        ] {
            assert!(controller.set_field(field, value));
        }
    }

    #[test]
    fn create_mode_without_id() {
        let mut c = FormController::create();
        assert_eq!(c.mode(), FormMode::Create);
        filled(&mut c);
        match c.submit().expect("valid form") {
            Submission::Create(p) => assert_eq!(p.name_english, "Omar Saleh"),
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn edit_mode_seeded_from_row() {
        let rows = project_rows(&[record(42, "Amy", 1, 10)], &specs(), &affs(), DEFAULT_DATE_FORMAT);
        let mut c = FormController::edit(&rows[0]);
        assert_eq!(c.mode(), FormMode::Edit(42));
        assert_eq!(c.values()["specialization_id"], "1");
        assert_eq!(c.values()["city"], "Dubai");

        match c.submit().expect("seeded form is valid") {
            Submission::Update { id, payload } => {
                assert_eq!(id, 42);
                assert_eq!(payload.country, "United Arab Emirates");
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn payload_coercion_asymmetry() {
        let mut c = FormController::create();
        filled(&mut c);
        let Submission::Create(p) = c.submit().expect("valid form") else {
            panic!("expected create");
        };
        assert_eq!(p.city, "");
        assert_eq!(p.state, "");
        assert_eq!(p.country, "");
        assert_eq!(p.zip_code, None);

        c.set_field("zip_code", "   ");
        c.set_field("city", "   ");
        let Submission::Create(p) = c.submit().expect("blank zip is allowed") else {
            panic!("expected create");
        };
        assert_eq!(p.zip_code, None);
        assert_eq!(p.city, "");

        c.set_field("zip_code", "12345");
        let Submission::Create(p) = c.submit().expect("valid zip") else {
            panic!("expected create");
        };
        assert_eq!(p.zip_code.as_deref(), Some("12345"));
    }

    #[test]
    fn failed_submit_keeps_errors_for_rendering() {
        let mut c = FormController::create();
        filled(&mut c);
        c.set_field("zip_code", "1234");
        let errors = c.submit().expect_err("short zip");
        assert!(errors.contains("zip_code"));
        assert_eq!(c.errors(), &errors);

        c.set_field("zip_code", "12345");
        assert!(c.submit().is_ok());
        assert!(c.errors().is_empty());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut c = FormController::create();
        assert!(!c.set_field("doctor_id", "9"));
        assert!(!c.set_field("nickname", "Doc"));
    }
}
