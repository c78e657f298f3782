//! Doctor form validation.
//!
//! Each field runs its own rule chain and stops at the first failing rule, contributing at most
//! one message. Fields do not depend on each other. The result is either a fully normalized
//! [`ValidatedDoctor`] or a non-empty [`FieldErrors`] map, never both.
//!
//! Optional fields (`zip_code`, `state`, `country`, `city`, `address_line2`, `name_arabic`) are
//! nullable: blank input means absent and is not validated further.

use crate::form::FormState;
use mdr_types::{EmailAddress, NonEmptyText, PhoneNumber, RegionName, TextError, ZipCode};
use serde::Serialize;
use std::collections::BTreeMap;

pub const NAME_ENGLISH: &str = "name_english";
pub const NAME_ARABIC: &str = "name_arabic";
pub const CONTACT: &str = "contact";
pub const EMAIL: &str = "email";
pub const SPECIALIZATION_ID: &str = "specialization_id";
pub const AFFILIATION_ID: &str = "affiliation_id";
pub const ADDRESS_LINE1: &str = "address_line1";
pub const ADDRESS_LINE2: &str = "address_line2";
pub const CITY: &str = "city";
pub const STATE: &str = "state";
pub const COUNTRY: &str = "country";
pub const ZIP_CODE: &str = "zip_code";

/// Field name to human-readable message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// A form that passed every rule, with values in their normalized form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedDoctor {
    pub name_english: NonEmptyText,
    pub name_arabic: Option<String>,
    pub contact: PhoneNumber,
    pub email: EmailAddress,
    pub specialization_id: i64,
    pub affiliation_id: i64,
    pub address_line1: NonEmptyText,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<RegionName>,
    pub country: Option<RegionName>,
    pub zip_code: Option<ZipCode>,
}

/// Blank input is absent; anything else passes through untouched.
fn nullable(input: &str) -> Option<&str> {
    if input.trim().is_empty() {
        None
    } else {
        Some(input)
    }
}

fn required_text(input: &str, label: &str) -> Result<NonEmptyText, String> {
    NonEmptyText::new(input).map_err(|_| format!("{label} is required"))
}

fn optional_text(input: &str) -> Result<Option<String>, String> {
    Ok(nullable(input).map(|v| v.trim().to_string()))
}

fn selection(input: &str, label: &str) -> Result<i64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(format!("{label} is required"));
    }
    match input.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("{label} must be a valid selection")),
    }
}

fn strict_message(err: TextError, label: &str, shape: &str) -> String {
    match err {
        TextError::Empty => format!("{label} is required"),
        TextError::Padded => format!("{label} must not have leading or trailing spaces"),
        _ => format!("{label} must be a valid {shape}"),
    }
}

fn contact(input: &str) -> Result<PhoneNumber, String> {
    PhoneNumber::parse(input).map_err(|e| strict_message(e, "Contact", "phone number"))
}

fn email(input: &str) -> Result<EmailAddress, String> {
    EmailAddress::parse(input).map_err(|e| strict_message(e, "Email", "email address"))
}

fn zip_code(input: &str) -> Result<Option<ZipCode>, String> {
    let Some(value) = nullable(input) else {
        return Ok(None);
    };
    ZipCode::parse(value).map(Some).map_err(|e| match e {
        TextError::TooShort { min } => format!("Zip code must be at least {min} digits"),
        TextError::TooLong { max } => format!("Zip code must be at most {max} digits"),
        _ => "Zip code must contain only digits".to_string(),
    })
}

fn region(input: &str, label: &str) -> Result<Option<RegionName>, String> {
    let Some(value) = nullable(input) else {
        return Ok(None);
    };
    RegionName::parse(value)
        .map(Some)
        .map_err(|_| format!("{label} must contain only letters and spaces"))
}

/// Record a failure under `field` and hand back the value on success.
fn check<T>(errors: &mut FieldErrors, field: &str, result: Result<T, String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(message) => {
            errors.insert(field, message);
            None
        }
    }
}

/// Validate `form`, returning the normalized values or every field's first failure.
pub fn validate(form: &FormState) -> Result<ValidatedDoctor, FieldErrors> {
    let mut errors = FieldErrors::default();
    let e = &mut errors;

    let name_english = check(e, NAME_ENGLISH, required_text(&form.name_english, "Name (English)"));
    let name_arabic = check(e, NAME_ARABIC, optional_text(&form.name_arabic));
    let contact = check(e, CONTACT, contact(&form.contact));
    let email = check(e, EMAIL, email(&form.email));
    let specialization_id = check(e, SPECIALIZATION_ID, selection(&form.specialization_id, "Specialization"));
    let affiliation_id = check(e, AFFILIATION_ID, selection(&form.affiliation_id, "Affiliation"));
    let address_line1 = check(e, ADDRESS_LINE1, required_text(&form.address_line1, "Address line 1"));
    let address_line2 = check(e, ADDRESS_LINE2, optional_text(&form.address_line2));
    let city = check(e, CITY, optional_text(&form.city));
    let state = check(e, STATE, region(&form.state, "State"));
    let country = check(e, COUNTRY, region(&form.country, "Country"));
    let zip_code = check(e, ZIP_CODE, zip_code(&form.zip_code));

    match (
        name_english,
        name_arabic,
        contact,
        email,
        specialization_id,
        affiliation_id,
        address_line1,
        address_line2,
        city,
        state,
        country,
        zip_code,
    ) {
        (
            Some(name_english),
            Some(name_arabic),
            Some(contact),
            Some(email),
            Some(specialization_id),
            Some(affiliation_id),
            Some(address_line1),
            Some(address_line2),
            Some(city),
            Some(state),
            Some(country),
            Some(zip_code),
        ) if errors.is_empty() => Ok(ValidatedDoctor {
            name_english,
            name_arabic,
            contact,
            email,
            specialization_id,
            affiliation_id,
            address_line1,
            address_line2,
            city,
            state,
            country,
            zip_code,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> FormState {
        FormState {
            doctor_id: None,
            name_english: "Layla Nasser".into(),
            name_arabic: "".into(),
            contact: "+971 50 123 4567".into(),
            email: "layla@clinic.example".into(),
            specialization_id: "1".into(),
            affiliation_id: "10".into(),
            address_line1: "12 Harbour Rd".into(),
            address_line2: "".into(),
            city: "Dubai".into(),
            state: "".into(),
            country: "United Arab Emirates".into(),
            zip_code: "".into(),
        }
    }

    #[test]
    fn valid_form_normalizes() {
        let mut form = valid_form();
        form.name_english = "  Layla Nasser ".into();
        form.city = " Dubai ".into();

        let v = validate(&form).expect("form should be valid");
        assert_eq!(v.name_english.as_str(), "Layla Nasser");
        assert_eq!(v.city.as_deref(), Some("Dubai"));
        assert_eq!(v.specialization_id, 1);
        assert!(v.zip_code.is_none());
        assert!(v.state.is_none());
    }

    #[test]
    fn whitespace_only_name_is_required_error() {
        let mut form = valid_form();
        form.name_english = "  ".into();
        let errors = validate(&form).expect_err("blank name should fail");
        assert_eq!(errors.get(NAME_ENGLISH), Some("Name (English) is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn zip_code_scenarios() {
        let mut form = valid_form();

        form.zip_code = "1234".into();
        let errors = validate(&form).expect_err("4 digits should fail");
        assert_eq!(errors.get(ZIP_CODE), Some("Zip code must be at least 5 digits"));

        form.zip_code = "12345".into();
        let v = validate(&form).expect("5 digits should pass");
        assert_eq!(v.zip_code.map(|z| z.to_string()), Some("12345".to_string()));

        form.zip_code = "".into();
        assert!(validate(&form).expect("blank zip is absent").zip_code.is_none());

        form.zip_code = "   ".into();
        assert!(validate(&form).expect("whitespace zip is absent").zip_code.is_none());

        form.zip_code = "1234567".into();
        assert_eq!(
            validate(&form).unwrap_err().get(ZIP_CODE),
            Some("Zip code must be at most 6 digits")
        );

        form.zip_code = "12a45".into();
        assert_eq!(
            validate(&form).unwrap_err().get(ZIP_CODE),
            Some("Zip code must contain only digits")
        );
    }

    #[test]
    fn contact_padding_is_distinct_from_shape() {
        let mut form = valid_form();

        form.contact = " 0501234567".into();
        assert_eq!(
            validate(&form).unwrap_err().get(CONTACT),
            Some("Contact must not have leading or trailing spaces")
        );

        form.contact = "call me".into();
        assert_eq!(
            validate(&form).unwrap_err().get(CONTACT),
            Some("Contact must be a valid phone number")
        );

        form.contact = "   ".into();
        assert_eq!(validate(&form).unwrap_err().get(CONTACT), Some("Contact is required"));
    }

    #[test]
    fn email_strictness() {
        let mut form = valid_form();
        form.email = "layla@clinic.example ".into();
        assert_eq!(
            validate(&form).unwrap_err().get(EMAIL),
            Some("Email must not have leading or trailing spaces")
        );
        form.email = "layla-at-clinic".into();
        assert_eq!(
            validate(&form).unwrap_err().get(EMAIL),
            Some("Email must be a valid email address")
        );
    }

    #[test]
    fn region_fields_letters_and_spaces() {
        let mut form = valid_form();
        form.state = "Zone 7".into();
        form.country = "Oman".into();
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get(STATE), Some("State must contain only letters and spaces"));
        assert!(!errors.contains(COUNTRY));
    }

    #[test]
    fn selections_must_be_positive_ids() {
        let mut form = valid_form();
        form.specialization_id = "".into();
        form.affiliation_id = "abc".into();
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get(SPECIALIZATION_ID), Some("Specialization is required"));
        assert_eq!(errors.get(AFFILIATION_ID), Some("Affiliation must be a valid selection"));
    }

    #[test]
    fn validation_is_total_on_empty_form() {
        let errors = validate(&FormState::default()).expect_err("empty form is invalid");
        for field in [NAME_ENGLISH, CONTACT, EMAIL, SPECIALIZATION_ID, AFFILIATION_ID, ADDRESS_LINE1] {
            assert!(errors.contains(field), "missing error for {field}");
        }
        for field in [ZIP_CODE, STATE, COUNTRY, CITY, ADDRESS_LINE2, NAME_ARABIC] {
            assert!(!errors.contains(field), "unexpected error for {field}");
        }
    }

    #[test]
    fn errors_display_is_stable() {
        let mut errors = FieldErrors::default();
        errors.insert(ZIP_CODE, "bad");
        errors.insert(EMAIL, "worse");
        assert_eq!(errors.to_string(), "email: worse; zip_code: bad");
    }
}
