//! Validated text primitives shared across the MDR crates.
//!
//! Each type guarantees its invariant once constructed, so code holding one never has to
//! re-check it. Construction is the only place a rule is evaluated.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_SHAPE: Regex =
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("email pattern is valid");
    static ref PHONE_SHAPE: Regex =
        Regex::new(r"^\+?[0-9]+(?:[ \-][0-9]+)*$").expect("phone pattern is valid");
}

/// Fewest digits accepted in a contact number.
pub const PHONE_MIN_DIGITS: usize = 7;
/// Most digits accepted in a contact number (E.164 limit).
pub const PHONE_MAX_DIGITS: usize = 15;
/// Shortest accepted zip code.
pub const ZIP_MIN_LEN: usize = 5;
/// Longest accepted zip code.
pub const ZIP_MAX_LEN: usize = 6;

/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input carried leading or trailing whitespace where none is allowed
    #[error("Text must not have leading or trailing spaces")]
    Padded,
    #[error("Text is not a valid email address")]
    InvalidEmail,
    #[error("Text is not a valid phone number")]
    InvalidPhone,
    #[error("Text must contain only digits")]
    NonDigit,
    #[error("Text must be at least {min} characters")]
    TooShort { min: usize },
    #[error("Text must be at most {max} characters")]
    TooLong { max: usize },
    #[error("Text must contain only letters and spaces")]
    NotAlphabetic,
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// Returns `Err(TextError::Empty)` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Rejects blank input and, unlike [`NonEmptyText`], any surrounding whitespace.
fn strict(input: &str) -> Result<&str, TextError> {
    if input.trim().is_empty() {
        return Err(TextError::Empty);
    }
    if input.trim() != input {
        return Err(TextError::Padded);
    }
    Ok(input)
}

/// A syntactically valid email address with no surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses an email address, kept exactly as entered.
    ///
    /// # Errors
    /// - [`TextError::Empty`] if the input is blank,
    /// - [`TextError::Padded`] if it has leading or trailing whitespace,
    /// - [`TextError::InvalidEmail`] if it is not shaped like `local@domain.tld`.
    pub fn parse(input: &str) -> Result<Self, TextError> {
        let input = strict(input)?;
        if !EMAIL_SHAPE.is_match(input) {
            return Err(TextError::InvalidEmail);
        }
        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A contact number: optional leading `+`, digit groups separated by single spaces or hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parses a contact number.
    ///
    /// # Errors
    /// Returns [`TextError::Empty`] or [`TextError::Padded`] for blank or padded input, and
    /// [`TextError::InvalidPhone`] when the separators are malformed or the digit count falls
    /// outside the accepted range.
    pub fn parse(input: &str) -> Result<Self, TextError> {
        let input = strict(input)?;
        if !PHONE_SHAPE.is_match(input) {
            return Err(TextError::InvalidPhone);
        }
        let digits = input.bytes().filter(u8::is_ascii_digit).count();
        if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits) {
            return Err(TextError::InvalidPhone);
        }
        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A postal code of 5 or 6 ASCII digits, kept exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZipCode(String);

impl ZipCode {
    /// Parses a postal code. Whitespace is not trimmed; callers decide whether blank means absent.
    ///
    /// # Errors
    /// - [`TextError::Empty`] for an empty string,
    /// - [`TextError::NonDigit`] if any character is not an ASCII digit,
    /// - [`TextError::TooShort`] / [`TextError::TooLong`] outside 5 to 6 digits.
    pub fn parse(input: &str) -> Result<Self, TextError> {
        if input.is_empty() {
            return Err(TextError::Empty);
        }
        if !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TextError::NonDigit);
        }
        if input.len() < ZIP_MIN_LEN {
            return Err(TextError::TooShort { min: ZIP_MIN_LEN });
        }
        if input.len() > ZIP_MAX_LEN {
            return Err(TextError::TooLong { max: ZIP_MAX_LEN });
        }
        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A state or country name: letters and spaces only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionName(String);

impl RegionName {
    /// # Errors
    /// Returns [`TextError::Empty`] for blank input and [`TextError::NotAlphabetic`] if it
    /// contains anything other than letters and spaces.
    pub fn parse(input: &str) -> Result<Self, TextError> {
        if input.trim().is_empty() {
            return Err(TextError::Empty);
        }
        if !input.chars().all(|c| c.is_alphabetic() || c == ' ') {
            return Err(TextError::NotAlphabetic);
        }
        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! text_impls {
    ($($ty:ident => $ctor:expr),* $(,)?) => {$(
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                ($ctor)(s.as_str()).map_err(serde::de::Error::custom)
            }
        }
    )*};
}

text_impls! {
    NonEmptyText => |s: &str| NonEmptyText::new(s),
    EmailAddress => EmailAddress::parse,
    PhoneNumber => PhoneNumber::parse,
    ZipCode => ZipCode::parse,
    RegionName => RegionName::parse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_and_rejects_blank() {
        assert_eq!(NonEmptyText::new("  Dr Ada  ").unwrap().as_str(), "Dr Ada");
        assert_eq!(NonEmptyText::new(" \t ").unwrap_err(), TextError::Empty);
    }

    #[test]
    fn email_rejects_padding_separately_from_shape() {
        assert_eq!(
            EmailAddress::parse(" ada@example.com").unwrap_err(),
            TextError::Padded
        );
        assert_eq!(
            EmailAddress::parse("ada@example").unwrap_err(),
            TextError::InvalidEmail
        );
        assert!(EmailAddress::parse("ada.lovelace+cards@clinic.example.org").is_ok());
    }

    #[test]
    fn phone_accepts_grouped_digits_and_counts_them() {
        assert!(PhoneNumber::parse("+971 50-123 4567").is_ok());
        assert!(PhoneNumber::parse("0501234567").is_ok());
        assert_eq!(PhoneNumber::parse("12345").unwrap_err(), TextError::InvalidPhone);
        assert_eq!(PhoneNumber::parse("050--1234567").unwrap_err(), TextError::InvalidPhone);
        assert_eq!(PhoneNumber::parse("phone").unwrap_err(), TextError::InvalidPhone);
        assert_eq!(PhoneNumber::parse("0501234567 ").unwrap_err(), TextError::Padded);
    }

    #[test]
    fn zip_code_bounds() {
        assert_eq!(ZipCode::parse("1234").unwrap_err(), TextError::TooShort { min: 5 });
        assert_eq!(ZipCode::parse("1234567").unwrap_err(), TextError::TooLong { max: 6 });
        assert_eq!(ZipCode::parse("12a45").unwrap_err(), TextError::NonDigit);
        assert_eq!(ZipCode::parse("12345").unwrap().as_str(), "12345");
        assert_eq!(ZipCode::parse("123456").unwrap().as_str(), "123456");
    }

    #[test]
    fn region_name_letters_and_spaces_only() {
        assert!(RegionName::parse("New South Wales").is_ok());
        assert_eq!(RegionName::parse("NSW-2").unwrap_err(), TextError::NotAlphabetic);
    }

    #[test]
    fn deserialize_enforces_invariant() {
        let err = serde_json::from_str::<EmailAddress>("\"not-an-email\"");
        assert!(err.is_err());
        let ok: ZipCode = serde_json::from_str("\"54321\"").unwrap();
        assert_eq!(ok.to_string(), "54321");
    }
}
