//! Row projection: source records to display rows.
//!
//! Projection waits for all of its inputs. Until doctors, specializations and affiliations are
//! all loaded it yields no rows at all rather than rows with half-resolved titles.

use crate::constants::ADDRESS_SEPARATOR;
use crate::lookup::resolve;
use crate::model::{Address, DisplayRow, DoctorRecord, ReferenceItem};
use chrono::{DateTime, NaiveDate};
use std::fmt::Write as _;

/// Whether every projection input is present.
pub fn inputs_ready(
    records: &[DoctorRecord],
    specializations: &[ReferenceItem],
    affiliations: &[ReferenceItem],
) -> bool {
    !records.is_empty() && !specializations.is_empty() && !affiliations.is_empty()
}

/// Project `records` into display rows, one per record, in source order.
///
/// Returns an empty vector whenever any input is empty.
pub fn project_rows(
    records: &[DoctorRecord],
    specializations: &[ReferenceItem],
    affiliations: &[ReferenceItem],
    date_format: &str,
) -> Vec<DisplayRow> {
    if !inputs_ready(records, specializations, affiliations) {
        return Vec::new();
    }

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            project_row(index + 1, record, specializations, affiliations, date_format)
        })
        .collect()
}

fn project_row(
    position: usize,
    record: &DoctorRecord,
    specializations: &[ReferenceItem],
    affiliations: &[ReferenceItem],
    date_format: &str,
) -> DisplayRow {
    let specialization_id = record.specialization_id();
    let affiliation_id = record.affiliation_id();
    let empty = Address::default();
    let address = record.address.as_ref().unwrap_or(&empty);
    let part = |v: &Option<String>| v.clone().unwrap_or_default();
    let specialization = resolve(specialization_id, specializations);
    let affiliation = resolve(affiliation_id, affiliations);
    if !specialization.is_found() || !affiliation.is_found() {
        tracing::debug!(
            doctor_id = record.id,
            specialization_found = specialization.is_found(),
            affiliation_found = affiliation.is_found(),
            "row has unresolved reference titles"
        );
    }

    DisplayRow {
        id: position,
        doctor_id: record.id,
        name_english: record.name_english.clone(),
        name_arabic: part(&record.name_arabic),
        contact: record.contact.clone(),
        email: record.email.clone(),
        specialization_id,
        specialization_title: specialization.title().to_string(),
        affiliation_id,
        affiliation_title: affiliation.title().to_string(),
        address: join_address(address),
        address_line1: address.line1.clone(),
        address_line2: part(&address.line2),
        city: part(&address.city),
        state: part(&address.state),
        country: part(&address.country),
        zip_code: part(&address.zip_code),
        created_at: format_date(&record.created_at, date_format),
    }
}

/// Join line1, line2, city, state and country, skipping blank segments.
pub fn join_address(address: &Address) -> String {
    [
        Some(address.line1.as_str()),
        address.line2.as_deref(),
        address.city.as_deref(),
        address.state.as_deref(),
        address.country.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|segment| !segment.is_empty())
    .collect::<Vec<_>>()
    .join(ADDRESS_SEPARATOR)
}

/// Normalize an RFC 3339 timestamp or `YYYY-MM-DD` date to `date_format`.
///
/// Input that parses as neither, or a format string chrono rejects, passes through trimmed.
pub fn format_date(raw: &str, date_format: &str) -> String {
    let raw = raw.trim();
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    let Ok(date) = date else {
        if !raw.is_empty() {
            tracing::warn!(raw, "unrecognised date left as-is");
        }
        return raw.to_string();
    };

    let mut out = String::new();
    if write!(out, "{}", date.format(date_format)).is_err() {
        tracing::warn!(date_format, "invalid date format; using raw date");
        return raw.to_string();
    }
    out
}
