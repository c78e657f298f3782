//! Free-text search over display rows.

use crate::model::DisplayRow;
use serde::Serialize;

/// Fields of a [`DisplayRow`] that a query is matched against.
fn searchable_fields(row: &DisplayRow) -> [&str; 7] {
    [
        row.name_english.as_str(),
        row.name_arabic.as_str(),
        row.contact.as_str(),
        row.email.as_str(),
        row.specialization_title.as_str(),
        row.affiliation_title.as_str(),
        row.address.as_str(),
    ]
}

/// Whether `row` contains the (already lowercased) `needle` in any searchable field.
fn matches(row: &DisplayRow, needle: &str) -> bool {
    searchable_fields(row)
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Return the rows whose searchable fields contain `query`, case-insensitively, in their
/// original order. Only the empty query returns every row; whitespace is matched as typed.
pub fn filter_rows(query: &str, rows: &[DisplayRow]) -> Vec<DisplayRow> {
    if query.is_empty() {
        return rows.to_vec();
    }
    let needle = query.to_lowercase();

    rows.iter()
        .filter(|row| matches(row, &needle))
        .cloned()
        .collect()
}

/// What the table shows for the current query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchView {
    /// True while projection inputs are still loading.
    pub loading: bool,
    pub rows: Vec<DisplayRow>,
}

impl SearchView {
    /// Build the view for `query`. `inputs_ready` is the projection gate: while it is closed the
    /// view is loading and has no rows.
    pub fn new(query: &str, rows: &[DisplayRow], inputs_ready: bool) -> Self {
        if !inputs_ready {
            return Self {
                loading: true,
                rows: Vec::new(),
            };
        }

        Self {
            loading: false,
            rows: filter_rows(query, rows),
        }
    }
}
