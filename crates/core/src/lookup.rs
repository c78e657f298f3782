//! Foreign-key resolution against reference lists.

use crate::constants::UNRESOLVED_TITLE;
use crate::model::ReferenceItem;

/// Outcome of resolving a foreign key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolved<'a> {
    Found(&'a str),
    Unresolved,
}

impl<'a> Resolved<'a> {
    /// The title, or [`UNRESOLVED_TITLE`] on a miss.
    pub fn title(self) -> &'a str {
        match self {
            Resolved::Found(title) => title,
            Resolved::Unresolved => UNRESOLVED_TITLE,
        }
    }

    pub fn is_found(self) -> bool {
        matches!(self, Resolved::Found(_))
    }
}

/// Look up `id` in `items` by linear scan.
///
/// Ids are assumed unique within `items`; the first match wins. A missing id (`None`) or an
/// id with no entry resolves to [`Resolved::Unresolved`].
pub fn resolve(id: Option<i64>, items: &[ReferenceItem]) -> Resolved<'_> {
    let Some(id) = id else {
        return Resolved::Unresolved;
    };

    match items.iter().find(|item| item.id == id) {
        Some(item) => Resolved::Found(&item.title),
        None => {
            tracing::debug!(id, "reference id has no matching entry");
            Resolved::Unresolved
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specializations() -> Vec<ReferenceItem> {
        vec![
            ReferenceItem::new(1, "Cardiology"),
            ReferenceItem::new(2, "Dermatology"),
        ]
    }

    #[test]
    fn resolves_matching_id() {
        let items = specializations();
        assert_eq!(resolve(Some(2), &items), Resolved::Found("Dermatology"));
        assert_eq!(resolve(Some(2), &items).title(), "Dermatology");
    }

    #[test]
    fn miss_yields_sentinel() {
        let items = specializations();
        let r = resolve(Some(99), &items);
        assert!(!r.is_found());
        assert_eq!(r.title(), UNRESOLVED_TITLE);
        assert_eq!(resolve(None, &items), Resolved::Unresolved);
        assert_eq!(resolve(Some(1), &[]), Resolved::Unresolved);
    }
}
