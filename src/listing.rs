// SPDX-License-Identifier: MIT

//! In-memory list filtering and sorting for dashboard screens.
//!
//! Collections are small enough to hold client-side, so list endpoints fetch
//! everything and filter/sort here rather than pushing predicates into
//! Firestore. Matching is a case-insensitive substring test against one or
//! two text fields; sorting is a stable single-key sort.

use serde::Deserialize;

/// Sort direction toggled by the list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Case-insensitive substring match against any of the given fields.
///
/// An empty query matches everything. `None` fields never match, mirroring
/// records with the field unset.
pub fn matches_query(query: &str, fields: &[Option<&str>]) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    fields
        .iter()
        .flatten()
        .any(|f| f.to_lowercase().contains(&needle))
}

/// Stable sort by a lowercased string key.
///
/// Stability matters: toggling asc -> desc -> asc must restore the original
/// relative order of equal keys.
pub fn sort_by_key_stable<T, F>(items: &mut [T], order: SortOrder, key: F)
where
    F: Fn(&T) -> String,
{
    match order {
        SortOrder::Asc => items.sort_by_key(|item| key(item).to_lowercase()),
        SortOrder::Desc => {
            items.sort_by(|a, b| key(b).to_lowercase().cmp(&key(a).to_lowercase()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_query_case_insensitive() {
        assert!(matches_query("liv", &[Some("Olivia Martin"), None]));
        assert!(matches_query("MARTIN", &[Some("Olivia Martin"), None]));
        assert!(matches_query(
            "email.com",
            &[Some("Olivia Martin"), Some("olivia.martin@email.com")]
        ));
        assert!(!matches_query("zumba", &[Some("Olivia Martin"), None]));
    }

    #[test]
    fn test_empty_query_matches_all() {
        assert!(matches_query("", &[Some("anything")]));
        assert!(matches_query("", &[None]));
    }

    #[test]
    fn test_none_fields_never_match() {
        assert!(!matches_query("x", &[None, None]));
    }

    #[test]
    fn test_filter_returns_exact_subset() {
        let members = [
            ("Olivia Martin", "olivia.martin@email.com"),
            ("Jackson Lee", "jackson.lee@email.com"),
            ("Isabella Nguyen", "isabella.nguyen@email.com"),
        ];

        let hits: Vec<&str> = members
            .iter()
            .filter(|(name, email)| matches_query("LEE", &[Some(name), Some(email)]))
            .map(|(name, _)| *name)
            .collect();

        assert_eq!(hits, vec!["Jackson Lee"]);
    }

    #[test]
    fn test_sort_orders() {
        let mut names = vec!["charlie", "Alice", "bob"];
        sort_by_key_stable(&mut names, SortOrder::Asc, |n| n.to_string());
        assert_eq!(names, vec!["Alice", "bob", "charlie"]);

        sort_by_key_stable(&mut names, SortOrder::Desc, |n| n.to_string());
        assert_eq!(names, vec!["charlie", "bob", "Alice"]);
    }

    #[test]
    fn test_sort_toggle_round_trip_is_stable() {
        // Duplicate keys with distinct payloads: the asc -> desc -> asc round
        // trip must restore the original relative order.
        let original = vec![("yoga", 1), ("hiit", 2), ("yoga", 3), ("hiit", 4)];
        let mut items = original.clone();

        sort_by_key_stable(&mut items, SortOrder::Asc, |(k, _)| k.to_string());
        let after_asc = items.clone();

        sort_by_key_stable(&mut items, SortOrder::Desc, |(k, _)| k.to_string());
        sort_by_key_stable(&mut items, SortOrder::Asc, |(k, _)| k.to_string());

        assert_eq!(items, after_asc);
    }
}
