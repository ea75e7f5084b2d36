//! Brick list diffing - append vs. replacement.
//!
//! Identity is the brick URI. A payload change under the same URI is not a
//! change as far as placement is concerned.

use std::collections::HashSet;

use indexmap::IndexMap;
use masonry_api::Brick;

/// Result of comparing the previous brick list with a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffOutcome {
    /// `delta.len() < new.len()`. When every brick is new this is false, even
    /// if the previous list was empty.
    pub appended: bool,
    /// Bricks whose URI is absent from the previous list, in new-list order.
    pub delta: Vec<Brick>,
    /// Base arrival index for the delta: the previous list's length.
    pub offset: usize,
    /// Every previous URI is still present.
    pub superset: bool,
}

impl DiffOutcome {
    /// Whether only the delta needs resolving and existing placement stays.
    pub fn is_incremental(&self) -> bool {
        self.appended && self.superset
    }
}

/// Compare `previous` with `next` by URI.
pub fn diff(previous: &[Brick], next: &[Brick]) -> DiffOutcome {
    let known: HashSet<&str> = previous.iter().map(Brick::key).collect();
    let incoming: HashSet<&str> = next.iter().map(Brick::key).collect();

    let delta: Vec<Brick> = next
        .iter()
        .filter(|b| !known.contains(b.key()))
        .cloned()
        .collect();

    DiffOutcome {
        appended: delta.len() < next.len(),
        superset: known.iter().all(|uri| incoming.contains(uri)),
        offset: previous.len(),
        delta,
    }
}

/// Drop repeated URIs, keeping the first occurrence of each.
///
/// Returns the unique bricks in order and the URIs that were dropped.
pub fn unique_bricks(bricks: Vec<Brick>) -> (Vec<Brick>, Vec<String>) {
    let mut unique: IndexMap<String, Brick> = IndexMap::with_capacity(bricks.len());
    let mut duplicates = Vec::new();

    for brick in bricks {
        if unique.contains_key(brick.key()) {
            duplicates.push(brick.uri);
        } else {
            unique.insert(brick.uri.clone(), brick);
        }
    }

    (unique.into_values().collect(), duplicates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bricks(uris: &[&str]) -> Vec<Brick> {
        uris.iter().map(|u| Brick::new(*u)).collect()
    }

    fn uris(bricks: &[Brick]) -> Vec<&str> {
        bricks.iter().map(Brick::key).collect()
    }

    #[test]
    fn test_append_yields_only_the_new_bricks() {
        let outcome = diff(&bricks(&["A", "B", "C"]), &bricks(&["A", "B", "C", "D", "E"]));
        assert!(outcome.appended);
        assert!(outcome.superset);
        assert!(outcome.is_incremental());
        assert_eq!(uris(&outcome.delta), vec!["D", "E"]);
        assert_eq!(outcome.offset, 3);
    }

    #[test]
    fn test_wholesale_replacement_is_not_an_append() {
        let outcome = diff(&bricks(&["A", "B", "C"]), &bricks(&["X", "Y"]));
        assert!(!outcome.appended);
        assert!(!outcome.is_incremental());
        assert_eq!(uris(&outcome.delta), vec!["X", "Y"]);
        assert_eq!(outcome.offset, 3);
    }

    #[test]
    fn test_all_new_against_empty_previous_is_not_an_append() {
        // Same-length delta: every brick is new, so a full recompute follows.
        let outcome = diff(&[], &bricks(&["A", "B"]));
        assert!(!outcome.appended);
        assert_eq!(outcome.offset, 0);
    }

    #[test]
    fn test_identical_lists_have_empty_delta() {
        let outcome = diff(&bricks(&["A", "B"]), &bricks(&["A", "B"]));
        assert!(outcome.appended);
        assert!(outcome.delta.is_empty());
        assert!(outcome.is_incremental());
    }

    #[test]
    fn test_partial_overlap_is_appended_but_not_a_superset() {
        // Appended by the length rule, yet B and C were dropped.
        let outcome = diff(&bricks(&["A", "B", "C"]), &bricks(&["A", "X"]));
        assert!(outcome.appended);
        assert!(!outcome.superset);
        assert!(!outcome.is_incremental());
        assert_eq!(uris(&outcome.delta), vec!["X"]);
    }

    #[test]
    fn test_identity_is_the_uri_not_the_payload() {
        let previous = vec![Brick::new("A").with_data(serde_json::json!(1))];
        let next = vec![
            Brick::new("A").with_data(serde_json::json!(2)),
            Brick::new("B"),
        ];
        let outcome = diff(&previous, &next);
        assert_eq!(uris(&outcome.delta), vec!["B"]);
    }

    #[test]
    fn test_unique_bricks_keeps_first_occurrence() {
        let input = vec![
            Brick::new("A").with_data(serde_json::json!("first")),
            Brick::new("B"),
            Brick::new("A").with_data(serde_json::json!("second")),
        ];
        let (unique, duplicates) = unique_bricks(input);
        assert_eq!(uris(&unique), vec!["A", "B"]);
        assert_eq!(unique[0].data, serde_json::json!("first"));
        assert_eq!(duplicates, vec!["A".to_string()]);
    }
}
