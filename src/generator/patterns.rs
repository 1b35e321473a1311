//! Triple pattern keys from linked positions

use std::collections::{BTreeMap, BTreeSet};

use geoqa_types::{Category, LinkingResult, TriplePatternKey};

/// Category sets of the anchors (classes and entities) at each start position
pub fn categories_by_position(linking: &LinkingResult) -> BTreeMap<usize, BTreeSet<Category>> {
    let mut by_position: BTreeMap<usize, BTreeSet<Category>> = BTreeMap::new();
    for candidate in linking.anchors() {
        for &position in candidate.start_positions() {
            by_position
                .entry(position)
                .or_default()
                .insert(candidate.category());
        }
    }
    by_position
}

/// Keys of every template shape the linked positions can support.
///
/// An empty set means the question has no linkable anchors.
pub fn triple_pattern_keys(linking: &LinkingResult) -> BTreeSet<TriplePatternKey> {
    let by_position = categories_by_position(linking);
    let class_only = TriplePatternKey::single(Category::Class);

    if by_position.len() == 1 {
        if let Some(categories) = by_position.values().next() {
            if categories.contains(&Category::Class) {
                return BTreeSet::from([class_only]);
            }
        }
    }

    let positions: Vec<&BTreeSet<Category>> = by_position.values().collect();
    let mut keys = BTreeSet::new();
    for (i, first) in positions.iter().enumerate() {
        for second in &positions[i + 1..] {
            for &a in first.iter() {
                for &b in second.iter() {
                    keys.insert(TriplePatternKey::pair(a, b));
                }
            }
        }
    }

    if linking.entities().is_empty() && !linking.classes().is_empty() {
        keys.insert(class_only);
    }

    keys
}
