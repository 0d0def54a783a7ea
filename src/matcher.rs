//! Set-triple search over a classified layout.
//!
//! Three cards form a set when every attribute is all-equal or all-distinct
//! across them. With values in {1, 2, 3} the third card of a set is fully
//! determined by any two: equal values repeat, distinct ones complete to
//! `6 - a - b`. The search therefore looks up one completion per pair.

use crate::models::{AttributeGrid, Attributes, GridPos, SetTriple};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Value completing `a` and `b` to an all-equal or all-distinct triple
pub fn complete_value(a: u8, b: u8) -> u8 {
    if a == b { a } else { 6 - a - b }
}

/// Feature vector of the unique card completing `a` and `b` to a set
pub fn third_features(a: &Attributes, b: &Attributes) -> [u8; 4] {
    let (fa, fb) = (a.features(), b.features());
    std::array::from_fn(|i| complete_value(fa[i], fb[i]))
}

/// Direct rule check: every attribute all-equal or all-distinct
pub fn is_set(a: &Attributes, b: &Attributes, c: &Attributes) -> bool {
    let (fa, fb, fc) = (a.features(), b.features(), c.features());
    (0..4).all(|i| {
        let all_equal = fa[i] == fb[i] && fb[i] == fc[i];
        let all_distinct = fa[i] != fb[i] && fb[i] != fc[i] && fa[i] != fc[i];
        all_equal || all_distinct
    })
}

/// Every set on the board, each reported once regardless of discovery order.
pub fn find_triples(attributes: &AttributeGrid) -> BTreeSet<SetTriple> {
    let mut by_features: HashMap<[u8; 4], Vec<GridPos>> = HashMap::new();
    for (pos, attrs) in attributes.iter() {
        by_features.entry(attrs.features()).or_default().push(pos);
    }

    let cards: Vec<(GridPos, &Attributes)> = attributes.iter().collect();
    let mut triples = BTreeSet::new();
    for (i, &(p1, a1)) in cards.iter().enumerate() {
        for &(p2, a2) in &cards[i + 1..] {
            let Some(matches) = by_features.get(&third_features(a1, a2)) else {
                continue;
            };
            triples.extend(
                matches
                    .iter()
                    .filter_map(|&p3| SetTriple::new(p1, p2, p3)),
            );
        }
    }

    debug!(triples = triples.len(), "set search finished");
    triples
}

/// Reference search checking every unordered triple with [`is_set`]
pub fn find_triples_brute_force(attributes: &AttributeGrid) -> BTreeSet<SetTriple> {
    let cards: Vec<(GridPos, &Attributes)> = attributes.iter().collect();
    let mut triples = BTreeSet::new();
    for i in 0..cards.len() {
        for j in i + 1..cards.len() {
            for k in j + 1..cards.len() {
                let (a, b, c) = (cards[i], cards[j], cards[k]);
                if is_set(a.1, b.1, c.1) {
                    triples.extend(SetTriple::new(a.0, b.0, c.0));
                }
            }
        }
    }
    triples
}
