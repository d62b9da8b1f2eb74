//! Pairwise tag co-occurrence counting

use crate::data::TagSet;
use itertools::Itertools;
use rayon::prelude::*;
use std::collections::HashMap;

/// Canonical unordered pair of distinct tags, smaller tag first
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagPair {
    first: String,
    second: String,
}

impl TagPair {
    /// Build the canonical pair; `None` when both tags are equal
    pub fn new(a: &str, b: &str) -> Option<Self> {
        match a.cmp(b) {
            std::cmp::Ordering::Less => Some(Self {
                first: a.to_string(),
                second: b.to_string(),
            }),
            std::cmp::Ordering::Greater => Some(Self {
                first: b.to_string(),
                second: a.to_string(),
            }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

/// Co-occurrence counts keyed by canonical tag pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairCounts {
    counts: HashMap<TagPair, u32>,
}

impl PairCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one co-occurrence of `a` and `b`; equal tags are ignored
    pub fn increment(&mut self, a: &str, b: &str) {
        if let Some(pair) = TagPair::new(a, b) {
            *self.counts.entry(pair).or_insert(0) += 1;
        }
    }

    /// Count for the pair in either order
    pub fn get(&self, a: &str, b: &str) -> u32 {
        TagPair::new(a, b)
            .and_then(|pair| self.counts.get(&pair).copied())
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Largest count across all pairs
    pub fn max_count(&self) -> Option<u32> {
        self.counts.values().copied().max()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TagPair, u32)> {
        self.counts.iter().map(|(pair, &count)| (pair, count))
    }

    /// Pairs in canonical key order
    pub fn sorted(&self) -> Vec<(&TagPair, u32)> {
        let mut pairs: Vec<(&TagPair, u32)> = self.iter().collect();
        pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
        pairs
    }

    fn merge(mut self, other: PairCounts) -> PairCounts {
        // Fold the smaller map into the larger one
        let (mut into, from) = if self.counts.len() >= other.counts.len() {
            (std::mem::take(&mut self.counts), other.counts)
        } else {
            (other.counts, std::mem::take(&mut self.counts))
        };
        for (pair, count) in from {
            *into.entry(pair).or_insert(0) += count;
        }
        PairCounts { counts: into }
    }
}

/// Count co-occurring tag pairs across all tag sets.
///
/// Each set is deduplicated first; sets with fewer than two distinct tags
/// contribute nothing. Counting runs as a parallel fold/reduce over sets.
pub fn count_pairs(tag_sets: &[TagSet]) -> PairCounts {
    log::info!("Counting tag co-occurrences across {} tag sets", tag_sets.len());

    let counts = tag_sets
        .par_iter()
        .fold(PairCounts::new, |mut acc, tags| {
            let distinct: Vec<&str> = tags
                .iter()
                .map(String::as_str)
                .sorted_unstable()
                .dedup()
                .collect();
            for (a, b) in distinct.iter().tuple_combinations() {
                acc.increment(a, b);
            }
            acc
        })
        .reduce(PairCounts::new, PairCounts::merge);

    log::info!("Found {} distinct co-occurring tag pairs", counts.len());

    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> TagSet {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_three_tags_yield_three_pairs() {
        let counts = count_pairs(&[tags(&["a", "b", "c"])]);
        assert_eq!(counts.len(), 3);
        assert_eq!(counts.get("a", "b"), 1);
        assert_eq!(counts.get("a", "c"), 1);
        assert_eq!(counts.get("b", "c"), 1);
    }

    #[test]
    fn test_pair_is_order_independent() {
        assert_eq!(TagPair::new("b", "a"), TagPair::new("a", "b"));
        let pair = TagPair::new("zeta", "alpha").unwrap();
        assert_eq!(pair.first(), "alpha");
        assert_eq!(pair.second(), "zeta");

        let counts = count_pairs(&[tags(&["b", "a"]), tags(&["a", "b"])]);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("b", "a"), 2);
    }

    #[test]
    fn test_duplicates_collapsed() {
        let counts = count_pairs(&[tags(&["rust", "rust", "cargo", "cargo"])]);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("cargo", "rust"), 1);
    }

    #[test]
    fn test_small_sets_contribute_nothing() {
        let counts = count_pairs(&[tags(&["solo"]), tags(&["x", "x"]), tags(&[])]);
        assert!(counts.is_empty());
        assert_eq!(counts.max_count(), None);
    }

    #[test]
    fn test_empty_input() {
        assert!(count_pairs(&[]).is_empty());
    }

    #[test]
    fn test_counts_accumulate_across_sets() {
        let sets = vec![
            tags(&["python", "django"]),
            tags(&["python", "flask"]),
            tags(&["django", "flask"]),
            tags(&["python", "django"]),
        ];
        let counts = count_pairs(&sets);
        assert_eq!(counts.get("django", "python"), 2);
        assert_eq!(counts.get("flask", "python"), 1);
        assert_eq!(counts.get("django", "flask"), 1);
        assert_eq!(counts.max_count(), Some(2));

        let sorted: Vec<(&str, &str)> = counts
            .sorted()
            .into_iter()
            .map(|(pair, _)| (pair.first(), pair.second()))
            .collect();
        assert_eq!(
            sorted,
            vec![("django", "flask"), ("django", "python"), ("flask", "python")]
        );
    }

    #[test]
    fn test_equal_tags_never_counted() {
        let mut counts = PairCounts::new();
        counts.increment("same", "same");
        assert!(counts.is_empty());
        assert_eq!(counts.get("same", "same"), 0);
    }
}
