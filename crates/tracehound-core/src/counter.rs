//! Insertion-ordered frequency counter.
//!
//! Naive counting maps order equal counts arbitrarily; every histogram in
//! the report ties by first-seen order, so the counter remembers insertion
//! order explicitly.

use std::collections::HashMap;

/// A frequency counter whose iteration order is first-insertion order and
/// whose ranked views break count ties by first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct StableCounter {
    /// Keys in first-insertion order, paired with their counts
    entries: Vec<(String, usize)>,

    /// Key -> index into `entries`
    index: HashMap<String, usize>,
}

impl StableCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the count for `key`, inserting it on first sight
    pub fn count(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    /// The count for `key`, zero if never seen
    pub fn get(&self, key: &str) -> usize {
        self.index.get(key).map_or(0, |&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }

    /// The top `n` entries by descending count, ties broken by
    /// first-insertion order.
    pub fn top(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(usize, &str, usize)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (k, c))| (i, k.as_str(), *c))
            .collect();
        // Stable ordering: count descending, then original position
        ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
        ranked.into_iter().take(n).map(|(_, k, c)| (k, c)).collect()
    }
}
