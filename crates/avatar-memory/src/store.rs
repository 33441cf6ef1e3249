// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-session mapping from entity name to its current summary.

use std::collections::{BTreeMap, HashMap};

use crate::types::EntityEntry;

/// Entity summaries keyed by case-sensitive name. Last write wins.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entries: HashMap<String, String>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `name`, or `None` if the entity is not yet known.
    pub fn get(&self, name: &str) -> Option<EntityEntry> {
        self.entries
            .get(name)
            .map(|summary| EntityEntry::new(name, summary.clone()))
    }

    /// Inserts or overwrites the summary for `name`.
    pub fn put(&mut self, name: impl Into<String>, summary: impl Into<String>) {
        self.entries.insert(name.into(), summary.into());
    }

    /// Snapshot of every entry, ordered by name.
    pub fn all(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(name, summary)| (name.clone(), summary.clone()))
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unknown_entity_is_absent() {
        let store = EntityStore::new();
        assert_eq!(store.get("Alice"), None);
        assert!(!store.contains("Alice"));
    }

    #[test]
    fn put_overwrites_rather_than_appends() {
        let mut store = EntityStore::new();
        store.put("Alice", "Lives in Paris.");
        store.put("Alice", "Lives in Lyon.");
        assert_eq!(
            store.get("Alice"),
            Some(EntityEntry::new("Alice", "Lives in Lyon."))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut store = EntityStore::new();
        store.put("paris", "lowercase");
        store.put("Paris", "capitalized");
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("paris").unwrap().summary, "lowercase");
    }

    #[test]
    fn all_is_sorted_and_detached() {
        let mut store = EntityStore::new();
        store.put("Zed", "z");
        store.put("Alice", "a");
        let snapshot = store.all();
        store.clear();
        let names: Vec<_> = snapshot.keys().cloned().collect();
        assert_eq!(names, vec!["Alice", "Zed"]);
        assert!(store.is_empty());
    }

    proptest! {
        #[test]
        fn last_write_wins(writes in proptest::collection::vec(("[a-c]", "[a-z]{0,8}"), 0..32)) {
            let mut store = EntityStore::new();
            let mut expected = BTreeMap::new();
            for (name, summary) in &writes {
                store.put(name.clone(), summary.clone());
                expected.insert(name.clone(), summary.clone());
            }
            prop_assert_eq!(store.all(), expected);
        }
    }
}
