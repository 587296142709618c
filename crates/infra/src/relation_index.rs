//! One-directional relation index: foreign id → set of dependent ids.
//!
//! Entities only hold the id of what they point at (a review knows its place).
//! The reverse direction ("reviews of this place") lives here instead of as
//! back-pointers on the entities, so there are no ownership cycles.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct RelationIndex<K, V> {
    links: HashMap<K, BTreeSet<V>>,
}

impl<K, V> Default for RelationIndex<K, V> {
    fn default() -> Self {
        Self {
            links: HashMap::new(),
        }
    }
}

impl<K, V> RelationIndex<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Ord,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link(&mut self, key: K, dependent: V) {
        self.links.entry(key).or_default().insert(dependent);
    }

    pub fn unlink(&mut self, key: &K, dependent: &V) {
        if let Some(set) = self.links.get_mut(key) {
            set.remove(dependent);
            if set.is_empty() {
                self.links.remove(key);
            }
        }
    }

    /// Move `dependent` from `from` to `to`. No-op when the keys are equal.
    pub fn relink(&mut self, from: &K, to: K, dependent: V) {
        if *from == to {
            return;
        }
        self.unlink(from, &dependent);
        self.link(to, dependent);
    }

    /// Dependents of `key`, in id order.
    pub fn dependents(&self, key: &K) -> Vec<V> {
        self.links
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_dependents(&self, key: &K) -> bool {
        self.links.contains_key(key)
    }

    /// Drop `key` entirely, returning what depended on it.
    pub fn remove_key(&mut self, key: &K) -> BTreeSet<V> {
        self.links.remove(key).unwrap_or_default()
    }

    /// Number of keys with at least one dependent.
    pub fn key_count(&self) -> usize {
        self.links.len()
    }
}
