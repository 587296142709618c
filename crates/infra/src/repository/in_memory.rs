use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use lodgebase_core::entity::same_value;
use lodgebase_core::{DomainError, DomainResult, Record};

use super::r#trait::Repository;

#[derive(Debug)]
struct Slots<E: Record> {
    entries: HashMap<E::Id, E>,
    order: Vec<E::Id>,
}

/// In-memory repository for tests/dev and single-process deployments.
///
/// Updates are applied to a copy and swapped in under the write lock, so a
/// reader never observes a half-applied patch.
#[derive(Debug)]
pub struct InMemoryRepository<E: Record> {
    inner: RwLock<Slots<E>>,
}

impl<E: Record> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Slots {
                entries: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }

    // Writes never leave a partially-updated entry behind, so a poisoned lock
    // still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, Slots<E>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Slots<E>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: Record> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Record> Repository<E> for InMemoryRepository<E> {
    fn add(&self, entity: E) -> DomainResult<()> {
        let mut slots = self.write();
        let id = entity.id().clone();
        if slots.entries.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "{} `{id}` already exists",
                E::KIND
            )));
        }
        slots.order.push(id.clone());
        slots.entries.insert(id, entity);
        Ok(())
    }

    fn get(&self, id: &E::Id) -> Option<E> {
        self.read().entries.get(id).cloned()
    }

    fn get_all(&self) -> Vec<E> {
        let slots = self.read();
        slots
            .order
            .iter()
            .filter_map(|id| slots.entries.get(id).cloned())
            .collect()
    }

    fn get_by_attribute(&self, name: &str, value: &serde_json::Value) -> Option<E> {
        let slots = self.read();
        slots
            .order
            .iter()
            .filter_map(|id| slots.entries.get(id))
            .find(|entity| {
                entity
                    .attribute(name)
                    .is_some_and(|found| same_value(&found, value))
            })
            .cloned()
    }

    fn update(&self, id: &E::Id, patch: &E::Patch) -> DomainResult<E> {
        let mut slots = self.write();
        let mut next = slots
            .entries
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(E::KIND, id))?;
        next.apply_patch(patch)?;
        slots.entries.insert(id.clone(), next.clone());
        Ok(next)
    }

    fn delete(&self, id: &E::Id) -> Option<E> {
        let mut slots = self.write();
        let removed = slots.entries.remove(id)?;
        slots.order.retain(|existing| existing != id);
        Some(removed)
    }

    fn len(&self) -> usize {
        self.read().entries.len()
    }
}
