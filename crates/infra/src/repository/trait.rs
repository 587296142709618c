use std::sync::Arc;

use lodgebase_core::{DomainResult, Record};

/// Keyed store for a single entity kind.
///
/// Every operation is atomic with respect to other operations on the same
/// repository. Field validation already happened in the entity layer; the
/// only check `add` performs is key uniqueness.
pub trait Repository<E: Record>: Send + Sync {
    /// Store a new entity. A duplicate id is a `Conflict`.
    fn add(&self, entity: E) -> DomainResult<()>;

    /// Entity for `id`, or `None`. Never errors.
    fn get(&self, id: &E::Id) -> Option<E>;

    /// Snapshot of every entity, in insertion order.
    fn get_all(&self) -> Vec<E>;

    /// First entity whose named attribute equals `value` (by value).
    fn get_by_attribute(&self, name: &str, value: &serde_json::Value) -> Option<E>;

    /// Apply a partial update atomically and return the updated entity.
    ///
    /// A missing id is `NotFound`; an invalid field leaves the entity untouched.
    fn update(&self, id: &E::Id, patch: &E::Patch) -> DomainResult<E>;

    /// Remove and return the entity. A missing id is a no-op (`None`).
    fn delete(&self, id: &E::Id) -> Option<E>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E, R> Repository<E> for Arc<R>
where
    E: Record,
    R: Repository<E> + ?Sized,
{
    fn add(&self, entity: E) -> DomainResult<()> {
        (**self).add(entity)
    }

    fn get(&self, id: &E::Id) -> Option<E> {
        (**self).get(id)
    }

    fn get_all(&self) -> Vec<E> {
        (**self).get_all()
    }

    fn get_by_attribute(&self, name: &str, value: &serde_json::Value) -> Option<E> {
        (**self).get_by_attribute(name, value)
    }

    fn update(&self, id: &E::Id, patch: &E::Patch) -> DomainResult<E> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: &E::Id) -> Option<E> {
        (**self).delete(id)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}
