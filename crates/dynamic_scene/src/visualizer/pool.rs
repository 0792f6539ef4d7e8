//! Primitive Pool
//!
//! Caches one primitive per entity so an entity whose visual description
//! disappears and later returns gets its old primitive back, hidden in the
//! meantime, instead of a destroy/recreate round trip through the registry.
//!
//! # Invariants
//!
//! - At most one live primitive per [`EntityId`].
//! - Every handle in the pool was created by the registry passed to the
//!   pool's operations and is removed from it on [`release`](PrimitivePool::release).

use crate::render::{PrimitiveHandle, PrimitiveRegistry};
use crate::scene::EntityId;
use std::collections::HashMap;

/// Cached primitive for one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolEntry {
    /// The entity's primitive
    pub handle: PrimitiveHandle,
    /// Last value actually sampled from the entity's `show` property
    pub last_show: Option<bool>,
}

/// Entity id to primitive cache
#[derive(Debug, Default)]
pub struct PrimitivePool {
    entries: HashMap<EntityId, PoolEntry>,
}

impl PrimitivePool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached entry for `id`
    pub fn get(&self, id: &EntityId) -> Option<&PoolEntry> {
        self.entries.get(id)
    }

    /// Mutable access to the cached entry for `id`
    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut PoolEntry> {
        self.entries.get_mut(id)
    }

    /// The cached entry for `id`, creating one with `factory` if absent
    ///
    /// The second value is `true` when `factory` ran.
    pub fn get_or_create<F>(&mut self, id: &EntityId, factory: F) -> (&mut PoolEntry, bool)
    where
        F: FnOnce() -> PrimitiveHandle,
    {
        let mut created = false;
        let entry = self.entries.entry(id.clone()).or_insert_with(|| {
            created = true;
            PoolEntry {
                handle: factory(),
                last_show: None,
            }
        });
        (entry, created)
    }

    /// Drop the entry for `id` and remove its primitive from `registry`
    ///
    /// Releasing an id with no entry does nothing.
    pub fn release<R: PrimitiveRegistry + ?Sized>(&mut self, id: &EntityId, registry: &mut R) -> Option<PrimitiveHandle> {
        let entry = self.entries.remove(id)?;
        registry.remove(entry.handle);
        log::debug!("Released polyline {:?} for entity {}", entry.handle, id);
        Some(entry.handle)
    }

    /// Release every entry whose id fails `keep`
    pub fn release_unless<R, F>(&mut self, registry: &mut R, mut keep: F) -> usize
    where
        R: PrimitiveRegistry + ?Sized,
        F: FnMut(&EntityId) -> bool,
    {
        let stale: Vec<EntityId> = self.entries.keys().filter(|id| !keep(id)).cloned().collect();
        for id in &stale {
            self.release(id, registry);
        }
        stale.len()
    }

    /// Release every entry
    pub fn release_all<R: PrimitiveRegistry + ?Sized>(&mut self, registry: &mut R) -> usize {
        self.release_unless(registry, |_| false)
    }

    /// Hide the primitive for `id` without releasing it
    ///
    /// Returns whether a primitive was hidden.
    pub fn hide<R: PrimitiveRegistry + ?Sized>(&self, id: &EntityId, registry: &mut R) -> bool {
        let Some(entry) = self.entries.get(id) else {
            return false;
        };
        match registry.polyline_mut(entry.handle) {
            Some(polyline) => {
                polyline.set_show(false);
                true
            }
            None => false,
        }
    }

    /// Forget the entry for `id` without touching any registry
    pub fn forget(&mut self, id: &EntityId) -> Option<PoolEntry> {
        self.entries.remove(id)
    }

    /// Whether `id` has an entry
    pub fn contains(&self, id: &EntityId) -> bool {
        self.entries.contains_key(id)
    }

    /// Ids with an entry, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.entries.keys()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PrimitiveCollection;

    #[test]
    fn test_get_or_create_runs_factory_once() {
        let mut registry = PrimitiveCollection::new();
        let mut pool = PrimitivePool::new();
        let id = EntityId::from("test");

        let (first, created) = pool.get_or_create(&id, || registry.create_polyline());
        let first = first.handle;
        assert!(created);

        let (second, created) = pool.get_or_create(&id, || registry.create_polyline());
        assert!(!created);
        assert_eq!(second.handle, first);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_release_removes_from_registry() {
        let mut registry = PrimitiveCollection::new();
        let mut pool = PrimitivePool::new();
        let id = EntityId::from("test");
        let handle = pool.get_or_create(&id, || registry.create_polyline()).0.handle;

        assert_eq!(pool.release(&id, &mut registry), Some(handle));
        assert!(pool.is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_release_absent_id_is_noop() {
        let mut registry = PrimitiveCollection::new();
        let mut pool = PrimitivePool::new();
        assert_eq!(pool.release(&EntityId::from("missing"), &mut registry), None);
    }

    #[test]
    fn test_hide_keeps_primitive() {
        let mut registry = PrimitiveCollection::new();
        let mut pool = PrimitivePool::new();
        let id = EntityId::from("test");
        let handle = pool.get_or_create(&id, || registry.create_polyline()).0.handle;

        assert!(pool.hide(&id, &mut registry));
        assert!(!registry.polyline(handle).unwrap().show());
        assert_eq!(registry.len(), 1);
        assert!(!pool.hide(&EntityId::from("missing"), &mut registry));
    }

    #[test]
    fn test_release_unless() {
        let mut registry = PrimitiveCollection::new();
        let mut pool = PrimitivePool::new();
        for name in ["a", "b", "c"] {
            pool.get_or_create(&EntityId::from(name), || registry.create_polyline());
        }

        let released = pool.release_unless(&mut registry, |id| id.as_str() == "b");

        assert_eq!(released, 2);
        assert_eq!(registry.len(), 1);
        assert!(pool.contains(&EntityId::from("b")));
        assert_eq!(pool.ids().collect::<Vec<_>>(), vec![&EntityId::from("b")]);
    }
}
