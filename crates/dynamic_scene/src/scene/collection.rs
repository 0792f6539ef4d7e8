//! Observable collection of dynamic objects
//!
//! The collection is a cheap-to-clone handle; clones share the same objects
//! and listeners. Every structural mutation (an id becoming present or
//! absent) is reported to subscribers as a [`CollectionChange`]. Edits to an
//! object's properties are not structural and are not reported.
//!
//! Listeners run synchronously on the mutating thread after the collection's
//! lock has been released, so a listener may read the collection.

use super::entity::{DynamicObject, DynamicObjectRef, EntityId};
use slotmap::{new_key_type, SlotMap};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};

new_key_type! {
    /// Key of a registered change listener
    pub struct ListenerKey;
}

/// Ids that became present and ids that became absent in one mutation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionChange {
    /// Ids newly present
    pub added: Vec<EntityId>,
    /// Ids newly absent
    pub removed: Vec<EntityId>,
}

impl CollectionChange {
    /// Whether the change reports nothing
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Callback invoked for every structural change
pub type CollectionListener = dyn Fn(&CollectionChange) + Send + Sync;

struct CollectionState {
    objects: HashMap<EntityId, DynamicObjectRef>,
    listeners: SlotMap<ListenerKey, Arc<CollectionListener>>,
}

/// Observable mapping from [`EntityId`] to [`DynamicObject`]
#[derive(Clone)]
pub struct DynamicObjectCollection {
    state: Arc<Mutex<CollectionState>>,
}

impl DynamicObjectCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(CollectionState {
                objects: HashMap::new(),
                listeners: SlotMap::with_key(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CollectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the object with `id`, creating an empty one if absent
    pub fn get_or_create_object(&self, id: impl Into<EntityId>) -> DynamicObjectRef {
        let id = id.into();
        let (object, listeners) = {
            let mut state = self.lock();
            if let Some(existing) = state.objects.get(&id) {
                return Arc::clone(existing);
            }
            let object = Arc::new(RwLock::new(DynamicObject::new(id.clone())));
            state.objects.insert(id.clone(), Arc::clone(&object));
            (object, Self::listeners_of(&state))
        };

        Self::notify(&listeners, &CollectionChange {
            added: vec![id],
            removed: Vec::new(),
        });
        object
    }

    /// Insert `object`, replacing any object with the same id
    ///
    /// Replacement keeps the id present, so only a new id is reported.
    pub fn add_object(&self, object: DynamicObject) -> DynamicObjectRef {
        let id = object.id().clone();
        let handle = Arc::new(RwLock::new(object));
        let (is_new, listeners) = {
            let mut state = self.lock();
            let is_new = state.objects.insert(id.clone(), Arc::clone(&handle)).is_none();
            (is_new, Self::listeners_of(&state))
        };

        if is_new {
            Self::notify(&listeners, &CollectionChange {
                added: vec![id],
                removed: Vec::new(),
            });
        }
        handle
    }

    /// Remove the object with `id`, returning whether it was present
    pub fn remove_object(&self, id: &EntityId) -> bool {
        let listeners = {
            let mut state = self.lock();
            if state.objects.remove(id).is_none() {
                return false;
            }
            Self::listeners_of(&state)
        };

        Self::notify(&listeners, &CollectionChange {
            added: Vec::new(),
            removed: vec![id.clone()],
        });
        true
    }

    /// Remove every object
    pub fn clear(&self) {
        let (removed, listeners) = {
            let mut state = self.lock();
            if state.objects.is_empty() {
                return;
            }
            let removed: Vec<EntityId> = state.objects.drain().map(|(id, _)| id).collect();
            (removed, Self::listeners_of(&state))
        };

        log::debug!("Cleared {} dynamic objects", removed.len());
        Self::notify(&listeners, &CollectionChange {
            added: Vec::new(),
            removed,
        });
    }

    /// The object with `id`, if present
    pub fn get_object(&self, id: &EntityId) -> Option<DynamicObjectRef> {
        self.lock().objects.get(id).cloned()
    }

    /// Whether an object with `id` is present
    pub fn contains(&self, id: &EntityId) -> bool {
        self.lock().objects.contains_key(id)
    }

    /// Ids of all present objects, in no particular order
    pub fn ids(&self) -> Vec<EntityId> {
        self.lock().objects.keys().cloned().collect()
    }

    /// Snapshot of all present objects, in no particular order
    pub fn objects(&self) -> Vec<DynamicObjectRef> {
        self.lock().objects.values().cloned().collect()
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.lock().objects.len()
    }

    /// Whether the collection holds no objects
    pub fn is_empty(&self) -> bool {
        self.lock().objects.is_empty()
    }

    /// Register `listener` for structural changes
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// unsubscribed or dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&CollectionChange) + Send + Sync + 'static,
    {
        let key = self.lock().listeners.insert(Arc::new(listener));
        Subscription {
            state: Arc::downgrade(&self.state),
            key: Some(key),
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Whether `self` and `other` are handles to the same collection
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    fn listeners_of(state: &CollectionState) -> Vec<Arc<CollectionListener>> {
        state.listeners.values().cloned().collect()
    }

    fn notify(listeners: &[Arc<CollectionListener>], change: &CollectionChange) {
        for listener in listeners {
            (**listener)(change);
        }
    }
}

impl Default for DynamicObjectCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for DynamicObjectCollection {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for DynamicObjectCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("DynamicObjectCollection")
            .field("objects", &state.objects.len())
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

/// Registration of a change listener on a collection
///
/// Dropping the subscription unregisters the listener.
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    state: Weak<Mutex<CollectionState>>,
    key: Option<ListenerKey>,
}

impl Subscription {
    /// Unregister the listener; later calls do nothing
    pub fn unsubscribe(&mut self) {
        let Some(key) = self.key.take() else {
            return;
        };
        if let Some(state) = self.state.upgrade() {
            state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .listeners
                .remove(key);
        }
    }

    /// Whether the listener is still registered
    pub fn is_active(&self) -> bool {
        self.key.is_some() && self.state.strong_count() > 0
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
