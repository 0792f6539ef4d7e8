//! Scene primitive registry
//!
//! The registry is the host's storage of drawable primitives. Visualizers
//! create and remove primitives through the [`PrimitiveRegistry`] trait and
//! hold on to the returned [`PrimitiveHandle`]s; they never rely on a
//! primitive keeping its index between calls.
//!
//! Several visualizers may share one registry, each managing its own
//! primitives, so the registry is passed around as a [`SharedRegistry`].

use super::polyline::Polyline;
use slotmap::{new_key_type, SlotMap};
use std::sync::{Arc, Mutex};

new_key_type! {
    /// Handle to a primitive stored in a registry
    pub struct PrimitiveHandle;
}

/// Capability interface over a host's primitive storage
pub trait PrimitiveRegistry: Send {
    /// Create a default polyline and return its handle
    fn create_polyline(&mut self) -> PrimitiveHandle;

    /// Remove a primitive, returning whether it was present
    fn remove(&mut self, handle: PrimitiveHandle) -> bool;

    /// Number of live primitives
    fn len(&self) -> usize;

    /// Whether the registry holds no primitives
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Handle of the primitive at `index` in the current ordering
    fn get(&self, index: usize) -> Option<PrimitiveHandle>;

    /// Whether `handle` refers to a live primitive
    fn contains(&self, handle: PrimitiveHandle) -> bool;

    /// Borrow a polyline
    fn polyline(&self, handle: PrimitiveHandle) -> Option<&Polyline>;

    /// Mutably borrow a polyline
    fn polyline_mut(&mut self, handle: PrimitiveHandle) -> Option<&mut Polyline>;
}

/// Registry shared between visualizers and the renderer
pub type SharedRegistry<R> = Arc<Mutex<R>>;

/// Slot-map backed primitive storage
///
/// Lookup by handle is O(1). Index order is creation order; removing a
/// primitive shifts the indices of everything created after it.
#[derive(Debug, Default)]
pub struct PrimitiveCollection {
    polylines: SlotMap<PrimitiveHandle, Polyline>,
    order: Vec<PrimitiveHandle>,
}

impl PrimitiveCollection {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry wrapped for sharing
    pub fn shared() -> SharedRegistry<Self> {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Iterate live primitives in index order
    pub fn iter(&self) -> impl Iterator<Item = (PrimitiveHandle, &Polyline)> {
        self.order
            .iter()
            .filter_map(|&handle| self.polylines.get(handle).map(|p| (handle, p)))
    }

    /// Number of primitives with unconsumed writes
    pub fn dirty_count(&self) -> usize {
        self.polylines.values().filter(|p| !p.dirty().is_empty()).count()
    }
}

impl PrimitiveRegistry for PrimitiveCollection {
    fn create_polyline(&mut self) -> PrimitiveHandle {
        let handle = self.polylines.insert(Polyline::new());
        self.order.push(handle);
        handle
    }

    fn remove(&mut self, handle: PrimitiveHandle) -> bool {
        if self.polylines.remove(handle).is_none() {
            return false;
        }
        if let Some(pos) = self.order.iter().position(|&h| h == handle) {
            self.order.remove(pos);
        }
        true
    }

    fn len(&self) -> usize {
        self.polylines.len()
    }

    fn get(&self, index: usize) -> Option<PrimitiveHandle> {
        self.order.get(index).copied()
    }

    fn contains(&self, handle: PrimitiveHandle) -> bool {
        self.polylines.contains_key(handle)
    }

    fn polyline(&self, handle: PrimitiveHandle) -> Option<&Polyline> {
        self.polylines.get(handle)
    }

    fn polyline_mut(&mut self, handle: PrimitiveHandle) -> Option<&mut Polyline> {
        self.polylines.get_mut(handle)
    }
}
