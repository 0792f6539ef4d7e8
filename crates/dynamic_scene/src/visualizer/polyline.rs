//! Dynamic Polyline Visualizer
//!
//! Keeps a registry's polylines in step with the polyline descriptions of a
//! [`DynamicObjectCollection`].
//!
//! # Per-frame reconciliation
//!
//! [`update`](DynamicPolylineVisualizer::update) walks every object in the
//! attached collection and, for the given time:
//!
//! - hides the object's primitive if it has no polyline, no position source,
//!   no positions at that time, or `show` evaluates false
//! - otherwise creates the primitive on first sight (back-reference set
//!   before anything else) and overwrites every sampled field
//!
//! Objects that left the collection are never visited here. Structural
//! removal is handled eagerly by the collection listener, so a cleared
//! collection holds no primitives even before the next update.
//!
//! # Lock order
//!
//! visualizer state, then registry. The collection's own lock is never held
//! while either is taken.

use super::error::{VisualizerError, VisualizerResult};
use super::pool::PrimitivePool;
use crate::config::{PolylineDefaults, RemovalPolicy, VisualizerConfig};
use crate::foundation::time::JulianDate;
use crate::property::sample;
use crate::render::{Polyline, PrimitiveHandle, PrimitiveRegistry, SharedRegistry};
use crate::scene::{CollectionChange, DynamicObject, DynamicObjectCollection, EntityId, Subscription};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// State shared between the visualizer and its collection listener
struct VisualizerState<R> {
    scene: SharedRegistry<R>,
    pool: PrimitivePool,
    config: VisualizerConfig,
}

impl<R: PrimitiveRegistry> VisualizerState<R> {
    fn on_collection_changed(&mut self, change: &CollectionChange) {
        if change.removed.is_empty() {
            return;
        }
        let mut scene = lock(&self.scene);
        for id in &change.removed {
            match self.config.removal_policy {
                RemovalPolicy::Release => {
                    self.pool.release(id, &mut *scene);
                }
                RemovalPolicy::Hide => {
                    self.pool.hide(id, &mut *scene);
                }
            }
        }
    }

    fn update_object(&mut self, object: &DynamicObject, time: &JulianDate, scene: &mut R) {
        let id = object.id();
        let (Some(description), Some(vertex_positions)) = (&object.polyline, &object.vertex_positions) else {
            if self.pool.hide(id, scene) {
                log::trace!("Entity {} has no polyline or positions, hiding", id);
            }
            return;
        };

        let sampled_show = sample(description.show.as_ref(), time);
        let prior_show = self.pool.get(id).and_then(|entry| entry.last_show);
        if !sampled_show.or(prior_show).unwrap_or(true) {
            if let Some(entry) = self.pool.get_mut(id) {
                entry.last_show = Some(false);
            }
            self.pool.hide(id, scene);
            return;
        }

        let positions = match vertex_positions.value_cartesian(time) {
            Some(positions) if !positions.is_empty() => positions,
            _ => {
                if self.pool.hide(id, scene) {
                    log::trace!("Entity {} has no positions at {:?}, hiding", id, time);
                }
                return;
            }
        };

        let (entry, created) = self.pool.get_or_create(id, || create_polyline(scene, id));
        if sampled_show.is_some() {
            entry.last_show = sampled_show;
        }
        let handle = entry.handle;
        if created {
            log::debug!("Created polyline {:?} for entity {}", handle, id);
        }

        let Some(polyline) = scene.polyline_mut(handle) else {
            // Removed behind our back; recreate on the next update
            log::warn!("Polyline {:?} for entity {} is missing from the registry", handle, id);
            self.pool.forget(id);
            return;
        };

        if created {
            apply_defaults(polyline, &self.config.defaults);
        }
        polyline.set_show(true);
        polyline.set_positions(positions);
        if let Some(color) = sample(description.color.as_ref(), time) {
            polyline.set_color(color);
        }
        if let Some(width) = sample(description.width.as_ref(), time) {
            polyline.set_width(width);
        }
        if let Some(outline_color) = sample(description.outline_color.as_ref(), time) {
            polyline.set_outline_color(outline_color);
        }
        if let Some(outline_width) = sample(description.outline_width.as_ref(), time) {
            polyline.set_outline_width(outline_width);
        }
    }
}

fn create_polyline<R: PrimitiveRegistry>(scene: &mut R, owner: &EntityId) -> PrimitiveHandle {
    let handle = scene.create_polyline();
    if let Some(polyline) = scene.polyline_mut(handle) {
        polyline.set_owner(Some(owner.clone()));
    }
    handle
}

fn apply_defaults(polyline: &mut Polyline, defaults: &PolylineDefaults) {
    polyline.set_color(defaults.color);
    polyline.set_width(defaults.width);
    polyline.set_outline_color(defaults.outline_color);
    polyline.set_outline_width(defaults.outline_width);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Visualizer mapping polyline descriptions to registry polylines
///
/// Calls to [`update`](Self::update),
/// [`set_dynamic_object_collection`](Self::set_dynamic_object_collection)
/// and [`destroy`](Self::destroy) must be serialized by the caller, typically
/// by making them all from the render thread.
///
/// # Usage
///
/// ```rust
/// use dynamic_scene::prelude::*;
/// use std::sync::Arc;
///
/// let scene = PrimitiveCollection::shared();
/// let collection = DynamicObjectCollection::new();
/// let mut visualizer = DynamicPolylineVisualizer::new(scene.clone(), collection.clone())?;
///
/// let object = collection.get_or_create_object("track");
/// {
///     let mut object = object.write().unwrap();
///     object.vertex_positions = Some(Arc::new(ConstantPositions::new(vec![
///         Cartesian3::new(0.0, 0.0, 0.0),
///         Cartesian3::new(1.0, 0.0, 0.0),
///     ])));
///     object.polyline = Some(DynamicPolyline::new());
/// }
///
/// visualizer.update(JulianDate::j2000())?;
/// assert_eq!(scene.lock().unwrap().len(), 1);
/// # Ok::<(), VisualizerError>(())
/// ```
pub struct DynamicPolylineVisualizer<R: PrimitiveRegistry + 'static> {
    state: Arc<Mutex<VisualizerState<R>>>,
    scene: SharedRegistry<R>,
    collection: Option<DynamicObjectCollection>,
    subscription: Option<Subscription>,
    destroyed: bool,
}

impl<R: PrimitiveRegistry + 'static> DynamicPolylineVisualizer<R> {
    /// Create a visualizer with the default configuration
    ///
    /// Fails with [`VisualizerError::InvalidArgument`] if `scene` is `None`.
    /// Without a collection the visualizer is idle until one is attached.
    pub fn new(
        scene: impl Into<Option<SharedRegistry<R>>>,
        collection: impl Into<Option<DynamicObjectCollection>>,
    ) -> VisualizerResult<Self> {
        Self::with_config(scene, collection, VisualizerConfig::default())
    }

    /// Create a visualizer with a custom configuration
    pub fn with_config(
        scene: impl Into<Option<SharedRegistry<R>>>,
        collection: impl Into<Option<DynamicObjectCollection>>,
        config: VisualizerConfig,
    ) -> VisualizerResult<Self> {
        let scene = scene.into().ok_or(VisualizerError::InvalidArgument("scene"))?;
        let state = Arc::new(Mutex::new(VisualizerState {
            scene: Arc::clone(&scene),
            pool: PrimitivePool::new(),
            config,
        }));

        let mut visualizer = Self {
            state,
            scene,
            collection: None,
            subscription: None,
            destroyed: false,
        };
        visualizer.attach(collection.into());
        Ok(visualizer)
    }

    /// The registry this visualizer writes to
    pub const fn scene(&self) -> &SharedRegistry<R> {
        &self.scene
    }

    /// The attached collection, if any
    pub const fn dynamic_object_collection(&self) -> Option<&DynamicObjectCollection> {
        self.collection.as_ref()
    }

    /// Current configuration
    pub fn config(&self) -> VisualizerConfig {
        lock(&self.state).config.clone()
    }

    /// The pooled primitive for `id`, if one exists
    pub fn primitive_for(&self, id: &EntityId) -> Option<PrimitiveHandle> {
        lock(&self.state).pool.get(id).map(|entry| entry.handle)
    }

    /// Number of entities with a pooled primitive
    pub fn tracked_len(&self) -> usize {
        lock(&self.state).pool.len()
    }

    /// Reconcile primitives against the attached collection at `time`
    ///
    /// Fails with [`VisualizerError::InvalidArgument`] if `time` is `None`.
    pub fn update(&mut self, time: impl Into<Option<JulianDate>>) -> VisualizerResult<()> {
        self.ensure_alive()?;
        let time = time.into().ok_or(VisualizerError::InvalidArgument("time"))?;
        let Some(collection) = &self.collection else {
            return Ok(());
        };

        let objects = collection.objects();
        let mut state = lock(&self.state);
        let mut scene = lock(&self.scene);
        for object in &objects {
            let object = object.read().unwrap_or_else(PoisonError::into_inner);
            state.update_object(&object, &time, &mut *scene);
        }
        Ok(())
    }

    /// Point the visualizer at a different collection
    ///
    /// Primitives of entities absent from `collection` are released now; the
    /// new collection's primitives are created by the next update.
    pub fn set_dynamic_object_collection(
        &mut self,
        collection: impl Into<Option<DynamicObjectCollection>>,
    ) -> VisualizerResult<()> {
        self.ensure_alive()?;
        let collection = collection.into();

        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }

        let present: HashSet<EntityId> = collection
            .as_ref()
            .map(|c| c.ids().into_iter().collect())
            .unwrap_or_default();
        {
            let mut state = lock(&self.state);
            let state = &mut *state;
            let mut scene = lock(&self.scene);
            let released = state.pool.release_unless(&mut *scene, |id| present.contains(id));
            log::debug!("Collection swapped, released {} stale polylines", released);
        }

        self.attach(collection);
        Ok(())
    }

    /// Release every primitive and detach from the collection
    ///
    /// Any later call to `update`, `set_dynamic_object_collection` or
    /// `destroy` fails with [`VisualizerError::UseAfterDestroy`].
    pub fn destroy(&mut self) -> VisualizerResult<()> {
        self.ensure_alive()?;
        self.teardown();
        self.destroyed = true;
        log::debug!("Polyline visualizer destroyed");
        Ok(())
    }

    /// Whether [`destroy`](Self::destroy) has been called
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn ensure_alive(&self) -> VisualizerResult<()> {
        if self.destroyed {
            Err(VisualizerError::UseAfterDestroy)
        } else {
            Ok(())
        }
    }

    fn attach(&mut self, collection: Option<DynamicObjectCollection>) {
        self.subscription = collection.as_ref().map(|collection| {
            let state: Weak<Mutex<VisualizerState<R>>> = Arc::downgrade(&self.state);
            collection.subscribe(move |change| {
                if let Some(state) = state.upgrade() {
                    lock(&state).on_collection_changed(change);
                }
            })
        });
        self.collection = collection;
    }

    fn teardown(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.collection = None;

        let mut state = lock(&self.state);
        let state = &mut *state;
        let mut scene = lock(&self.scene);
        state.pool.release_all(&mut *scene);
    }
}

impl<R: PrimitiveRegistry + 'static> Drop for DynamicPolylineVisualizer<R> {
    fn drop(&mut self) {
        if !self.destroyed {
            self.teardown();
        }
    }
}
