//! Scene entities and the observable collection that holds them
//!
//! Entities describe *what* should be visible over time. They know nothing
//! about render primitives; a visualizer turns them into primitives frame by
//! frame.

pub mod entity;
pub mod collection;

pub use entity::{DynamicObject, DynamicObjectRef, DynamicPolyline, EntityId};
pub use collection::{
    CollectionChange, CollectionListener, DynamicObjectCollection, ListenerKey, Subscription,
};
