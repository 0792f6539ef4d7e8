//! # Dynamic Scene
//!
//! Keeps a renderer's primitives in step with a collection of time-varying
//! scene entities.
//!
//! ## Features
//!
//! - **Time-Sampled Properties**: Constant, interval and interpolated values
//! - **Observable Collections**: Structural change notifications by subscription
//! - **Primitive Pooling**: Hidden-and-reused primitives instead of churn
//! - **Per-Frame Reconciliation**: One `update(time)` call per rendered frame
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dynamic_scene::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scene = PrimitiveCollection::shared();
//!     let collection = DynamicObjectCollection::new();
//!     let mut visualizer = DynamicPolylineVisualizer::new(scene.clone(), collection.clone())?;
//!
//!     let mut clock = FrameClock::new(JulianDate::j2000(), 1.0 / 60.0);
//!     loop {
//!         visualizer.update(clock.tick())?;
//!         // Hand `scene` to the renderer
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod property;
pub mod render;
pub mod scene;
pub mod visualizer;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, PolylineDefaults, RemovalPolicy, VisualizerConfig},
        foundation::{
            math::{Cartesian3, Color},
            time::{FrameClock, JulianDate},
        },
        property::{
            ConstantPositions, ConstantProperty, PositionsProperty, Property, SampledPositions,
            TimeInterval, TimeIntervalProperty,
        },
        render::{Polyline, PrimitiveCollection, PrimitiveHandle, PrimitiveRegistry, SharedRegistry},
        scene::{
            CollectionChange, DynamicObject, DynamicObjectCollection, DynamicObjectRef,
            DynamicPolyline, EntityId, Subscription,
        },
        visualizer::{DynamicPolylineVisualizer, VisualizerError},
    };
}
