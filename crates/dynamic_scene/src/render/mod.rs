//! Render-side primitives and the registry that stores them

pub mod polyline;
pub mod registry;

pub use polyline::{Polyline, PolylineDirty};
pub use registry::{PrimitiveCollection, PrimitiveHandle, PrimitiveRegistry, SharedRegistry};
