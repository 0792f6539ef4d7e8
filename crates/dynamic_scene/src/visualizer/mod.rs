//! Visualizers
//!
//! A visualizer owns a [`PrimitivePool`], listens to a collection's
//! structural changes, and reconciles primitives against entity state once
//! per frame.

pub mod error;
pub mod pool;
pub mod polyline;

#[cfg(test)]
mod tests;

pub use error::{VisualizerError, VisualizerResult};
pub use pool::{PoolEntry, PrimitivePool};
pub use polyline::DynamicPolylineVisualizer;
