//! Visualizer errors
//!
//! Only caller misuse is an error. Missing data (no polyline, no positions,
//! a property with no value at the requested time) is a normal state that
//! the update loop resolves by hiding or skipping.

use thiserror::Error;

/// Errors returned by visualizer operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualizerError {
    /// A required argument was not supplied
    #[error("Invalid argument: {0} is required")]
    InvalidArgument(&'static str),

    /// The visualizer was used after `destroy`
    #[error("Visualizer used after it was destroyed")]
    UseAfterDestroy,
}

/// Result alias for visualizer operations
pub type VisualizerResult<T> = Result<T, VisualizerError>;
