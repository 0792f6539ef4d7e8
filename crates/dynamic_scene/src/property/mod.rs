//! Time-sampled properties
//!
//! A property maps a [`JulianDate`] to a concrete value, or to nothing when
//! it has no data at that time. Evaluation is pure: the visualizer may sample
//! a property any number of times per frame and expects the same answer.
//!
//! Position lists get their own trait because they are sampled through a
//! vector-returning evaluation rather than a single value.

mod constant;
mod interval;
mod sampled;

pub use constant::{ConstantPositions, ConstantProperty};
pub use interval::{TimeInterval, TimeIntervalProperty};
pub use sampled::SampledPositions;

use crate::foundation::math::Cartesian3;
use crate::foundation::time::JulianDate;
use std::sync::Arc;

/// A value that varies with simulation time
pub trait Property<T>: Send + Sync {
    /// Value at `time`, or `None` if the property has no data there
    fn value(&self, time: &JulianDate) -> Option<T>;
}

/// An ordered list of positions that varies with simulation time
pub trait PositionsProperty: Send + Sync {
    /// Positions at `time`, or `None` if the property has no data there
    fn value_cartesian(&self, time: &JulianDate) -> Option<Vec<Cartesian3>>;
}

/// Shared handle to a scalar/color/flag property
pub type PropertyRef<T> = Arc<dyn Property<T>>;

/// Shared handle to a positions property
pub type PositionsRef = Arc<dyn PositionsProperty>;

impl<T, F> Property<T> for F
where
    F: Fn(&JulianDate) -> Option<T> + Send + Sync,
{
    fn value(&self, time: &JulianDate) -> Option<T> {
        self(time)
    }
}

/// Sample an optional property, treating a missing property as "no value"
pub fn sample<T>(property: Option<&PropertyRef<T>>, time: &JulianDate) -> Option<T> {
    property.and_then(|p| p.value(time))
}
