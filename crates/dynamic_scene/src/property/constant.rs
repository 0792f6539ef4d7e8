//! Properties whose value does not change with time

use super::{PositionsProperty, Property};
use crate::foundation::math::Cartesian3;
use crate::foundation::time::JulianDate;

/// A property that yields the same value at every time
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantProperty<T> {
    value: T,
}

impl<T> ConstantProperty<T> {
    /// Create a constant property
    pub const fn new(value: T) -> Self {
        Self { value }
    }

    /// The constant value
    pub const fn get(&self) -> &T {
        &self.value
    }
}

impl<T: Clone + Send + Sync> Property<T> for ConstantProperty<T> {
    fn value(&self, _time: &JulianDate) -> Option<T> {
        Some(self.value.clone())
    }
}

/// A fixed list of positions
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantPositions {
    positions: Vec<Cartesian3>,
}

impl ConstantPositions {
    /// Create a fixed position list
    pub fn new(positions: impl Into<Vec<Cartesian3>>) -> Self {
        Self {
            positions: positions.into(),
        }
    }
}

impl PositionsProperty for ConstantPositions {
    fn value_cartesian(&self, _time: &JulianDate) -> Option<Vec<Cartesian3>> {
        Some(self.positions.clone())
    }
}
