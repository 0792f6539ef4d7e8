//! Piecewise-constant properties over time intervals

use super::Property;
use crate::foundation::time::JulianDate;

/// A closed interval of simulation time, `start <= t <= stop`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    /// Inclusive start
    pub start: JulianDate,
    /// Inclusive stop
    pub stop: JulianDate,
}

impl TimeInterval {
    /// Create an interval; the bounds are swapped if given in reverse
    pub fn new(start: JulianDate, stop: JulianDate) -> Self {
        if stop < start {
            Self { start: stop, stop: start }
        } else {
            Self { start, stop }
        }
    }

    /// Whether `time` falls inside the interval
    pub fn contains(&self, time: &JulianDate) -> bool {
        self.start <= *time && *time <= self.stop
    }
}

/// A property holding one value per time interval
///
/// Intervals are kept sorted by start time. Where intervals overlap, the one
/// starting latest wins, ties going to the one added last. Times outside
/// every interval have no value.
#[derive(Debug, Clone, Default)]
pub struct TimeIntervalProperty<T> {
    intervals: Vec<(TimeInterval, T)>,
}

impl<T> TimeIntervalProperty<T> {
    /// Create an empty property
    pub const fn new() -> Self {
        Self { intervals: Vec::new() }
    }

    /// Add a value for an interval (builder pattern)
    #[must_use]
    pub fn with_interval(mut self, interval: TimeInterval, value: T) -> Self {
        self.insert(interval, value);
        self
    }

    /// Add a value for an interval
    pub fn insert(&mut self, interval: TimeInterval, value: T) {
        // Insert after any equal starts so later additions win the search below
        let index = self
            .intervals
            .partition_point(|(existing, _)| existing.start <= interval.start);
        self.intervals.insert(index, (interval, value));
    }

    /// Number of intervals
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Whether the property has no intervals
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    fn find(&self, time: &JulianDate) -> Option<&T> {
        let candidates = self.intervals.partition_point(|(interval, _)| interval.start <= *time);
        self.intervals[..candidates]
            .iter()
            .rev()
            .find(|(interval, _)| interval.contains(time))
            .map(|(_, value)| value)
    }
}

impl<T: Clone + Send + Sync> Property<T> for TimeIntervalProperty<T> {
    fn value(&self, time: &JulianDate) -> Option<T> {
        self.find(time).cloned()
    }
}
