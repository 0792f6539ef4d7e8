//! Position lists interpolated between timestamped samples

use super::PositionsProperty;
use crate::foundation::math::Cartesian3;
use crate::foundation::time::JulianDate;

/// Position lists sampled at discrete times, linearly interpolated between
///
/// Every sample must carry the same number of positions. Times before the
/// first sample or after the last have no value.
#[derive(Debug, Clone, Default)]
pub struct SampledPositions {
    samples: Vec<(JulianDate, Vec<Cartesian3>)>,
}

impl SampledPositions {
    /// Create an empty property
    pub const fn new() -> Self {
        Self { samples: Vec::new() }
    }

    /// Add a sample (builder pattern)
    #[must_use]
    pub fn with_sample(mut self, time: JulianDate, positions: Vec<Cartesian3>) -> Self {
        self.add_sample(time, positions);
        self
    }

    /// Add a sample, replacing any existing sample at the same time
    ///
    /// Returns `false` and discards the sample if its length differs from
    /// the samples already stored.
    pub fn add_sample(&mut self, time: JulianDate, positions: Vec<Cartesian3>) -> bool {
        if let Some((_, first)) = self.samples.first() {
            if first.len() != positions.len() {
                log::warn!(
                    "Discarding position sample with {} points, expected {}",
                    positions.len(),
                    first.len()
                );
                return false;
            }
        }
        match self.samples.binary_search_by(|(t, _)| t.cmp(&time)) {
            Ok(index) => self.samples[index].1 = positions,
            Err(index) => self.samples.insert(index, (time, positions)),
        }
        true
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether there are no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl PositionsProperty for SampledPositions {
    fn value_cartesian(&self, time: &JulianDate) -> Option<Vec<Cartesian3>> {
        let index = match self.samples.binary_search_by(|(t, _)| t.cmp(time)) {
            Ok(index) => return Some(self.samples[index].1.clone()),
            Err(index) => index,
        };
        if index == 0 || index == self.samples.len() {
            return None;
        }

        let (before_time, before) = &self.samples[index - 1];
        let (after_time, after) = &self.samples[index];
        let span = after_time.seconds_difference(before_time);
        let t = time.seconds_difference(before_time) / span;

        Some(
            before
                .iter()
                .zip(after)
                .map(|(a, b)| a.lerp(b, t))
                .collect(),
        )
    }
}
