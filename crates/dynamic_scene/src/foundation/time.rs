//! Time management utilities
//!
//! Simulation time is a [`JulianDate`]: a whole day number plus seconds into
//! that day. Keeping the two parts separate preserves sub-millisecond
//! precision over spans of many years, which a single `f64` of seconds does not.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Seconds in one Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian day number of the J2000 epoch (2000-01-01T12:00:00)
pub const J2000_DAY_NUMBER: i64 = 2_451_545;

/// A point in simulation time
///
/// Always normalized so that `0 <= seconds_of_day < SECONDS_PER_DAY`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JulianDate {
    day_number: i64,
    seconds_of_day: f64,
}

impl JulianDate {
    /// Create a date from a day number and seconds into that day
    ///
    /// Out-of-range seconds roll over into the day number.
    pub fn new(day_number: i64, seconds_of_day: f64) -> Self {
        let mut date = Self { day_number, seconds_of_day };
        date.normalize();
        date
    }

    /// The J2000 epoch
    pub fn j2000() -> Self {
        Self::new(J2000_DAY_NUMBER, 0.0)
    }

    /// Create a date from a fractional Julian day count
    pub fn from_total_days(total_days: f64) -> Self {
        let day_number = total_days.floor();
        #[allow(clippy::cast_possible_truncation)]
        Self::new(day_number as i64, (total_days - day_number) * SECONDS_PER_DAY)
    }

    /// Whole day number
    pub const fn day_number(&self) -> i64 {
        self.day_number
    }

    /// Seconds elapsed since the start of the day
    pub const fn seconds_of_day(&self) -> f64 {
        self.seconds_of_day
    }

    /// Fractional Julian day count (loses precision for far dates)
    #[allow(clippy::cast_precision_loss)]
    pub fn total_days(&self) -> f64 {
        self.day_number as f64 + self.seconds_of_day / SECONDS_PER_DAY
    }

    /// A new date offset by `seconds` (may be negative)
    #[must_use]
    pub fn add_seconds(&self, seconds: f64) -> Self {
        Self::new(self.day_number, self.seconds_of_day + seconds)
    }

    /// Seconds from `other` to `self` (positive when `self` is later)
    #[allow(clippy::cast_precision_loss)]
    pub fn seconds_difference(&self, other: &Self) -> f64 {
        (self.day_number - other.day_number) as f64 * SECONDS_PER_DAY
            + (self.seconds_of_day - other.seconds_of_day)
    }

    #[allow(clippy::float_cmp)]
    fn normalize(&mut self) {
        if !self.seconds_of_day.is_finite() {
            self.seconds_of_day = 0.0;
            return;
        }
        let whole_days = (self.seconds_of_day / SECONDS_PER_DAY).floor();
        if whole_days != 0.0 {
            #[allow(clippy::cast_possible_truncation)]
            {
                self.day_number += whole_days as i64;
            }
            self.seconds_of_day -= whole_days * SECONDS_PER_DAY;
        }
        // Rounding can land exactly on the day boundary
        if self.seconds_of_day >= SECONDS_PER_DAY {
            self.day_number += 1;
            self.seconds_of_day -= SECONDS_PER_DAY;
        }
        // Fold -0.0 into +0.0 so equality and ordering agree
        if self.seconds_of_day == 0.0 {
            self.seconds_of_day = 0.0;
        }
    }
}

impl Default for JulianDate {
    fn default() -> Self {
        Self::j2000()
    }
}

impl PartialEq for JulianDate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for JulianDate {}

impl PartialOrd for JulianDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for JulianDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.day_number
            .cmp(&other.day_number)
            .then_with(|| self.seconds_of_day.total_cmp(&other.seconds_of_day))
    }
}

impl approx::AbsDiffEq for JulianDate {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        1e-9
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.seconds_difference(other).abs() <= epsilon
    }
}

impl approx::RelativeEq for JulianDate {
    fn default_max_relative() -> Self::Epsilon {
        f64::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.day_number == other.day_number
            && self.seconds_of_day.relative_eq(&other.seconds_of_day, epsilon, max_relative)
    }
}

/// Fixed-step simulation clock, advanced once per rendered frame
pub struct FrameClock {
    current: JulianDate,
    step_seconds: f64,
    frame_count: u64,
}

impl FrameClock {
    /// Create a clock starting at `start` that advances `step_seconds` per frame
    pub const fn new(start: JulianDate, step_seconds: f64) -> Self {
        Self {
            current: start,
            step_seconds,
            frame_count: 0,
        }
    }

    /// Advance one frame and return the new current time
    pub fn tick(&mut self) -> JulianDate {
        self.current = self.current.add_seconds(self.step_seconds);
        self.frame_count += 1;
        self.current
    }

    /// Current simulation time
    pub const fn current(&self) -> JulianDate {
        self.current
    }

    /// Number of frames ticked so far
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Seconds advanced per frame
    pub const fn step_seconds(&self) -> f64 {
        self.step_seconds
    }
}
