use thiserror::Error;

use tnrg_core::Phase;

/// Errors that can occur when creating a [`SearchInterval`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum IntervalError {
    /// One or both bounds are non-finite.
    #[error("non-finite bound(s): [{low}, {high}]")]
    NonFinite { low: f64, high: f64 },
    /// The lower bound is not below the upper bound.
    #[error("lower bound {low} is not below upper bound {high}")]
    NotIncreasing { low: f64, high: f64 },
}

/// How an iteration moved the interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The midpoint was disordered, so the critical point lies above it.
    RaiseLow,
    /// The midpoint was ordered, so the critical point lies below it.
    LowerHigh,
}

impl Step {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Step::RaiseLow => "raise_low",
            Step::LowerHigh => "lower_high",
        }
    }
}

/// Temperature bounds around the critical point, with `low < high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchInterval {
    low: f64,
    high: f64,
}

impl SearchInterval {
    /// Creates an interval from finite bounds with `low < high`.
    ///
    /// # Errors
    ///
    /// Returns an [`IntervalError`] if either bound is non-finite or the
    /// bounds are not strictly increasing.
    pub fn new(low: f64, high: f64) -> Result<Self, IntervalError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(IntervalError::NonFinite { low, high });
        }
        if low >= high {
            return Err(IntervalError::NotIncreasing { low, high });
        }
        Ok(Self { low, high })
    }

    #[must_use]
    pub fn low(&self) -> f64 {
        self.low
    }

    #[must_use]
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Returns the bounds as `[low, high]`.
    #[must_use]
    pub fn as_array(&self) -> [f64; 2] {
        [self.low, self.high]
    }

    #[must_use]
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.low + self.high)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Returns whether `x` lies strictly inside the interval.
    #[must_use]
    pub fn splits_at(&self, x: f64) -> bool {
        self.low < x && x < self.high
    }

    /// Moves one bound to `x` according to the phase observed there.
    pub(super) fn shrink(&mut self, x: f64, phase: Phase) -> Step {
        match phase {
            Phase::Ordered => {
                self.high = x;
                Step::LowerHigh
            }
            Phase::Disordered => {
                self.low = x;
                Step::RaiseLow
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn rejects_non_finite() {
        assert!(matches!(
            SearchInterval::new(f64::NAN, 5.0),
            Err(IntervalError::NonFinite { .. })
        ));
        assert!(matches!(
            SearchInterval::new(4.0, f64::INFINITY),
            Err(IntervalError::NonFinite { .. })
        ));
    }

    #[test]
    fn rejects_empty_or_reversed() {
        assert!(matches!(
            SearchInterval::new(4.5, 4.5),
            Err(IntervalError::NotIncreasing { .. })
        ));
        assert!(matches!(
            SearchInterval::new(5.0, 4.0),
            Err(IntervalError::NotIncreasing { .. })
        ));
    }

    #[test]
    fn shrink_moves_the_bound_on_the_midpoint_side() {
        let mut interval = SearchInterval::new(4.0, 5.0).expect("valid interval");

        let step = interval.shrink(interval.midpoint(), Phase::Ordered);
        assert_eq!(step, Step::LowerHigh);
        assert_relative_eq!(interval.low(), 4.0);
        assert_relative_eq!(interval.high(), 4.5);

        let step = interval.shrink(interval.midpoint(), Phase::Disordered);
        assert_eq!(step, Step::RaiseLow);
        assert_eq!(interval.as_array(), [4.25, 4.5]);
        assert_relative_eq!(interval.width(), 0.25);
    }
}
