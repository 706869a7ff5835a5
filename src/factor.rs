use std::{
    fmt::Display,
    hash::{Hash, Hasher},
};

/// Floating-point indicator parameter clamped to a lower bound.
///
/// Used for multipliers such as the Keltner offset multiplier or the T3
/// volume factor. Construction never fails: values below the bound, and NaN,
/// are clamped to the bound. `-0.0` is normalized to `0.0`.
///
/// Implements `Eq` and `Hash` via bit-level comparison, which matches exact
/// numeric equality because NaN and negative zero cannot be stored.
#[derive(Clone, Copy, Debug)]
pub struct Factor(f64);

impl Factor {
    /// Creates a factor, clamping `value` to at least `min`.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn at_least(value: f64, min: f64) -> Self {
        debug_assert!(min.is_finite(), "factor bound must be finite");

        // `f64::max` returns the non-NaN operand; `+ 0.0` turns -0.0 into 0.0.
        let clamped = value.max(min) + 0.0;
        if clamped != value {
            tracing::debug!(value, min, clamped, "factor clamped to minimum");
        }

        Self(clamped)
    }

    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Factor {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Factor {}

impl Hash for Factor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Clamps an integer period to at least `1`.
#[inline]
pub(crate) fn clamp_period(name: &'static str, value: usize) -> usize {
    if value == 0 {
        tracing::debug!(param = name, value, clamped = 1, "period clamped to minimum");
        1
    } else {
        value
    }
}

/// Largest accepted T3 chain depth.
///
/// Each pass owns two EMAs, and past a few dozen passes the output no
/// longer moves within `f64` precision.
pub const MAX_T_COUNT: usize = 64;

/// Clamps a T3 chain depth to `1..=MAX_T_COUNT`.
#[inline]
pub(crate) fn clamp_t_count(value: usize) -> usize {
    if value > MAX_T_COUNT {
        tracing::debug!(value, clamped = MAX_T_COUNT, "t_count clamped to maximum");
        MAX_T_COUNT
    } else {
        clamp_period("t_count", value)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keeps_values_above_bound() {
        assert_eq!(Factor::at_least(1.5, 0.01).value(), 1.5);
    }

    #[test]
    fn clamps_values_below_bound() {
        assert_eq!(Factor::at_least(0.0, 0.01).value(), 0.01);
        assert_eq!(Factor::at_least(-3.0, 1.0).value(), 1.0);
    }

    #[test]
    fn nan_clamps_to_bound() {
        assert_eq!(Factor::at_least(f64::NAN, 0.0).value(), 0.0);
    }

    #[test]
    fn negative_zero_equals_zero() {
        let a = Factor::at_least(-0.0, 0.0);
        let b = Factor::at_least(0.0, 0.0);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn distinct_values_are_distinct() {
        assert_ne!(Factor::at_least(0.4, 0.0), Factor::at_least(0.41, 0.0));
    }

    #[test]
    fn period_clamping() {
        assert_eq!(clamp_period("period", 0), 1);
        assert_eq!(clamp_period("period", 14), 14);
    }

    #[test]
    fn t_count_clamping() {
        assert_eq!(clamp_t_count(0), 1);
        assert_eq!(clamp_t_count(3), 3);
        assert_eq!(clamp_t_count(MAX_T_COUNT), MAX_T_COUNT);
        assert_eq!(clamp_t_count(usize::MAX), MAX_T_COUNT);
    }
}
