// src/test_util.rs

use crate::Bar;

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() <= e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

/// Asserts that two `f64` values are within an absolute tolerance.
macro_rules! assert_near {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let (a, e, t) = ($actual, $expected, $tolerance);
        assert!(
            (a - e).abs() <= t,
            "assert_near failed: actual={a}, expected={e}, diff={:.2e} > {t:.2e}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;
pub(crate) use assert_near;

/// Bar with explicit OHLC values.
pub fn ohlc(time: u64, open: f64, high: f64, low: f64, close: f64) -> Bar {
    Bar::new(time, open, high, low, close)
}

/// Convenience: bar with just a close price and timestamp (OHLC all equal to close).
pub fn bar(close: f64, time: u64) -> Bar {
    Bar::new(time, close, close, close, close)
}

/// Bar spanning `low..=high` with the close in the middle.
pub fn ranged(time: u64, high: f64, low: f64) -> Bar {
    let mid = f64::midpoint(high, low);
    Bar::new(time, mid, high, low, mid)
}
