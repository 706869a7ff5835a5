//! Recursive smoothing primitives shared by every indicator.
//!
//! Both smoothers keep only the frozen value of the previous bar and the
//! value of the bar currently open, so an update is O(1) regardless of
//! history length and a repaint recomputes from the frozen value.

use crate::{Price, bar_clock::BarStep};

/// Exponential smoothing with `α = 2 / (period + 1)`.
///
/// ```text
/// ema = α × input + (1 − α) × prev_ema
/// ```
///
/// The first value equals the first input: there is no SMA seed.
#[derive(Clone, Debug)]
pub(crate) struct ExpSmoother {
    alpha: f64,
    decay: f64,
    previous: Option<Price>,
    current: Option<Price>,
}

impl ExpSmoother {
    pub(crate) fn new(period: usize) -> Self {
        debug_assert!(period > 0, "period must be positive");

        #[allow(clippy::cast_precision_loss)]
        let alpha = 2.0 / (period as f64 + 1.0);

        Self {
            alpha,
            decay: 1.0 - alpha,
            previous: None,
            current: None,
        }
    }

    #[inline]
    pub(crate) fn update(&mut self, step: BarStep, input: Price) -> Price {
        if step.is_advance() {
            self.previous = self.current;
        }

        // α = 1 collapses to `input` exactly: 1 × input + 0 × prev.
        let value = self
            .previous
            .map_or(input, |prev| self.alpha.mul_add(input, self.decay * prev));

        self.current = Some(value);
        value
    }

    #[inline]
    pub(crate) fn value(&self) -> Option<Price> {
        self.current
    }
}

/// Wilder's smoothing with a warm-up ramp.
///
/// With `n = min(bars_seen, period)`:
///
/// ```text
/// avg = ((n − 1) × prev_avg + input) / n
/// ```
///
/// For the first `period` bars this is the running mean of the inputs,
/// afterwards it is Wilder's recursion with `α = 1 / period`.
#[derive(Clone, Debug)]
pub(crate) struct WilderSmoother {
    period: usize,
    seen_bars: usize,
    previous: Option<Price>,
    current: Option<Price>,
}

impl WilderSmoother {
    pub(crate) fn new(period: usize) -> Self {
        debug_assert!(period > 0, "period must be positive");

        Self {
            period,
            seen_bars: 0,
            previous: None,
            current: None,
        }
    }

    #[inline]
    pub(crate) fn update(&mut self, step: BarStep, input: Price) -> Price {
        if step.is_advance() {
            self.previous = self.current;
            if self.seen_bars < self.period {
                self.seen_bars += 1;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let n = self.seen_bars as f64;
        let value = self
            .previous
            .map_or(input, |prev| prev.mul_add(n - 1.0, input) / n);

        self.current = Some(value);
        value
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::assert_approx;

    use BarStep::{Advance, Repaint};

    mod exp {
        use super::*;

        #[test]
        fn first_value_is_input() {
            let mut ema = ExpSmoother::new(10);
            assert_eq!(ema.update(Advance, 42.0), 42.0);
        }

        #[test]
        fn applies_alpha() {
            // α = 2 / (3 + 1) = 0.5
            let mut ema = ExpSmoother::new(3);
            ema.update(Advance, 4.0);
            assert_eq!(ema.update(Advance, 8.0), 6.0);
            assert_eq!(ema.update(Advance, 10.0), 8.0);
        }

        #[test]
        fn period_one_tracks_input_exactly() {
            let mut ema = ExpSmoother::new(1);
            for x in [0.1, 1e9, -3.7, 0.3, 1.0 / 3.0] {
                assert_eq!(ema.update(Advance, x), x);
            }
        }

        #[test]
        fn repaint_recomputes_from_frozen_value() {
            let mut ema = ExpSmoother::new(3);
            ema.update(Advance, 4.0);
            ema.update(Advance, 8.0); // 6.0
            // 12 × 0.5 + 4 × 0.5
            assert_eq!(ema.update(Repaint, 12.0), 8.0);
            // prev is the repainted 8.0
            assert_eq!(ema.update(Advance, 10.0), 9.0);
        }

        #[test]
        fn repaint_on_first_bar_stays_bootstrap() {
            let mut ema = ExpSmoother::new(5);
            ema.update(Advance, 1.0);
            assert_eq!(ema.update(Repaint, 3.0), 3.0);
            assert_eq!(ema.value(), Some(3.0));
        }

        #[test]
        fn value_is_none_before_first_update() {
            assert_eq!(ExpSmoother::new(3).value(), None);
        }

        #[test]
        fn largest_period_stays_finite() {
            let mut ema = ExpSmoother::new(usize::MAX);
            assert_eq!(ema.update(Advance, 5.0), 5.0);

            let next = ema.update(Advance, 7.0);
            assert!(next.is_finite());
            assert!((5.0..=7.0).contains(&next));
        }
    }

    mod wilder {
        use super::*;

        #[test]
        fn ramps_as_running_mean() {
            let mut rma = WilderSmoother::new(3);
            assert_eq!(rma.update(Advance, 3.0), 3.0);
            assert_eq!(rma.update(Advance, 6.0), 4.5);
            assert_eq!(rma.update(Advance, 9.0), 6.0);
        }

        #[test]
        fn applies_wilder_recursion_after_ramp() {
            let mut rma = WilderSmoother::new(3);
            rma.update(Advance, 3.0);
            rma.update(Advance, 6.0);
            rma.update(Advance, 9.0); // 6.0
            // (2 × 6 + 12) / 3 = 8
            assert_eq!(rma.update(Advance, 12.0), 8.0);
            // (2 × 8 + 2) / 3 = 6
            assert_eq!(rma.update(Advance, 2.0), 6.0);
        }

        #[test]
        fn repaint_does_not_extend_ramp() {
            let mut rma = WilderSmoother::new(4);
            rma.update(Advance, 2.0);
            rma.update(Advance, 4.0); // n = 2
            rma.update(Repaint, 6.0); // still n = 2: (2 + 6) / 2
            assert_eq!(rma.update(Repaint, 8.0), 5.0);
            // n = 3: (2 × 5 + 2) / 3
            assert_approx!(rma.update(Advance, 2.0), 4.0);
        }

        #[test]
        fn period_one_tracks_input() {
            let mut rma = WilderSmoother::new(1);
            rma.update(Advance, 5.0);
            assert_eq!(rma.update(Advance, 7.0), 7.0);
        }
    }
}
