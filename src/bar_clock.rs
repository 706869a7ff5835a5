use crate::{Ohlcv, Price, Timestamp};

/// What a bar event does to recursive state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BarStep {
    /// A new bar opened: the previous one is frozen and state moves one step.
    Advance,
    /// The bar currently open was updated: recompute from the frozen state.
    Repaint,
}

impl BarStep {
    #[inline]
    pub(crate) fn is_advance(self) -> bool {
        self == Self::Advance
    }
}

/// Detects bar boundaries from `open_time` and remembers the previous close.
#[derive(Clone, Debug, Default)]
pub(crate) struct BarClock {
    last_open_time: Option<Timestamp>,
    cur_close: Option<Price>,
    prev_close: Option<Price>,
}

impl BarClock {
    #[inline]
    pub(crate) fn tick(&mut self, ohlcv: &impl Ohlcv) -> BarStep {
        debug_assert!(
            self.last_open_time.is_none_or(|t| t <= ohlcv.open_time()),
            "open_time must be non-decreasing: last={}, got={}",
            self.last_open_time.unwrap_or(0),
            ohlcv.open_time(),
        );

        let step = if self.last_open_time.is_none_or(|t| t < ohlcv.open_time()) {
            self.prev_close = self.cur_close;
            self.last_open_time = Some(ohlcv.open_time());
            BarStep::Advance
        } else {
            BarStep::Repaint
        };

        self.cur_close = Some(ohlcv.close());
        step
    }

    /// Close of the last frozen bar, `None` while on the first bar.
    #[inline]
    pub(crate) fn prev_close(&self) -> Option<Price> {
        self.prev_close
    }
}
