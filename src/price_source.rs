use crate::{Ohlcv, Price};

use std::fmt::Display;

/// Value extracted from an [`Ohlcv`] bar before it is fed into a smoother.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub enum PriceSource {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Lowest price.
    Low,
    /// Closing price.
    #[default]
    Close,
    /// Median price: `(high + low) / 2`.
    HL2,
    /// Typical price: `(high + low + close) / 3`.
    HLC3,
    /// Average price: `(open + high + low + close) / 4`.
    OHLC4,
    /// Bar range: `high - low`.
    Range,
    /// True range: `max(high - low, |high - prev_close|, |low - prev_close|)`.
    ///
    /// On the first bar (no previous close), falls back to `high - low`.
    TrueRange,
}

impl Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl PriceSource {
    #[inline]
    pub(crate) fn extract(self, ohlcv: &impl Ohlcv, prev_close: Option<Price>) -> Price {
        let (high, low) = (ohlcv.high(), ohlcv.low());

        match self {
            Self::Open => ohlcv.open(),
            Self::High => high,
            Self::Low => low,
            Self::Close => ohlcv.close(),
            Self::HL2 => f64::midpoint(high, low),
            Self::HLC3 => (high + low + ohlcv.close()) / 3.0,
            Self::OHLC4 => (ohlcv.open() + high + low + ohlcv.close()) / 4.0,
            Self::Range => high - low,
            Self::TrueRange => prev_close.map_or(high - low, |prev| {
                (high - low).max((high - prev).abs()).max((low - prev).abs())
            }),
        }
    }
}
