/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// Bar open timestamp or sequence number.
///
/// Used for bar boundary detection. Must be non-decreasing
/// between consecutive calls to [`Indicator::compute`](crate::Indicator::compute).
pub type Timestamp = u64;

/// OHLCV bar data delivered by the host's bar feed.
///
/// Implement this on your own kline/candle type to avoid per-tick
/// conversion, or use the ready-made [`Bar`] record. Indicators accept
/// `&impl Ohlcv` and extract what they need internally.
///
/// # Bar boundaries
///
/// Indicators detect new bars by comparing [`open_time`](Ohlcv::open_time)
/// values: a new timestamp closes the previous bar and advances every
/// recursive state by one step, the same timestamp updates (repaints) the
/// bar currently open.
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing (or latest) price of the bar.
    fn close(&self) -> Price;

    /// Bar open timestamp or sequence number.
    ///
    /// Values must be non-decreasing between calls. Behaviour is undefined if
    /// `open_time` decreases.
    fn open_time(&self) -> Timestamp;

    /// Trade volume during the bar. Defaults to `0.0`.
    fn volume(&self) -> f64 {
        0.0
    }
}

/// Immutable OHLCV record.
///
/// A minimal [`Ohlcv`] implementation for hosts that do not carry their own
/// candle type.
///
/// # Example
///
/// ```
/// use envelope_ta::{Bar, Ohlcv};
///
/// let bar = Bar::new(1, 9.0, 10.0, 8.0, 9.5).with_volume(1200.0);
/// assert_eq!(bar.high() - bar.low(), 2.0);
/// assert_eq!(bar.volume(), 1200.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    open_time: Timestamp,
    open: Price,
    high: Price,
    low: Price,
    close: Price,
    volume: f64,
}

impl Bar {
    /// Creates a bar with zero volume.
    #[must_use]
    pub fn new(open_time: Timestamp, open: Price, high: Price, low: Price, close: Price) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume: 0.0,
        }
    }

    #[must_use]
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }
}

impl Ohlcv for Bar {
    #[inline]
    fn open(&self) -> Price {
        self.open
    }

    #[inline]
    fn high(&self) -> Price {
        self.high
    }

    #[inline]
    fn low(&self) -> Price {
        self.low
    }

    #[inline]
    fn close(&self) -> Price {
        self.close
    }

    #[inline]
    fn open_time(&self) -> Timestamp {
        self.open_time
    }

    #[inline]
    fn volume(&self) -> f64 {
        self.volume
    }
}
