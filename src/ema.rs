use std::fmt::Display;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Series,
    bar_clock::BarClock, factor::clamp_period, smoothing::ExpSmoother,
};

/// Configuration for the Exponential Moving Average ([`Ema`]) indicator.
///
/// # Example
///
/// ```
/// use envelope_ta::{EmaConfig, IndicatorConfig, IndicatorConfigBuilder, PriceSource};
///
/// let config = EmaConfig::builder()
///     .period(20)
///     .source(PriceSource::HLC3)
///     .build();
///
/// assert_eq!(config.period(), 20);
/// assert_eq!(*config.source(), PriceSource::HLC3);
///
/// // Periods below 1 are clamped.
/// assert_eq!(EmaConfig::close(0).period(), 1);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct EmaConfig {
    period: usize,
    source: PriceSource,
}

impl IndicatorConfig for EmaConfig {
    type Builder = EmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        EmaConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl EmaConfig {
    /// Smoothing period (number of bars).
    #[inline]
    #[must_use]
    pub fn period(&self) -> usize {
        self.period
    }

    /// EMA on closing price.
    #[must_use]
    pub fn close(period: usize) -> Self {
        Self::builder().period(period).build()
    }

    /// EMA on typical price: `(high + low + close) / 3`.
    #[must_use]
    pub fn hlc3(period: usize) -> Self {
        Self::builder()
            .period(period)
            .source(PriceSource::HLC3)
            .build()
    }
}

impl Default for EmaConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for EmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EmaConfig({}, {})", self.period, self.source)
    }
}

/// Builder for [`EmaConfig`].
///
/// Defaults: period = `14`, source = [`PriceSource::Close`].
pub struct EmaConfigBuilder {
    period: usize,
    source: PriceSource,
}

impl EmaConfigBuilder {
    fn new() -> Self {
        Self {
            period: 14,
            source: PriceSource::Close,
        }
    }

    /// Sets the smoothing period. Clamped to at least `1`.
    #[inline]
    #[must_use]
    pub fn period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }
}

impl IndicatorConfigBuilder<EmaConfig> for EmaConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> EmaConfig {
        EmaConfig {
            period: clamp_period("period", self.period),
            source: self.source,
        }
    }
}

/// Exponential Moving Average (EMA).
///
/// Uses the standard smoothing factor `α = 2 / (period + 1)`:
///
/// ```text
/// EMA = α × price + (1 − α) × prev_EMA
/// ```
///
/// The first bar bootstraps with `prev_EMA = price`, so the first value is
/// the raw price and output is defined from bar one. With `period = 1` the
/// EMA equals the price on every bar.
///
/// Supports live repainting: feeding a bar with the same `open_time`
/// recomputes from the previous EMA without advancing state.
///
/// # Example
///
/// ```
/// use envelope_ta::{Bar, Ema, EmaConfig};
///
/// let mut ema = Ema::new(EmaConfig::close(3));
///
/// // Bootstrap: first value is the first close.
/// assert_eq!(ema.compute(&Bar::new(1, 0.0, 0.0, 0.0, 4.0)), 4.0);
///
/// // α = 0.5: 8 × 0.5 + 4 × 0.5
/// assert_eq!(ema.compute(&Bar::new(2, 0.0, 0.0, 0.0, 8.0)), 6.0);
/// ```
#[derive(Clone, Debug)]
pub struct Ema {
    config: EmaConfig,
    clock: BarClock,
    smoother: ExpSmoother,
    values: Series,
}

impl Indicator for Ema {
    type Config = EmaConfig;
    type Output = Price;

    const OUTPUTS: &'static [&'static str] = &["value"];

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            clock: BarClock::default(),
            smoother: ExpSmoother::new(config.period),
            values: Series::default(),
        }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Price {
        let step = self.clock.tick(ohlcv);
        let price = self.config.source.extract(ohlcv, self.clock.prev_close());

        let value = self.smoother.update(step, price);
        self.values.record(step, value);

        value
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.smoother.value()
    }

    fn output(&self, name: &str) -> Option<&Series> {
        (name == "value").then_some(&self.values)
    }
}

impl Ema {
    /// Recorded EMA values.
    #[must_use]
    pub fn values(&self) -> &Series {
        &self.values
    }
}

impl Display for Ema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({}, {})", self.config.period, self.config.source)
    }
}
