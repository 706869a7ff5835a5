use std::fmt::Display;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Series,
    bar_clock::BarClock, factor::clamp_period, smoothing::WilderSmoother,
};

/// Configuration for the Average True Range ([`Atr`]) indicator.
///
/// # Example
///
/// ```
/// use envelope_ta::{AtrConfig, IndicatorConfig, PriceSource};
///
/// let config = AtrConfig::new(100);
/// assert_eq!(config.period(), 100);
/// assert_eq!(*config.source(), PriceSource::TrueRange);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct AtrConfig {
    period: usize,
    source: PriceSource,
}

impl IndicatorConfig for AtrConfig {
    type Builder = AtrConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        AtrConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl AtrConfig {
    /// ATR of true range with the given period.
    #[must_use]
    pub fn new(period: usize) -> Self {
        Self::builder().period(period).build()
    }

    /// Smoothing period (number of bars).
    #[inline]
    #[must_use]
    pub fn period(&self) -> usize {
        self.period
    }
}

impl Default for AtrConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for AtrConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AtrConfig({}, {})", self.period, self.source)
    }
}

/// Builder for [`AtrConfig`].
///
/// Defaults: period = `14`, source = [`PriceSource::TrueRange`]. Any other
/// source turns the indicator into a Wilder moving average of that price.
pub struct AtrConfigBuilder {
    period: usize,
    source: PriceSource,
}

impl AtrConfigBuilder {
    fn new() -> Self {
        Self {
            period: 14,
            source: PriceSource::TrueRange,
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

impl IndicatorConfigBuilder<AtrConfig> for AtrConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> AtrConfig {
        AtrConfig {
            period: clamp_period("atr_period", self.period),
            source: self.source,
        }
    }
}

/// Average True Range (ATR) with Wilder's smoothing.
///
/// True range is `max(high − low, |high − prev_close|, |low − prev_close|)`,
/// falling back to `high − low` on the first bar. With `n = min(bars, period)`:
///
/// ```text
/// ATR = ((n − 1) × prev_ATR + TR) / n
/// ```
///
/// The first value is the first bar's range. Until `period` bars have been
/// seen the ATR is the running mean of true range; afterwards it follows
/// Wilder's recursion. Output is defined from bar one and is non-negative
/// for well-formed bars.
///
/// # Example
///
/// ```
/// use envelope_ta::{Atr, AtrConfig, Bar};
///
/// let mut atr = Atr::new(AtrConfig::new(3));
///
/// assert_eq!(atr.compute(&Bar::new(1, 10.0, 12.0, 9.0, 11.0)), 3.0);
/// // TR = max(1, |12 − 11|, |11 − 11|) = 1, mean of [3, 1]
/// assert_eq!(atr.compute(&Bar::new(2, 11.0, 12.0, 11.0, 11.5)), 2.0);
/// ```
#[derive(Clone, Debug)]
pub struct Atr {
    config: AtrConfig,
    clock: BarClock,
    smoother: WilderSmoother,
    values: Series,
}

impl Indicator for Atr {
    type Config = AtrConfig;
    type Output = Price;

    const OUTPUTS: &'static [&'static str] = &["value"];

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            clock: BarClock::default(),
            smoother: WilderSmoother::new(config.period),
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
        let range = self.config.source.extract(ohlcv, self.clock.prev_close());

        let value = self.smoother.update(step, range);
        self.values.record(step, value);

        value
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.values.current()
    }

    fn output(&self, name: &str) -> Option<&Series> {
        (name == "value").then_some(&self.values)
    }
}

impl Atr {
    /// Recorded ATR values.
    #[must_use]
    pub fn values(&self) -> &Series {
        &self.values
    }
}

impl Display for Atr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ATR({})", self.config.period)
    }
}
