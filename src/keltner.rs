use std::fmt::Display;

use crate::{
    Factor, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Series,
    bar_clock::BarClock, factor::clamp_period, smoothing::ExpSmoother,
};

/// Configuration for the [`Keltner`] channel.
///
/// # Example
///
/// ```
/// use envelope_ta::{IndicatorConfig, IndicatorConfigBuilder, KeltnerConfig, PriceSource};
///
/// let config = KeltnerConfig::builder()
///     .period(20)
///     .offset_multiplier(2.0)
///     .build();
///
/// assert_eq!(config.period(), 20);
/// assert_eq!(config.offset_multiplier().value(), 2.0);
/// assert_eq!(*config.source(), PriceSource::HLC3);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct KeltnerConfig {
    period: usize,
    offset_multiplier: Factor,
    source: PriceSource,
}

impl IndicatorConfig for KeltnerConfig {
    type Builder = KeltnerConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        KeltnerConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl KeltnerConfig {
    /// Keltner channel around the typical price.
    #[must_use]
    pub fn new(period: usize, offset_multiplier: f64) -> Self {
        Self::builder()
            .period(period)
            .offset_multiplier(offset_multiplier)
            .build()
    }

    /// Keltner channel around the closing price.
    #[must_use]
    pub fn close(period: usize, offset_multiplier: f64) -> Self {
        Self::builder()
            .period(period)
            .offset_multiplier(offset_multiplier)
            .source(PriceSource::Close)
            .build()
    }

    /// EMA period shared by the midline and the range smoothing.
    #[inline]
    #[must_use]
    pub fn period(&self) -> usize {
        self.period
    }

    /// Multiplier applied to the smoothed bar range.
    #[inline]
    #[must_use]
    pub fn offset_multiplier(&self) -> Factor {
        self.offset_multiplier
    }
}

impl Default for KeltnerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for KeltnerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "KeltnerConfig({}, {}, {})",
            self.period, self.offset_multiplier, self.source
        )
    }
}

/// Builder for [`KeltnerConfig`].
///
/// Defaults: period = `10`, offset multiplier = `1.5`,
/// source = [`PriceSource::HLC3`].
pub struct KeltnerConfigBuilder {
    period: usize,
    offset_multiplier: f64,
    source: PriceSource,
}

impl KeltnerConfigBuilder {
    fn new() -> Self {
        Self {
            period: 10,
            offset_multiplier: 1.5,
            source: PriceSource::HLC3,
        }
    }

    /// Sets the EMA period. Clamped to at least `1`.
    #[inline]
    #[must_use]
    pub fn period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    /// Sets the offset multiplier. Clamped to at least `0.01`.
    #[inline]
    #[must_use]
    pub fn offset_multiplier(mut self, offset_multiplier: f64) -> Self {
        self.offset_multiplier = offset_multiplier;
        self
    }
}

impl IndicatorConfigBuilder<KeltnerConfig> for KeltnerConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> KeltnerConfig {
        KeltnerConfig {
            period: clamp_period("period", self.period),
            offset_multiplier: Factor::at_least(self.offset_multiplier, 0.01),
            source: self.source,
        }
    }
}

/// Keltner channel output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeltnerValue {
    upper: Price,
    midline: Price,
    lower: Price,
}

impl KeltnerValue {
    /// Upper band: midline + offset.
    #[inline]
    #[must_use]
    pub fn upper(&self) -> Price {
        self.upper
    }

    /// Midline: EMA of the configured source.
    #[inline]
    #[must_use]
    pub fn midline(&self) -> Price {
        self.midline
    }

    /// Lower band: midline − offset.
    #[inline]
    #[must_use]
    pub fn lower(&self) -> Price {
        self.lower
    }

    /// Distance from the midline to either band.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> Price {
        self.upper - self.midline
    }

    /// Distance between the bands.
    #[inline]
    #[must_use]
    pub fn width(&self) -> Price {
        self.upper - self.lower
    }
}

impl Display for KeltnerValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Keltner(u: {}, m: {}, l: {})",
            self.upper, self.midline, self.lower
        )
    }
}

/// Keltner channel on an EMA midline with an EMA-of-range offset.
///
/// ```text
/// midline = EMA(price, period)
/// offset  = EMA(high − low, period) × offset_multiplier
/// upper   = midline + offset
/// lower   = midline − offset
/// ```
///
/// Both EMAs bootstrap from the first bar, so the channel is defined from
/// bar one. Bands never cross: `upper ≥ midline ≥ lower` for well-formed
/// bars.
///
/// # Example
///
/// ```
/// use envelope_ta::{Bar, Keltner, KeltnerConfig};
///
/// let mut keltner = Keltner::new(KeltnerConfig::new(10, 1.5));
///
/// let value = keltner.compute(&Bar::new(1, 9.0, 10.0, 8.0, 9.0));
/// assert_eq!(value.midline(), 9.0);
/// assert_eq!(value.offset(), 3.0);
/// assert_eq!((value.upper(), value.lower()), (12.0, 6.0));
/// ```
#[derive(Clone, Debug)]
pub struct Keltner {
    config: KeltnerConfig,
    clock: BarClock,
    diff: Series,
    midline_ema: ExpSmoother,
    diff_ema: ExpSmoother,
    upper: Series,
    midline: Series,
    lower: Series,
}

impl Indicator for Keltner {
    type Config = KeltnerConfig;
    type Output = KeltnerValue;

    const OUTPUTS: &'static [&'static str] = &["midline", "upper", "lower"];

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            clock: BarClock::default(),
            diff: Series::default(),
            midline_ema: ExpSmoother::new(config.period),
            diff_ema: ExpSmoother::new(config.period),
            upper: Series::default(),
            midline: Series::default(),
            lower: Series::default(),
        }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> KeltnerValue {
        let step = self.clock.tick(ohlcv);
        let price = self.config.source.extract(ohlcv, self.clock.prev_close());
        let diff = ohlcv.high() - ohlcv.low();
        self.diff.record(step, diff);

        let midline = self.midline_ema.update(step, price);
        let offset = self.diff_ema.update(step, diff) * self.config.offset_multiplier.value();

        let value = KeltnerValue {
            upper: midline + offset,
            midline,
            lower: midline - offset,
        };

        self.upper.record(step, value.upper);
        self.midline.record(step, value.midline);
        self.lower.record(step, value.lower);

        value
    }

    #[inline]
    fn value(&self) -> Option<KeltnerValue> {
        Some(KeltnerValue {
            upper: self.upper.current()?,
            midline: self.midline.current()?,
            lower: self.lower.current()?,
        })
    }

    fn output(&self, name: &str) -> Option<&Series> {
        match name {
            "midline" => Some(&self.midline),
            "upper" => Some(&self.upper),
            "lower" => Some(&self.lower),
            _ => None,
        }
    }
}

impl Keltner {
    /// Recorded bar ranges (`high − low`) feeding the offset EMA.
    #[must_use]
    pub fn ranges(&self) -> &Series {
        &self.diff
    }

    #[must_use]
    pub fn upper(&self) -> &Series {
        &self.upper
    }

    #[must_use]
    pub fn midline(&self) -> &Series {
        &self.midline
    }

    #[must_use]
    pub fn lower(&self) -> &Series {
        &self.lower
    }
}

impl Display for Keltner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Keltner({}, {}, {})",
            self.config.period, self.config.offset_multiplier, self.config.source
        )
    }
}
