use std::fmt::Display;

use crate::{
    Factor, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Series,
    bar_clock::BarClock, factor::{clamp_period, clamp_t_count}, smoothing::WilderSmoother, t3::T3Cascade,
};

/// Configuration for the [`T3Envelope`] indicator.
///
/// # Example
///
/// ```
/// use envelope_ta::{IndicatorConfig, IndicatorConfigBuilder, T3EnvelopeConfig};
///
/// let config = T3EnvelopeConfig::builder()
///     .ma_period(20)
///     .atr_period(50)
///     .atr_multiple(2.5)
///     .build();
///
/// assert_eq!(config.ma_period(), 20);
/// assert_eq!(config.t_count(), 2);
/// assert_eq!(config.atr_multiple().value(), 2.5);
///
/// // The ATR multiple never drops below 1.
/// let narrow = T3EnvelopeConfig::builder().atr_multiple(0.5).build();
/// assert_eq!(narrow.atr_multiple().value(), 1.0);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct T3EnvelopeConfig {
    ma_period: usize,
    t_count: usize,
    v_factor: Factor,
    atr_period: usize,
    atr_multiple: Factor,
    source: PriceSource,
}

impl IndicatorConfig for T3EnvelopeConfig {
    type Builder = T3EnvelopeConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        T3EnvelopeConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl T3EnvelopeConfig {
    /// EMA period of the T3 centerline.
    #[inline]
    #[must_use]
    pub fn ma_period(&self) -> usize {
        self.ma_period
    }

    /// Chain depth of the T3 centerline.
    #[inline]
    #[must_use]
    pub fn t_count(&self) -> usize {
        self.t_count
    }

    /// Volume factor of the T3 centerline.
    #[inline]
    #[must_use]
    pub fn v_factor(&self) -> Factor {
        self.v_factor
    }

    /// ATR period for the band width.
    #[inline]
    #[must_use]
    pub fn atr_period(&self) -> usize {
        self.atr_period
    }

    /// Band width in ATRs.
    #[inline]
    #[must_use]
    pub fn atr_multiple(&self) -> Factor {
        self.atr_multiple
    }
}

impl Default for T3EnvelopeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for T3EnvelopeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "T3EnvelopeConfig({}, {}, {}, {}, {}, {})",
            self.ma_period,
            self.t_count,
            self.v_factor,
            self.atr_period,
            self.atr_multiple,
            self.source
        )
    }
}

/// Builder for [`T3EnvelopeConfig`].
///
/// Defaults: `ma_period` = `30`, `t_count` = `2`, `v_factor` = `0.4`,
/// `atr_period` = `100`, `atr_multiple` = `4`, source = [`PriceSource::Close`].
pub struct T3EnvelopeConfigBuilder {
    ma_period: usize,
    t_count: usize,
    v_factor: f64,
    atr_period: usize,
    atr_multiple: f64,
    source: PriceSource,
}

impl T3EnvelopeConfigBuilder {
    fn new() -> Self {
        Self {
            ma_period: 30,
            t_count: 2,
            v_factor: 0.4,
            atr_period: 100,
            atr_multiple: 4.0,
            source: PriceSource::Close,
        }
    }

    /// Sets the T3 period. Clamped to at least `1`.
    #[inline]
    #[must_use]
    pub fn ma_period(mut self, ma_period: usize) -> Self {
        self.ma_period = ma_period;
        self
    }

    /// Sets the T3 chain depth. Clamped to `1..=`[`MAX_T_COUNT`](crate::MAX_T_COUNT).
    #[inline]
    #[must_use]
    pub fn t_count(mut self, t_count: usize) -> Self {
        self.t_count = t_count;
        self
    }

    /// Sets the T3 volume factor. Clamped to at least `0`.
    #[inline]
    #[must_use]
    pub fn v_factor(mut self, v_factor: f64) -> Self {
        self.v_factor = v_factor;
        self
    }

    /// Sets the ATR period. Clamped to at least `1`.
    #[inline]
    #[must_use]
    pub fn atr_period(mut self, atr_period: usize) -> Self {
        self.atr_period = atr_period;
        self
    }

    /// Sets the band width in ATRs. Clamped to at least `1`.
    #[inline]
    #[must_use]
    pub fn atr_multiple(mut self, atr_multiple: f64) -> Self {
        self.atr_multiple = atr_multiple;
        self
    }
}

impl IndicatorConfigBuilder<T3EnvelopeConfig> for T3EnvelopeConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> T3EnvelopeConfig {
        T3EnvelopeConfig {
            ma_period: clamp_period("ma_period", self.ma_period),
            t_count: clamp_t_count(self.t_count),
            v_factor: Factor::at_least(self.v_factor, 0.0),
            atr_period: clamp_period("atr_period", self.atr_period),
            atr_multiple: Factor::at_least(self.atr_multiple, 1.0),
            source: self.source,
        }
    }
}

/// T3 envelope output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct T3EnvelopeValue {
    upper: Price,
    centerline: Price,
    lower: Price,
}

impl T3EnvelopeValue {
    /// Upper band: centerline + band.
    #[inline]
    #[must_use]
    pub fn upper(&self) -> Price {
        self.upper
    }

    /// Centerline: T3 of the configured source.
    #[inline]
    #[must_use]
    pub fn centerline(&self) -> Price {
        self.centerline
    }

    /// Lower band: centerline − band.
    #[inline]
    #[must_use]
    pub fn lower(&self) -> Price {
        self.lower
    }

    /// Distance from the centerline to either band: `ATR × atr_multiple`.
    #[inline]
    #[must_use]
    pub fn band(&self) -> Price {
        self.upper - self.centerline
    }
}

impl Display for T3EnvelopeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "T3Envelope(u: {}, c: {}, l: {})",
            self.upper, self.centerline, self.lower
        )
    }
}

/// ATR-scaled envelope around a T3 centerline.
///
/// ```text
/// centerline = T3(price, ma_period, t_count, v_factor)
/// band       = ATR(atr_period) × atr_multiple
/// upper      = centerline + band
/// lower      = centerline − band
/// ```
///
/// The T3 cascade and the ATR are both stepped from the same bar before the
/// bands are formed, so every output reflects the current bar. The ATR uses
/// Wilder's smoothing with a warm-up ramp and is defined from bar one.
///
/// # Example
///
/// ```
/// use envelope_ta::{Bar, T3Envelope, T3EnvelopeConfig};
///
/// let mut envelope = T3Envelope::new(T3EnvelopeConfig::default());
///
/// // First bar: centerline is the close, ATR is the bar range.
/// let value = envelope.compute(&Bar::new(1, 100.0, 101.0, 99.0, 100.0));
/// assert_eq!(value.centerline(), 100.0);
/// assert_eq!(value.band(), 8.0);
/// assert_eq!((value.upper(), value.lower()), (108.0, 92.0));
/// ```
#[derive(Clone, Debug)]
pub struct T3Envelope {
    config: T3EnvelopeConfig,
    clock: BarClock,
    t3: T3Cascade,
    atr: WilderSmoother,
    upper: Series,
    lower: Series,
    centerline: Series,
}

impl Indicator for T3Envelope {
    type Config = T3EnvelopeConfig;
    type Output = T3EnvelopeValue;

    const OUTPUTS: &'static [&'static str] = &["upper", "lower", "centerline"];

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            clock: BarClock::default(),
            t3: T3Cascade::new(config.ma_period, config.t_count, config.v_factor),
            atr: WilderSmoother::new(config.atr_period),
            upper: Series::default(),
            lower: Series::default(),
            centerline: Series::default(),
        }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> T3EnvelopeValue {
        let step = self.clock.tick(ohlcv);
        let prev_close = self.clock.prev_close();

        let price = self.config.source.extract(ohlcv, prev_close);
        let centerline = self.t3.update(step, price);

        let true_range = PriceSource::TrueRange.extract(ohlcv, prev_close);
        let band = self.atr.update(step, true_range) * self.config.atr_multiple.value();

        let value = T3EnvelopeValue {
            upper: centerline + band,
            centerline,
            lower: centerline - band,
        };

        self.upper.record(step, value.upper);
        self.lower.record(step, value.lower);
        self.centerline.record(step, value.centerline);

        value
    }

    #[inline]
    fn value(&self) -> Option<T3EnvelopeValue> {
        Some(T3EnvelopeValue {
            upper: self.upper.current()?,
            centerline: self.centerline.current()?,
            lower: self.lower.current()?,
        })
    }

    fn output(&self, name: &str) -> Option<&Series> {
        match name {
            "upper" => Some(&self.upper),
            "lower" => Some(&self.lower),
            "centerline" => Some(&self.centerline),
            _ => None,
        }
    }
}

impl T3Envelope {
    #[must_use]
    pub fn upper(&self) -> &Series {
        &self.upper
    }

    #[must_use]
    pub fn lower(&self) -> &Series {
        &self.lower
    }

    #[must_use]
    pub fn centerline(&self) -> &Series {
        &self.centerline
    }
}

impl Display for T3Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = &self.config;
        write!(
            f,
            "T3Envelope({}, {}, {}, {}, {}, {})",
            c.ma_period, c.t_count, c.v_factor, c.atr_period, c.atr_multiple, c.source
        )
    }
}
