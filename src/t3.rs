use std::fmt::Display;

use crate::{
    Factor, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Series,
    bar_clock::{BarClock, BarStep},
    factor::{clamp_period, clamp_t_count},
    smoothing::ExpSmoother,
};

/// Configuration for the [`T3`] moving average.
///
/// # Example
///
/// ```
/// use envelope_ta::{IndicatorConfig, IndicatorConfigBuilder, T3Config};
///
/// let config = T3Config::builder()
///     .period(5)
///     .t_count(4)
///     .v_factor(0.7)
///     .build();
///
/// assert_eq!(config.period(), 5);
/// assert_eq!(config.t_count(), 4);
/// assert_eq!(config.v_factor().value(), 0.7);
///
/// // Classic Tillson T3 defaults.
/// let classic = T3Config::default();
/// assert_eq!((classic.period(), classic.t_count()), (4, 3));
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct T3Config {
    period: usize,
    t_count: usize,
    v_factor: Factor,
    source: PriceSource,
}

impl IndicatorConfig for T3Config {
    type Builder = T3ConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        T3ConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl T3Config {
    /// EMA period of every smoothing stage.
    #[inline]
    #[must_use]
    pub fn period(&self) -> usize {
        self.period
    }

    /// Chain depth: number of generalized DEMA passes.
    #[inline]
    #[must_use]
    pub fn t_count(&self) -> usize {
        self.t_count
    }

    /// Volume factor weighting the double EMA in each pass.
    #[inline]
    #[must_use]
    pub fn v_factor(&self) -> Factor {
        self.v_factor
    }

    /// T3 on closing price.
    #[must_use]
    pub fn close(period: usize, t_count: usize, v_factor: f64) -> Self {
        Self::builder()
            .period(period)
            .t_count(t_count)
            .v_factor(v_factor)
            .build()
    }
}

impl Default for T3Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for T3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "T3Config({}, {}, {}, {})",
            self.period, self.t_count, self.v_factor, self.source
        )
    }
}

/// Builder for [`T3Config`].
///
/// Defaults: period = `4`, `t_count` = `3`, `v_factor` = `0.4`,
/// source = [`PriceSource::Close`].
pub struct T3ConfigBuilder {
    period: usize,
    t_count: usize,
    v_factor: f64,
    source: PriceSource,
}

impl T3ConfigBuilder {
    fn new() -> Self {
        Self {
            period: 4,
            t_count: 3,
            v_factor: 0.4,
            source: PriceSource::Close,
        }
    }

    /// Sets the EMA period. Clamped to at least `1`.
    #[inline]
    #[must_use]
    pub fn period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    /// Sets the chain depth. Clamped to `1..=`[`MAX_T_COUNT`](crate::MAX_T_COUNT).
    #[inline]
    #[must_use]
    pub fn t_count(mut self, t_count: usize) -> Self {
        self.t_count = t_count;
        self
    }

    /// Sets the volume factor. Clamped to at least `0`.
    #[inline]
    #[must_use]
    pub fn v_factor(mut self, v_factor: f64) -> Self {
        self.v_factor = v_factor;
        self
    }
}

impl IndicatorConfigBuilder<T3Config> for T3ConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> T3Config {
        T3Config {
            period: clamp_period("period", self.period),
            t_count: clamp_t_count(self.t_count),
            v_factor: Factor::at_least(self.v_factor, 0.0),
            source: self.source,
        }
    }
}

/// One generalized DEMA pass: `EMA(x)·(1 + v) − EMA(EMA(x))·v`.
#[derive(Clone, Debug)]
struct GdStage {
    ema: ExpSmoother,
    ema_of_ema: ExpSmoother,
}

impl GdStage {
    fn new(period: usize) -> Self {
        Self {
            ema: ExpSmoother::new(period),
            ema_of_ema: ExpSmoother::new(period),
        }
    }

    #[inline]
    fn update(&mut self, step: BarStep, input: Price, v_factor: f64) -> Price {
        let ema = self.ema.update(step, input);
        let ema_of_ema = self.ema_of_ema.update(step, ema);

        // ema × (1 + v) − ema_of_ema × v, exact when both EMAs agree.
        (ema - ema_of_ema).mul_add(v_factor, ema)
    }
}

#[derive(Clone, Debug)]
enum Chain {
    /// `t_count = 1`: a plain EMA, no generalized DEMA pass.
    Single(ExpSmoother),
    /// `t_count > 1`: `t_count − 1` intermediate passes plus the final one.
    Cascade(Box<[GdStage]>),
}

/// The T3 smoothing chain, independent of bar handling.
///
/// Stages live in an arena sized once at construction and are evaluated in
/// order, so each pass sees the current-bar value of the previous one.
#[derive(Clone, Debug)]
pub(crate) struct T3Cascade {
    chain: Chain,
    v_factor: f64,
}

impl T3Cascade {
    pub(crate) fn new(period: usize, t_count: usize, v_factor: Factor) -> Self {
        let chain = if t_count == 1 {
            Chain::Single(ExpSmoother::new(period))
        } else {
            Chain::Cascade((0..t_count).map(|_| GdStage::new(period)).collect())
        };

        Self {
            chain,
            v_factor: v_factor.value(),
        }
    }

    #[inline]
    pub(crate) fn update(&mut self, step: BarStep, input: Price) -> Price {
        match &mut self.chain {
            Chain::Single(ema) => ema.update(step, input),
            Chain::Cascade(stages) => stages
                .iter_mut()
                .fold(input, |x, stage| stage.update(step, x, self.v_factor)),
        }
    }
}

/// T3 output: the smoothed value and its slope against the previous bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct T3Value {
    value: Price,
    rising: bool,
}

impl T3Value {
    /// Smoothed value for the bar.
    #[inline]
    #[must_use]
    pub fn value(&self) -> Price {
        self.value
    }

    /// `true` when the value is strictly above the previous bar's value.
    /// Always `false` on the first bar.
    #[inline]
    #[must_use]
    pub fn is_rising(&self) -> bool {
        self.rising
    }
}

impl Display for T3Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arrow = if self.rising { "↑" } else { "↓" };
        write!(f, "T3({} {arrow})", self.value)
    }
}

/// Tillson T3 moving average, generalized to any chain depth.
///
/// Each pass is a generalized DEMA:
///
/// ```text
/// GD(x) = EMA(x) × (1 + v) − EMA(EMA(x)) × v
/// ```
///
/// With `t_count = 1` the output is `EMA(x)` directly. Otherwise the input
/// runs through `t_count` chained passes, each owning its own pair of EMAs.
/// The classic T3 is `t_count = 3`. A positive `v` lowers lag at the cost of
/// overshoot on sharp moves.
///
/// Supports live repainting: feeding a bar with the same `open_time`
/// recomputes every pass from its frozen state.
///
/// # Example
///
/// ```
/// use envelope_ta::{Bar, T3, T3Config};
///
/// let mut t3 = T3::new(T3Config::default());
///
/// let first = t3.compute(&Bar::new(1, 0.0, 0.0, 0.0, 100.0));
/// assert_eq!(first.value(), 100.0);
///
/// let second = t3.compute(&Bar::new(2, 0.0, 0.0, 0.0, 110.0));
/// assert!(second.is_rising());
/// ```
#[derive(Clone, Debug)]
pub struct T3 {
    config: T3Config,
    clock: BarClock,
    cascade: T3Cascade,
    values: Series,
}

impl Indicator for T3 {
    type Config = T3Config;
    type Output = T3Value;

    const OUTPUTS: &'static [&'static str] = &["value"];

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            clock: BarClock::default(),
            cascade: T3Cascade::new(config.period, config.t_count, config.v_factor),
            values: Series::default(),
        }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    #[inline]
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> T3Value {
        let step = self.clock.tick(ohlcv);
        let price = self.config.source.extract(ohlcv, self.clock.prev_close());

        let value = self.cascade.update(step, price);
        self.values.record(step, value);

        T3Value {
            value,
            rising: self.rises_to(value),
        }
    }

    #[inline]
    fn value(&self) -> Option<T3Value> {
        self.values.current().map(|value| T3Value {
            value,
            rising: self.rises_to(value),
        })
    }

    fn output(&self, name: &str) -> Option<&Series> {
        (name == "value").then_some(&self.values)
    }
}

impl T3 {
    /// Recorded T3 values.
    #[must_use]
    pub fn values(&self) -> &Series {
        &self.values
    }

    #[inline]
    fn rises_to(&self, value: Price) -> bool {
        self.values.get(1).is_ok_and(|prev| value > prev)
    }
}

impl Display for T3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "T3({}, {}, {}, {})",
            self.config.period, self.config.t_count, self.config.v_factor, self.config.source
        )
    }
}
