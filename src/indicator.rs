use crate::{Ohlcv, PriceSource, Series};

use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

/// Configuration for a technical [`Indicator`].
///
/// Every indicator has a corresponding config type that holds its parameters.
/// Configs are immutable value types: cheap to copy, compare, and hash. Every
/// parameter is clamped to its minimum once, when the builder runs, so
/// building a config never fails.
pub trait IndicatorConfig: Sized + Copy + PartialEq + Eq + Hash + Display + Debug {
    /// Builder type for constructing this config.
    type Builder: IndicatorConfigBuilder<Self>;

    /// Returns a new builder with default values.
    fn builder() -> Self::Builder;

    /// Price source to extract from each bar.
    fn source(&self) -> &PriceSource;
}

/// Builder for an [`IndicatorConfig`].
pub trait IndicatorConfigBuilder<Config>
where
    Config: IndicatorConfig,
{
    /// Sets the price source.
    #[must_use]
    fn source(self, source: PriceSource) -> Self;

    /// Builds the config, clamping every parameter to its minimum.
    #[must_use]
    fn build(self) -> Config;
}

/// A streaming technical indicator.
///
/// Indicators maintain recursive state and advance it by exactly one step
/// per bar on [`compute`](Indicator::compute). Output is defined from the
/// first bar onward: smoothers bootstrap from their first input instead of
/// waiting for a full window.
///
/// Each output is also recorded in a named [`Series`] so consumers can read
/// past values by offset.
///
/// # Example
///
/// ```
/// use envelope_ta::{Bar, Ema, EmaConfig, Indicator};
///
/// let mut ema = Ema::new(EmaConfig::close(3));
///
/// assert_eq!(ema.compute(&Bar::new(1, 0.0, 0.0, 0.0, 4.0)), 4.0);
/// assert_eq!(ema.compute(&Bar::new(2, 0.0, 0.0, 0.0, 8.0)), 6.0);
///
/// let series = ema.output("value").unwrap();
/// assert_eq!(series.get(1), Ok(4.0));
/// ```
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Computed output type. `f64` for single-line indicators,
    /// a struct for envelopes.
    type Output: Copy + Send + Sync + Display + Debug;

    /// Names of the output series, in declaration order.
    const OUTPUTS: &'static [&'static str];

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// Configuration this indicator was built with.
    fn config(&self) -> &Self::Config;

    /// Feeds a bar and returns the updated indicator value.
    ///
    /// A bar with a new `open_time` closes the previous bar and advances
    /// state; a bar with the same `open_time` repaints the current one.
    fn compute(&mut self, ohlcv: &impl Ohlcv) -> Self::Output;

    /// Returns the last computed value without advancing state, or `None`
    /// before the first bar.
    fn value(&self) -> Option<Self::Output>;

    /// Output series by name, `None` for an unknown name.
    fn output(&self, name: &str) -> Option<&Series>;
}
