//! Streaming channel and envelope indicators for Rust.
//!
//! Indicators accept any type implementing [`Ohlcv`], advance their
//! recursive state by one step per bar, and return typed results. Every
//! smoother bootstraps from its first input, so output is defined from the
//! first bar. A bar with the same `open_time` as the previous one repaints
//! the current bar instead of advancing.
//!
//! Each indicator type ([`Ema`], [`Atr`], [`T3`], [`Keltner`],
//! [`T3Envelope`]) exposes [`new`](Ema::new), [`compute`](Ema::compute), and
//! [`value`](Ema::value) as inherent methods, so no trait import is needed.
//! Import [`Indicator`] only for generic code or to read named output
//! [`Series`].
//!
//! A [`Registry`] shares one instance per `(type, config, input)` among
//! several consumers.

mod atr;
mod bar_clock;
mod ema;
mod error;
mod factor;
mod indicator;
mod keltner;
mod ohlcv;
mod price_source;
mod registry;
mod series;
mod smoothing;
mod t3;
mod t3_envelope;

pub use crate::error::SeriesError;
pub use crate::factor::{Factor, MAX_T_COUNT};
pub use crate::indicator::{Indicator, IndicatorConfig, IndicatorConfigBuilder};
pub use crate::ohlcv::{Bar, Ohlcv, Price, Timestamp};
pub use crate::price_source::PriceSource;
pub use crate::registry::{IndicatorKey, InputId, Registered, Registry, RegistryKey, Shared};
pub use crate::series::{DEFAULT_LOOKBACK, Series};

pub use crate::atr::{Atr, AtrConfig, AtrConfigBuilder};
pub use crate::ema::{Ema, EmaConfig, EmaConfigBuilder};
pub use crate::keltner::{Keltner, KeltnerConfig, KeltnerConfigBuilder, KeltnerValue};
pub use crate::t3::{T3, T3Config, T3ConfigBuilder, T3Value};
pub use crate::t3_envelope::{
    T3Envelope, T3EnvelopeConfig, T3EnvelopeConfigBuilder, T3EnvelopeValue,
};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            #[inline]
            pub fn compute(&mut self, ohlcv: &impl Ohlcv) -> $output {
                <Self as Indicator>::compute(self, ohlcv)
            }

            /// See [`Indicator::value`].
            #[must_use]
            #[inline]
            pub fn value(&self) -> Option<$output> {
                <Self as Indicator>::value(self)
            }
        }
    };
}

impl_indicator_methods!(Ema, EmaConfig, Price);
impl_indicator_methods!(Atr, AtrConfig, Price);
impl_indicator_methods!(T3, T3Config, T3Value);
impl_indicator_methods!(Keltner, KeltnerConfig, KeltnerValue);
impl_indicator_methods!(T3Envelope, T3EnvelopeConfig, T3EnvelopeValue);

#[cfg(test)]
mod test_util;
