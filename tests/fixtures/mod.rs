#![allow(dead_code)]

use envelope_ta::{
    Indicator, KeltnerValue, Ohlcv, Price, T3EnvelopeValue, T3Value, Timestamp,
};
use serde::{Deserialize, de::DeserializeOwned};

/// OHLCV bar parsed from the hourly fixture CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct RefBar {
    pub open_time: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Ohlcv for RefBar {
    fn open(&self) -> Price {
        self.open
    }

    fn high(&self) -> Price {
        self.high
    }

    fn low(&self) -> Price {
        self.low
    }

    fn close(&self) -> Price {
        self.close
    }

    fn open_time(&self) -> Timestamp {
        self.open_time
    }

    fn volume(&self) -> f64 {
        self.volume
    }
}

/// Reference value with timestamp.
#[derive(Debug, Deserialize)]
pub struct RefValue {
    pub open_time: u64,
    pub expected: f64,
}

/// Reference band triple with timestamp.
///
/// The middle line is `midline` in Keltner fixtures and `centerline` in
/// envelope fixtures.
#[derive(Debug, Deserialize)]
pub struct RefBandValue {
    pub open_time: u64,
    pub upper: f64,
    #[serde(alias = "midline", alias = "centerline")]
    pub middle: f64,
    pub lower: f64,
}

/// A fixture row: the bar it belongs to and its expected lines, in the
/// order [`Lines::lines`] reports them.
pub trait Expected {
    fn open_time(&self) -> u64;
    fn expected(&self) -> Vec<f64>;
}

impl Expected for RefValue {
    fn open_time(&self) -> u64 {
        self.open_time
    }

    fn expected(&self) -> Vec<f64> {
        vec![self.expected]
    }
}

impl Expected for RefBandValue {
    fn open_time(&self) -> u64 {
        self.open_time
    }

    fn expected(&self) -> Vec<f64> {
        vec![self.upper, self.middle, self.lower]
    }
}

/// Indicator output split into named numeric lines.
pub trait Lines: Copy + std::fmt::Debug {
    fn lines(self) -> Vec<(&'static str, f64)>;
}

impl Lines for f64 {
    fn lines(self) -> Vec<(&'static str, f64)> {
        vec![("value", self)]
    }
}

impl Lines for T3Value {
    fn lines(self) -> Vec<(&'static str, f64)> {
        vec![("value", self.value())]
    }
}

impl Lines for KeltnerValue {
    fn lines(self) -> Vec<(&'static str, f64)> {
        vec![
            ("upper", self.upper()),
            ("midline", self.midline()),
            ("lower", self.lower()),
        ]
    }
}

impl Lines for T3EnvelopeValue {
    fn lines(self) -> Vec<(&'static str, f64)> {
        vec![
            ("upper", self.upper()),
            ("centerline", self.centerline()),
            ("lower", self.lower()),
        ]
    }
}

const OHLCV_PATH: &str = "tests/fixtures/data/ohlcv-1h.csv";

/// Load reference OHLCV bars.
pub fn load_reference_ohlcvs() -> Vec<RefBar> {
    load_records(OHLCV_PATH)
}

/// Load single-value reference data (EMA, ATR, T3).
pub fn load_ref_values(path: &str) -> Vec<RefValue> {
    load_records(path)
}

/// Load band reference data (Keltner, T3 envelope).
pub fn load_band_ref(path: &str) -> Vec<RefBandValue> {
    load_records(path)
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Intra-bar ticks converging on `bar`, all sharing its `open_time`.
///
/// Each tick moves high, low and close a further step from the open toward
/// their final values. The last tick is `bar` itself.
pub fn repaint_sequence(bar: &RefBar) -> Vec<RefBar> {
    const PROGRESS: [f64; 3] = [0.1, 0.5, 1.0];

    let toward = |target: f64, f: f64| (target - bar.open).mul_add(f, bar.open);
    PROGRESS
        .iter()
        .map(|&f| RefBar {
            high: toward(bar.high, f),
            low: toward(bar.low, f),
            close: toward(bar.close, f),
            volume: bar.volume * f,
            ..bar.clone()
        })
        .collect()
}

/// Streams the fixture bars through `I` and checks every line against the
/// reference rows, which must all be visited in order.
pub fn assert_matches_reference<I, R>(config: I::Config, reference: &[R], tolerance: f64)
where
    I: Indicator,
    I::Output: Lines,
    R: Expected,
{
    let bars = load_reference_ohlcvs();
    let mut ind = I::new(config);
    let mut rows = reference.iter().enumerate().peekable();

    for bar in &bars {
        let out = ind.compute(bar);
        let Some((idx, row)) = rows.next_if(|(_, row)| row.open_time() == bar.open_time) else {
            continue;
        };

        for ((line, actual), expected) in out.lines().into_iter().zip(row.expected()) {
            assert_near(
                actual,
                expected,
                tolerance,
                &format!("{config} {line} at row {idx} (t={})", bar.open_time),
            );
        }
    }

    let remaining = rows.count();
    assert_eq!(
        remaining, 0,
        "{config}: {remaining} of {} reference rows never matched a bar",
        reference.len()
    );
}

/// Feeds one instance whole bars and another [`repaint_sequence`] ticks,
/// asserting every line agrees after each bar.
pub fn assert_repaint_matches_closed<I>(config: I::Config, tolerance: f64)
where
    I: Indicator,
    I::Output: Lines,
{
    let bars = load_reference_ohlcvs();
    let mut closed = I::new(config);
    let mut repainted = I::new(config);

    for (i, bar) in bars.iter().enumerate() {
        let expected = closed.compute(bar);
        for tick in repaint_sequence(bar) {
            repainted.compute(&tick);
        }

        let actual = repainted
            .value()
            .unwrap_or_else(|| panic!("{config}: no value after bar {i}"));
        for ((line, c), (_, r)) in expected.lines().into_iter().zip(actual.lines()) {
            let diff = (c - r).abs();
            assert!(
                diff <= tolerance,
                "{config} {line} diverged at bar {i}: closed={c:.10}, repainted={r:.10}, diff={diff:.2e}"
            );
        }
    }

    for name in I::OUTPUTS {
        let series = repainted.output(name).unwrap_or_else(|| panic!("missing {name}"));
        assert_eq!(series.len(), bars.len(), "{config} {name}");
    }
}

/// Generates reference and repaint tests for one indicator configuration.
///
/// Usage: `reference_test!(ema_20, Ema, EmaConfig::close(20), "tests/fixtures/data/ema-20-close.csv", 1e-6);`
#[allow(unused_macros)]
macro_rules! reference_test {
    ($name:ident, $ind:ty, $config:expr, $ref_path:expr, $tolerance:expr) => {
        mod $name {
            use super::fixtures::*;
            use envelope_ta::*;

            #[test]
            fn matches_reference() {
                let reference = load_ref_values($ref_path);
                assert_matches_reference::<$ind, _>($config, &reference, $tolerance);
            }

            #[test]
            fn repaint_matches_closed() {
                assert_repaint_matches_closed::<$ind>($config, $tolerance);
            }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use reference_test;

fn load_records<D: DeserializeOwned>(path: &str) -> Vec<D> {
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize()
        .enumerate()
        .map(|(row, record)| record.unwrap_or_else(|e| panic!("{path} row {row}: {e}")))
        .collect()
}
