use crate::{Price, SeriesError, bar_clock::BarStep};

use std::num::NonZero;

/// Default number of values a [`Series`] retains, current bar included.
pub const DEFAULT_LOOKBACK: usize = 256;

/// Bounded-history numeric series addressed by offset from the current bar.
///
/// Offset `0` is the bar currently being processed, offset `k` is `k` bars in
/// the past. Only offset `0` is writable: [`advance`](Series::advance) freezes
/// it into offset `1` and opens a new, unwritten slot. Repeated
/// [`set`](Series::set) calls without an `advance` repaint the current bar.
///
/// Storage is a fixed ring of `lookback` values allocated once. [`len`]
/// counts every bar ever opened and never decreases; values older than the
/// lookback are no longer addressable.
///
/// [`len`]: Series::len
///
/// # Example
///
/// ```
/// use envelope_ta::{Series, SeriesError};
/// use std::num::NonZero;
///
/// let mut series = Series::new(NonZero::new(2).unwrap());
/// series.advance();
/// series.set(1.0)?;
/// series.advance();
/// series.set(2.0)?;
///
/// assert_eq!(series.get(0)?, 2.0);
/// assert_eq!(series.get(1)?, 1.0);
///
/// series.advance();
/// series.set(3.0)?;
/// assert_eq!(series.len(), 3);
/// assert_eq!(
///     series.get(2),
///     Err(SeriesError::OutOfRange { offset: 2, available: 2 })
/// );
/// # Ok::<(), SeriesError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Series {
    buffer: Box<[Price]>,
    head: usize,
    len: usize,
    written: bool,
}

impl Series {
    /// Creates an empty series retaining at most `lookback` values.
    #[must_use]
    pub fn new(lookback: NonZero<usize>) -> Self {
        let capacity = lookback.get();

        Self {
            buffer: vec![0.0; capacity].into_boxed_slice(),
            head: capacity - 1,
            len: 0,
            written: false,
        }
    }

    /// Number of bars ever opened on this series.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` before the first bar.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of addressable values, current bar included.
    #[inline]
    #[must_use]
    pub fn lookback(&self) -> usize {
        self.buffer.len()
    }

    /// Opens a new bar slot; the previous offset `0` becomes offset `1`.
    #[inline]
    pub fn advance(&mut self) {
        debug_assert!(
            self.len == 0 || self.written,
            "Series invariant violation: advancing past an unwritten bar"
        );

        self.head += 1;
        if self.head == self.buffer.len() {
            self.head = 0;
        }
        self.len += 1;
        self.written = false;
    }

    /// Writes the value of the bar currently open (offset `0`).
    ///
    /// # Errors
    ///
    /// [`SeriesError::NoOpenBar`] if [`advance`](Self::advance) was never called.
    #[inline]
    pub fn set(&mut self, value: Price) -> Result<(), SeriesError> {
        if self.is_empty() {
            return Err(SeriesError::NoOpenBar);
        }

        self.buffer[self.head] = value;
        self.written = true;

        Ok(())
    }

    /// Reads the value `offset` bars before the current one.
    ///
    /// # Errors
    ///
    /// - [`SeriesError::OutOfRange`] when `offset` reaches past recorded
    ///   history or the lookback window.
    /// - [`SeriesError::Unwritten`] when reading offset `0` of a bar that has
    ///   been opened but not written.
    #[inline]
    pub fn get(&self, offset: usize) -> Result<Price, SeriesError> {
        let available = self.retained();

        if offset >= available {
            return Err(SeriesError::OutOfRange { offset, available });
        }
        if offset == 0 && !self.written {
            return Err(SeriesError::Unwritten);
        }

        Ok(self.buffer[self.index(offset)])
    }

    /// Value of the current bar, `None` if not written yet.
    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<Price> {
        (self.len > 0 && self.written).then(|| self.buffer[self.head])
    }

    /// Readable values, newest first.
    pub fn iter(&self) -> impl Iterator<Item = Price> + '_ {
        let first = usize::from(!self.written);
        (first..self.retained()).map(|offset| self.buffer[self.index(offset)])
    }

    /// Opens a bar on [`BarStep::Advance`] and writes offset `0`.
    #[inline]
    pub(crate) fn record(&mut self, step: BarStep, value: Price) {
        if step.is_advance() {
            self.advance();
        }

        debug_assert!(!self.is_empty(), "first bar must advance the series");
        self.buffer[self.head] = value;
        self.written = true;
    }

    #[inline]
    fn retained(&self) -> usize {
        self.len.min(self.buffer.len())
    }

    #[inline]
    fn index(&self, offset: usize) -> usize {
        let capacity = self.buffer.len();
        (self.head + capacity - offset) % capacity
    }
}

impl Default for Series {
    fn default() -> Self {
        Self::new(NonZero::new(DEFAULT_LOOKBACK).expect("DEFAULT_LOOKBACK is non-zero"))
    }
}
