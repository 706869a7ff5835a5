//! Series access errors.

use thiserror::Error;

/// Errors raised by [`Series`](crate::Series) access.
///
/// These signal a dependency-order bug in the caller (reading a value that
/// was never written or has scrolled out of the lookback window), never a
/// data condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SeriesError {
    /// Offset points past recorded history or the lookback window.
    #[error("offset {offset} out of range: {available} value(s) available")]
    OutOfRange {
        /// Requested offset.
        offset: usize,
        /// Number of values that can currently be read.
        available: usize,
    },

    /// The current bar slot has been opened but not written yet.
    #[error("current bar has not been written")]
    Unwritten,

    /// `set` was called before any bar was opened with `advance`.
    #[error("no bar open: call advance() before set()")]
    NoOpenBar,
}
