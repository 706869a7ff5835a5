//! Shared indicator instances keyed by type, configuration and input feed.
//!
//! Several consumers asking for the same indicator over the same feed get
//! one instance: bars are computed once and every holder reads the same
//! output series. Registry scope is explicit; entries live until they are
//! released, removed, cleared, or the registry is dropped.

use std::{
    any::Any,
    collections::HashMap,
    fmt::Display,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{
    Atr, AtrConfig, Ema, EmaConfig, Indicator, Keltner, KeltnerConfig, T3, T3Config, T3Envelope,
    T3EnvelopeConfig,
};

/// Handle to a registry-owned indicator.
pub type Shared<I> = Arc<Mutex<I>>;

type Erased = Arc<dyn Any + Send + Sync>;

/// Opaque identity of an input feed.
///
/// Two feeds carrying identical bars are still different inputs: ids are
/// allocated from a process-wide counter and never reused.
///
/// # Example
///
/// ```
/// use envelope_ta::InputId;
///
/// let a = InputId::new();
/// let b = InputId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputId(u64);

impl InputId {
    /// Allocates a fresh id.
    #[must_use]
    pub fn new() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for InputId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for InputId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "input#{}", self.0)
    }
}

/// Indicator type tag carrying the full configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKey {
    /// [`Ema`](crate::Ema) instance.
    Ema(EmaConfig),
    /// [`Atr`](crate::Atr) instance.
    Atr(AtrConfig),
    /// [`T3`](crate::T3) instance.
    T3(T3Config),
    /// [`Keltner`](crate::Keltner) instance.
    Keltner(KeltnerConfig),
    /// [`T3Envelope`](crate::T3Envelope) instance.
    T3Envelope(T3EnvelopeConfig),
}

impl Display for IndicatorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ema(config) => write!(f, "{config}"),
            Self::Atr(config) => write!(f, "{config}"),
            Self::T3(config) => write!(f, "{config}"),
            Self::Keltner(config) => write!(f, "{config}"),
            Self::T3Envelope(config) => write!(f, "{config}"),
        }
    }
}

/// Registry lookup key: indicator type, configuration and input feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistryKey {
    indicator: IndicatorKey,
    input: InputId,
}

impl RegistryKey {
    #[must_use]
    pub fn new(indicator: impl Into<IndicatorKey>, input: InputId) -> Self {
        Self {
            indicator: indicator.into(),
            input,
        }
    }

    #[inline]
    #[must_use]
    pub fn indicator(&self) -> IndicatorKey {
        self.indicator
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> InputId {
        self.input
    }
}

impl Display for RegistryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ {}", self.indicator, self.input)
    }
}

/// An indicator the [`Registry`] can share.
pub trait Registered: Indicator + Send + 'static {
    /// Tags `config` with this indicator's type.
    fn indicator_key(config: Self::Config) -> IndicatorKey;
}

macro_rules! impl_registered {
    ($type:ident, $config:ty) => {
        impl Registered for $type {
            #[inline]
            fn indicator_key(config: $config) -> IndicatorKey {
                IndicatorKey::$type(config)
            }
        }

        impl From<$config> for IndicatorKey {
            #[inline]
            fn from(config: $config) -> Self {
                IndicatorKey::$type(config)
            }
        }
    };
}

impl_registered!(Ema, EmaConfig);
impl_registered!(Atr, AtrConfig);
impl_registered!(T3, T3Config);
impl_registered!(Keltner, KeltnerConfig);
impl_registered!(T3Envelope, T3EnvelopeConfig);

/// Session-scoped cache of shared indicator instances.
///
/// Equal `(type, config, input)` always yields the same instance; any
/// difference yields a distinct one. Lookups and inserts are serialized by
/// an internal lock, so the registry can be shared across threads. Each
/// instance has its own lock: computing one indicator does not block
/// lookups.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use envelope_ta::{Bar, EmaConfig, Ema, InputId, Registry};
///
/// let registry = Registry::new();
/// let feed = InputId::new();
///
/// let a = registry.get_or_create::<Ema>(feed, EmaConfig::close(20));
/// let b = registry.get_or_create::<Ema>(feed, EmaConfig::close(20));
/// assert!(Arc::ptr_eq(&a, &b));
///
/// a.lock().compute(&Bar::new(1, 10.0, 10.0, 10.0, 10.0));
/// assert_eq!(b.lock().value(), Some(10.0));
///
/// assert_eq!(registry.release(feed), 1);
/// assert!(registry.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    entries: Mutex<HashMap<RegistryKey, Erased>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the instance for `(I, config, input)`, creating it on first
    /// request.
    pub fn get_or_create<I: Registered>(&self, input: InputId, config: I::Config) -> Shared<I> {
        let key = RegistryKey::new(I::indicator_key(config), input);
        let mut entries = self.entries.lock();

        let entry = entries.entry(key).or_insert_with(|| {
            debug!(key = %key, "indicator instance created");
            Arc::new(Mutex::new(I::new(config))) as Erased
        });
        trace!(key = %key, "indicator instance shared");

        Self::downcast(key, entry)
    }

    /// Returns the instance for `(I, config, input)` if one exists.
    #[must_use]
    pub fn get<I: Registered>(&self, input: InputId, config: I::Config) -> Option<Shared<I>> {
        let key = RegistryKey::new(I::indicator_key(config), input);
        self.entries
            .lock()
            .get(&key)
            .map(|entry| Self::downcast(key, entry))
    }

    /// `true` if an instance exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &RegistryKey) -> bool {
        self.entries.lock().contains_key(key)
    }

    /// Drops one entry. Outstanding handles stay valid but are no longer
    /// shared with new requests.
    pub fn remove(&self, key: &RegistryKey) -> bool {
        let removed = self.entries.lock().remove(key).is_some();
        if removed {
            debug!(key = %key, "indicator instance removed");
        }
        removed
    }

    /// Drops every entry computed over `input`, returning how many were
    /// removed.
    pub fn release(&self, input: InputId) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|key, _| key.input != input);

        let released = before - entries.len();
        debug!(input = %input, released, "input released");
        released
    }

    /// Drops every entry.
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        debug!(released = entries.len(), "registry cleared");
        entries.clear();
    }

    /// Number of live instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn downcast<I: Registered>(key: RegistryKey, entry: &Erased) -> Shared<I> {
        Arc::clone(entry)
            .downcast::<Mutex<I>>()
            .unwrap_or_else(|_| {
                panic!("registry invariant violation: entry for {key} has a foreign type")
            })
    }
}
