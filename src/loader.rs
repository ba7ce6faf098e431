//! Backing loaders and miss counting.
//!
//! A [`Loader`] stands in for the expensive operation a cache exists to avoid.
//! [`BoundedCache`](crate::BoundedCache) calls it exactly once per miss, so a
//! loader that counts its invocations measures the cache's miss count
//! independently of the cache's own bookkeeping.

use core::fmt;

/// Produces the value for a key the cache does not hold.
pub trait Loader<K, V> {
    /// Loads the value for `key`.
    fn load(&mut self, key: &K) -> V;
}

impl<K, V, L: Loader<K, V> + ?Sized> Loader<K, V> for &mut L {
    #[inline]
    fn load(&mut self, key: &K) -> V {
        (**self).load(key)
    }
}

/// Monotonically increasing count of loader invocations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MissCounter(u64);

impl MissCounter {
    /// A counter at zero.
    #[inline]
    pub const fn new() -> Self {
        MissCounter(0)
    }

    /// Adds one.
    #[inline]
    pub fn increment(&mut self) {
        self.0 += 1;
    }

    /// Current count.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A loader that delegates to a closure and counts every call.
///
/// ```
/// use missbench::{CountingLoader, Loader};
///
/// let mut loader = CountingLoader::new(|key: &u64| key * 2);
/// assert_eq!(loader.load(&21), 42);
/// assert_eq!(loader.counter().value(), 1);
/// ```
pub struct CountingLoader<F> {
    load_fn: F,
    counter: MissCounter,
}

impl<F> CountingLoader<F> {
    /// Wraps `load_fn` with a fresh counter.
    pub fn new(load_fn: F) -> Self {
        CountingLoader {
            load_fn,
            counter: MissCounter::new(),
        }
    }

    /// The invocation counter.
    #[inline]
    pub fn counter(&self) -> MissCounter {
        self.counter
    }

    /// Shorthand for `self.counter().value()`.
    #[inline]
    pub fn misses(&self) -> u64 {
        self.counter.value()
    }
}

impl<K, V, F> Loader<K, V> for CountingLoader<F>
where
    F: FnMut(&K) -> V,
{
    fn load(&mut self, key: &K) -> V {
        self.counter.increment();
        (self.load_fn)(key)
    }
}

impl<F> fmt::Debug for CountingLoader<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingLoader")
            .field("counter", &self.counter)
            .finish()
    }
}

/// Value handed out by [`unit_loader`]: a fresh allocation per miss.
pub type Payload = Box<u64>;

/// The benchmark's stand-in loader: counts calls and allocates a new payload
/// holding the key, mirroring an expensive fetch.
pub fn unit_loader<K: Copy + Into<u64>>() -> CountingLoader<impl FnMut(&K) -> Payload> {
    CountingLoader::new(|key: &K| Box::new((*key).into()))
}
