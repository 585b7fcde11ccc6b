/// Default number of recycled channels kept per thread-local cache bucket.
pub const DEFAULT_CHANNEL_CACHE_SIZE: usize = 100;

/// Upper bound on `Config::cache_size` a single bucket is allowed to hold.
/// Exists purely as a contract-violation guard (see `ChannelBuildError`);
/// the default of 100 is nowhere near it.
pub const MAX_CACHE_BUCKET_SIZE: usize = 1_000_000;

/// Default cache-line size assumed for padding purposes (platform-aware
/// padding is delegated to `crossbeam_utils::CachePadded`; this constant is
/// kept for callers who want to reason about it directly, mirroring the
/// external interface the distilled spec names).
pub const DEFAULT_CACHE_LINE_SIZE: usize = 64;

/// Concurrency flavor of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    /// Multiple producers, multiple consumers. Two locks, one per side.
    Mpmc,
    /// Multiple producers, a single consumer. Lock-free receive fast path.
    Mpsc,
    /// A single producer, a single consumer. Lock-free on both hot paths.
    Spsc,
}

/// Configuration for constructing a channel.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Number of items the channel can buffer. `0` requests a rendezvous
    /// (unbuffered) channel.
    pub capacity: usize,
    /// Concurrency flavor.
    pub flavor: Flavor,
    /// Maximum number of recycled channels kept per thread-local cache
    /// bucket. `0` disables caching for this shape entirely.
    pub cache_size: usize,
    /// Enable atomic message counters (slight overhead on the hot path).
    pub enable_metrics: bool,
}

impl Config {
    /// Creates a new configuration with custom settings.
    pub const fn new(capacity: usize, flavor: Flavor) -> Self {
        Self {
            capacity,
            flavor,
            cache_size: DEFAULT_CHANNEL_CACHE_SIZE,
            enable_metrics: false,
        }
    }

    /// Returns the ring's slot count: `capacity + 1` for buffered channels,
    /// or `1` for the rendezvous (capacity `0`) case.
    #[inline]
    pub const fn size(&self) -> usize {
        if self.capacity == 0 {
            1
        } else {
            self.capacity + 1
        }
    }

    /// Returns `true` for the unbuffered (rendezvous) case.
    #[inline]
    pub const fn is_rendezvous(&self) -> bool {
        self.capacity == 0
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 30,
            flavor: Flavor::Mpmc,
            cache_size: DEFAULT_CHANNEL_CACHE_SIZE,
            enable_metrics: false,
        }
    }
}
