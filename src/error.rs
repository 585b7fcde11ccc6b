use thiserror::Error;

/// Errors that can occur while constructing a channel.
///
/// These never occur in the default configuration; they guard against
/// contract violations the caller can fix before opening a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChannelBuildError {
    /// `Config::cache_size` combined with the channel's shape would overflow
    /// the bucket accounting the cache keeps per-thread.
    #[error("cache size {requested} exceeds the supported maximum {max}")]
    CacheSizeTooLarge {
        /// The cache size that was requested.
        requested: usize,
        /// The supported maximum.
        max: usize,
    },
    /// `capacity + 1` (the ring's slot count) overflowed `usize`.
    #[error("capacity {capacity} overflows the ring's internal slot count")]
    CapacityOverflow {
        /// The capacity that was requested.
        capacity: usize,
    },
}
