use crate::cache;
use crate::config::{Config, MAX_CACHE_BUCKET_SIZE};
use crate::error::ChannelBuildError;
use crate::metrics::MetricsSnapshot;
use crate::protocol::Ops;
use crate::raw::RawChannel;

/// Wraps a value the caller has proven is not referenced anywhere else,
/// formalizing the "isolated transfer" contract the distilled spec names
/// for `recvOwned`/`sendOwned`-style operations. Rust's ownership model
/// already guarantees this for any bare `T` moved across the channel; the
/// wrapper exists so call sites can spell the intent out explicitly rather
/// than because the language needs it to be safe.
#[derive(Debug)]
pub struct Isolated<T>(T);

impl<T> Isolated<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

/// A typed, move-only handle onto a channel.
///
/// Not `Clone`/`Copy` by construction — threads that need to share access
/// coordinate through `Arc<TypedChannel<T>>` at the call site, the same way
/// the underlying `RawChannel<T>` is designed to be shared.
pub struct TypedChannel<T> {
    raw: Option<Box<RawChannel<T>>>,
    config: Config,
    ops: Ops<T>,
}

fn validate_config(config: Config) -> Result<(), ChannelBuildError> {
    if config.capacity == usize::MAX {
        return Err(ChannelBuildError::CapacityOverflow {
            capacity: config.capacity,
        });
    }
    if config.cache_size > MAX_CACHE_BUCKET_SIZE {
        return Err(ChannelBuildError::CacheSizeTooLarge {
            requested: config.cache_size,
            max: MAX_CACHE_BUCKET_SIZE,
        });
    }
    Ok(())
}

/// Fallible constructor. Most callers want [`init_chan`].
pub fn try_init_chan<T: Send + 'static>(
    config: Config,
) -> Result<TypedChannel<T>, ChannelBuildError> {
    validate_config(config)?;
    let raw = cache::alloc::<T>(config);
    let ops = Ops::for_flavor(config.flavor);
    Ok(TypedChannel {
        raw: Some(raw),
        config,
        ops,
    })
}

/// Constructs a channel for `T` with the given configuration.
///
/// # Panics
///
/// Panics if `config` violates a construction-time contract (see
/// [`ChannelBuildError`]) — these are programming errors, not conditions a
/// caller should expect to recover from.
pub fn init_chan<T: Send + 'static>(config: Config) -> TypedChannel<T> {
    try_init_chan(config)
        .unwrap_or_else(|e| panic!("channel construction contract violated: {e}"))
}

impl<T: Send + 'static> TypedChannel<T> {
    #[inline]
    fn raw(&self) -> &RawChannel<T> {
        self.raw
            .as_deref()
            .expect("TypedChannel used after being dropped")
    }

    /// Attempts to enqueue `value` without blocking. Returns the value back
    /// on failure (full, or no waiting consumer for a rendezvous channel).
    pub fn try_send(&self, value: T) -> Result<(), T> {
        (self.ops.try_send)(self.raw(), value)
    }

    /// Enqueues `value`, blocking until there is room.
    pub fn send(&self, value: T) {
        (self.ops.send)(self.raw(), value);
    }

    /// Attempts to dequeue a value without blocking.
    pub fn try_recv(&self) -> Option<T> {
        (self.ops.try_recv)(self.raw())
    }

    /// Dequeues a value, blocking until one is available.
    pub fn recv(&self) -> T {
        (self.ops.recv)(self.raw())
    }

    /// Like [`recv`](Self::recv), wrapping the result in [`Isolated`].
    pub fn recv_owned(&self) -> Isolated<T> {
        Isolated::new(self.recv())
    }

    /// Non-blocking send of an isolated value.
    pub fn try_send_isolated(&self, value: Isolated<T>) -> Result<(), Isolated<T>> {
        self.try_send(value.0).map_err(Isolated::new)
    }

    /// Blocking send of an isolated value.
    pub fn send_isolated(&self, value: Isolated<T>) {
        self.send(value.0);
    }

    /// Approximate, racy item count.
    pub fn peek(&self) -> usize {
        self.raw().len()
    }

    /// Clears the advisory closed flag. Returns `false` if already open.
    pub fn open(&self) -> bool {
        self.raw().open()
    }

    /// Sets the advisory closed flag. Returns `false` if already closed.
    ///
    /// Does not wake any thread currently blocked in `send`/`recv` on this
    /// channel.
    pub fn close(&self) -> bool {
        self.raw().close()
    }

    pub fn is_closed(&self) -> bool {
        self.raw().is_closed()
    }

    pub fn capacity(&self) -> usize {
        self.raw().capacity()
    }

    pub fn is_rendezvous(&self) -> bool {
        self.raw().is_rendezvous()
    }

    pub fn metrics(&self) -> Option<MetricsSnapshot> {
        self.raw().metrics()
    }
}

impl<T: Send + 'static> Drop for TypedChannel<T> {
    fn drop(&mut self) {
        if let Some(raw) = self.raw.take() {
            cache::free(raw, self.config);
        }
    }
}

// Safety: TypedChannel<T> only exposes RawChannel<T> through &self methods
// that are themselves Send+Sync-safe whenever T: Send.
unsafe impl<T: Send> Send for TypedChannel<T> {}
unsafe impl<T: Send> Sync for TypedChannel<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::flush_cache;
    use crate::config::Flavor;

    #[test]
    fn close_open_idempotence_scenario() {
        let ch: TypedChannel<u32> = init_chan(Config::default());
        assert!(ch.close());
        assert!(!ch.close());
        assert!(ch.open());
        assert!(!ch.open());
    }

    #[test]
    fn try_send_returns_value_back_on_failure() {
        let ch: TypedChannel<u32> = init_chan(Config::new(1, Flavor::Mpmc));
        assert!(ch.try_send(1).is_ok());
        assert_eq!(ch.try_send(2), Err(2));
    }

    #[test]
    fn peek_starts_at_zero() {
        let ch: TypedChannel<u32> = init_chan(Config::default());
        assert_eq!(ch.peek(), 0);
    }

    #[test]
    fn drop_recycles_into_the_cache() {
        flush_cache();
        let config = Config::new(4, Flavor::Mpmc);

        let first: TypedChannel<u32> = init_chan(config);
        let addr_first = first.raw() as *const RawChannel<u32>;
        drop(first);

        let second: TypedChannel<u32> = init_chan(config);
        let addr_second = second.raw() as *const RawChannel<u32>;

        assert_eq!(addr_first, addr_second);
        flush_cache();
    }

    #[test]
    fn isolated_round_trip() {
        let ch: TypedChannel<String> = init_chan(Config::new(1, Flavor::Spsc));
        ch.send_isolated(Isolated::new("hello".to_string()));
        let received = ch.recv_owned();
        assert_eq!(received.into_inner(), "hello");
    }

    #[test]
    #[should_panic(expected = "contract violated")]
    fn init_chan_panics_on_capacity_overflow() {
        let mut config = Config::default();
        config.capacity = usize::MAX;
        let _: TypedChannel<u32> = init_chan(config);
    }

    #[test]
    fn try_init_chan_rejects_oversized_cache_bucket() {
        let mut config = Config::default();
        config.cache_size = MAX_CACHE_BUCKET_SIZE + 1;
        let err = try_init_chan::<u32>(config).unwrap_err();
        assert_eq!(
            err,
            ChannelBuildError::CacheSizeTooLarge {
                requested: MAX_CACHE_BUCKET_SIZE + 1,
                max: MAX_CACHE_BUCKET_SIZE,
            }
        );
    }

    #[test]
    #[should_panic(expected = "contract violated")]
    fn init_chan_panics_on_oversized_cache_bucket() {
        let mut config = Config::default();
        config.cache_size = MAX_CACHE_BUCKET_SIZE + 1;
        let _: TypedChannel<u32> = init_chan(config);
    }
}
