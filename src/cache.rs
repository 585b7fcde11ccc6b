//! Per-thread free list of recycled channel objects.
//!
//! Channel construction (locks, condvars, a heap allocation) is expensive
//! relative to typical message throughput, so channels are recycled by
//! exact shape rather than reallocated from scratch each time. The
//! distilled spec keys this cache by `(itemsize, capacity, flavor)`; in
//! safe Rust, `itemsize` is replaced by `TypeId` (see `SPEC_FULL.md` §9) —
//! two distinct types of the same byte size must never share a recycled
//! allocation here, since Rust cannot prove that sound without `unsafe`
//! transmutation the distilled spec never asked for.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::config::{Config, Flavor};
use crate::invariants::debug_assert_cache_entry_clean;
use crate::raw::RawChannel;

type CacheKey = (TypeId, usize, Flavor);

thread_local! {
    static CACHE: RefCell<HashMap<CacheKey, Vec<Box<dyn Any>>>> = RefCell::new(HashMap::new());
}

fn key_for<T: 'static>(config: &Config) -> CacheKey {
    (TypeId::of::<T>(), config.capacity, config.flavor)
}

/// Pops a recycled channel matching `config`'s shape, or allocates a fresh
/// one if the cache has nothing to offer (or caching is disabled).
pub fn alloc<T: Send + 'static>(config: Config) -> Box<RawChannel<T>> {
    if config.cache_size == 0 {
        return Box::new(RawChannel::new(config));
    }

    let key = key_for::<T>(&config);
    let popped = CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        cache.entry(key).or_insert_with(Vec::new).pop()
    });

    match popped {
        Some(boxed_any) => {
            let raw = boxed_any
                .downcast::<RawChannel<T>>()
                .expect("cache key carried the wrong concrete type");
            debug_assert_cache_entry_clean!(raw.is_empty(), raw.is_closed());
            raw
        }
        None => Box::new(RawChannel::new(config)),
    }
}

/// Returns a channel to the cache, resetting it to the empty/open state
/// first. If the bucket for this shape is already at `config.cache_size`,
/// the channel is dropped instead — there is no separate teardown step to
/// perform beyond ordinary `Drop`.
pub fn free<T: Send + 'static>(mut raw: Box<RawChannel<T>>, config: Config) {
    if config.cache_size == 0 {
        return;
    }

    raw.reset_for_cache();
    let key = key_for::<T>(&config);
    CACHE.with(move |cache| {
        let mut cache = cache.borrow_mut();
        let bucket = cache.entry(key).or_insert_with(Vec::new);
        if bucket.len() < config.cache_size {
            bucket.push(raw as Box<dyn Any>);
        }
    });
}

/// Drops every cached channel on the current thread immediately. Rust's
/// own `thread_local!` destructor already does this at thread exit; this
/// is the explicit, deterministic escape hatch for callers who want it
/// sooner.
pub fn flush_cache() {
    CACHE.with(|cache| cache.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recycled_channel_has_same_address() {
        flush_cache();
        let config = Config::new(8, Flavor::Mpmc);

        let first: Box<RawChannel<u32>> = alloc(config);
        let addr_first = &*first as *const RawChannel<u32>;
        free(first, config);

        let second: Box<RawChannel<u32>> = alloc(config);
        let addr_second = &*second as *const RawChannel<u32>;

        assert_eq!(addr_first, addr_second);
        flush_cache();
    }

    #[test]
    fn disabled_cache_never_recycles() {
        flush_cache();
        let mut config = Config::new(8, Flavor::Mpmc);
        config.cache_size = 0;

        let first: Box<RawChannel<u32>> = alloc(config);
        let addr_first = &*first as *const RawChannel<u32>;
        free(first, config);

        let second: Box<RawChannel<u32>> = alloc(config);
        let addr_second = &*second as *const RawChannel<u32>;

        assert_ne!(addr_first, addr_second);
    }

    #[test]
    fn distinct_payload_types_do_not_share_a_bucket() {
        flush_cache();
        let config32 = Config::new(8, Flavor::Mpmc);

        let a: Box<RawChannel<u32>> = alloc(config32);
        free(a, config32);

        // A channel of a different payload type, same capacity/flavor,
        // must allocate fresh rather than reuse the u32 bucket's entry.
        let b: Box<RawChannel<u64>> = alloc(config32);
        drop(b);
        flush_cache();
    }
}
