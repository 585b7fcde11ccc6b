//! Shared-memory, blocking-capable, typed inter-thread channels.
//!
//! Three concurrency flavors share one ring-buffer engine:
//!
//! - **MPMC** — any number of producers, any number of consumers.
//! - **MPSC** — any number of producers, exactly one consumer (lock-free
//!   receive fast path).
//! - **SPSC** — exactly one producer, exactly one consumer (lock-free on
//!   both hot paths).
//!
//! A channel constructed with `capacity == 0` is a synchronous rendezvous:
//! each send meets exactly one recv through a single slot.
//!
//! Channel objects are expensive to build (locks, condvars, a heap
//! allocation), so they are recycled through a per-thread cache keyed by
//! payload type, capacity, and flavor rather than rebuilt from scratch each
//! time a [`TypedChannel`] is dropped and a new one of the same shape is
//! requested.
//!
//! # Example
//!
//! ```
//! use ringchan_rs::{init_chan, Config, Flavor};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let config = Config::new(8, Flavor::Mpsc);
//! let channel = Arc::new(init_chan::<u64>(config));
//!
//! let producer = Arc::clone(&channel);
//! let handle = thread::spawn(move || {
//!     for i in 0..10 {
//!         producer.send(i);
//!     }
//! });
//!
//! let mut total = 0u64;
//! for _ in 0..10 {
//!     total += channel.recv();
//! }
//! handle.join().unwrap();
//! assert_eq!(total, 45);
//! ```

mod backoff;
mod cache;
mod channel;
mod config;
mod error;
mod invariants;
mod metrics;
mod protocol;
mod raw;

pub use backoff::Backoff;
pub use cache::flush_cache;
pub use channel::{init_chan, try_init_chan, Isolated, TypedChannel};
pub use config::{
    Config, Flavor, DEFAULT_CACHE_LINE_SIZE, DEFAULT_CHANNEL_CACHE_SIZE, MAX_CACHE_BUCKET_SIZE,
};
pub use error::ChannelBuildError;
pub use metrics::MetricsSnapshot;
pub use raw::RawChannel;
