//! Multi-producer single-consumer protocol.
//!
//! The send side is identical to MPMC: multiple producers still serialize on
//! `tail_lock` (or `head_lock` for a rendezvous channel, the only slot there
//! is). The receive side has a single, unique consumer, so it does not take
//! a lock on its fast path: it busy-waits with an adaptive `Backoff`,
//! brackets the read with a `SeqCst` fence, and only parks on `head_lock`
//! once the backoff budget is exhausted.

use crate::backoff::Backoff;
use crate::raw::RawChannel;
use std::sync::atomic::{fence, Ordering};

pub use super::mpmc::{send, try_send};

pub fn try_recv<T>(raw: &RawChannel<T>) -> Option<T> {
    if raw.is_empty() {
        return None;
    }
    fence(Ordering::SeqCst);
    let (idx, new_head) = raw.reserve_recv_slot();
    let value = unsafe { raw.read_slot(idx) };
    fence(Ordering::SeqCst);
    raw.store_head(new_head, Ordering::Release);
    raw.not_full().notify_one();
    raw.record_recv();
    Some(value)
}

pub fn recv<T>(raw: &RawChannel<T>) -> T {
    let mut backoff = Backoff::new();
    while raw.is_empty() {
        if backoff.is_completed() {
            let mut guard = raw.head_lock().lock().unwrap();
            while raw.is_empty() {
                guard = raw.not_empty().wait(guard).unwrap();
            }
            drop(guard);
            break;
        }
        backoff.snooze();
    }

    fence(Ordering::SeqCst);
    let (idx, new_head) = raw.reserve_recv_slot();
    let value = unsafe { raw.read_slot(idx) };
    fence(Ordering::SeqCst);
    raw.store_head(new_head, Ordering::Release);
    raw.not_full().notify_one();
    raw.record_recv();
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Flavor};

    #[test]
    fn single_producer_order_preserved() {
        let raw = RawChannel::<u32>::new(Config::new(4, Flavor::Mpsc));
        for i in 0..10 {
            send(&raw, i);
        }
        for i in 0..10 {
            assert_eq!(recv(&raw), i);
        }
    }

    #[test]
    fn try_recv_on_empty_returns_none() {
        let raw = RawChannel::<u32>::new(Config::new(4, Flavor::Mpsc));
        assert_eq!(try_recv(&raw), None);
    }

    #[test]
    fn multiple_producers_preserve_per_producer_order() {
        use std::sync::Arc;
        use std::thread;

        let raw = Arc::new(RawChannel::<(usize, u32)>::new(Config::new(16, Flavor::Mpsc)));
        let mut handles = Vec::new();
        for pid in 0..4 {
            let raw = Arc::clone(&raw);
            handles.push(thread::spawn(move || {
                for i in 0..200u32 {
                    send(&raw, (pid, i));
                }
            }));
        }

        let mut last_seen = [0u32; 4];
        let mut total = 0;
        while total < 800 {
            if let Some((pid, value)) = try_recv(&raw) {
                assert_eq!(value, last_seen[pid]);
                last_seen[pid] += 1;
                total += 1;
            } else {
                std::thread::yield_now();
            }
        }

        for h in handles {
            h.join().unwrap();
        }
    }
}
