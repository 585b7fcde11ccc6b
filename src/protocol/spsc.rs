//! Single-producer single-consumer protocol.
//!
//! Both sides are unique, so neither takes a lock on its hot path; both
//! busy-wait on their predicate with an adaptive `Backoff`, bracket the
//! slot access with a `SeqCst` fence, and only park on the relevant
//! lock/condvar pair once backoff is exhausted. The receive path is
//! identical to MPSC's (a single, unique consumer is a single, unique
//! consumer regardless of how many producers there are), so it is reused
//! directly rather than duplicated.

use crate::backoff::Backoff;
use crate::raw::RawChannel;
use std::sync::atomic::{fence, Ordering};

pub use super::mpsc::{recv, try_recv};

pub fn try_send<T>(raw: &RawChannel<T>, value: T) -> Result<(), T> {
    if raw.is_full() {
        return Err(value);
    }
    fence(Ordering::SeqCst);
    let (idx, published) = raw.reserve_send_slot();
    unsafe { raw.write_slot(idx, value) };
    fence(Ordering::SeqCst);
    raw.publish_send(published, Ordering::Release);
    raw.not_empty().notify_one();
    raw.record_send();
    Ok(())
}

pub fn send<T>(raw: &RawChannel<T>, value: T) {
    let mut backoff = Backoff::new();
    while raw.is_full() {
        if backoff.is_completed() {
            let lock = if raw.is_rendezvous() {
                raw.head_lock()
            } else {
                raw.tail_lock()
            };
            let mut guard = lock.lock().unwrap();
            while raw.is_full() {
                guard = raw.not_full().wait(guard).unwrap();
            }
            drop(guard);
            break;
        }
        backoff.snooze();
    }

    fence(Ordering::SeqCst);
    let (idx, published) = raw.reserve_send_slot();
    unsafe { raw.write_slot(idx, value) };
    fence(Ordering::SeqCst);
    raw.publish_send(published, Ordering::Release);
    raw.not_empty().notify_one();
    raw.record_send();
}
