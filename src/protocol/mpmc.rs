//! Multi-producer multi-consumer protocol.
//!
//! Producers serialize on `tail_lock`, consumers serialize on `head_lock`,
//! so a send and a recv can proceed concurrently. Unbuffered (rendezvous)
//! channels instead synchronize both sides through `head_lock` alone, since
//! there is only one slot to hand off; `RawChannel::reserve_send_slot` and
//! friends already fold that distinction in, so the code below reads the
//! same for both cases.

use crate::raw::RawChannel;
use std::sync::atomic::Ordering;

pub fn try_send<T>(raw: &RawChannel<T>, value: T) -> Result<(), T> {
    if raw.is_full() {
        return Err(value);
    }

    let lock = if raw.is_rendezvous() {
        raw.head_lock()
    } else {
        raw.tail_lock()
    };
    let guard = lock.lock().unwrap();
    if raw.is_full() {
        return Err(value);
    }
    let (idx, published) = raw.reserve_send_slot();
    unsafe { raw.write_slot(idx, value) };
    raw.publish_send(published, Ordering::Release);
    drop(guard);
    raw.not_empty().notify_one();
    raw.record_send();
    Ok(())
}

pub fn send<T>(raw: &RawChannel<T>, value: T) {
    let lock = if raw.is_rendezvous() {
        raw.head_lock()
    } else {
        raw.tail_lock()
    };
    let mut guard = lock.lock().unwrap();
    while raw.is_full() {
        guard = raw.not_full().wait(guard).unwrap();
    }
    let (idx, published) = raw.reserve_send_slot();
    unsafe { raw.write_slot(idx, value) };
    raw.publish_send(published, Ordering::Release);
    drop(guard);
    raw.not_empty().notify_one();
    raw.record_send();
}

pub fn try_recv<T>(raw: &RawChannel<T>) -> Option<T> {
    if raw.is_empty() {
        return None;
    }

    let guard = raw.head_lock().lock().unwrap();
    if raw.is_empty() {
        return None;
    }
    let (idx, new_head) = raw.reserve_recv_slot();
    let value = unsafe { raw.read_slot(idx) };
    raw.store_head(new_head, Ordering::Release);
    drop(guard);
    raw.not_full().notify_one();
    raw.record_recv();
    Some(value)
}

pub fn recv<T>(raw: &RawChannel<T>) -> T {
    let mut guard = raw.head_lock().lock().unwrap();
    while raw.is_empty() {
        guard = raw.not_empty().wait(guard).unwrap();
    }
    let (idx, new_head) = raw.reserve_recv_slot();
    let value = unsafe { raw.read_slot(idx) };
    raw.store_head(new_head, Ordering::Release);
    drop(guard);
    raw.not_full().notify_one();
    raw.record_recv();
    value
}
