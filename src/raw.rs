use crate::config::{Config, Flavor};
use crate::invariants::{
    debug_assert_bounded_occupancy, debug_assert_monotonic, debug_assert_slot_in_range,
};
use crate::metrics::{Metrics, MetricsSnapshot};
use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicIsize, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};

// =============================================================================
// MEMORY LAYOUT & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// Producers serialize on `tail_lock` (MPMC, MPSC) or touch `tail` directly
// with no lock at all (SPSC). Consumers serialize on `head_lock` (MPMC) or
// busy-wait and touch `head` directly (MPSC, SPSC). `head` and `tail` live in
// separate cache lines (via `CachePadded`) so the producer and consumer hot
// paths never contend for the same cache line.
//
// Buffered channels (`capacity >= 1`) use `size = capacity + 1` slots and
// derive occupancy from `(size + tail - head) % size`, sacrificing one slot
// so full and empty are never ambiguous. Rendezvous channels (`capacity ==
// 0`) use a single slot and let `head` itself toggle between `0` (vacant)
// and `1` (occupied); `tail` is unused in that mode.
//
// =============================================================================

/// The shared ring buffer and synchronization state behind a channel.
///
/// Generic over the payload type so slots are stored with the right size and
/// alignment; see the cache module for how this interacts with per-thread
/// recycling.
pub struct RawChannel<T> {
    capacity: usize,
    size: usize,
    flavor: Flavor,

    tail: CachePadded<AtomicUsize>,
    tail_lock: CachePadded<Mutex<()>>,
    not_full: Condvar,

    head: CachePadded<AtomicUsize>,
    head_lock: CachePadded<Mutex<()>>,
    not_empty: Condvar,

    /// Advisory only; never consulted by the send/recv protocols themselves.
    closed: AtomicBool,
    /// Always observed at `-1`. Kept inert: nothing in this crate ever
    /// assigns it a real thread id, matching what it does upstream.
    owner: AtomicIsize,
    metrics: Option<Metrics>,

    buffer: UnsafeCell<Box<[MaybeUninit<T>]>>,
}

// Safety: all cross-thread access to `buffer` is mediated by the head/tail
// protocol (locks for MPMC, single-writer-per-side discipline for MPSC/SPSC).
unsafe impl<T: Send> Send for RawChannel<T> {}
unsafe impl<T: Send> Sync for RawChannel<T> {}

impl<T> RawChannel<T> {
    pub fn new(config: Config) -> Self {
        let size = config.size();

        let mut buffer = Vec::with_capacity(size);
        buffer.resize_with(size, MaybeUninit::uninit);

        Self {
            capacity: config.capacity,
            size,
            flavor: config.flavor,
            tail: CachePadded::new(AtomicUsize::new(0)),
            tail_lock: CachePadded::new(Mutex::new(())),
            not_full: Condvar::new(),
            head: CachePadded::new(AtomicUsize::new(0)),
            head_lock: CachePadded::new(Mutex::new(())),
            not_empty: Condvar::new(),
            closed: AtomicBool::new(false),
            owner: AtomicIsize::new(-1),
            metrics: if config.enable_metrics {
                Some(Metrics::new())
            } else {
                None
            },
            buffer: UnsafeCell::new(buffer.into_boxed_slice()),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    #[inline]
    pub fn is_rendezvous(&self) -> bool {
        self.capacity == 0
    }

    #[inline]
    pub fn metrics(&self) -> Option<MetricsSnapshot> {
        self.metrics.as_ref().map(Metrics::snapshot)
    }

    #[inline]
    pub(crate) fn record_send(&self) {
        if let Some(m) = &self.metrics {
            m.record_send();
        }
    }

    #[inline]
    pub(crate) fn record_recv(&self) {
        if let Some(m) = &self.metrics {
            m.record_recv();
        }
    }

    // -------------------------------------------------------------------
    // Advisory closed flag
    // -------------------------------------------------------------------

    /// Sets the closed flag. Returns `false` if it was already closed.
    ///
    /// Relaxed ordering: this flag gives no happens-before guarantee and is
    /// never consulted on the send/recv fast path. Closing a channel does
    /// not wake any thread blocked in `send`/`recv`.
    pub fn close(&self) -> bool {
        !self.closed.swap(true, Ordering::Relaxed)
    }

    /// Clears the closed flag. Returns `false` if it was already open.
    pub fn open(&self) -> bool {
        self.closed.swap(false, Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }

    // -------------------------------------------------------------------
    // Occupancy
    // -------------------------------------------------------------------

    #[inline]
    fn slot_index(&self, seq: usize) -> usize {
        let idx = seq % self.size;
        debug_assert_slot_in_range!(idx, self.size);
        idx
    }

    /// Approximate, racy item count. Used by `peek()`.
    pub fn len(&self) -> usize {
        if self.is_rendezvous() {
            usize::from(self.head.load(Ordering::Acquire) == 1)
        } else {
            let head = self.head.load(Ordering::Acquire);
            let tail = self.tail.load(Ordering::Acquire);
            (self.size + tail - head) % self.size
        }
    }

    pub fn is_empty(&self) -> bool {
        if self.is_rendezvous() {
            self.head.load(Ordering::Acquire) == 0
        } else {
            self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
        }
    }

    pub fn is_full(&self) -> bool {
        if self.is_rendezvous() {
            self.head.load(Ordering::Acquire) == 1
        } else {
            let count = self.len();
            debug_assert_bounded_occupancy!(count, self.size);
            count == self.size - 1
        }
    }

    // -------------------------------------------------------------------
    // Raw index access for the protocol modules
    // -------------------------------------------------------------------

    pub(crate) fn tail_lock(&self) -> &Mutex<()> {
        &self.tail_lock
    }

    pub(crate) fn head_lock(&self) -> &Mutex<()> {
        &self.head_lock
    }

    pub(crate) fn not_full(&self) -> &Condvar {
        &self.not_full
    }

    pub(crate) fn not_empty(&self) -> &Condvar {
        &self.not_empty
    }

    pub(crate) fn load_head(&self, order: Ordering) -> usize {
        self.head.load(order)
    }

    pub(crate) fn load_tail(&self, order: Ordering) -> usize {
        self.tail.load(order)
    }

    pub(crate) fn store_head(&self, value: usize, order: Ordering) {
        if !self.is_rendezvous() {
            debug_assert_monotonic!("head", self.head.load(Ordering::Relaxed), value);
        }
        self.head.store(value, order);
    }

    pub(crate) fn store_tail(&self, value: usize, order: Ordering) {
        debug_assert_monotonic!("tail", self.tail.load(Ordering::Relaxed), value);
        self.tail.store(value, order);
    }

    /// Slot index a producer should write to for its next item, and the
    /// value to publish as the new `tail` (or `head`, for a rendezvous
    /// channel's single occupancy flag) once that write is visible.
    pub(crate) fn reserve_send_slot(&self) -> (usize, usize) {
        if self.is_rendezvous() {
            (0, 1)
        } else {
            let tail = self.load_tail(Ordering::Relaxed);
            (tail, tail.wrapping_add(1))
        }
    }

    /// Slot index a consumer should read from for its next item, and the
    /// value to publish as the new `head` once that read has completed.
    pub(crate) fn reserve_recv_slot(&self) -> (usize, usize) {
        if self.is_rendezvous() {
            (0, 0)
        } else {
            let head = self.load_head(Ordering::Relaxed);
            (head, head.wrapping_add(1))
        }
    }

    /// Publishes a send: for a rendezvous channel this is the occupancy
    /// flag (`head`), for a buffered channel it is `tail`.
    pub(crate) fn publish_send(&self, new_value: usize, order: Ordering) {
        if self.is_rendezvous() {
            self.store_head(new_value, order);
        } else {
            self.store_tail(new_value, order);
        }
    }

    /// Writes `value` into the slot addressed by sequence number `seq`.
    ///
    /// # Safety
    /// Caller must hold exclusive claim over this slot (reserved but not yet
    /// published), i.e. the protocol has already verified there is room.
    pub(crate) unsafe fn write_slot(&self, seq: usize, value: T) {
        let idx = self.slot_index(seq);
        let slot = &mut *self.buffer.get();
        slot[idx].write(value);
    }

    /// Reads and takes ownership of the slot addressed by sequence number
    /// `seq`, which must have been previously written and not yet read.
    ///
    /// # Safety
    /// Caller must hold exclusive claim over this slot, i.e. the protocol
    /// has already verified an item is present there.
    pub(crate) unsafe fn read_slot(&self, seq: usize) -> T {
        let idx = self.slot_index(seq);
        let slot = &mut *self.buffer.get();
        slot[idx].assume_init_read()
    }

    // -------------------------------------------------------------------
    // Cache recycling support
    // -------------------------------------------------------------------

    /// Drops any items still resident and resets the channel to the empty,
    /// open state a freshly constructed channel would be in. Used by the
    /// cache before a channel is recycled.
    pub(crate) fn reset_for_cache(&mut self) {
        self.drop_remaining_items();
        self.head.store(0, Ordering::Relaxed);
        self.tail.store(0, Ordering::Relaxed);
        self.closed.store(false, Ordering::Relaxed);
    }

    fn drop_remaining_items(&mut self) {
        if self.is_rendezvous() {
            if self.head.load(Ordering::Relaxed) == 1 {
                let slot = self.buffer.get_mut();
                unsafe { ptr::drop_in_place(slot[0].as_mut_ptr()) };
            }
            return;
        }

        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);
        let count = (self.size + tail - head) % self.size;
        let slot = self.buffer.get_mut();
        for i in 0..count {
            let idx = (head + i) % self.size;
            unsafe { ptr::drop_in_place(slot[idx].as_mut_ptr()) };
        }
    }
}

impl<T> Drop for RawChannel<T> {
    fn drop(&mut self) {
        self.drop_remaining_items();
    }
}
