//! Dispatch over the three channel flavors.
//!
//! The flavor set is closed and never changes after a channel is
//! constructed, so dispatch is a `match` computed once and cached as a
//! small table of function pointers on the typed façade, rather than an
//! indirect call re-derived on every operation.

pub mod mpmc;
pub mod mpsc;
pub mod spsc;

use crate::config::Flavor;
use crate::raw::RawChannel;

/// Function-pointer table for one channel's send/recv operations, selected
/// once at construction based on its flavor.
pub struct Ops<T> {
    pub try_send: fn(&RawChannel<T>, T) -> Result<(), T>,
    pub send: fn(&RawChannel<T>, T),
    pub try_recv: fn(&RawChannel<T>) -> Option<T>,
    pub recv: fn(&RawChannel<T>) -> T,
}

impl<T> Ops<T> {
    pub fn for_flavor(flavor: Flavor) -> Self {
        match flavor {
            Flavor::Mpmc => Self {
                try_send: mpmc::try_send,
                send: mpmc::send,
                try_recv: mpmc::try_recv,
                recv: mpmc::recv,
            },
            Flavor::Mpsc => Self {
                try_send: mpsc::try_send,
                send: mpsc::send,
                try_recv: mpsc::try_recv,
                recv: mpsc::recv,
            },
            Flavor::Spsc => Self {
                try_send: spsc::try_send,
                send: spsc::send,
                try_recv: spsc::try_recv,
                recv: spsc::recv,
            },
        }
    }
}

impl<T> Clone for Ops<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Ops<T> {}
