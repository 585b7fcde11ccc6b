//! Debug assertion macros for ring buffer and cache invariants.
//!
//! These macros provide runtime checks for the invariants documented in
//! `SPEC_FULL.md`. They are only active in debug builds
//! (`#[cfg(debug_assertions)]`), so there is zero overhead in release builds.

// =============================================================================
// INV-SEQ-01: Bounded Occupancy
// =============================================================================

/// Assert that occupancy never exceeds `size - 1` (buffered channels).
///
/// **Invariant**: `0 <= numItems <= size - 1`
macro_rules! debug_assert_bounded_occupancy {
    ($count:expr, $size:expr) => {
        debug_assert!(
            $count < $size,
            "INV-SEQ-01 violated: occupancy {} not below size {}",
            $count,
            $size
        )
    };
}

// =============================================================================
// INV-SEQ-02: Monotonic Progress
// =============================================================================

/// Assert that a sequence number only increases.
///
/// **Invariant**: `new_value >= old_value`
macro_rules! debug_assert_monotonic {
    ($name:literal, $old:expr, $new:expr) => {
        debug_assert!(
            $new >= $old,
            "INV-SEQ-02 violated: {} decreased from {} to {}",
            $name,
            $old,
            $new
        )
    };
}

// =============================================================================
// INV-INIT-01: Slot Index In Range
// =============================================================================

/// Assert that a computed slot index is within the backing buffer.
macro_rules! debug_assert_slot_in_range {
    ($idx:expr, $size:expr) => {
        debug_assert!(
            $idx < $size,
            "INV-INIT-01 violated: slot index {} outside buffer of size {}",
            $idx,
            $size
        )
    };
}

// =============================================================================
// INV-CACHE-01: Recycled Channel Is Empty And Open
// =============================================================================

/// Assert a channel popped from the cache is empty and not closed.
macro_rules! debug_assert_cache_entry_clean {
    ($is_empty:expr, $is_closed:expr) => {
        debug_assert!(
            $is_empty,
            "INV-CACHE-01 violated: cached channel was not empty"
        );
        debug_assert!(
            !$is_closed,
            "INV-CACHE-01 violated: cached channel was closed"
        );
    };
}

pub(crate) use debug_assert_bounded_occupancy;
pub(crate) use debug_assert_cache_entry_clean;
pub(crate) use debug_assert_monotonic;
pub(crate) use debug_assert_slot_in_range;
