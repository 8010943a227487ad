//! Debug-only consistency checks for the rank/gap slot protocol. All of these
//! compile to nothing outside debug builds; they exist to catch a broken
//! invariant at the point it first goes wrong rather than three context
//! switches later.

/// INV-SLOT: a slot's rank is always `-1` (empty), `-2` (mid-claim, MPMC
/// only) or a non-negative rank belonging to the slot's index class.
macro_rules! debug_assert_slot_legal {
    ($rank:expr, $capacity:expr, $index:expr) => {
        debug_assert!(
            $rank == -1 || $rank == -2 || ($rank >= 0 && ($rank as usize) % $capacity == $index),
            "slot legality violated: rank {} at index {} (capacity {})",
            $rank,
            $index,
            $capacity
        )
    };
}

/// INV-EMPTY: a producer publishing into a slot must find it empty first.
macro_rules! debug_assert_slot_empty {
    ($rank:expr) => {
        debug_assert!($rank == -1, "expected empty slot, found rank {}", $rank)
    };
}

/// INV-GAP-MONO: `gap` only ever increases for a given slot.
macro_rules! debug_assert_gap_monotonic {
    ($old_gap:expr, $new_gap:expr) => {
        debug_assert!(
            $new_gap >= $old_gap,
            "gap decreased from {} to {}",
            $old_gap,
            $new_gap
        )
    };
}

/// INV-RANK-MONO: `head`/`tail` only ever increase.
macro_rules! debug_assert_monotonic {
    ($name:literal, $old:expr, $new:expr) => {
        debug_assert!($new >= $old, "{} decreased from {} to {}", $name, $old, $new)
    };
}

/// INV-BOUND: the gap between `tail` and `head` never exceeds the ring's
/// capacity (a producer cannot lap a consumer that hasn't kept up).
macro_rules! debug_assert_bounded_span {
    ($tail:expr, $head:expr, $capacity:expr) => {
        debug_assert!(
            ($tail as i64).wrapping_sub($head as i64) as u64 <= ($capacity as u64),
            "ring span exceeded capacity: tail {} head {} capacity {}",
            $tail,
            $head,
            $capacity
        )
    };
}

pub(crate) use debug_assert_bounded_span;
pub(crate) use debug_assert_gap_monotonic;
pub(crate) use debug_assert_monotonic;
pub(crate) use debug_assert_slot_empty;
pub(crate) use debug_assert_slot_legal;
