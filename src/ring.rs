//! The shared ring buffer all three disciplines operate on. This module
//! owns construction, indexing and capacity bookkeeping; the actual
//! enqueue/dequeue protocols live in [`crate::spsc`], [`crate::spmc`] and
//! [`crate::mpmc`] as further `impl<T> Ring<T>` blocks.

use crate::config::Config;
use crate::error::RingError;
use crate::invariants::debug_assert_slot_legal;
use crate::slot::Slot;
use core::sync::atomic::{AtomicI64, Ordering};
use crossbeam_utils::CachePadded;

/// A fixed-capacity, lock-free ring of `Slot<T>`s. Which enqueue/dequeue
/// methods are safe to call concurrently on a given `Ring` depends on which
/// discipline you've chosen for it - the ring itself doesn't enforce that;
/// [`crate::handles`] provides typed handles that do.
pub struct Ring<T> {
    pub(crate) head: CachePadded<AtomicI64>,
    pub(crate) tail: CachePadded<AtomicI64>,
    pub(crate) mask: usize,
    pub(crate) buffer: Box<[Slot<T>]>,
}

// SAFETY: all cross-thread handoff of `T` is gated by the rank/gap protocol
// on each slot; the ring itself holds no `T` outside a `Slot`.
unsafe impl<T: Send> Send for Ring<T> {}
unsafe impl<T: Send> Sync for Ring<T> {}

impl<T> Ring<T> {
    /// Allocates a ring of `config.capacity()` slots, each starting empty.
    pub fn new(config: Config) -> Self {
        let capacity = config.capacity();
        let mut buffer = Vec::with_capacity(capacity);
        buffer.resize_with(capacity, Slot::new);
        Self {
            head: CachePadded::new(AtomicI64::new(0)),
            tail: CachePadded::new(AtomicI64::new(0)),
            mask: config.mask(),
            buffer: buffer.into_boxed_slice(),
        }
    }

    /// Validates `capacity` and allocates a ring of that many slots in one
    /// step, matching the original `new_ffq`'s fallible-construction shape
    /// (there, an `assert`; here, a `Result` so a library caller gets to
    /// decide how to react instead of aborting the process).
    pub fn try_new(capacity: usize) -> Result<Self, RingError> {
        Config::new(capacity).map(Self::new)
    }

    pub fn capacity(&self) -> usize {
        self.mask + 1
    }

    /// Slots currently holding a published, unconsumed value, as observed
    /// from `head`/`tail` at this instant - advisory under concurrent
    /// access, exact only when called from a single quiescent thread.
    pub fn len(&self) -> usize {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Relaxed);
        tail.wrapping_sub(head) as u64 as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maps a rank to its slot index. With `randomize-addresses` enabled
    /// this scrambles the low byte of the rank before masking, the same
    /// `HASH_INDEX` transform as the original, to disrupt false sharing
    /// between adjacent ranks under adversarial access patterns.
    #[inline]
    pub(crate) fn slot_index(&self, rank: i64) -> usize {
        let rank = rank as u64 as usize;
        #[cfg(feature = "randomize-addresses")]
        {
            (rank & (self.mask ^ 0xFF)) | ((rank & 0x0F) << 4) | ((rank & 0xF0) >> 4)
        }
        #[cfg(not(feature = "randomize-addresses"))]
        {
            rank & self.mask
        }
    }

    #[inline]
    pub(crate) fn slot(&self, rank: i64) -> &Slot<T> {
        &self.buffer[self.slot_index(rank)]
    }

    /// INV-SLOT: a rank observed at `index` must be `-1`/`-2` or congruent to
    /// `index` modulo capacity. Called after a consumer confirms a slot's
    /// published rank, to catch an index/rank mismatch bug at the point it
    /// first manifests rather than downstream as a silently wrong value.
    #[inline]
    pub(crate) fn assert_slot_legal(&self, rank: i64, index: usize) {
        debug_assert_slot_legal!(rank, self.capacity(), index);
    }
}
