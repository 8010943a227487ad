//! The `(rank, gap)` slot word: the whole synchronization protocol lives in
//! how this word is read and CAS'd. Packed into one 128-bit atomic
//! (`portable_atomic::AtomicI128`, since stable Rust has no native i128
//! atomics) so every discipline - not just MPMC - shares one `Slot<T>`
//! layout and one lock-free update primitive.

use portable_atomic::AtomicI128;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::Ordering;

/// Slot holds no published value.
pub(crate) const EMPTY: i64 = -1;
/// A producer has exclusively claimed this slot but not yet published into
/// it (MPMC only; transient, never observed at rest).
pub(crate) const CLAIMED: i64 = -2;

#[inline]
pub(crate) fn pack(rank: i64, gap: i64) -> i128 {
    (((rank as u64 as u128) << 64) | (gap as u64 as u128)) as i128
}

#[inline]
pub(crate) fn unpack(word: i128) -> (i64, i64) {
    let word = word as u128;
    let rank = (word >> 64) as u64 as i64;
    let gap = word as u64 as i64;
    (rank, gap)
}

/// One ring cell: a rank/gap tag plus an opaque payload. `repr(align(64))`
/// is a build-time policy (`align-slots` feature), not the default - most
/// workloads are better served by the denser, more cache-friendly packed
/// layout than by paying a cache line per slot.
#[cfg_attr(feature = "align-slots", repr(align(64)))]
pub(crate) struct Slot<T> {
    rank_gap: AtomicI128,
    data: UnsafeCell<MaybeUninit<T>>,
}

// SAFETY: a `Slot<T>` only ever hands its `T` to one producer/consumer at a
// time; cross-thread handoff is exactly what the rank/gap protocol gates.
unsafe impl<T: Send> Send for Slot<T> {}
unsafe impl<T: Send> Sync for Slot<T> {}

impl<T> Slot<T> {
    pub(crate) fn new() -> Self {
        Self {
            rank_gap: AtomicI128::new(pack(EMPTY, EMPTY)),
            data: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    #[inline]
    pub(crate) fn load_rank(&self, order: Ordering) -> i64 {
        unpack(self.rank_gap.load(order)).0
    }

    #[inline]
    pub(crate) fn load_rank_gap(&self, order: Ordering) -> (i64, i64) {
        unpack(self.rank_gap.load(order))
    }

    #[inline]
    pub(crate) fn load_packed(&self, order: Ordering) -> i128 {
        self.rank_gap.load(order)
    }

    #[inline]
    pub(crate) fn cas_packed(
        &self,
        current: i128,
        new: i128,
        success: Ordering,
        failure: Ordering,
    ) -> Result<i128, i128> {
        self.rank_gap.compare_exchange(current, new, success, failure)
    }

    /// Publish `rank`, preserving whatever `gap` currently holds (gap is
    /// monotonic and must never be reset by a publish).
    #[inline]
    pub(crate) fn publish(&self, rank: i64, order: Ordering) {
        self.update_rank(rank, order);
    }

    /// Return this slot to `empty`, preserving `gap`.
    #[inline]
    pub(crate) fn reclaim(&self, order: Ordering) {
        self.update_rank(EMPTY, order);
    }

    /// Record that the producer has skipped past this slot at `new_gap`,
    /// preserving whatever `rank` currently holds.
    #[inline]
    pub(crate) fn mark_gap(&self, new_gap: i64, order: Ordering) {
        let mut current = self.rank_gap.load(Ordering::Relaxed);
        loop {
            let (rank, _) = unpack(current);
            let desired = pack(rank, new_gap);
            match self
                .rank_gap
                .compare_exchange_weak(current, desired, order, Ordering::Relaxed)
            {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    #[inline]
    fn update_rank(&self, new_rank: i64, order: Ordering) {
        let mut current = self.rank_gap.load(Ordering::Relaxed);
        loop {
            let (_, gap) = unpack(current);
            let desired = pack(new_rank, gap);
            match self
                .rank_gap
                .compare_exchange_weak(current, desired, order, Ordering::Relaxed)
            {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    /// # Safety
    /// Caller must have exclusive producer access to this slot (the
    /// protocol's single-writer-per-rank guarantee) and the slot must not
    /// currently hold a live, unconsumed value.
    #[inline]
    pub(crate) fn write_data(&self, value: T) {
        unsafe {
            (*self.data.get()).write(value);
        }
    }

    /// # Safety
    /// Caller must have just observed this slot's rank matching the rank it
    /// is entitled to via an Acquire load, guaranteeing the producer's
    /// release-store happened-before this read, and must be the sole
    /// consumer entitled to that rank.
    #[inline]
    pub(crate) unsafe fn read_data(&self) -> T {
        (*self.data.get()).assume_init_read()
    }
}

impl<T> Drop for Slot<T> {
    fn drop(&mut self) {
        let (rank, _) = unpack(*self.rank_gap.get_mut());
        if rank >= 0 {
            unsafe {
                (*self.data.get()).assume_init_drop();
            }
        }
    }
}
