//! Single producer, many consumers. The producer still writes slots
//! single-threadedly, but now it may find an older, still-unconsumed item
//! sitting in its way: rather than wait on a slow consumer, it marks the
//! slot's `gap` and moves on, so any consumer still chasing that rank can
//! abandon it instead of spinning forever.

use crate::backoff::{Backoff, RetryClass};
use crate::invariants::debug_assert_gap_monotonic;
use crate::ring::Ring;
use crate::stats;
use core::sync::atomic::Ordering;

impl<T> Ring<T> {
    /// Publishes `data`, skipping past any slot still holding an
    /// unconsumed item rather than waiting for a consumer to catch up.
    /// Always succeeds; returns `1`.
    pub fn spmc_enqueue(&self, data: T) -> usize {
        let mut t = self.tail.load(Ordering::Relaxed);
        loop {
            let slot = self.slot(t);
            let (rank, gap) = slot.load_rank_gap(Ordering::Acquire);
            if rank < 0 {
                slot.write_data(data);
                slot.publish(t, Ordering::Release);
                break;
            }
            debug_assert_gap_monotonic!(gap, t);
            slot.mark_gap(t, Ordering::Release);
            stats::global().record_spmc_skipped();
            t = t.wrapping_add(1);
        }
        // `tail` is advisory for consumers: committed once, after the
        // producer's possibly multi-slot-skipping loop settles.
        self.tail.store(t.wrapping_add(1), Ordering::Relaxed);
        1
    }

    /// Non-blocking dequeue: `None` only if the next rank is neither
    /// published nor already marked as gapped-past.
    pub fn spmc_dequeue(&self) -> Option<(T, usize)> {
        let head = self.head.load(Ordering::Relaxed);
        let slot = self.slot(head);
        let (rank, gap) = slot.load_rank_gap(Ordering::Acquire);
        if rank == head || gap >= head {
            Some(self.spmc_dequeue_backoff())
        } else {
            None
        }
    }

    /// Claims the next available rank and waits for the producer to either
    /// publish it or mark it as gapped-past, in which case a fresh rank is
    /// claimed instead.
    pub fn spmc_dequeue_backoff(&self) -> (T, usize) {
        let mut backoff = Backoff::new(RetryClass::Spmc);
        loop {
            let rank = self.head.fetch_add(1, Ordering::Relaxed);
            let slot = self.slot(rank);
            loop {
                let (slot_rank, gap) = slot.load_rank_gap(Ordering::Acquire);
                if slot_rank == rank {
                    self.assert_slot_legal(rank, self.slot_index(rank));
                    // SAFETY: rank match under an Acquire load means the
                    // producer's publish happened-before this read, and
                    // `fetch_add` on `head` guarantees this is the only
                    // consumer entitled to this rank.
                    let data = unsafe { slot.read_data() };
                    slot.reclaim(Ordering::Release);
                    return (data, backoff.retries() as usize + 1);
                }
                if gap >= rank {
                    let (slot_rank_recheck, _) = slot.load_rank_gap(Ordering::Acquire);
                    if slot_rank_recheck != rank {
                        break; // producer has moved on; claim a fresh rank
                    }
                }
                backoff.wait();
            }
        }
    }
}
