//! Single-producer, single-consumer enqueue/dequeue. The simplest of the
//! three disciplines: exactly one thread ever writes `tail` and the slots it
//! touches, exactly one ever writes `head` and the slots *it* touches, so
//! neither side needs a CAS - only the per-slot rank acts as the handshake.

use crate::backoff::{Backoff, RetryClass};
use crate::invariants::{debug_assert_bounded_span, debug_assert_monotonic, debug_assert_slot_empty};
use crate::ring::Ring;
use crate::slot::EMPTY;
use crate::stats;
use core::sync::atomic::Ordering;

impl<T> Ring<T> {
    /// Publishes `data` at the next slot, spinning/backing off if a slow
    /// consumer hasn't yet vacated it. Returns the number of retries + 1.
    pub fn spsc_enqueue(&self, data: T) -> usize {
        let tail = self.tail.load(Ordering::Relaxed);
        let next_tail = tail.wrapping_add(1);
        debug_assert_monotonic!("tail", tail, next_tail);
        self.tail.store(next_tail, Ordering::Relaxed);
        let slot = self.slot(tail);

        let mut backoff = Backoff::new(RetryClass::Spsc);
        if slot.load_rank(Ordering::Acquire) != EMPTY {
            stats::global().record_spsc_delayed();
            while slot.load_rank(Ordering::Acquire) != EMPTY {
                backoff.wait();
            }
        }

        debug_assert_slot_empty!(slot.load_rank(Ordering::Relaxed));
        debug_assert_bounded_span!(next_tail, self.head.load(Ordering::Relaxed), self.capacity());
        slot.write_data(data);
        slot.publish(tail, Ordering::Release);
        backoff.retries() as usize + 1
    }

    /// Non-blocking dequeue: returns `None` immediately if the next slot
    /// isn't published yet, rather than spinning.
    pub fn spsc_dequeue(&self) -> Option<(T, usize)> {
        let head = self.head.load(Ordering::Relaxed);
        let slot = self.slot(head);
        if slot.load_rank(Ordering::Acquire) != head {
            return None;
        }
        Some(self.spsc_dequeue_backoff())
    }

    /// Dequeues the next slot, backing off until the producer publishes it.
    pub fn spsc_dequeue_backoff(&self) -> (T, usize) {
        let head = self.head.load(Ordering::Relaxed);
        let next_head = head.wrapping_add(1);
        debug_assert_monotonic!("head", head, next_head);
        self.head.store(next_head, Ordering::Relaxed);
        let slot = self.slot(head);

        let mut backoff = Backoff::new(RetryClass::Spsc);
        while slot.load_rank(Ordering::Acquire) != head {
            backoff.wait();
        }

        self.assert_slot_legal(head, self.slot_index(head));
        // SAFETY: rank == head was just observed via an Acquire load, so the
        // producer's write happened-before this read; this is the one
        // consumer entitled to `head`.
        let data = unsafe { slot.read_data() };
        slot.reclaim(Ordering::Release);
        (data, backoff.retries() as usize + 1)
    }

    /// Polls several SPSC rings for the first one with a ready item. When
    /// `blocking` is true, spins with backoff until one is found; when
    /// false, returns `None` after a single pass over `rings`.
    pub fn spsc_mdequeue(rings: &[Ring<T>], blocking: bool) -> Option<(T, usize)> {
        let mut backoff = Backoff::new(RetryClass::Spsc);
        loop {
            for ring in rings {
                let head = ring.head.load(Ordering::Relaxed);
                let slot = ring.slot(head);
                if slot.load_rank(Ordering::Acquire) == head {
                    ring.head.store(head.wrapping_add(1), Ordering::Relaxed);
                    // SAFETY: same reasoning as `spsc_dequeue_backoff`.
                    let data = unsafe { slot.read_data() };
                    slot.reclaim(Ordering::Release);
                    return Some((data, backoff.retries() as usize + 1));
                }
            }
            if !blocking {
                return None;
            }
            backoff.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn enqueue_dequeue_roundtrip() {
        let ring: Ring<u32> = Ring::new(Config::new(8).unwrap());
        assert_eq!(ring.spsc_enqueue(42), 1);
        let (value, retries) = ring.spsc_dequeue().unwrap();
        assert_eq!(value, 42);
        assert_eq!(retries, 1);
    }

    #[test]
    fn dequeue_on_empty_ring_is_none() {
        let ring: Ring<u32> = Ring::new(Config::new(8).unwrap());
        assert!(ring.spsc_dequeue().is_none());
    }

    #[test]
    fn preserves_fifo_order() {
        let ring: Ring<u32> = Ring::new(Config::new(8).unwrap());
        for i in 0..5 {
            ring.spsc_enqueue(i);
        }
        for i in 0..5 {
            let (value, _) = ring.spsc_dequeue().unwrap();
            assert_eq!(value, i);
        }
    }

    #[test]
    fn mdequeue_checks_rings_in_order() {
        let rings = vec![
            Ring::<u32>::new(Config::new(8).unwrap()),
            Ring::<u32>::new(Config::new(8).unwrap()),
        ];
        rings[1].spsc_enqueue(99);
        let (value, _) = Ring::spsc_mdequeue(&rings, false).unwrap();
        assert_eq!(value, 99);
    }

    #[test]
    fn mdequeue_non_blocking_returns_none_when_all_empty() {
        let rings = vec![Ring::<u32>::new(Config::new(8).unwrap())];
        assert!(Ring::spsc_mdequeue(&rings, false).is_none());
    }

    #[test]
    fn wraps_around_ring_capacity() {
        let ring: Ring<u32> = Ring::new(Config::new(4).unwrap());
        for round in 0..3u32 {
            for i in 0..4u32 {
                ring.spsc_enqueue(round * 4 + i);
            }
            for i in 0..4u32 {
                let (value, _) = ring.spsc_dequeue().unwrap();
                assert_eq!(value, round * 4 + i);
            }
        }
    }
}
