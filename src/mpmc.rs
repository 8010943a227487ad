//! Many producers, many consumers. Dequeue delegates straight to the SPMC
//! implementation - a consumer doesn't care how many producers there are,
//! only that ranks arrive in some order. Enqueue is the one place that
//! needs the full 128-bit CAS on the packed rank/gap word, since now
//! multiple producers can race for the same slot.

use crate::invariants::debug_assert_gap_monotonic;
use crate::ring::Ring;
use crate::slot::{pack, unpack, CLAIMED, EMPTY};
use crate::stats;
use core::sync::atomic::Ordering;

impl<T> Ring<T> {
    /// Publishes `data` into the ring, resolving producer-producer
    /// contention with a CAS on the packed rank/gap word. Always succeeds
    /// (eventually); returns `1`.
    pub fn mpmc_enqueue(&self, data: T) -> usize {
        'acquire: loop {
            let rank = self.tail.fetch_add(1, Ordering::Relaxed);
            let slot = self.slot(rank);
            loop {
                let exp = slot.load_packed(Ordering::Acquire);
                let (exp_rank, exp_gap) = unpack(exp);

                if exp_gap >= rank {
                    // A producer racing ahead of us already gapped past
                    // this rank; abandon it and claim a fresh one.
                    stats::global().record_mpmc_skipped();
                    continue 'acquire;
                }

                if exp_rank >= 0 {
                    // Slot still holds an unconsumed item from an earlier
                    // rank. Raise its gap so a consumer chasing our rank
                    // can abandon it, then move on ourselves.
                    debug_assert_gap_monotonic!(exp_gap, rank);
                    let desired = pack(exp_rank, rank);
                    let _ = slot.cas_packed(exp, desired, Ordering::Release, Ordering::Relaxed);
                    stats::global().record_mpmc_skipped();
                    continue 'acquire;
                }

                debug_assert_eq!(exp_rank, EMPTY);
                let desired = pack(CLAIMED, exp_gap);
                match slot.cas_packed(exp, desired, Ordering::AcqRel, Ordering::Relaxed) {
                    Ok(_) => {
                        slot.write_data(data);
                        slot.publish(rank, Ordering::Release);
                        return 1;
                    }
                    Err(_) => continue, // lost the claim race; retry this rank
                }
            }
        }
    }

    /// Delegates to [`Ring::spmc_dequeue`]: a dequeuer doesn't distinguish
    /// one producer from many.
    pub fn mpmc_dequeue(&self) -> Option<(T, usize)> {
        self.spmc_dequeue()
    }

    /// Delegates to [`Ring::spmc_dequeue_backoff`].
    pub fn mpmc_dequeue_backoff(&self) -> (T, usize) {
        self.spmc_dequeue_backoff()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn enqueue_dequeue_roundtrip() {
        let ring: Ring<u32> = Ring::new(Config::new(8).unwrap());
        assert_eq!(ring.mpmc_enqueue(5), 1);
        let (value, _) = ring.mpmc_dequeue().unwrap();
        assert_eq!(value, 5);
    }

    #[test]
    fn many_producers_many_consumers_move_every_item() {
        use std::sync::atomic::AtomicUsize;
        use std::sync::Arc;
        use std::thread;

        const PRODUCERS: u32 = 4;
        const PER_PRODUCER: u32 = 200;

        let ring = Arc::new(Ring::<u32>::new(Config::new(64).unwrap()));
        let mut producers = Vec::new();
        for p in 0..PRODUCERS {
            let ring = Arc::clone(&ring);
            producers.push(thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    ring.mpmc_enqueue(p * PER_PRODUCER + i);
                }
            }));
        }

        let consumed = Arc::new(AtomicUsize::new(0));
        let target = (PRODUCERS * PER_PRODUCER) as usize;
        let mut consumers = Vec::new();
        for _ in 0..3 {
            let ring = Arc::clone(&ring);
            let consumed = Arc::clone(&consumed);
            consumers.push(thread::spawn(move || {
                let mut local = Vec::new();
                while consumed.load(Ordering::Relaxed) < target {
                    if let Some((value, _)) = ring.mpmc_dequeue() {
                        local.push(value);
                        consumed.fetch_add(1, Ordering::Relaxed);
                    } else {
                        std::hint::spin_loop();
                    }
                }
                local
            }));
        }

        for p in producers {
            p.join().unwrap();
        }
        let mut all = Vec::new();
        for c in consumers {
            all.extend(c.join().unwrap());
        }
        all.sort_unstable();
        assert_eq!(all, (0..target as u32).collect::<Vec<_>>());
    }
}
