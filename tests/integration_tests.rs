//! Threaded end-to-end scenarios covering SPSC/SPMC/MPMC throughput,
//! full-ring backpressure, multi-ring fan-in, and empty-queue polling.

use ffq_rs::{Config, MpmcQueue, Ring, SpmcQueue, SpscQueue};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Scenario 1: SPSC producer writes 1..N, consumer reads 1..N: output
/// equals input, in order.
#[test]
fn spsc_million_roundtrip_preserves_order() {
    const N: u32 = 1_000_000;
    let queue = SpscQueue::<u32>::new(Config::new(4096).unwrap());
    let (producer, consumer) = queue.split();

    let producer_handle = thread::spawn(move || {
        for i in 1..=N {
            producer.enqueue(i);
        }
    });

    let mut next_expected = 1u32;
    while next_expected <= N {
        if let Some((value, _)) = consumer.dequeue() {
            assert_eq!(value, next_expected);
            next_expected += 1;
        } else {
            std::hint::spin_loop();
        }
    }

    producer_handle.join().unwrap();
}

/// Scenario 2: one producer enqueues 1..100_000, four consumers drain:
/// union of consumer outputs is the full set, with no duplicates.
#[test]
fn spmc_four_consumers_drain_full_set_no_duplicates() {
    const N: u32 = 100_000;
    const CONSUMERS: usize = 4;

    let queue = SpmcQueue::<u32>::new(Config::new(8192).unwrap());
    let (producer, consumer) = queue.split();

    let producer_handle = thread::spawn(move || {
        for i in 1..=N {
            producer.enqueue(i);
        }
    });

    let consumed = Arc::new(AtomicUsize::new(0));
    let mut handles = Vec::new();
    for _ in 0..CONSUMERS {
        let consumer = consumer.clone();
        let consumed = Arc::clone(&consumed);
        handles.push(thread::spawn(move || {
            let mut local = Vec::new();
            while consumed.load(Ordering::Relaxed) < N as usize {
                if let Some((value, _)) = consumer.dequeue() {
                    local.push(value);
                    consumed.fetch_add(1, Ordering::Relaxed);
                } else {
                    std::hint::spin_loop();
                }
            }
            local
        }));
    }

    producer_handle.join().unwrap();
    let mut all = Vec::new();
    for h in handles {
        all.extend(h.join().unwrap());
    }

    assert_eq!(all.len(), N as usize);
    let unique: HashSet<_> = all.iter().copied().collect();
    assert_eq!(unique.len(), N as usize);
    assert_eq!(unique, (1..=N).collect::<HashSet<_>>());
}

/// Scenario 3: four producers each enqueue 25_000 distinct tagged values,
/// four consumers drain: union is 100_000 distinct values, no duplicates.
#[test]
fn mpmc_four_producers_four_consumers_no_duplicates() {
    const PRODUCERS: u32 = 4;
    const PER_PRODUCER: u32 = 25_000;
    const TOTAL: u32 = PRODUCERS * PER_PRODUCER;

    let queue = MpmcQueue::<u32>::new(Config::new(8192).unwrap());
    let (producer, consumer) = queue.split();

    let mut producer_handles = Vec::new();
    for p in 0..PRODUCERS {
        let producer = producer.clone();
        producer_handles.push(thread::spawn(move || {
            for i in 0..PER_PRODUCER {
                // tag each value with its producer so we can check provenance too
                producer.enqueue(p * PER_PRODUCER + i);
            }
        }));
    }

    let consumed = Arc::new(AtomicUsize::new(0));
    let mut consumer_handles = Vec::new();
    for _ in 0..4 {
        let consumer = consumer.clone();
        let consumed = Arc::clone(&consumed);
        consumer_handles.push(thread::spawn(move || {
            let mut local = Vec::new();
            while consumed.load(Ordering::Relaxed) < TOTAL as usize {
                if let Some((value, _)) = consumer.dequeue() {
                    local.push(value);
                    consumed.fetch_add(1, Ordering::Relaxed);
                } else {
                    std::hint::spin_loop();
                }
            }
            local
        }));
    }

    for h in producer_handles {
        h.join().unwrap();
    }
    let mut all = Vec::new();
    for h in consumer_handles {
        all.extend(h.join().unwrap());
    }

    assert_eq!(all.len(), TOTAL as usize);
    let unique: HashSet<_> = all.iter().copied().collect();
    assert_eq!(unique.len(), TOTAL as usize);
    assert_eq!(unique, (0..TOTAL).collect::<HashSet<_>>());
}

/// Scenario 4: SPSC full-ring stress with a tiny capacity, forcing the
/// producer to repeatedly block on a slow consumer.
#[test]
fn spsc_full_ring_stress_preserves_order() {
    const N: u32 = 1000;
    let queue = SpscQueue::<u32>::new(Config::new(4).unwrap());
    let (producer, consumer) = queue.split();

    let producer_handle = thread::spawn(move || {
        for i in 1..=N {
            producer.enqueue(i);
        }
    });

    let mut out = Vec::with_capacity(N as usize);
    while out.len() < N as usize {
        if let Some((value, _)) = consumer.dequeue() {
            out.push(value);
            thread::sleep(Duration::from_micros(1));
        } else {
            std::hint::spin_loop();
        }
    }

    producer_handle.join().unwrap();
    assert_eq!(out, (1..=N).collect::<Vec<_>>());
}

/// Scenario 5: two SPSC rings, producer A pushes evens, producer B pushes
/// odds, and `spsc_mdequeue` drains both completely via a blocking scan.
#[test]
fn multi_queue_blocking_drain_completes_both_streams() {
    const N: u32 = 2000;
    let rings = Arc::new(vec![
        Ring::<u32>::new(Config::new(64).unwrap()),
        Ring::<u32>::new(Config::new(64).unwrap()),
    ]);

    let producer_a = {
        let rings = Arc::clone(&rings);
        thread::spawn(move || {
            for even in (0..N).step_by(2) {
                rings[0].spsc_enqueue(even);
            }
        })
    };
    let producer_b = {
        let rings = Arc::clone(&rings);
        thread::spawn(move || {
            for odd in (1..N).step_by(2) {
                rings[1].spsc_enqueue(odd);
            }
        })
    };

    let mut drained = Vec::with_capacity(N as usize);
    while drained.len() < N as usize {
        let (value, _) = Ring::spsc_mdequeue(&rings, true).unwrap();
        drained.push(value);
    }

    producer_a.join().unwrap();
    producer_b.join().unwrap();

    drained.sort_unstable();
    assert_eq!(drained, (0..N).collect::<Vec<_>>());
}

/// Scenario 6: a freshly constructed ring reports empty on every
/// non-blocking dequeue variant without advancing `head`.
#[test]
fn non_blocking_dequeue_on_empty_ring_is_idempotent() {
    let spsc: Ring<u32> = Ring::new(Config::new(8).unwrap());
    assert!(spsc.spsc_dequeue().is_none());
    assert!(spsc.spsc_dequeue().is_none());
    assert_eq!(spsc.len(), 0);

    let spmc: Ring<u32> = Ring::new(Config::new(8).unwrap());
    assert!(spmc.spmc_dequeue().is_none());
    assert!(spmc.spmc_dequeue().is_none());
    assert_eq!(spmc.len(), 0);

    let mpmc: Ring<u32> = Ring::new(Config::new(8).unwrap());
    assert!(mpmc.mpmc_dequeue().is_none());
    assert!(mpmc.mpmc_dequeue().is_none());
    assert_eq!(mpmc.len(), 0);
}
