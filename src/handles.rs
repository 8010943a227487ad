//! Ergonomic `Producer`/`Consumer` handles layered over the raw `Ring<T>`
//! methods. The raw methods are correct but unchecked: nothing stops you
//! calling `spsc_enqueue` from two threads at once. These handles encode
//! each discipline's cardinality at the type level instead - a non-`Clone`
//! producer can't be handed to a second thread by accident.

use crate::config::Config;
use crate::ring::Ring;
use std::sync::Arc;

/// A single-producer, single-consumer queue. [`SpscQueue::split`] hands out
/// exactly one producer and one consumer handle, matching the discipline
/// the underlying ring requires.
pub struct SpscQueue<T> {
    ring: Arc<Ring<T>>,
}

impl<T> SpscQueue<T> {
    pub fn new(config: Config) -> Self {
        Self {
            ring: Arc::new(Ring::new(config)),
        }
    }

    pub fn split(self) -> (SpscProducer<T>, SpscConsumer<T>) {
        (
            SpscProducer {
                ring: Arc::clone(&self.ring),
            },
            SpscConsumer { ring: self.ring },
        )
    }
}

/// Not `Clone`: cloning would let two threads enqueue into the same ring,
/// breaking the single-producer invariant the SPSC fast path relies on.
pub struct SpscProducer<T> {
    ring: Arc<Ring<T>>,
}

impl<T> SpscProducer<T> {
    pub fn enqueue(&self, data: T) -> usize {
        self.ring.spsc_enqueue(data)
    }
}

/// Not `Clone`, for the same reason as [`SpscProducer`], on the consumer side.
pub struct SpscConsumer<T> {
    ring: Arc<Ring<T>>,
}

impl<T> SpscConsumer<T> {
    pub fn dequeue(&self) -> Option<(T, usize)> {
        self.ring.spsc_dequeue()
    }

    pub fn dequeue_backoff(&self) -> (T, usize) {
        self.ring.spsc_dequeue_backoff()
    }
}

/// A single-producer, multi-consumer queue. The producer handle stays
/// exclusive; consumer handles are cheap to clone since many threads are
/// expected to race over `head`.
pub struct SpmcQueue<T> {
    ring: Arc<Ring<T>>,
}

impl<T> SpmcQueue<T> {
    pub fn new(config: Config) -> Self {
        Self {
            ring: Arc::new(Ring::new(config)),
        }
    }

    pub fn split(self) -> (SpmcProducer<T>, SpmcConsumer<T>) {
        (
            SpmcProducer {
                ring: Arc::clone(&self.ring),
            },
            SpmcConsumer { ring: self.ring },
        )
    }
}

/// Not `Clone`: SPMC still has exactly one producer.
pub struct SpmcProducer<T> {
    ring: Arc<Ring<T>>,
}

impl<T> SpmcProducer<T> {
    pub fn enqueue(&self, data: T) -> usize {
        self.ring.spmc_enqueue(data)
    }
}

#[derive(Clone)]
pub struct SpmcConsumer<T> {
    ring: Arc<Ring<T>>,
}

impl<T> SpmcConsumer<T> {
    pub fn dequeue(&self) -> Option<(T, usize)> {
        self.ring.spmc_dequeue()
    }

    pub fn dequeue_backoff(&self) -> (T, usize) {
        self.ring.spmc_dequeue_backoff()
    }
}

/// A multi-producer, multi-consumer queue. Both handle kinds are cheap to
/// clone: the ring's 128-bit CAS is what actually arbitrates producers.
pub struct MpmcQueue<T> {
    ring: Arc<Ring<T>>,
}

impl<T> MpmcQueue<T> {
    pub fn new(config: Config) -> Self {
        Self {
            ring: Arc::new(Ring::new(config)),
        }
    }

    pub fn split(self) -> (MpmcProducer<T>, MpmcConsumer<T>) {
        (
            MpmcProducer {
                ring: Arc::clone(&self.ring),
            },
            MpmcConsumer { ring: self.ring },
        )
    }
}

#[derive(Clone)]
pub struct MpmcProducer<T> {
    ring: Arc<Ring<T>>,
}

impl<T> MpmcProducer<T> {
    pub fn enqueue(&self, data: T) -> usize {
        self.ring.mpmc_enqueue(data)
    }
}

#[derive(Clone)]
pub struct MpmcConsumer<T> {
    ring: Arc<Ring<T>>,
}

impl<T> MpmcConsumer<T> {
    pub fn dequeue(&self) -> Option<(T, usize)> {
        self.ring.mpmc_dequeue()
    }

    pub fn dequeue_backoff(&self) -> (T, usize) {
        self.ring.mpmc_dequeue_backoff()
    }
}
