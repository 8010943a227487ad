//! `ffq-rs`: fixed-capacity, lock-free, in-memory SPSC/SPMC/MPMC queues.
//!
//! Every queue is a single ring of rank-tagged slots. A slot's `rank` field
//! doubles as its occupancy flag (`-1` empty, `-2` mid-claim under MPMC
//! contention, else the producer rank that published it); a `gap` field
//! records the highest rank a producer has skipped past it, letting a
//! consumer abandon a claim on a slot the producer has moved on from
//! instead of spinning on it forever.
//!
//! Three disciplines share this layout:
//!
//! - **SPSC** ([`spsc`]) - one producer, one consumer, no contention at all;
//!   the rank field alone is the full handshake.
//! - **SPMC** ([`spmc`]) - one producer, many consumers; the producer uses
//!   `gap` to skip a slow consumer rather than block on it, and consumers
//!   race each other via `fetch_add` on `head`.
//! - **MPMC** ([`mpmc`]) - many producers, many consumers; producer-producer
//!   contention is resolved with a CAS on the packed `(rank, gap)` word.
//!   Dequeue is identical to SPMC - a consumer doesn't care how many
//!   producers there are.
//!
//! Each discipline is available two ways: the raw [`Ring<T>`] methods
//! (`spsc_enqueue`, `spmc_dequeue_backoff`, ...) named after the original
//! C API this crate is a Rust rendition of, and the [`handles`] module's
//! typed `Producer`/`Consumer` wrappers, which encode each discipline's
//! producer/consumer cardinality so misuse (e.g. two threads calling
//! `spsc_enqueue` on the same ring) doesn't type-check.
//!
//! Retry counts from every backoff loop feed into process-wide
//! [`stats::Stats`], dumpable via [`stats::Stats::dump`].

mod backoff;
mod config;
mod error;
mod handles;
mod invariants;
mod mpmc;
mod ring;
mod slot;
mod spmc;
mod spsc;
mod stats;

pub use backoff::{Backoff, RetryClass};
pub use config::{Config, Tunables, HIGH_THROUGHPUT_CAPACITY, LOW_LATENCY_CAPACITY};
pub use error::RingError;
pub use handles::{
    MpmcConsumer, MpmcProducer, MpmcQueue, SpmcConsumer, SpmcProducer, SpmcQueue, SpscConsumer,
    SpscProducer, SpscQueue,
};
pub use ring::Ring;
pub use stats::{Stats, StatsSnapshot};
