//! Process-wide queue statistics, mirroring the original's file-scope
//! `qst` and `no_sleeping` globals. One instance per process, not per ring:
//! the original counts retries across every queue a program happens to run,
//! and callers that want per-ring numbers should partition by thread/ring
//! themselves.

use crate::backoff::RetryClass;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};

const HISTOGRAM_BUCKETS: usize = 12;

const fn zeroed_histogram() -> [AtomicU64; HISTOGRAM_BUCKETS] {
    [
        AtomicU64::new(0),
        AtomicU64::new(0),
        AtomicU64::new(0),
        AtomicU64::new(0),
        AtomicU64::new(0),
        AtomicU64::new(0),
        AtomicU64::new(0),
        AtomicU64::new(0),
        AtomicU64::new(0),
        AtomicU64::new(0),
        AtomicU64::new(0),
        AtomicU64::new(0),
    ]
}

/// A point-in-time, non-atomic copy of [`Stats`] for inspection or dumping.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub spsc_enqueue_delayed: u64,
    pub spmc_enqueue_skipped: u64,
    pub mpmc_enqueue_skipped: u64,
    pub spsc_enqueue_retries: [u64; HISTOGRAM_BUCKETS],
    pub spmc_enqueue_retries: [u64; HISTOGRAM_BUCKETS],
    pub mpmc_enqueue_retries: [u64; HISTOGRAM_BUCKETS],
    pub errors: u64,
}

pub struct Stats {
    spsc_enqueue_delayed: AtomicU64,
    spmc_enqueue_skipped: AtomicU64,
    mpmc_enqueue_skipped: AtomicU64,
    spsc_enqueue_retries: [AtomicU64; HISTOGRAM_BUCKETS],
    spmc_enqueue_retries: [AtomicU64; HISTOGRAM_BUCKETS],
    mpmc_enqueue_retries: [AtomicU64; HISTOGRAM_BUCKETS],
    errors: AtomicU64,
    /// Count of threads currently parked in the SPMC/MPMC sleep path; used
    /// to skew later sleepers' wait time so they don't all wake at once.
    sleep_priority: AtomicU64,
}

static GLOBAL: Stats = Stats::new();

/// The process-wide statistics instance. There is exactly one: the original
/// `qst`/`no_sleeping` globals are not per-queue either.
pub fn global() -> &'static Stats {
    &GLOBAL
}

impl Stats {
    const fn new() -> Self {
        Self {
            spsc_enqueue_delayed: AtomicU64::new(0),
            spmc_enqueue_skipped: AtomicU64::new(0),
            mpmc_enqueue_skipped: AtomicU64::new(0),
            spsc_enqueue_retries: zeroed_histogram(),
            spmc_enqueue_retries: zeroed_histogram(),
            mpmc_enqueue_retries: zeroed_histogram(),
            errors: AtomicU64::new(0),
            sleep_priority: AtomicU64::new(0),
        }
    }

    pub(crate) fn record_spsc_delayed(&self) {
        self.spsc_enqueue_delayed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_spmc_skipped(&self) {
        self.spmc_enqueue_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_mpmc_skipped(&self) {
        self.mpmc_enqueue_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// `n` is the retry count *before* this backoff step (`r++` in the
    /// original). A bucket only ever fires on an exact power-of-ten hit,
    /// same as `inc_retry`: this is a sparse milestone counter, not a
    /// lossless histogram of every sample.
    pub(crate) fn record_retry(&self, class: RetryClass, n: u64) {
        let histogram = match class {
            RetryClass::Spsc => &self.spsc_enqueue_retries,
            RetryClass::Spmc => &self.spmc_enqueue_retries,
            RetryClass::Mpmc => &self.mpmc_enqueue_retries,
        };
        let mut milestone = 1u64;
        for bucket in histogram {
            if n == milestone {
                bucket.fetch_add(1, Ordering::Relaxed);
                return;
            }
            milestone = milestone.saturating_mul(10);
        }
    }

    /// Marks a malformed or unrecognized retry class, the counterpart of
    /// `inc_retry`'s `else` branch. Rust's closed `RetryClass` enum makes
    /// that branch unreachable through the safe API; kept for statistics
    /// parity and for callers instrumenting their own retry loops.
    #[allow(dead_code)]
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn enter_sleep(&self) -> u64 {
        self.sleep_priority.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn exit_sleep(&self) {
        self.sleep_priority.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let load_hist = |h: &[AtomicU64; HISTOGRAM_BUCKETS]| {
            let mut out = [0u64; HISTOGRAM_BUCKETS];
            for (slot, atomic) in out.iter_mut().zip(h.iter()) {
                *slot = atomic.load(Ordering::Relaxed);
            }
            out
        };
        StatsSnapshot {
            spsc_enqueue_delayed: self.spsc_enqueue_delayed.load(Ordering::Relaxed),
            spmc_enqueue_skipped: self.spmc_enqueue_skipped.load(Ordering::Relaxed),
            mpmc_enqueue_skipped: self.mpmc_enqueue_skipped.load(Ordering::Relaxed),
            spsc_enqueue_retries: load_hist(&self.spsc_enqueue_retries),
            spmc_enqueue_retries: load_hist(&self.spmc_enqueue_retries),
            mpmc_enqueue_retries: load_hist(&self.mpmc_enqueue_retries),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }

    /// Writes a human-readable dump to `sink`, the same shape as the
    /// original `print_queue_stats`.
    pub fn dump(&self, sink: &mut impl io::Write) -> io::Result<()> {
        let snap = self.snapshot();
        writeln!(sink, "Single Producer / Single Consumer Queue Stats:")?;
        writeln!(sink, "  Slots delayed: {}", snap.spsc_enqueue_delayed)?;
        dump_histogram(sink, &snap.spsc_enqueue_retries)?;
        writeln!(sink, "Single Producer / Multiple Consumer Queue Stats:")?;
        writeln!(sink, "  Slots skipped: {}", snap.spmc_enqueue_skipped)?;
        dump_histogram(sink, &snap.spmc_enqueue_retries)?;
        writeln!(sink, "Multiple Producer / Multiple Consumer Queue Stats:")?;
        writeln!(sink, "  Slots skipped: {}", snap.mpmc_enqueue_skipped)?;
        dump_histogram(sink, &snap.mpmc_enqueue_retries)?;
        writeln!(sink, "Errors: {}", snap.errors)
    }
}

fn dump_histogram(sink: &mut impl io::Write, histogram: &[u64; HISTOGRAM_BUCKETS]) -> io::Result<()> {
    let mut milestone = 1u64;
    for &count in histogram {
        if count > 0 {
            writeln!(sink, "  retries (>= {milestone}): {count}")?;
        }
        milestone = milestone.saturating_mul(10);
    }
    Ok(())
}
