use crate::error::RingError;
use crate::slot::Slot;
use core::sync::atomic::{AtomicU32, Ordering};

/// Ring capacity, validated once at construction so `Ring::new` never has to
/// assert on the hot path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    capacity: usize,
}

/// A capacity that keeps the per-producer retry rate low under bursty
/// single-hop workloads.
pub const LOW_LATENCY_CAPACITY: usize = 4096;

/// A capacity sized for sustained high-throughput batch workloads.
pub const HIGH_THROUGHPUT_CAPACITY: usize = 1 << 18;

impl Config {
    /// `capacity` is a slot count, not a byte size; see [`Config::from_bytes`]
    /// for the byte-oriented constructor closer to the original `new_ffq`
    /// signature.
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        if capacity < 2 || !capacity.is_power_of_two() {
            return Err(RingError::InvalidCapacity(capacity));
        }
        #[cfg(feature = "randomize-addresses")]
        if capacity < 256 {
            return Err(RingError::CapacityTooSmallForRandomization(capacity));
        }
        Ok(Self { capacity })
    }

    /// Derives a slot count from a buffer byte size and `T`'s slot layout,
    /// matching `new_ffq(q, buffer_size, buffer)` dividing by `sizeof(*q->buffer)`.
    pub fn from_bytes<T>(capacity_bytes: usize) -> Result<Self, RingError> {
        let slot_size = core::mem::size_of::<Slot<T>>().max(1);
        Self::new(capacity_bytes / slot_size)
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub const fn mask(&self) -> usize {
        self.capacity - 1
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(LOW_LATENCY_CAPACITY).expect("LOW_LATENCY_CAPACITY is a valid capacity")
    }
}

static INTERARRIVAL_NS: AtomicU32 = AtomicU32::new(100);
static MAX_WAIT_PERIODS: AtomicU32 = AtomicU32::new(10_000);
static PRIORITY_BACKOFF_STEP_NS: AtomicU32 = AtomicU32::new(10);

/// Process-wide backoff tuning, mirroring the original's file-scope statics
/// (`syscall_interarrivaltime_ns`, `max_wait_periods`, `backoff`). Meant to
/// be set once during startup, before any ring sees contention.
pub struct Tunables;

impl Tunables {
    pub fn set(interarrival_ns: u32, max_wait_periods: u32, priority_backoff_step_ns: u32) {
        INTERARRIVAL_NS.store(interarrival_ns, Ordering::Relaxed);
        MAX_WAIT_PERIODS.store(max_wait_periods, Ordering::Relaxed);
        PRIORITY_BACKOFF_STEP_NS.store(priority_backoff_step_ns, Ordering::Relaxed);
    }

    pub fn interarrival_ns() -> u32 {
        INTERARRIVAL_NS.load(Ordering::Relaxed)
    }

    pub fn max_wait_periods() -> u32 {
        MAX_WAIT_PERIODS.load(Ordering::Relaxed)
    }

    pub fn priority_backoff_step_ns() -> u32 {
        PRIORITY_BACKOFF_STEP_NS.load(Ordering::Relaxed)
    }
}
