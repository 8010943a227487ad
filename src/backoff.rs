//! Adaptive retry backoff: CPU-pause for the first couple of spins, then an
//! exponentially-growing OS sleep, clamped at a tunable ceiling. Ported from
//! the original's `backoff_queue`, which does the same pause/nanosleep
//! escalation keyed off a per-call retry counter.

use crate::config::Tunables;
use crate::stats;

/// Which retry histogram / sleep-priority rule a backoff call belongs to.
/// Only the SPMC class pays the anti-thundering-herd skew: it's the only
/// discipline with many consumers racing the same `head`, where staggering
/// wakeups actually helps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    Spsc,
    Spmc,
    Mpmc,
}

/// A single call site's escalating backoff state. Not `Clone`: a backoff
/// tracks one logical retry loop, and sharing it across loops would mix
/// unrelated retry counts into the same statistics bucket.
#[derive(Debug)]
pub struct Backoff {
    class: RetryClass,
    n: u32,
}

impl Backoff {
    pub fn new(class: RetryClass) -> Self {
        Self { class, n: 0 }
    }

    /// Number of times [`Backoff::wait`] has been called so far.
    pub fn retries(&self) -> u32 {
        self.n
    }

    /// One escalation step: pause for the first two calls, then an
    /// increasingly long sleep. Always records a retry sample first,
    /// matching `backoff_queue` calling `inc_retry` unconditionally before
    /// branching on `n`.
    pub fn wait(&mut self) {
        stats::global().record_retry(self.class, u64::from(self.n));

        #[cfg(feature = "cooperative-yield")]
        {
            std::thread::yield_now();
        }

        #[cfg(not(feature = "cooperative-yield"))]
        {
            if self.n < 2 {
                core::hint::spin_loop();
            } else {
                let clamped = self.n.min(Tunables::max_wait_periods());
                let mut wait_ns = u64::from(Tunables::interarrival_ns()) * u64::from(clamped);

                let sleeping_class = self.class == RetryClass::Spmc;
                if sleeping_class {
                    let priority = stats::global().enter_sleep();
                    wait_ns += priority * u64::from(Tunables::priority_backoff_step_ns());
                }

                std::thread::sleep(std::time::Duration::from_nanos(wait_ns));

                if sleeping_class {
                    stats::global().exit_sleep();
                }
            }
        }

        self.n = self.n.saturating_add(1);
    }
}
