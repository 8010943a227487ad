use thiserror::Error;

/// Construction-time failures. Everything past `Ring::new` is either
/// lock-free progress (no error path) or a documented safety precondition
/// that a correct caller cannot trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    #[error("capacity {0} must be a power of two >= 2")]
    InvalidCapacity(usize),

    #[error("capacity {0} must be >= 256 when address randomization is enabled")]
    CapacityTooSmallForRandomization(usize),
}
