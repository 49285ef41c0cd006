//! Environment abstraction for deterministic testing.
//!
//! Decouples the simulation logic from system resources (time, randomness).
//! Production frontends implement this with real clocks and OS entropy; the
//! test harness supplies a virtual clock and a seeded generator so that every
//! run with the same seed and tick schedule is reproducible.
//!
//! State machines never read the clock themselves: time is passed to them as
//! a parameter (`now`), and the environment is consulted only for randomness
//! and wall-clock timestamps.

use std::{
    ops::{Add, Sub},
    time::Duration,
};

/// Abstract environment providing time and randomness.
///
/// # Invariants
///
/// - `now()` never goes backwards within a single execution context.
/// - Given the same seed, simulation implementations produce the same
///   `random_bytes` sequence.
pub trait Environment: Clone + Send + Sync + 'static {
    /// The instant type used by this environment.
    ///
    /// Production environments use [`std::time::Instant`]; simulation
    /// environments use virtual time.
    type Instant: Copy
        + Ord
        + Send
        + Sync
        + Add<Duration, Output = Self::Instant>
        + Sub<Output = Duration>;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;

    /// Wall-clock time in milliseconds since the Unix epoch.
    ///
    /// Used for persisted and displayed timestamps. Unlike [`Self::now`],
    /// no monotonicity is guaranteed across processes.
    fn wall_clock_millis(&self) -> u64;

    /// Sleeps for the specified duration.
    ///
    /// Only driver code may await this; state machines take time as
    /// parameters instead.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;

    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u64`, used for fresh session and message ids.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    /// Uniform index into a collection of `len` elements.
    ///
    /// Returns `0` for an empty collection; callers select from non-empty
    /// collections.
    fn random_index(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        (self.random_u64() % len as u64) as usize
    }

    /// Bernoulli trial that succeeds with probability `p` (clamped to
    /// `[0, 1]`).
    fn chance(&self, p: f64) -> bool {
        // 53 uniform bits, the full precision of an f64 mantissa.
        let unit = (self.random_u64() >> 11) as f64 / (1u64 << 53) as f64;
        unit < p
    }

    /// Uniform duration in `[min, max)`. Returns `min` when the range is
    /// empty.
    fn random_duration(&self, min: Duration, max: Duration) -> Duration {
        let span_millis = max.saturating_sub(min).as_millis() as u64;
        if span_millis == 0 {
            return min;
        }
        min + Duration::from_millis(self.random_u64() % span_millis)
    }
}
