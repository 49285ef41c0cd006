//! Production [`Environment`] implementation using system time and OS RNG.
//!
//! `SystemEnv` drives the simulation with real wall-clock timing: the
//! monotonic clock is `std::time::Instant`, sleeping goes through tokio, and
//! randomness comes from the operating system via getrandom. Runs are
//! non-reproducible by construction; use the harness `SimEnv` for
//! deterministic tests.

use std::time::Duration;

use mirage_core::Environment;

/// Environment backed by system time and OS entropy.
///
/// # Panics
///
/// Panics if the OS RNG fails. Randomness drives session and message id
/// generation; without it no fresh identity can be minted, so there is no
/// sensible way to continue.
#[derive(Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = std::time::Instant;

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    fn wall_clock_millis(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer).expect("invariant: OS RNG failure is unrecoverable");
    }
}
