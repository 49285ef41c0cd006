//! Scripted environment for unit tests.
//!
//! `StubEnv` gives each test full control over time and every random draw:
//! the clock moves only through `advance`, and `random_u64` pops values from
//! a queue scripted by the test (falling back to a counter so id generation
//! stays unique when a test does not care).

use std::{
    collections::VecDeque,
    ops::{Add, Sub},
    sync::{Arc, Mutex},
    time::Duration,
};

use mirage_core::env::Environment;

/// Millisecond-resolution virtual instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StubInstant(u64);

impl Add<Duration> for StubInstant {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs.as_millis() as u64)
    }
}

impl Sub for StubInstant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        Duration::from_millis(self.0.saturating_sub(rhs.0))
    }
}

struct StubInner {
    now_millis: u64,
    scripted: VecDeque<u64>,
    fallback_counter: u64,
}

/// Deterministic environment with scripted random draws.
#[derive(Clone)]
pub struct StubEnv {
    inner: Arc<Mutex<StubInner>>,
}

/// Wall-clock origin for stub timestamps (2023-11-14T22:13:20Z).
pub const STUB_WALL_BASE: u64 = 1_700_000_000_000;

impl StubEnv {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StubInner {
                now_millis: 0,
                scripted: VecDeque::new(),
                fallback_counter: 0,
            })),
        }
    }

    pub fn advance(&self, duration: Duration) {
        self.lock().now_millis += duration.as_millis() as u64;
    }

    /// Queue values returned by the next `random_u64` calls, in order.
    pub fn script_randoms(&self, values: impl IntoIterator<Item = u64>) {
        self.lock().scripted.extend(values);
    }

    /// A draw that makes `chance(p)` fail for any `p < 1`.
    pub const CHANCE_FAIL: u64 = u64::MAX;

    /// A draw that makes `chance(p)` succeed for any `p > 0`.
    pub const CHANCE_PASS: u64 = 0;

    fn lock(&self) -> std::sync::MutexGuard<'_, StubInner> {
        self.inner.lock().unwrap()
    }
}

impl Environment for StubEnv {
    type Instant = StubInstant;

    fn now(&self) -> StubInstant {
        StubInstant(self.lock().now_millis)
    }

    fn wall_clock_millis(&self) -> u64 {
        STUB_WALL_BASE + self.lock().now_millis
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.advance(duration);
        async {}
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        for chunk in buffer.chunks_mut(8) {
            let bytes = self.random_u64().to_be_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn random_u64(&self) -> u64 {
        let mut inner = self.lock();
        if let Some(value) = inner.scripted.pop_front() {
            return value;
        }
        inner.fallback_counter += 1;
        inner.fallback_counter
    }
}
