//! Per-window rate limiting for repeated messages.
//!
//! Records are bucketed by level and a hash of their message. Within one tick the
//! first `initial` records of a bucket pass, then every `thereafter`-th. Hash
//! collisions share a bucket, which only ever makes sampling more aggressive.

use super::{Core, Entry};
use crate::error::Error;
use crate::field::Field;
use crate::level::Level;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

const COUNTERS_PER_LEVEL: usize = 4096;

/// Monotonic time source, as an offset from an arbitrary fixed epoch.
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock's epoch.
    fn now(&self) -> Duration;
}

/// Monotonic clock measuring from its creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    /// Clock stopped at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(as_nanos(by), Ordering::SeqCst);
    }

    /// Moves the clock to `at` since its epoch.
    pub fn set(&self, at: Duration) {
        self.nanos.store(as_nanos(at), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

#[derive(Default)]
struct Counter {
    count: AtomicU64,
    reset_at: AtomicU64,
}

impl Counter {
    /// Bumps the count, starting a fresh window first if the current one has ended.
    /// Returns the record's position within its window, starting at 1.
    fn inc_check_reset(&self, now: u64, tick: u64) -> u64 {
        let reset_after = self.reset_at.load(Ordering::Acquire);
        if reset_after > now {
            return self.count.fetch_add(1, Ordering::AcqRel) + 1;
        }

        self.count.store(1, Ordering::Release);
        let new_reset = now.saturating_add(tick);
        if self
            .reset_at
            .compare_exchange(reset_after, new_reset, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            // Another thread opened the window first; count within it
            return self.count.fetch_add(1, Ordering::AcqRel) + 1;
        }
        1
    }
}

/// Wraps a core and drops repeats beyond the configured budget.
pub struct Sampler {
    inner: Box<dyn Core>,
    clock: Box<dyn Clock>,
    tick: u64,
    initial: u64,
    thereafter: u64,
    counters: Box<[Counter]>,
}

impl Sampler {
    /// Samples per `tick` using the system clock.
    #[must_use]
    pub fn new(inner: Box<dyn Core>, tick: Duration, initial: u64, thereafter: u64) -> Self {
        Self::with_clock(inner, tick, initial, thereafter, SystemClock::default())
    }

    /// Like [`Sampler::new`], reading time from `clock`.
    #[must_use]
    pub fn with_clock(
        inner: Box<dyn Core>,
        tick: Duration,
        initial: u64,
        thereafter: u64,
        clock: impl Clock + 'static,
    ) -> Self {
        let counters = (0..Level::all().len() * COUNTERS_PER_LEVEL)
            .map(|_| Counter::default())
            .collect();
        Self {
            inner,
            clock: Box::new(clock),
            tick: as_nanos(tick),
            initial,
            thereafter,
            counters,
        }
    }

    /// Records per window that always pass.
    #[must_use]
    pub const fn initial(&self) -> u64 {
        self.initial
    }

    /// Pass rate after `initial`. 0 drops the rest of the window.
    #[must_use]
    pub const fn thereafter(&self) -> u64 {
        self.thereafter
    }

    fn counter(&self, level: Level, message: &str) -> &Counter {
        let mut hasher = DefaultHasher::new();
        message.hash(&mut hasher);
        let bucket = usize::try_from(hasher.finish() % COUNTERS_PER_LEVEL as u64).unwrap_or(0);
        &self.counters[level as usize * COUNTERS_PER_LEVEL + bucket]
    }

    fn admits(&self, n: u64) -> bool {
        if n <= self.initial {
            return true;
        }
        self.thereafter != 0 && (n - self.initial) % self.thereafter == 0
    }
}

impl Core for Sampler {
    fn enabled(&self, level: Level) -> bool {
        self.inner.enabled(level)
    }

    fn check(&self, entry: &Entry) -> bool {
        if !self.inner.check(entry) {
            return false;
        }
        let now = as_nanos(self.clock.now());
        let n = self
            .counter(entry.level, &entry.message)
            .inc_check_reset(now, self.tick);
        self.admits(n)
    }

    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<(), Error> {
        self.inner.write(entry, fields)
    }

    fn sync(&self) -> Result<(), Error> {
        self.inner.sync()
    }
}

fn as_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}
