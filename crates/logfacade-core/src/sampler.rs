//! Per-message sampling within one-second windows.
//!
//! Entries are counted in a fixed table of slots keyed by a hash of level and
//! message. Two messages that share a slot share a budget.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::config::Sampling;
use crate::level::Level;

const SLOTS: usize = 4096;
const WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
struct Counter {
    /// Nanoseconds since the sampler epoch at which the window ends
    resets_at: AtomicI64,
    count: AtomicU64,
}

impl Counter {
    /// Count one entry and return its position in the current window.
    fn increment(&self, now: i64, window: i64) -> u64 {
        let resets_at = self.resets_at.load(Ordering::Acquire);
        if resets_at > now {
            return self.count.fetch_add(1, Ordering::AcqRel) + 1;
        }

        // Window elapsed; the thread that wins the exchange starts the next one
        match self.resets_at.compare_exchange(
            resets_at,
            now + window,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => {
                self.count.store(1, Ordering::Release);
                1
            }
            Err(_) => self.count.fetch_add(1, Ordering::AcqRel) + 1,
        }
    }
}

pub(crate) struct Sampler {
    initial: u64,
    thereafter: u64,
    epoch: Instant,
    window: i64,
    counters: Box<[Counter]>,
}

impl std::fmt::Debug for Sampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sampler")
            .field("initial", &self.initial)
            .field("thereafter", &self.thereafter)
            .finish()
    }
}

impl Sampler {
    pub(crate) fn new(sampling: Sampling) -> Self {
        Self::with_window(sampling, WINDOW)
    }

    fn with_window(sampling: Sampling, window: Duration) -> Self {
        Self {
            initial: sampling.initial,
            thereafter: sampling.thereafter,
            epoch: Instant::now(),
            window: i64::try_from(window.as_nanos()).unwrap_or(i64::MAX),
            counters: (0..SLOTS).map(|_| Counter::default()).collect(),
        }
    }

    /// Whether an entry with this level and message should be written.
    pub(crate) fn admit(&self, level: Level, msg: &str) -> bool {
        if level == Level::Fatal {
            return true;
        }

        let mut hasher = DefaultHasher::new();
        level.hash(&mut hasher);
        msg.hash(&mut hasher);
        let slot = (hasher.finish() % SLOTS as u64) as usize;

        let now = i64::try_from(self.epoch.elapsed().as_nanos()).unwrap_or(i64::MAX);
        let n = self.counters[slot].increment(now, self.window);
        if n <= self.initial {
            return true;
        }
        self.thereafter != 0 && (n - self.initial) % self.thereafter == 0
    }
}
