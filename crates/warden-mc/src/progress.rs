//! Run statistics and the periodic stats reporter.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Monotonic exploration counters shared between the checker and any
/// observer thread.
///
/// Exploration itself is single-threaded; the atomics (written and read
/// with relaxed ordering) exist so an observer on another thread can take
/// a snapshot without ever blocking the checker.
#[derive(Debug, Default)]
pub struct Stats {
    /// States emitted, duplicates included.
    pub generated: AtomicU64,
    /// States newly admitted to the seen set.
    pub unique: AtomicU64,
    /// Current seen-set size.
    pub seen_size: AtomicU64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a point-in-time view of the counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            generated: self.generated.load(Ordering::Relaxed),
            unique: self.unique.load(Ordering::Relaxed),
            seen_size: self.seen_size.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of [`Stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub generated: u64,
    pub unique: u64,
    pub seen_size: u64,
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generated: {} unique: {} hash table size: {}",
            self.generated, self.unique, self.seen_size
        )
    }
}

struct ReporterShared {
    done: Mutex<bool>,
    wake: Condvar,
}

/// Observer thread printing a stats line on a fixed cadence while a run is
/// in progress.
///
/// Shutdown is a flag under the mutex plus a condvar notification, so a
/// sleeping reporter wakes immediately instead of finishing its interval;
/// [`stop`](Reporter::stop) joins the thread before returning.
pub struct Reporter {
    shared: Arc<ReporterShared>,
    handle: JoinHandle<()>,
}

impl Reporter {
    /// Spawn an observer printing `stats` every `interval`.
    pub fn spawn(stats: Arc<Stats>, interval: Duration) -> Self {
        let shared = Arc::new(ReporterShared {
            done: Mutex::new(false),
            wake: Condvar::new(),
        });
        let thread_shared = Arc::clone(&shared);
        let handle = thread::spawn(move || {
            let mut done = thread_shared.done.lock().unwrap();
            while !*done {
                let (guard, timeout) = thread_shared
                    .wake
                    .wait_timeout(done, interval)
                    .unwrap();
                done = guard;
                if !*done && timeout.timed_out() {
                    println!("{}", stats.snapshot());
                }
            }
        });
        Self { shared, handle }
    }

    /// Signal the observer to stop and join it.
    pub fn stop(self) {
        *self.shared.done.lock().unwrap() = true;
        self.shared.wake.notify_all();
        let _ = self.handle.join();
    }
}
