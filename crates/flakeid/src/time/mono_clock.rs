use core::time::Duration;
use std::{
    sync::{Arc, OnceLock},
    thread::{self, JoinHandle},
};

use portable_atomic::{AtomicU64, Ordering};

#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
use std::time::Instant;
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
use web_time::Instant;

use crate::{SystemClock, TimeSource};

/// Shared ticker thread that updates every millisecond.
#[derive(Debug)]
struct SharedTickerInner {
    elapsed: AtomicU64,
    _handle: OnceLock<JoinHandle<()>>,
}

/// A wall-clock aligned time source that never moves backward.
///
/// The clock reads the system clock once, at construction, and from then on
/// advances by the elapsed monotonic time (`Instant`). NTP steps and manual
/// clock changes after construction are therefore invisible to it, which
/// keeps a [`Generator`] from ever hitting [`Error::ClockRegression`] within
/// one process.
///
/// A background thread publishes the elapsed milliseconds to a shared atomic
/// counter, so reads avoid a syscall. The thread exits once the last clone of
/// the clock is dropped.
///
/// # Example
///
/// ```
/// use flakeid::{MonotonicClock, SystemClock, TimeSource};
///
/// let clock = MonotonicClock::new();
/// let first = clock.current_millis();
/// std::thread::sleep(std::time::Duration::from_millis(5));
///
/// // Readings only ever increase and start out near the wall clock.
/// assert!(clock.current_millis() >= first);
/// assert!(SystemClock.current_millis().abs_diff(first) < 1_000);
/// ```
///
/// [`Generator`]: crate::Generator
/// [`Error::ClockRegression`]: crate::Error::ClockRegression
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    inner: Arc<SharedTickerInner>,
    anchor: u64, // wall clock at construction, in milliseconds
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Anchors a new clock to the current system time.
    pub fn new() -> Self {
        Self::with_anchor(SystemClock.current_millis())
    }

    /// Anchors a new clock to an explicit UNIX-epoch reading in milliseconds.
    ///
    /// Readings start at `anchor` and advance with elapsed monotonic time.
    pub fn with_anchor(anchor: u64) -> Self {
        let start = Instant::now();
        let inner = Arc::new(SharedTickerInner {
            elapsed: AtomicU64::new(0),
            _handle: OnceLock::new(),
        });

        let weak_inner = Arc::downgrade(&inner);
        let handle = thread::spawn(move || {
            let mut tick = 0;

            loop {
                // Compute the absolute target time of the next tick
                let target = start + Duration::from_millis(tick);

                // Sleep if we are early
                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                let Some(inner_ref) = weak_inner.upgrade() else {
                    break;
                };

                // After waking, recompute how far we actually are from the
                // start
                let now_ms = start.elapsed().as_millis() as u64;
                inner_ref.elapsed.fetch_max(now_ms, Ordering::Release);

                // Align to next tick after the current actual time
                tick = now_ms + 1;
            }
        });

        // Only this constructor ever sets the handle.
        let _ = inner._handle.set(handle);

        Self { inner, anchor }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.anchor + self.inner.elapsed.load(Ordering::Acquire)
    }
}
