//! Time source abstraction for testability.
//!
//! Every animation on the page suspends through a `TimeSource`. Production code
//! uses `RealTimeSource`, which is backed by `tokio::time` (and therefore also
//! honours tokio's paused test clock). `TestTimeSource` advances a logical
//! clock instead of sleeping and remembers every wait it was asked for, so
//! tests can assert the exact pacing of an animation.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Abstraction over time-related operations.
#[async_trait]
pub trait TimeSource: Send + Sync + std::fmt::Debug {
    /// Get the current instant for measuring elapsed time.
    fn now(&self) -> Instant;

    /// Suspend the calling task for the specified duration.
    ///
    /// In tests, this may only advance logical time.
    async fn sleep(&self, duration: Duration);

    /// Calculate elapsed time since an earlier instant.
    fn elapsed_since(&self, earlier: Instant) -> Duration {
        self.now().saturating_duration_since(earlier)
    }
}

/// Type alias for shared time source.
pub type SharedTimeSource = Arc<dyn TimeSource>;

/// Production implementation on top of the tokio timer wheel.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeSource;

impl RealTimeSource {
    pub fn new() -> Self {
        Self
    }

    pub fn shared() -> SharedTimeSource {
        Arc::new(Self)
    }
}

#[async_trait]
impl TimeSource for RealTimeSource {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Test implementation with controllable time.
///
/// - `now()` returns a logical instant based on an internal counter
/// - `sleep()` advances logical time, records the request and yields once
/// - Time can be advanced manually via `advance()`
///
/// # Example
///
/// ```
/// use portfolio::services::time_source::{TimeSource, TestTimeSource};
/// use std::time::Duration;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let time = TestTimeSource::new();
/// let start = time.now();
///
/// time.sleep(Duration::from_secs(5)).await;
///
/// assert!(time.elapsed_since(start) >= Duration::from_secs(5));
/// assert_eq!(time.sleeps(), vec![Duration::from_secs(5)]);
/// # });
/// ```
#[derive(Debug)]
pub struct TestTimeSource {
    /// Logical time in nanoseconds since creation.
    logical_nanos: AtomicU64,
    /// Base instant (real time at creation, used for Instant arithmetic).
    base_instant: Instant,
    /// Every duration passed to `sleep`, in call order.
    sleeps: Mutex<Vec<Duration>>,
}

impl Default for TestTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTimeSource {
    pub fn new() -> Self {
        Self {
            logical_nanos: AtomicU64::new(0),
            base_instant: Instant::now(),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Advance logical time by the given duration.
    pub fn advance(&self, duration: Duration) {
        self.logical_nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Get the logical elapsed time since creation.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.logical_nanos.load(Ordering::SeqCst))
    }

    /// Snapshot of every sleep requested so far.
    pub fn sleeps(&self) -> Vec<Duration> {
        match self.sleeps.lock() {
            Ok(sleeps) => sleeps.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of sleeps requested so far.
    pub fn sleep_count(&self) -> usize {
        match self.sleeps.lock() {
            Ok(sleeps) => sleeps.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

#[async_trait]
impl TimeSource for TestTimeSource {
    fn now(&self) -> Instant {
        self.base_instant + self.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        if let Ok(mut sleeps) = self.sleeps.lock() {
            sleeps.push(duration);
        }
        self.advance(duration);
        // Give other tasks on the runtime a chance to observe the new state.
        tokio::task::yield_now().await;
    }
}
