use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Trait for measuring layout performance.
///
/// This allows us to swap implementations. In production builds the
/// positioners report to a `NoOpProfiler`, whose methods inline to nothing.
pub trait Profiler: Send + Sync {
    fn record(&self, key: &str, duration: Duration);
    fn count_hit(&self);
    fn count_miss(&self);
    fn reset(&self);
}

/// A no-op profiler for production use.
/// The compiler will inline these and eliminate the overhead.
pub struct NoOpProfiler;

impl Profiler for NoOpProfiler {
    #[inline(always)]
    fn record(&self, _key: &str, _duration: Duration) {}
    #[inline(always)]
    fn count_hit(&self) {}
    #[inline(always)]
    fn count_miss(&self) {}
    #[inline(always)]
    fn reset(&self) {}
}

/// Real profiler implementation.
/// Counts positioner cache hits and misses; with the `profiling` feature it
/// also accumulates the wall-clock time of each pass.
pub struct DebugProfiler {
    stats: Mutex<HashMap<String, Duration>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl DebugProfiler {
    pub fn new() -> Self {
        Self {
            stats: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Acquire)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Acquire)
    }

    /// Total time recorded under `key`, if any.
    pub fn total(&self, key: &str) -> Option<Duration> {
        self.stats.lock().ok()?.get(key).copied()
    }

    pub fn log_summary(&self, label: &str) {
        let hits = self.hits();
        let misses = self.misses();
        let total = hits + misses;
        if total == 0 {
            return;
        }

        log::info!("=== Profile Summary ({}) ===", label);
        log::info!(
            "Positioner cache hits: {} ({:.1}%)",
            hits,
            (hits as f64 / total as f64) * 100.0
        );

        if let Ok(stats) = self.stats.lock() {
            for (k, v) in stats.iter() {
                log::info!("{}: {:?}", k, v);
            }
        }
    }
}

impl Default for DebugProfiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Profiler for DebugProfiler {
    fn record(&self, key: &str, duration: Duration) {
        if let Ok(mut g) = self.stats.lock() {
            *g.entry(key.to_string()).or_default() += duration;
        }
    }
    fn count_hit(&self) {
        self.hits.fetch_add(1, Ordering::Release);
    }

    fn count_miss(&self) {
        self.misses.fetch_add(1, Ordering::Release);
    }

    fn reset(&self) {
        if let Ok(mut g) = self.stats.lock() {
            g.clear();
        }
        self.hits.store(0, Ordering::Release);
        self.misses.store(0, Ordering::Release);
    }
}

/// Records the lifetime of a pass under `key` when dropped.
///
/// Only reads the clock when the `profiling` feature is enabled.
pub(crate) struct PassTimer {
    profiler: Arc<dyn Profiler>,
    key: &'static str,
    #[cfg(feature = "profiling")]
    start: std::time::Instant,
}

impl PassTimer {
    pub(crate) fn start(profiler: &Arc<dyn Profiler>, key: &'static str) -> Self {
        Self {
            profiler: Arc::clone(profiler),
            key,
            #[cfg(feature = "profiling")]
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for PassTimer {
    fn drop(&mut self) {
        #[cfg(feature = "profiling")]
        self.profiler.record(self.key, self.start.elapsed());
        #[cfg(not(feature = "profiling"))]
        let _ = (&self.profiler, self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_profiler_counts() {
        let profiler = DebugProfiler::new();
        profiler.count_hit();
        profiler.count_miss();
        profiler.count_miss();
        assert_eq!(profiler.hits(), 1);
        assert_eq!(profiler.misses(), 2);

        profiler.record("pass", Duration::from_micros(5));
        profiler.record("pass", Duration::from_micros(7));
        assert_eq!(profiler.total("pass"), Some(Duration::from_micros(12)));

        profiler.reset();
        assert_eq!(profiler.hits(), 0);
        assert_eq!(profiler.total("pass"), None);
    }
}
