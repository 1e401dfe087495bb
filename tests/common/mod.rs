pub mod fixtures;

use gridset::{MetricEnvironment, MetricError, MonospaceMetrics, Size, TableDefaults, Tree};
use std::sync::atomic::{AtomicUsize, Ordering};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Monospace metrics that count how often content is measured.
#[derive(Debug, Default)]
pub struct CountingMetrics {
    inner: MonospaceMetrics,
    queries: AtomicUsize,
}

impl CountingMetrics {
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl MetricEnvironment for CountingMetrics {
    fn measure(&self, content: &Tree) -> Result<Size, MetricError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.measure(content)
    }

    fn defaults(&self) -> &TableDefaults {
        self.inner.defaults()
    }

    fn name(&self) -> &'static str {
        "CountingMetrics"
    }
}
