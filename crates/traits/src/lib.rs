pub mod metrics;

pub use metrics::{MetricEnvironment, MetricError, MonospaceMetrics, TableDefaults};
