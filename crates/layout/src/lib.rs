use gridset_traits::MetricError;
use gridset_types::TablePath;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum LayoutError {
    #[error("Malformed table at {path}: {message}")]
    MalformedInput { path: TablePath, message: String },
    #[error("Span conflict at {path}, cell ({row}, {col}): {message}")]
    SpanConflict {
        path: TablePath,
        row: usize,
        col: usize,
        message: String,
    },
    #[error("Malformed decoration at {path}, cell ({row}, {col}): {message}")]
    DecorationMalformed {
        path: TablePath,
        row: usize,
        col: usize,
        message: String,
    },
    #[error("Stage order violation: `{stage}` requires {requires}.")]
    StageOrder {
        stage: &'static str,
        requires: &'static str,
    },
    #[error("Table at {0} is finished and can no longer be modified.")]
    Finished(TablePath),
    #[error("Nested table at {path} exceeds the maximum nesting depth of {limit}.")]
    NestingTooDeep { path: TablePath, limit: usize },
    #[error("Metric environment error: {0}")]
    Metric(#[from] MetricError),
}

impl LayoutError {
    pub(crate) fn malformed(path: &TablePath, message: impl Into<String>) -> Self {
        LayoutError::MalformedInput {
            path: path.clone(),
            message: message.into(),
        }
    }

    /// Whether the error was raised by one of the structural passes
    /// (building, decoration expansion, span resolution).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            LayoutError::MalformedInput { .. }
                | LayoutError::SpanConflict { .. }
                | LayoutError::DecorationMalformed { .. }
                | LayoutError::NestingTooDeep { .. }
        )
    }
}

pub mod borders;
pub mod builder;
pub mod cache;
pub mod config;
pub mod decorations;
pub mod format;
pub mod grid;
pub mod output;
pub mod perf;
pub mod positioner;
pub mod span;
pub mod table;
pub mod util;

pub use self::borders::{BorderPlan, GridLine, LineRun};
pub use self::config::{LayoutConfig, SpanDistribution};
pub use self::grid::{Cell, CellContent, Grid, Slot};
pub use self::output::{PlacedCell, TableGeometry};
pub use self::perf::{DebugProfiler, NoOpProfiler, Profiler};
pub use self::table::{Table, layout_table};

// Re-export the collaborator types that appear in the engine's API
pub use gridset_traits::{MetricEnvironment, MonospaceMetrics, TableDefaults};
pub use gridset_tree::{Tag, Tree};
pub use gridset_types::{Rect, Size, Track};

#[cfg(test)]
mod borders_test;
#[cfg(test)]
mod test_utils;
