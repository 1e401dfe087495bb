//! # gridset
//!
//! A table layout engine: turns a declarative table tree (rows, cells,
//! spans, decorations, border and format annotations) into finished
//! geometry, meaning column widths, row heights and absolute cell positions.
//!
//! The workspace is split into:
//! - **gridset-types**: geometry primitives and table addressing
//! - **gridset-style**: alignment, length and border vocabulary with value parsers
//! - **gridset-tree**: the input tree (`TABLE`, `ROW`, `CELL`, `TFORMAT`, `CWITH`, `TMARKER`)
//! - **gridset-traits**: the `MetricEnvironment` seam supplying intrinsic content sizes
//! - **gridset-layout**: the layout passes themselves
//!
//! ## Example
//!
//! ```ignore
//! let env = MonospaceMetrics::default();
//! let tree = Tree::table(vec![Tree::row(vec![Tree::text_cell("hello")])]);
//! let geometry = gridset::typeset_table(&env, &tree, LayoutConfig::default())?;
//! assert_eq!(geometry.column_widths(), vec![30.0]);
//! ```

pub mod error;
pub mod loader;

pub use error::GridsetError;
pub use loader::{geometry_to_json, load_tree_from_path, load_tree_from_str};

// Re-export the engine and its vocabulary
pub use gridset_layout::{
    BorderPlan, DebugProfiler, GridLine, LayoutConfig, LayoutError, LineRun, NoOpProfiler,
    PlacedCell, Profiler, SpanDistribution, Table, TableGeometry, layout_table,
};
pub use gridset_style::{BorderStyle, HAlign, LineKind, Sides, VAlign};
pub use gridset_traits::{MetricEnvironment, MetricError, MonospaceMetrics, TableDefaults};
pub use gridset_tree::{Tag, Tree};
pub use gridset_types::{Rect, Size, TablePath, Track};

/// Lays out a top-level table with the given environment and configuration.
pub fn typeset_table(
    env: &dyn MetricEnvironment,
    tree: &Tree,
    config: LayoutConfig,
) -> Result<TableGeometry, GridsetError> {
    Ok(layout_table(env, tree, TablePath::root(), config)?)
}
