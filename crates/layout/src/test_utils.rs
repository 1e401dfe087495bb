use crate::LayoutError;
use crate::output::TableGeometry;
use crate::table::Table;
use gridset_traits::{MetricEnvironment, MetricError, MonospaceMetrics, TableDefaults};
use gridset_tree::Tree;
use gridset_types::{Size, TablePath};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Monospace metrics (6pt advance, 12pt lines) that count every query.
#[derive(Debug, Default)]
pub struct CountingMetrics {
    inner: MonospaceMetrics,
    queries: AtomicUsize,
}

impl CountingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

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

/// A `rows` x `cols` table of text cells produced by `text`.
pub fn text_table(rows: usize, cols: usize, text: impl Fn(usize, usize) -> String) -> Tree {
    Tree::table(
        (0..rows)
            .map(|r| Tree::row((0..cols).map(|c| Tree::text_cell(text(r, c))).collect()))
            .collect(),
    )
}

/// A `rows` x `cols` table where every cell holds the same text.
pub fn uniform_table(rows: usize, cols: usize, text: &str) -> Tree {
    text_table(rows, cols, |_, _| text.to_string())
}

/// The 3x3 decoration used throughout the tests: eight text entries around
/// a marker.
pub fn ring_decoration() -> Tree {
    Tree::table(vec![
        Tree::row(vec![Tree::text_cell("a"), Tree::text_cell("b"), Tree::text_cell("c")]),
        Tree::row(vec![Tree::text_cell("d"), Tree::cell(Tree::marker()), Tree::text_cell("e")]),
        Tree::row(vec![Tree::text_cell("f"), Tree::text_cell("g"), Tree::text_cell("h")]),
    ])
}

/// Decorates the 1-based `(row, col)` cell of `table` with `ring_decoration`.
pub fn decorate(table: Tree, cells: &[(i64, i64)]) -> Tree {
    let annotations = cells
        .iter()
        .map(|&(r, c)| Tree::cwith((r, r), (c, c), "cell-decoration", ring_decoration()))
        .collect();
    Tree::tformat(annotations, table)
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn layout(env: &dyn MetricEnvironment, tree: &Tree) -> Result<TableGeometry, LayoutError> {
    init_logging();
    let mut table = Table::new(env);
    table.typeset_full(tree, TablePath::root()).cloned()
}

/// Runs the passes up to and including `merge_borders`.
pub fn prepare<'a>(env: &'a dyn MetricEnvironment, tree: &Tree) -> Result<Table<'a>, LayoutError> {
    init_logging();
    let mut table = Table::new(env);
    table.typeset(tree, TablePath::root())?;
    table.handle_decorations()?;
    table.handle_span()?;
    table.merge_borders()?;
    Ok(table)
}
