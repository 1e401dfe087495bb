//! Grid Builder: turns a `TFORMAT`/`TABLE` tree into a `Grid`.
//!
//! The builder checks the declared shape of the tree, converts every `CELL`
//! into a `Cell`, lays out nested tables recursively, and finally applies the
//! collected `CWITH` annotations.

use crate::LayoutError;
use crate::config::LayoutConfig;
use crate::format::{Annotation, apply_annotations};
use crate::grid::{Cell, CellContent, Grid};
use crate::perf::Profiler;
use crate::table::Table;
use gridset_style::LengthContext;
use gridset_traits::MetricEnvironment;
use gridset_tree::{Tag, Tree};
use gridset_types::TablePath;
use std::sync::Arc;

/// What kind of grid is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BuildMode {
    Table,
    /// A decoration sub-grid, where `TMARKER` entries are allowed.
    Decoration,
}

pub(crate) struct GridBuilder<'a> {
    env: &'a dyn MetricEnvironment,
    config: LayoutConfig,
    profiler: Arc<dyn Profiler>,
    path: TablePath,
    depth: usize,
    next_seq: u64,
}

impl<'a> GridBuilder<'a> {
    pub(crate) fn new(
        env: &'a dyn MetricEnvironment,
        config: LayoutConfig,
        profiler: Arc<dyn Profiler>,
        path: TablePath,
        depth: usize,
    ) -> Self {
        Self {
            env,
            config,
            profiler,
            path,
            depth,
            next_seq: 0,
        }
    }

    pub(crate) fn path(&self) -> &TablePath {
        &self.path
    }

    pub(crate) fn length_context(&self) -> LengthContext {
        self.env.defaults().length_context()
    }

    pub(crate) fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    pub(crate) fn build_grid(&mut self, tree: &Tree, mode: BuildMode) -> Result<Grid, LayoutError> {
        let mut annotations = Vec::new();
        let table = self.unwrap_formats(tree, &mut annotations)?;
        let mut grid = self.build_cells(table, mode)?;
        apply_annotations(&mut grid, &annotations, self)?;
        Ok(grid)
    }

    /// Peels off `TFORMAT` wrappers, collecting their annotations outermost first.
    fn unwrap_formats<'t>(
        &self,
        tree: &'t Tree,
        annotations: &mut Vec<Annotation<'t>>,
    ) -> Result<&'t Tree, LayoutError> {
        let mut current = tree;
        loop {
            match current.tag() {
                Some(Tag::Table) => return Ok(current),
                Some(Tag::Tformat) => {
                    let mut inner = None;
                    for child in current.children() {
                        match child.tag() {
                            Some(Tag::Cwith) => annotations.push(Annotation::parse(child, &self.path)?),
                            Some(Tag::Table | Tag::Tformat) if inner.is_none() => inner = Some(child),
                            Some(Tag::Table | Tag::Tformat) => {
                                return Err(LayoutError::malformed(
                                    &self.path,
                                    "TFORMAT holds more than one table",
                                ));
                            }
                            _ => {
                                return Err(LayoutError::malformed(
                                    &self.path,
                                    format!("unexpected {} inside TFORMAT", child.describe()),
                                ));
                            }
                        }
                    }
                    current = inner.ok_or_else(|| {
                        LayoutError::malformed(&self.path, "TFORMAT does not hold a table")
                    })?;
                }
                _ => {
                    return Err(LayoutError::malformed(
                        &self.path,
                        format!("expected a TABLE or TFORMAT, found {}", current.describe()),
                    ));
                }
            }
        }
    }

    fn build_cells(&mut self, table: &Tree, mode: BuildMode) -> Result<Grid, LayoutError> {
        let entries = table.children();
        let nr_rows = entries.len();
        if nr_rows == 0 {
            return Err(LayoutError::malformed(&self.path, "table has no rows"));
        }
        if let Some((index, entry)) = entries.iter().enumerate().find(|(_, e)| !e.is(&Tag::Row)) {
            let actual = entries.iter().filter(|e| e.is(&Tag::Row)).count();
            return Err(LayoutError::malformed(
                &self.path,
                format!(
                    "table declares {} rows but has {} ROW entries (entry {} is {})",
                    nr_rows,
                    actual,
                    index + 1,
                    entry.describe()
                ),
            ));
        }

        let nr_cols = entries[0].arity();
        if nr_cols == 0 {
            return Err(LayoutError::malformed(&self.path, "row 1 has no cells"));
        }

        let mut rows = Vec::with_capacity(nr_rows);
        for (r, row) in entries.iter().enumerate() {
            if row.arity() != nr_cols {
                return Err(LayoutError::malformed(
                    &self.path,
                    format!(
                        "row {} declares {} cells but the table has {} columns",
                        r + 1,
                        row.arity(),
                        nr_cols
                    ),
                ));
            }
            let mut cells = Vec::with_capacity(nr_cols);
            for (c, entry) in row.children().iter().enumerate() {
                cells.push(self.build_cell(entry, r, c, mode)?);
            }
            rows.push(cells);
        }

        Ok(Grid::from_rows(nr_cols, rows))
    }

    fn build_cell(&mut self, entry: &Tree, row: usize, col: usize, mode: BuildMode) -> Result<Cell, LayoutError> {
        let content = match entry.tag() {
            Some(Tag::Cell) => match entry.children() {
                [] => CellContent::Empty,
                [child] => self.build_content(child, row, col, mode)?,
                children => {
                    return Err(LayoutError::malformed(
                        &self.path,
                        format!(
                            "cell ({}, {}) holds {} entries, expected one",
                            row + 1,
                            col + 1,
                            children.len()
                        ),
                    ));
                }
            },
            // A bare marker may stand in for a cell inside decorations.
            Some(Tag::Tmarker) if mode == BuildMode::Decoration => CellContent::Marker,
            _ => {
                return Err(LayoutError::malformed(
                    &self.path,
                    format!(
                        "row {} declares a cell at column {} but the entry is {}",
                        row + 1,
                        col + 1,
                        entry.describe()
                    ),
                ));
            }
        };
        Ok(Cell::new(content))
    }

    fn build_content(
        &mut self,
        child: &Tree,
        row: usize,
        col: usize,
        mode: BuildMode,
    ) -> Result<CellContent, LayoutError> {
        match child.tag() {
            Some(Tag::Table | Tag::Tformat) => self.build_nested(child, row, col),
            Some(Tag::Tmarker) if mode == BuildMode::Decoration => Ok(CellContent::Marker),
            Some(Tag::Tmarker) => Err(LayoutError::malformed(
                &self.path,
                format!("TMARKER at ({}, {}) outside a decoration", row + 1, col + 1),
            )),
            _ => Ok(CellContent::Leaf(child.clone())),
        }
    }

    fn build_nested(&mut self, tree: &Tree, row: usize, col: usize) -> Result<CellContent, LayoutError> {
        let path = self.path.cell(row, col);
        let depth = self.depth + 1;
        if depth > self.config.max_nesting_depth {
            return Err(LayoutError::NestingTooDeep {
                path,
                limit: self.config.max_nesting_depth,
            });
        }
        log::trace!("Laying out nested table at {}", path);
        let mut nested = Table::nested(self.env, self.config, Arc::clone(&self.profiler), depth);
        let geometry = nested.typeset_full(tree, path)?.clone();
        Ok(CellContent::Nested(Box::new(geometry)))
    }
}
