//! The `Table` layout state and its eight passes.
//!
//! A `Table` is created per layout request and driven through
//! `typeset`, `handle_decorations`, `handle_span`, `merge_borders`,
//! `position_columns`, `finish_horizontal`, `position_rows` and `finish`, in
//! that order. Each pass checks that the passes it depends on have run on the
//! current grid and reports a `StageOrder` error otherwise.
//!
//! Every structural change bumps the table's generation. The positioners
//! and the per-slot metric cache compare against it, so a repeated call on
//! an unchanged grid is answered without querying the environment again.

use crate::LayoutError;
use crate::borders::{self, BorderPlan};
use crate::builder::{BuildMode, GridBuilder};
use crate::cache::{AxisCache, MetricCache};
use crate::config::LayoutConfig;
use crate::decorations;
use crate::grid::{CellContent, Grid};
use crate::output::{PlacedCell, TableGeometry};
use crate::perf::{NoOpProfiler, PassTimer, Profiler};
use crate::positioner::{self, Axis};
use crate::span;
use gridset_style::HAlign;
use gridset_traits::MetricEnvironment;
use gridset_tree::Tree;
use gridset_types::{Rect, Size, TablePath, Track};
use std::sync::Arc;

/// Horizontal placement of one origin cell, committed by `finish_horizontal`.
#[derive(Debug, Clone, Copy)]
struct Horizontal {
    x: f32,
    width: f32,
    content_x: f32,
    halign: HAlign,
}

fn stage_order(stage: &'static str, requires: &'static str) -> LayoutError {
    LayoutError::StageOrder { stage, requires }
}

pub struct Table<'a> {
    env: &'a dyn MetricEnvironment,
    config: LayoutConfig,
    profiler: Arc<dyn Profiler>,
    depth: usize,
    path: TablePath,
    grid: Option<Grid>,
    generation: u64,
    decorations_handled: bool,
    spans_resolved: bool,
    metrics: MetricCache,
    columns: AxisCache,
    rows: AxisCache,
    borders: Option<(u64, BorderPlan)>,
    horizontal: Option<(u64, Vec<Horizontal>)>,
    finished: Option<TableGeometry>,
}

impl<'a> Table<'a> {
    pub fn new(env: &'a dyn MetricEnvironment) -> Self {
        Self::nested(env, LayoutConfig::default(), Arc::new(NoOpProfiler), 0)
    }

    pub(crate) fn nested(
        env: &'a dyn MetricEnvironment,
        config: LayoutConfig,
        profiler: Arc<dyn Profiler>,
        depth: usize,
    ) -> Self {
        Self {
            env,
            config,
            profiler,
            depth,
            path: TablePath::root(),
            grid: None,
            generation: 0,
            decorations_handled: false,
            spans_resolved: false,
            metrics: MetricCache::default(),
            columns: AxisCache::default(),
            rows: AxisCache::default(),
            borders: None,
            horizontal: None,
            finished: None,
        }
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Reports cache hits and pass timings to `profiler`, including those of
    /// nested tables.
    pub fn with_profiler(mut self, profiler: Arc<dyn Profiler>) -> Self {
        self.profiler = profiler;
        self
    }

    pub fn nr_rows(&self) -> usize {
        self.grid.as_ref().map_or(0, Grid::nr_rows)
    }

    pub fn nr_cols(&self) -> usize {
        self.grid.as_ref().map_or(0, Grid::nr_cols)
    }

    /// The structural generation; bumped whenever the grid topology changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn path(&self) -> &TablePath {
        &self.path
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// The border plan, if `merge_borders` ran on the current grid.
    pub fn border_plan(&self) -> Option<&BorderPlan> {
        match &self.borders {
            Some((generation, plan)) if *generation == self.generation => Some(plan),
            _ => None,
        }
    }

    /// The frozen geometry, once `finish` has run.
    pub fn geometry(&self) -> Option<&TableGeometry> {
        self.finished.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished.is_some()
    }

    fn check_open(&self) -> Result<(), LayoutError> {
        match self.finished {
            Some(_) => Err(LayoutError::Finished(self.path.clone())),
            None => Ok(()),
        }
    }

    fn bump_generation(&mut self) {
        self.generation += 1;
        log::trace!("Table {} is now at generation {}", self.path, self.generation);
    }

    /// Drops the grid and everything derived from it.
    fn reset(&mut self, path: TablePath) {
        self.path = path;
        self.grid = None;
        self.decorations_handled = false;
        self.spans_resolved = false;
        self.borders = None;
        self.horizontal = None;
        self.columns.invalidate();
        self.rows.invalidate();
        self.bump_generation();
    }

    /// Grid Builder: parses `tree` into a fresh grid, discarding any previous
    /// state of this table. On error the table holds no grid at all.
    pub fn typeset(&mut self, tree: &Tree, path: TablePath) -> Result<(), LayoutError> {
        self.check_open()?;
        self.reset(path.clone());
        let _timer = PassTimer::start(&self.profiler, "typeset");

        let mut builder = GridBuilder::new(
            self.env,
            self.config,
            Arc::clone(&self.profiler),
            path.clone(),
            self.depth,
        );
        let grid = builder.build_grid(tree, BuildMode::Table)?;
        log::debug!(
            "Typeset table {} as {}x{} using {}",
            path,
            grid.nr_rows(),
            grid.nr_cols(),
            self.env.name()
        );

        self.grid = Some(grid);
        Ok(())
    }

    /// Decoration Expander: grows the grid around every decorated cell.
    ///
    /// Must run before `handle_span`. Calling it again once nothing is left
    /// to expand is a no-op.
    pub fn handle_decorations(&mut self) -> Result<(), LayoutError> {
        self.check_open()?;
        if self.spans_resolved {
            return Err(stage_order("handle_decorations", "that `handle_span` has not run yet"));
        }
        let grid = self
            .grid
            .as_mut()
            .ok_or_else(|| stage_order("handle_decorations", "a grid built by `typeset`"))?;
        let _timer = PassTimer::start(&self.profiler, "handle_decorations");

        if let Some(expanded) = decorations::expand(grid, &self.path)? {
            *grid = expanded;
            self.bump_generation();
        }
        self.decorations_handled = true;
        Ok(())
    }

    /// Span Resolver: claims the footprint of every spanning cell.
    pub fn handle_span(&mut self) -> Result<(), LayoutError> {
        self.check_open()?;
        if !self.decorations_handled {
            return Err(stage_order("handle_span", "`handle_decorations` to run first"));
        }
        if self.spans_resolved {
            return Ok(());
        }
        let grid = self
            .grid
            .as_mut()
            .ok_or_else(|| stage_order("handle_span", "a grid built by `typeset`"))?;
        let _timer = PassTimer::start(&self.profiler, "handle_span");

        let claimed = span::resolve(grid, &self.path)?;
        log::debug!("Resolved {} spans in table {}", claimed, self.path);
        self.spans_resolved = true;
        self.bump_generation();
        Ok(())
    }

    /// Border Merger: derives the border plan of the resolved grid.
    pub fn merge_borders(&mut self) -> Result<(), LayoutError> {
        self.check_open()?;
        let grid = match &self.grid {
            Some(grid) if self.spans_resolved => grid,
            _ => return Err(stage_order("merge_borders", "`handle_span` to run first")),
        };
        let _timer = PassTimer::start(&self.profiler, "merge_borders");

        let plan = borders::merge(grid);
        log::debug!(
            "Merged borders of table {}: {} drawn segments",
            self.path,
            plan.drawn_segments()
        );
        self.borders = Some((self.generation, plan));
        Ok(())
    }

    fn current_plan(&self, stage: &'static str) -> Result<(&Grid, &BorderPlan), LayoutError> {
        match (&self.grid, self.border_plan()) {
            (Some(grid), Some(plan)) => Ok((grid, plan)),
            _ => Err(stage_order(stage, "`merge_borders` on the current grid")),
        }
    }

    /// Measures every origin cell not yet measured at this generation.
    fn ensure_metrics(&mut self) -> Result<(), LayoutError> {
        let Some(grid) = &self.grid else {
            return Err(stage_order("ensure_metrics", "a grid built by `typeset`"));
        };
        self.metrics.sync(self.generation, grid.len());

        for (index, row, col, cell) in grid.origins() {
            if self.metrics.get(index).is_some() {
                continue;
            }
            let size = match &cell.content {
                CellContent::Empty => Size::zero(),
                CellContent::Leaf(content) => self.env.measure(content)?,
                CellContent::Nested(geometry) => geometry.size,
                CellContent::Marker => {
                    panic!("marker at ({}, {}) of table {} survived decoration expansion", row, col, self.path)
                }
            };
            self.metrics.insert(index, size);
        }
        Ok(())
    }

    fn solve_axis(&self, stage: &'static str, axis: Axis, include_spans: bool) -> Result<Vec<Track>, LayoutError> {
        let (grid, plan) = self.current_plan(stage)?;
        let (count, lines) = match axis {
            Axis::Columns => (grid.nr_cols(), plan.vline_thickness()),
            Axis::Rows => (grid.nr_rows(), plan.hline_thickness()),
        };
        let extents = positioner::collect_extents(grid, axis, &self.env.defaults().padding, |index| {
            self.metrics.size(index)
        });
        Ok(positioner::solve(
            count,
            &lines,
            &extents,
            include_spans,
            self.config.span_distribution,
        ))
    }

    /// Column Positioner: widths and x-offsets of every column.
    ///
    /// A provisional pass (`final_pass == false`) ignores spanning cells. The
    /// result is memoized per generation; a cached final result also answers
    /// provisional requests.
    pub fn position_columns(&mut self, final_pass: bool) -> Result<&[Track], LayoutError> {
        self.current_plan("position_columns")?;
        if self.columns.is_current(self.generation, final_pass) {
            self.profiler.count_hit();
        } else {
            self.profiler.count_miss();
            let _timer = PassTimer::start(&self.profiler, "position_columns");
            self.ensure_metrics()?;
            let tracks = self.solve_axis("position_columns", Axis::Columns, final_pass)?;
            log::debug!(
                "Positioned {} {} of table {} ({})",
                tracks.len(),
                Axis::Columns.name(),
                self.path,
                if final_pass { "final" } else { "provisional" }
            );
            self.columns.store(self.generation, final_pass, tracks);
        }
        Ok(self.columns.tracks())
    }

    /// Horizontal Finalizer: commits x-positions and horizontal alignment.
    pub fn finish_horizontal(&mut self) -> Result<(), LayoutError> {
        self.check_open()?;
        if !self.columns.is_current(self.generation, true) {
            return Err(stage_order(
                "finish_horizontal",
                "a final `position_columns` pass on the current grid",
            ));
        }
        let Some(grid) = &self.grid else {
            return Err(stage_order("finish_horizontal", "a grid built by `typeset`"));
        };
        let columns = self.columns.tracks();
        let defaults = self.env.defaults();

        let placements = grid
            .origins()
            .map(|(index, row, col, cell)| {
                let (_, cs) = grid.footprint(row, col);
                let x = columns[col].offset;
                let width = columns[col + cs - 1].end() - x;
                let padding = cell.format.resolved_padding(&defaults.padding);
                let halign = cell.format.halign.unwrap_or(defaults.halign);
                let content = self.metrics.size(index);
                let available = width - padding.horizontal();
                Horizontal {
                    x,
                    width,
                    content_x: x + padding.left + halign.offset(available, content.width),
                    halign,
                }
            })
            .collect::<Vec<_>>();

        log::debug!("Committed {} horizontal placements in table {}", placements.len(), self.path);
        self.horizontal = Some((self.generation, placements));
        Ok(())
    }

    /// Row Positioner: heights and y-offsets of every row, memoized like
    /// the column positioner.
    pub fn position_rows(&mut self) -> Result<&[Track], LayoutError> {
        self.current_plan("position_rows")?;
        if self.rows.is_current(self.generation, true) {
            self.profiler.count_hit();
        } else {
            self.profiler.count_miss();
            let _timer = PassTimer::start(&self.profiler, "position_rows");
            self.ensure_metrics()?;
            let tracks = self.solve_axis("position_rows", Axis::Rows, true)?;
            log::debug!(
                "Positioned {} {} of table {}",
                tracks.len(),
                Axis::Rows.name(),
                self.path
            );
            self.rows.store(self.generation, true, tracks);
        }
        Ok(self.rows.tracks())
    }

    fn freeze(&self) -> Result<TableGeometry, LayoutError> {
        let horizontal = match &self.horizontal {
            Some((generation, placements)) if *generation == self.generation => placements,
            _ => return Err(stage_order("finish", "`finish_horizontal` on the current grid")),
        };
        if !self.rows.is_current(self.generation, true) {
            return Err(stage_order("finish", "`position_rows` on the current grid"));
        }
        let (grid, plan) = self.current_plan("finish")?;
        let columns = self.columns.tracks();
        let rows = self.rows.tracks();
        let defaults = self.env.defaults();

        let cells = grid
            .origins()
            .zip(horizontal)
            .map(|((index, row, col, cell), h)| {
                let (rs, cs) = grid.footprint(row, col);
                let y = rows[row].offset;
                let height = rows[row + rs - 1].end() - y;
                let padding = cell.format.resolved_padding(&defaults.padding);
                let valign = cell.format.valign.unwrap_or(defaults.valign);
                let content = self.metrics.size(index);
                let available = height - padding.vertical();
                let content_y = y + padding.top + valign.offset(available, content.height);

                let (leaf, nested) = match &cell.content {
                    CellContent::Leaf(tree) => (Some(tree.clone()), None),
                    CellContent::Nested(geometry) => (None, Some(geometry.clone())),
                    CellContent::Empty | CellContent::Marker => (None, None),
                };
                PlacedCell {
                    row,
                    col,
                    row_span: rs,
                    col_span: cs,
                    frame: Rect::new(h.x, y, h.width, height),
                    content: Rect::new(h.content_x, content_y, content.width, content.height),
                    halign: h.halign,
                    valign,
                    leaf,
                    nested,
                }
            })
            .collect();

        Ok(TableGeometry {
            path: self.path.clone(),
            nr_rows: grid.nr_rows(),
            nr_cols: grid.nr_cols(),
            columns: columns.to_vec(),
            rows: rows.to_vec(),
            size: Size::new(
                positioner::total_extent(columns, &plan.vline_thickness()),
                positioner::total_extent(rows, &plan.hline_thickness()),
            ),
            borders: plan.clone(),
            cells,
        })
    }

    /// Finalizer: freezes the geometry. Later calls return the same
    /// geometry; every mutating pass fails with `Finished` afterwards.
    pub fn finish(&mut self) -> Result<&TableGeometry, LayoutError> {
        let geometry = match self.finished.take() {
            Some(geometry) => geometry,
            None => {
                let _timer = PassTimer::start(&self.profiler, "finish");
                let geometry = self.freeze()?;
                log::debug!(
                    "Finished table {}: {}x{}, {:.2}x{:.2}pt",
                    self.path,
                    geometry.nr_rows,
                    geometry.nr_cols,
                    geometry.size.width,
                    geometry.size.height
                );
                geometry
            }
        };
        Ok(&*self.finished.insert(geometry))
    }

    /// Runs every pass in order.
    pub fn typeset_full(&mut self, tree: &Tree, path: TablePath) -> Result<&TableGeometry, LayoutError> {
        self.typeset(tree, path)?;
        self.handle_decorations()?;
        self.handle_span()?;
        self.merge_borders()?;
        self.position_columns(false)?;
        self.position_columns(true)?;
        self.finish_horizontal()?;
        self.position_rows()?;
        self.finish()
    }
}

/// Lays out `tree` in one call.
pub fn layout_table(
    env: &dyn MetricEnvironment,
    tree: &Tree,
    path: TablePath,
    config: LayoutConfig,
) -> Result<TableGeometry, LayoutError> {
    let mut table = Table::new(env).with_config(config);
    table.typeset_full(tree, path).cloned()
}
