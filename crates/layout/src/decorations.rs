//! Decoration Expander: grows the grid around decorated cells.
//!
//! A decoration is a small sub-grid with exactly one `TMARKER` entry. The
//! marker stands for the decorated cell itself; every other entry ends up in
//! rows and columns inserted around that cell. Insertions are computed per
//! original row and column so that neighbouring decorations each get their
//! own ring and never clip one another.

use crate::LayoutError;
use crate::grid::{CellContent, Grid, Slot};
use gridset_types::TablePath;

/// A validated decoration: its grid and the marker's position in it.
struct Ring {
    row: usize,
    col: usize,
    /// Last original row and column covered by the decorated cell.
    last: (usize, usize),
    grid: Grid,
    marker: (usize, usize),
}

impl Ring {
    fn above(&self) -> usize {
        self.marker.0
    }

    fn below(&self) -> usize {
        self.grid.nr_rows() - 1 - self.marker.0
    }

    fn left(&self) -> usize {
        self.marker.1
    }

    fn right(&self) -> usize {
        self.grid.nr_cols() - 1 - self.marker.1
    }
}

/// How original indices on one axis map into the expanded grid.
#[derive(Debug, Clone, PartialEq)]
struct AxisMap {
    /// Mapped position of each original index.
    mapped: Vec<usize>,
    len: usize,
}

impl AxisMap {
    fn new(before: &[usize], after: &[usize]) -> Self {
        let mut mapped = Vec::with_capacity(before.len());
        let mut start = 0;
        for (b, a) in before.iter().zip(after) {
            mapped.push(start + b);
            start += 1 + b + a;
        }
        Self { mapped, len: start }
    }

    /// New span of a cell starting at original index `start` that declared
    /// `span`. Spans running past the grid keep their overflow.
    fn remap_span(&self, start: usize, span: usize) -> usize {
        let last = start.saturating_add(span - 1);
        let n = self.mapped.len();
        if last < n {
            self.mapped[last] - self.mapped[start] + 1
        } else {
            (self.mapped[n - 1] - self.mapped[start] + 1).saturating_add(last - (n - 1))
        }
    }
}

fn malformed(path: &TablePath, row: usize, col: usize, message: impl Into<String>) -> LayoutError {
    LayoutError::DecorationMalformed {
        path: path.clone(),
        row,
        col,
        message: message.into(),
    }
}

fn validate(
    grid: Grid,
    (row, col): (usize, usize),
    last: (usize, usize),
    path: &TablePath,
) -> Result<Ring, LayoutError> {
    let mut marker = None;
    for (_, r, c, cell) in grid.origins() {
        if cell.format.decoration.is_some() {
            return Err(malformed(path, row, col, "decoration entries cannot be decorated themselves"));
        }
        if matches!(cell.content, CellContent::Marker) {
            if marker.is_some() {
                return Err(malformed(path, row, col, "decoration holds more than one TMARKER"));
            }
            marker = Some((r, c));
        }
    }
    let marker = marker.ok_or_else(|| malformed(path, row, col, "decoration holds no TMARKER"))?;
    Ok(Ring {
        row,
        col,
        last,
        grid,
        marker,
    })
}

/// Expands every decorated cell of `grid`.
///
/// `grid` is only read; the expanded grid is returned as `Ok(Some(_))` and
/// `Ok(None)` means no cell carries a decoration.
pub(crate) fn expand(grid: &Grid, path: &TablePath) -> Result<Option<Grid>, LayoutError> {
    let nr_rows = grid.nr_rows();
    let nr_cols = grid.nr_cols();

    let mut rings = Vec::new();
    for row in 0..nr_rows {
        for col in 0..nr_cols {
            let Some(cell) = grid.cell(row, col) else {
                continue;
            };
            let last = (
                row.saturating_add(cell.format.row_span - 1).min(nr_rows - 1),
                col.saturating_add(cell.format.col_span - 1).min(nr_cols - 1),
            );
            if let Some(decoration) = &cell.format.decoration {
                rings.push(validate(Grid::clone(decoration), (row, col), last, path)?);
            }
        }
    }
    if rings.is_empty() {
        return Ok(None);
    }

    let mut above = vec![0; nr_rows];
    let mut below = vec![0; nr_rows];
    let mut left = vec![0; nr_cols];
    let mut right = vec![0; nr_cols];
    for ring in &rings {
        let (last_row, last_col) = ring.last;
        above[ring.row] = above[ring.row].max(ring.above());
        below[last_row] = below[last_row].max(ring.below());
        left[ring.col] = left[ring.col].max(ring.left());
        right[last_col] = right[last_col].max(ring.right());
    }

    let rows = AxisMap::new(&above, &below);
    let cols = AxisMap::new(&left, &right);
    let mut expanded = Grid::new(rows.len, cols.len);
    let mut claimed = vec![false; rows.len * cols.len];

    // Original cells first, at their mapped positions.
    for row in 0..nr_rows {
        for col in 0..nr_cols {
            let (rs, cs) = span_of(grid, row, col);
            let Some(cell) = grid.cell(row, col) else {
                continue;
            };
            let mut moved = cell.clone();
            moved.format.decoration = None;
            moved.format.row_span = rows.remap_span(row, rs);
            moved.format.col_span = cols.remap_span(col, cs);
            let (r, c) = (rows.mapped[row], cols.mapped[col]);
            claimed[expanded.index(r, c)] = true;
            expanded.set(r, c, Slot::Cell(moved));
        }
    }

    for ring in rings {
        place_ring(&mut expanded, &mut claimed, ring, &rows, &cols, path)?;
    }

    log::debug!(
        "Expanded decorations of {}: {}x{} -> {}x{}",
        path,
        nr_rows,
        nr_cols,
        expanded.nr_rows(),
        expanded.nr_cols()
    );
    Ok(Some(expanded))
}

fn span_of(grid: &Grid, row: usize, col: usize) -> (usize, usize) {
    grid.cell(row, col)
        .map(|c| (c.format.row_span, c.format.col_span))
        .unwrap_or((1, 1))
}

/// Target index and span on one axis for the ring entry at `index`, given a
/// marker at `marker` that covers mapped positions `first..=last`.
fn ring_target(index: usize, marker: usize, first: usize, last: usize) -> (usize, usize) {
    if index < marker {
        (first - (marker - index), 1)
    } else if index > marker {
        (last + (index - marker), 1)
    } else {
        (first, last - first + 1)
    }
}

fn place_ring(
    expanded: &mut Grid,
    claimed: &mut [bool],
    ring: Ring,
    rows: &AxisMap,
    cols: &AxisMap,
    path: &TablePath,
) -> Result<(), LayoutError> {
    let first_row = rows.mapped[ring.row];
    let first_col = cols.mapped[ring.col];
    let last_row = rows.mapped[ring.last.0];
    let last_col = cols.mapped[ring.last.1];

    let (mi, mj) = ring.marker;
    let nr_cols = ring.grid.nr_cols();
    for (index, slot) in ring.grid.into_slots().into_iter().enumerate() {
        let (di, dj) = (index / nr_cols, index % nr_cols);
        if (di, dj) == (mi, mj) {
            continue;
        }
        let Slot::Cell(mut cell) = slot else {
            continue;
        };
        let (r, row_span) = ring_target(di, mi, first_row, last_row);
        let (c, col_span) = ring_target(dj, mj, first_col, last_col);
        let target = expanded.index(r, c);
        if claimed[target] {
            return Err(malformed(
                path,
                ring.row,
                ring.col,
                format!("decoration entry ({}, {}) collides with another cell", di + 1, dj + 1),
            ));
        }
        claimed[target] = true;
        if row_span > 1 {
            cell.format.row_span = row_span;
        }
        if col_span > 1 {
            cell.format.col_span = col_span;
        }
        log::trace!("Decoration entry ({}, {}) of ({}, {}) placed at ({}, {})", di, dj, ring.row, ring.col, r, c);
        expanded.set(r, c, Slot::Cell(cell));
    }
    Ok(())
}
