//! Span Resolver: allocates the footprint of every spanning cell.

use crate::LayoutError;
use crate::grid::{Grid, Slot};
use gridset_types::TablePath;

fn conflict(path: &TablePath, row: usize, col: usize, message: String) -> LayoutError {
    LayoutError::SpanConflict {
        path: path.clone(),
        row,
        col,
        message,
    }
}

/// Marks the non-origin slots of every spanning cell as merged into it.
///
/// Spans are claimed in row-major order of their origins. A slot already
/// claimed by an earlier span, or holding a cell that declares a span of its
/// own, is a conflict. Content of a plain cell swallowed by a span is dropped.
pub(crate) fn resolve(grid: &mut Grid, path: &TablePath) -> Result<usize, LayoutError> {
    let nr_rows = grid.nr_rows();
    let nr_cols = grid.nr_cols();
    let mut claimed = 0;

    for row in 0..nr_rows {
        for col in 0..nr_cols {
            let (rs, cs) = match grid.slot(row, col) {
                Slot::Cell(cell) if cell.format.is_spanning() => (cell.format.row_span, cell.format.col_span),
                _ => continue,
            };
            if rs > nr_rows - row || cs > nr_cols - col {
                return Err(conflict(
                    path,
                    row,
                    col,
                    format!("a {}x{} span runs past the {}x{} grid", rs, cs, nr_rows, nr_cols),
                ));
            }

            for r in row..row + rs {
                for c in col..col + cs {
                    if (r, c) == (row, col) {
                        continue;
                    }
                    match grid.slot(r, c) {
                        Slot::Merged { origin } => {
                            return Err(conflict(
                                path,
                                row,
                                col,
                                format!("({}, {}) is already claimed by the span at {:?}", r, c, origin),
                            ));
                        }
                        Slot::Cell(other) if other.format.is_spanning() => {
                            return Err(conflict(
                                path,
                                row,
                                col,
                                format!("the span overlaps the span declared at ({}, {})", r, c),
                            ));
                        }
                        Slot::Cell(other) if !other.content.is_empty() => {
                            log::warn!(
                                "Content of cell ({}, {}) in table {} is covered by the span at ({}, {}) and dropped",
                                r,
                                c,
                                path,
                                row,
                                col
                            );
                        }
                        Slot::Cell(_) => {}
                    }
                }
            }

            for r in row..row + rs {
                for c in col..col + cs {
                    if (r, c) != (row, col) {
                        grid.set(r, c, Slot::Merged { origin: (row, col) });
                    }
                }
            }
            log::trace!("Span {}x{} claimed at ({}, {})", rs, cs, row, col);
            claimed += 1;
        }
    }

    Ok(claimed)
}
