use crate::borders::BorderPlan;
use crate::util::float_slices_fuzzy_eq;
use gridset_style::{HAlign, VAlign};
use gridset_tree::Tree;
use gridset_types::{Rect, Size, TablePath, Track};
use serde::Serialize;

/// A cell placed in the finished table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedCell {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
    /// The area of the cell's footprint, between its grid lines.
    pub frame: Rect,
    /// The aligned content box inside the padded frame.
    pub content: Rect,
    pub halign: HAlign,
    pub valign: VAlign,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaf: Option<Tree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested: Option<Box<TableGeometry>>,
}

/// The frozen geometry of a laid out table, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableGeometry {
    pub path: TablePath,
    pub nr_rows: usize,
    pub nr_cols: usize,
    pub columns: Vec<Track>,
    pub rows: Vec<Track>,
    pub size: Size,
    pub borders: BorderPlan,
    /// Origin cells in row-major order.
    pub cells: Vec<PlacedCell>,
}

impl TableGeometry {
    pub fn column_widths(&self) -> Vec<f32> {
        self.columns.iter().map(|t| t.size).collect()
    }

    pub fn row_heights(&self) -> Vec<f32> {
        self.rows.iter().map(|t| t.size).collect()
    }

    /// The placed cell whose footprint covers `(row, col)`.
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&PlacedCell> {
        self.cells.iter().find(|c| {
            (c.row..c.row + c.row_span).contains(&row) && (c.col..c.col + c.col_span).contains(&col)
        })
    }

    /// Whether two geometries agree on every track, up to float tolerance.
    pub fn same_layout(&self, other: &TableGeometry) -> bool {
        let offsets = |tracks: &[Track]| tracks.iter().map(|t| t.offset).collect::<Vec<_>>();
        self.nr_rows == other.nr_rows
            && self.nr_cols == other.nr_cols
            && float_slices_fuzzy_eq(&self.column_widths(), &other.column_widths())
            && float_slices_fuzzy_eq(&self.row_heights(), &other.row_heights())
            && float_slices_fuzzy_eq(&offsets(&self.columns), &offsets(&other.columns))
            && float_slices_fuzzy_eq(&offsets(&self.rows), &offsets(&other.rows))
    }
}
