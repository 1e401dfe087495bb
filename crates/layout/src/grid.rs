//! The dense cell grid the layout passes operate on.
//!
//! A `Grid` is a row-major array of slots. Before span resolution every slot
//! holds its own `Cell`; afterwards the non-origin slots of a spanning cell's
//! footprint hold a `Slot::Merged` back-reference to the origin's coordinates.
//! Decoration expansion never edits a grid in place, it builds a new one.

use crate::output::TableGeometry;
use gridset_style::{BorderStyle, HAlign, Sides, VAlign};
use gridset_tree::Tree;

/// A value set by an annotation, tagged with its declaration order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Declared<T> {
    pub value: T,
    pub seq: u64,
}

/// The per-cell format record built from `CWITH` annotations.
///
/// `None` fields fall back to the environment's `TableDefaults`.
#[derive(Debug, Clone)]
pub struct CellFormat {
    pub halign: Option<HAlign>,
    pub valign: Option<VAlign>,
    pub row_span: usize,
    pub col_span: usize,
    pub borders: Sides<Option<Declared<BorderStyle>>>,
    pub padding: Sides<Option<f32>>,
    pub min_width: Option<f32>,
    pub min_height: Option<f32>,
    /// An unexpanded decoration sub-grid. Cleared by the decoration pass.
    pub decoration: Option<Box<Grid>>,
}

impl Default for CellFormat {
    fn default() -> Self {
        Self {
            halign: None,
            valign: None,
            row_span: 1,
            col_span: 1,
            borders: Sides::default(),
            padding: Sides::default(),
            min_width: None,
            min_height: None,
            decoration: None,
        }
    }
}

impl CellFormat {
    pub fn is_spanning(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }

    /// Padding with defaults filled in.
    pub fn resolved_padding(&self, defaults: &Sides<f32>) -> Sides<f32> {
        Sides {
            left: self.padding.left.unwrap_or(defaults.left),
            right: self.padding.right.unwrap_or(defaults.right),
            top: self.padding.top.unwrap_or(defaults.top),
            bottom: self.padding.bottom.unwrap_or(defaults.bottom),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum CellContent {
    #[default]
    Empty,
    /// Opaque content measured by the environment.
    Leaf(Tree),
    /// A nested table, already laid out.
    Nested(Box<TableGeometry>),
    /// The center placeholder of a decoration sub-grid.
    Marker,
}

impl CellContent {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub content: CellContent,
    pub format: CellFormat,
}

impl Cell {
    pub fn new(content: CellContent) -> Self {
        Self {
            content,
            format: CellFormat::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Slot {
    Cell(Cell),
    /// Covered by the spanning cell whose origin is at `(row, col)`.
    Merged { origin: (usize, usize) },
}

#[derive(Debug, Clone)]
pub struct Grid {
    nr_rows: usize,
    nr_cols: usize,
    slots: Vec<Slot>,
}

impl Grid {
    /// A grid of empty cells.
    pub fn new(nr_rows: usize, nr_cols: usize) -> Self {
        Self {
            nr_rows,
            nr_cols,
            slots: vec![Slot::Cell(Cell::default()); nr_rows * nr_cols],
        }
    }

    /// Builds a grid from rectangular rows of cells.
    ///
    /// # Panics
    /// Panics if the rows are not all `nr_cols` long.
    pub fn from_rows(nr_cols: usize, rows: Vec<Vec<Cell>>) -> Self {
        let nr_rows = rows.len();
        let mut slots = Vec::with_capacity(nr_rows * nr_cols);
        for row in rows {
            assert_eq!(row.len(), nr_cols, "grid rows must be rectangular");
            slots.extend(row.into_iter().map(Slot::Cell));
        }
        Self {
            nr_rows,
            nr_cols,
            slots,
        }
    }

    pub fn nr_rows(&self) -> usize {
        self.nr_rows
    }

    pub fn nr_cols(&self) -> usize {
        self.nr_cols
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Row-major index of `(row, col)`.
    pub fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.nr_rows && col < self.nr_cols,
            "({}, {}) is outside the {}x{} grid",
            row,
            col,
            self.nr_rows,
            self.nr_cols
        );
        row * self.nr_cols + col
    }

    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.nr_cols, index % self.nr_cols)
    }

    pub fn slot(&self, row: usize, col: usize) -> &Slot {
        &self.slots[self.index(row, col)]
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn set(&mut self, row: usize, col: usize, slot: Slot) {
        let index = self.index(row, col);
        self.slots[index] = slot;
    }

    /// The cell at `(row, col)`, or `None` if the slot is merged.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        match self.slot(row, col) {
            Slot::Cell(cell) => Some(cell),
            Slot::Merged { .. } => None,
        }
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        let index = self.index(row, col);
        match &mut self.slots[index] {
            Slot::Cell(cell) => Some(cell),
            Slot::Merged { .. } => None,
        }
    }

    /// Coordinates of the cell owning `(row, col)`.
    pub fn owner(&self, row: usize, col: usize) -> (usize, usize) {
        match self.slot(row, col) {
            Slot::Cell(_) => (row, col),
            Slot::Merged { origin } => *origin,
        }
    }

    /// All origin cells in row-major order, with their coordinates and slot index.
    pub fn origins(&self) -> impl Iterator<Item = (usize, usize, usize, &Cell)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(move |(index, slot)| match slot {
                Slot::Cell(cell) => {
                    let (row, col) = self.position(index);
                    Some((index, row, col, cell))
                }
                Slot::Merged { .. } => None,
            })
    }

    /// The `(row_span, col_span)` footprint of the origin cell at `(row, col)`.
    ///
    /// # Panics
    /// Panics if `(row, col)` is a merged slot or the footprint leaves the
    /// grid; both are impossible once spans are resolved.
    pub fn footprint(&self, row: usize, col: usize) -> (usize, usize) {
        match self.slot(row, col) {
            Slot::Cell(cell) => {
                let (rs, cs) = (cell.format.row_span, cell.format.col_span);
                assert!(
                    rs <= self.nr_rows - row && cs <= self.nr_cols - col,
                    "cell ({}, {}) has an unresolvable {}x{} footprint",
                    row,
                    col,
                    rs,
                    cs
                );
                (rs, cs)
            }
            Slot::Merged { origin } => {
                panic!("({}, {}) is merged into {:?}, not an origin", row, col, origin)
            }
        }
    }

    /// Consumes the grid, yielding its slots in row-major order.
    pub fn into_slots(self) -> Vec<Slot> {
        self.slots
    }
}
