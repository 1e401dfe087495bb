//! Border Merger: resolves per-cell border declarations into one style per
//! grid-line segment.
//!
//! Horizontal line `k` separates row `k - 1` from row `k` and has one segment
//! per column; vertical line `k` separates column `k - 1` from column `k` and
//! has one segment per row. The two cells on either side of a segment may both
//! declare a border for it; the later declaration wins and the segment is
//! drawn once.

use crate::grid::{Declared, Grid};
use gridset_style::{BorderStyle, Side};
use itertools::Itertools;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GridLine {
    /// `None` where nothing was declared or where the line runs inside a
    /// spanning cell.
    pub segments: Vec<Option<BorderStyle>>,
}

/// A maximal run of consecutive segments sharing one drawn style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineRun {
    pub start: usize,
    pub len: usize,
    pub style: BorderStyle,
}

impl GridLine {
    /// Space the line occupies: the widest drawn segment.
    pub fn thickness(&self) -> f32 {
        self.segments
            .iter()
            .flatten()
            .map(BorderStyle::thickness)
            .fold(0.0, f32::max)
    }

    pub fn style_at(&self, segment: usize) -> Option<BorderStyle> {
        self.segments.get(segment).copied().flatten()
    }

    /// Drawn runs along the line, for a renderer that strokes whole lines.
    pub fn runs(&self) -> Vec<LineRun> {
        let mut runs = Vec::new();
        let mut start = 0;
        for (style, group) in &self.segments.iter().chunk_by(|s| **s) {
            let len = group.count();
            if let Some(style) = style.filter(BorderStyle::is_drawn) {
                runs.push(LineRun { start, len, style });
            }
            start += len;
        }
        runs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BorderPlan {
    /// `nr_rows + 1` horizontal lines, top to bottom.
    pub hlines: Vec<GridLine>,
    /// `nr_cols + 1` vertical lines, left to right.
    pub vlines: Vec<GridLine>,
}

impl BorderPlan {
    pub fn hline_thickness(&self) -> Vec<f32> {
        self.hlines.iter().map(GridLine::thickness).collect()
    }

    pub fn vline_thickness(&self) -> Vec<f32> {
        self.vlines.iter().map(GridLine::thickness).collect()
    }

    /// Number of drawn segments over the whole plan.
    pub fn drawn_segments(&self) -> usize {
        self.hlines
            .iter()
            .chain(&self.vlines)
            .flat_map(|line| &line.segments)
            .filter(|s| s.is_some_and(|s| s.is_drawn()))
            .count()
    }
}

fn declared(grid: &Grid, owner: (usize, usize), side: Side) -> Option<Declared<BorderStyle>> {
    let cell = grid
        .cell(owner.0, owner.1)
        .unwrap_or_else(|| panic!("owner {:?} is not an origin cell", owner));
    *cell.format.borders.get(side)
}

/// The later of two declarations for the same segment.
fn later(a: Option<Declared<BorderStyle>>, b: Option<Declared<BorderStyle>>) -> Option<BorderStyle> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.seq >= a.seq { b.value } else { a.value }),
        (a, b) => a.or(b).map(|d| d.value),
    }
}

/// Builds the border plan of a span-resolved grid.
pub(crate) fn merge(grid: &Grid) -> BorderPlan {
    let nr_rows = grid.nr_rows();
    let nr_cols = grid.nr_cols();

    let hlines = (0..=nr_rows)
        .map(|k| GridLine {
            segments: (0..nr_cols)
                .map(|c| {
                    let above = (k > 0).then(|| grid.owner(k - 1, c));
                    let below = (k < nr_rows).then(|| grid.owner(k, c));
                    if above.is_some() && above == below {
                        return None;
                    }
                    later(
                        above.and_then(|o| declared(grid, o, Side::Bottom)),
                        below.and_then(|o| declared(grid, o, Side::Top)),
                    )
                })
                .collect(),
        })
        .collect();

    let vlines = (0..=nr_cols)
        .map(|k| GridLine {
            segments: (0..nr_rows)
                .map(|r| {
                    let before = (k > 0).then(|| grid.owner(r, k - 1));
                    let after = (k < nr_cols).then(|| grid.owner(r, k));
                    if before.is_some() && before == after {
                        return None;
                    }
                    later(
                        before.and_then(|o| declared(grid, o, Side::Right)),
                        after.and_then(|o| declared(grid, o, Side::Left)),
                    )
                })
                .collect(),
        })
        .collect();

    BorderPlan { hlines, vlines }
}
