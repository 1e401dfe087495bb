//! Track sizing shared by the column and row positioners.
//!
//! Both axes are solved the same way: every origin cell contributes an
//! extent (its padded intrinsic size along the axis) over the tracks it
//! covers, single-track extents raise their track to fit, and spanning
//! extents then distribute whatever they still lack over their tracks.

use crate::config::SpanDistribution;
use crate::grid::{Cell, Grid};
use gridset_style::Sides;
use gridset_types::{Size, Track};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Columns,
    Rows,
}

impl Axis {
    pub fn name(self) -> &'static str {
        match self {
            Axis::Columns => "columns",
            Axis::Rows => "rows",
        }
    }
}

/// One cell's demand on an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Extent {
    pub start: usize,
    pub span: usize,
    pub size: f32,
}

/// The outer size of a cell along `axis`: content plus padding, raised to
/// the declared minimum.
pub(crate) fn outer_extent(cell: &Cell, content: Size, padding: &Sides<f32>, axis: Axis) -> f32 {
    let padding = cell.format.resolved_padding(padding);
    match axis {
        Axis::Columns => {
            let w = content.width + padding.horizontal();
            cell.format.min_width.map_or(w, |min| w.max(min))
        }
        Axis::Rows => {
            let h = content.height + padding.vertical();
            cell.format.min_height.map_or(h, |min| h.max(min))
        }
    }
}

/// Collects the extents of every origin cell of `grid` along `axis`.
pub(crate) fn collect_extents(
    grid: &Grid,
    axis: Axis,
    padding: &Sides<f32>,
    content: impl Fn(usize) -> Size,
) -> Vec<Extent> {
    grid.origins()
        .map(|(index, row, col, cell)| {
            let (rs, cs) = grid.footprint(row, col);
            let (start, span) = match axis {
                Axis::Columns => (col, cs),
                Axis::Rows => (row, rs),
            };
            Extent {
                start,
                span,
                size: outer_extent(cell, content(index), padding, axis),
            }
        })
        .collect()
}

/// Solves track sizes and offsets.
///
/// `lines` holds the thickness of the `count + 1` grid lines of the axis;
/// line `k` sits before track `k`. With `include_spans` false, spanning
/// extents are ignored entirely.
pub(crate) fn solve(
    count: usize,
    lines: &[f32],
    extents: &[Extent],
    include_spans: bool,
    distribution: SpanDistribution,
) -> Vec<Track> {
    debug_assert_eq!(lines.len(), count + 1);
    let mut sizes = vec![0.0f32; count];

    for extent in extents.iter().filter(|e| e.span == 1) {
        sizes[extent.start] = sizes[extent.start].max(extent.size);
    }

    if include_spans {
        let mut spanning: Vec<&Extent> = extents.iter().filter(|e| e.span > 1).collect();
        // Stable, so equal spans keep their row-major order.
        spanning.sort_by_key(|e| e.span);

        for extent in spanning {
            let range = extent.start..extent.start + extent.span;
            let interior: f32 = lines[extent.start + 1..extent.start + extent.span].iter().sum();
            let current: f32 = sizes[range.clone()].iter().sum::<f32>() + interior;
            let deficit = extent.size - current;
            if deficit > 0.0 {
                distribute(&mut sizes[range], deficit, distribution);
            }
        }
    }

    let mut offset = 0.0;
    sizes
        .iter()
        .enumerate()
        .map(|(k, &size)| {
            offset += lines[k];
            let track = Track::new(offset, size);
            offset += size;
            track
        })
        .collect()
}

fn distribute(tracks: &mut [f32], deficit: f32, distribution: SpanDistribution) {
    let n = tracks.len();
    let total: f32 = tracks.iter().sum();
    let weighted = distribution == SpanDistribution::Proportional && total > 0.0;

    let mut given = 0.0;
    for (i, track) in tracks.iter_mut().enumerate() {
        let share = if i + 1 == n {
            deficit - given
        } else if weighted {
            deficit * *track / total
        } else {
            deficit / n as f32
        };
        *track += share;
        given += share;
    }
}

/// Total extent of an axis: the end of its last track plus the closing line.
pub(crate) fn total_extent(tracks: &[Track], lines: &[f32]) -> f32 {
    let end = tracks.last().map_or(0.0, Track::end);
    end + lines.last().copied().unwrap_or(0.0)
}
