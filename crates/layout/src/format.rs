//! `CWITH` annotations and their application to cell format records.
//!
//! Annotations are applied in declaration order to every cell their range
//! covers, so a later annotation only overrides an earlier one where the two
//! ranges overlap. Border declarations additionally remember their
//! declaration sequence number for the border merger.

use crate::LayoutError;
use crate::builder::{BuildMode, GridBuilder};
use crate::grid::{CellFormat, Declared, Grid};
use gridset_style::parsers::{
    parse_border, parse_halign, parse_index, parse_length, parse_span, parse_valign, run_parser,
};
use gridset_style::{BorderStyle, HAlign, Side, StyleParseError, VAlign};
use gridset_tree::{Tag, Tree};
use gridset_types::TablePath;

/// A parsed but not yet applied `CWITH` node.
#[derive(Debug, Clone)]
pub(crate) struct Annotation<'t> {
    /// `None` for whole-column annotations.
    rows: Option<(i64, i64)>,
    cols: (i64, i64),
    property: &'t str,
    value: &'t Tree,
}

impl<'t> Annotation<'t> {
    pub(crate) fn parse(tree: &'t Tree, path: &TablePath) -> Result<Self, LayoutError> {
        debug_assert!(tree.is(&Tag::Cwith));
        let children = tree.children();
        let index = |i: usize| -> Result<i64, LayoutError> {
            let text = children[i].as_text().ok_or_else(|| {
                LayoutError::malformed(
                    path,
                    format!("CWITH index {} must be text, found {}", i + 1, children[i].describe()),
                )
            })?;
            parse_index(text).map_err(|e| LayoutError::malformed(path, e.to_string()))
        };
        let property = |i: usize| -> Result<&'t str, LayoutError> {
            children[i].as_text().ok_or_else(|| {
                LayoutError::malformed(
                    path,
                    format!("CWITH property must be text, found {}", children[i].describe()),
                )
            })
        };

        match children.len() {
            6 => Ok(Annotation {
                rows: Some((index(0)?, index(1)?)),
                cols: (index(2)?, index(3)?),
                property: property(4)?,
                value: &children[5],
            }),
            4 => Ok(Annotation {
                rows: None,
                cols: (index(0)?, index(1)?),
                property: property(2)?,
                value: &children[3],
            }),
            n => Err(LayoutError::malformed(
                path,
                format!("CWITH expects 4 or 6 children, found {}", n),
            )),
        }
    }

    pub(crate) fn property(&self) -> &str {
        self.property
    }
}

/// Resolves a 1-based (or negative, from the end) index against `len`.
fn resolve_index(raw: i64, len: usize) -> Option<usize> {
    if raw > 0 {
        let index = (raw - 1) as usize;
        (index < len).then_some(index)
    } else {
        let back = raw.unsigned_abs() as usize;
        (back <= len).then(|| len - back)
    }
}

fn resolve_range(
    (start, end): (i64, i64),
    len: usize,
    axis: &str,
    path: &TablePath,
) -> Result<(usize, usize), LayoutError> {
    match (resolve_index(start, len), resolve_index(end, len)) {
        (Some(s), Some(e)) if s <= e => Ok((s, e)),
        _ => Err(LayoutError::malformed(
            path,
            format!("{} range {}..{} does not fit a table with {} {}", axis, start, end, len, axis),
        )),
    }
}

#[derive(Debug, Clone)]
enum Setting {
    HAlign(HAlign),
    VAlign(VAlign),
    RowSpan(usize),
    ColSpan(usize),
    Border(&'static [Side], BorderStyle),
    Padding(Side, f32),
    MinWidth(f32),
    MinHeight(f32),
    Decoration(Box<Grid>),
}

impl Setting {
    fn is_span(&self) -> bool {
        matches!(self, Setting::RowSpan(_) | Setting::ColSpan(_))
    }

    fn apply(&self, format: &mut CellFormat, seq: u64) {
        match self {
            Setting::HAlign(h) => format.halign = Some(*h),
            Setting::VAlign(v) => format.valign = Some(*v),
            Setting::RowSpan(n) => format.row_span = *n,
            Setting::ColSpan(n) => format.col_span = *n,
            Setting::Border(sides, style) => {
                for side in sides.iter() {
                    *format.borders.get_mut(*side) = Some(Declared { value: *style, seq });
                }
            }
            Setting::Padding(side, value) => *format.padding.get_mut(*side) = Some(*value),
            Setting::MinWidth(w) => format.min_width = Some(*w),
            Setting::MinHeight(h) => format.min_height = Some(*h),
            Setting::Decoration(grid) => format.decoration = Some(grid.clone()),
        }
    }
}

fn text_value<'t>(property: &str, value: &'t Tree, path: &TablePath) -> Result<&'t str, LayoutError> {
    value.as_text().ok_or_else(|| {
        LayoutError::malformed(
            path,
            format!("'{}' expects a text value, found {}", property, value.describe()),
        )
    })
}

fn style_error(path: &TablePath) -> impl Fn(StyleParseError) -> LayoutError + '_ {
    move |e| LayoutError::malformed(path, e.to_string())
}

/// Parses an annotation's value once. `Ok(None)` means the property is
/// not one the engine knows and the annotation is ignored.
fn parse_setting(
    annotation: &Annotation<'_>,
    anchor: (usize, usize),
    builder: &mut GridBuilder<'_>,
) -> Result<Option<Setting>, LayoutError> {
    let path = builder.path().clone();
    let property = annotation.property;
    let value = annotation.value;
    let ctx = builder.length_context();

    let border = |sides: &'static [Side]| -> Result<Option<Setting>, LayoutError> {
        let text = text_value(property, value, &path)?;
        let spec = run_parser(parse_border, text).map_err(style_error(&path))?;
        Ok(Some(Setting::Border(sides, spec.resolve(&ctx))))
    };
    let length = || -> Result<f32, LayoutError> {
        let text = text_value(property, value, &path)?;
        let length = run_parser(parse_length, text).map_err(style_error(&path))?;
        Ok(length.resolve(&ctx).max(0.0))
    };

    let setting = match property {
        "cell-halign" => Setting::HAlign(
            parse_halign(text_value(property, value, &path)?).map_err(style_error(&path))?,
        ),
        "cell-valign" => Setting::VAlign(
            parse_valign(text_value(property, value, &path)?).map_err(style_error(&path))?,
        ),
        "cell-row-span" => Setting::RowSpan(
            parse_span(property, text_value(property, value, &path)?).map_err(style_error(&path))?,
        ),
        "cell-col-span" => Setting::ColSpan(
            parse_span(property, text_value(property, value, &path)?).map_err(style_error(&path))?,
        ),
        "cell-border" => return border(&Side::ALL),
        "cell-lborder" => return border(&[Side::Left]),
        "cell-rborder" => return border(&[Side::Right]),
        "cell-tborder" => return border(&[Side::Top]),
        "cell-bborder" => return border(&[Side::Bottom]),
        "cell-lsep" => Setting::Padding(Side::Left, length()?),
        "cell-rsep" => Setting::Padding(Side::Right, length()?),
        "cell-tsep" => Setting::Padding(Side::Top, length()?),
        "cell-bsep" => Setting::Padding(Side::Bottom, length()?),
        "cell-width" => Setting::MinWidth(length()?),
        "cell-height" => Setting::MinHeight(length()?),
        "cell-decoration" => {
            let grid = builder
                .build_grid(value, BuildMode::Decoration)
                .map_err(|e| decoration_error(e, &path, anchor))?;
            Setting::Decoration(Box::new(grid))
        }
        other => {
            log::warn!("Ignoring unknown cell property '{}' in table {}", other, path);
            return Ok(None);
        }
    };
    Ok(Some(setting))
}

fn decoration_error(error: LayoutError, path: &TablePath, (row, col): (usize, usize)) -> LayoutError {
    match error {
        e @ (LayoutError::DecorationMalformed { .. } | LayoutError::Metric(_)) => e,
        e @ LayoutError::NestingTooDeep { .. } => e,
        other => LayoutError::DecorationMalformed {
            path: path.clone(),
            row,
            col,
            message: other.to_string(),
        },
    }
}

/// Applies `annotations` in order to the freshly built `grid`.
pub(crate) fn apply_annotations(
    grid: &mut Grid,
    annotations: &[Annotation<'_>],
    builder: &mut GridBuilder<'_>,
) -> Result<(), LayoutError> {
    for annotation in annotations {
        let path = builder.path().clone();
        let (r1, r2) = match annotation.rows {
            Some(rows) => resolve_range(rows, grid.nr_rows(), "rows", &path)?,
            None => (0, grid.nr_rows() - 1),
        };
        let (c1, c2) = resolve_range(annotation.cols, grid.nr_cols(), "columns", &path)?;

        let Some(setting) = parse_setting(annotation, (r1, c1), builder)? else {
            continue;
        };
        let seq = builder.next_seq();
        log::trace!(
            "Applying '{}' to rows {}..={} columns {}..={} (seq {})",
            annotation.property(),
            r1,
            r2,
            c1,
            c2,
            seq
        );

        // A span belongs to the top-left cell of the range only.
        let (r2, c2) = if setting.is_span() { (r1, c1) } else { (r2, c2) };
        for row in r1..=r2 {
            for col in c1..=c2 {
                if let Some(cell) = grid.cell_mut(row, col) {
                    setting.apply(&mut cell.format, seq);
                }
            }
        }
    }
    Ok(())
}
