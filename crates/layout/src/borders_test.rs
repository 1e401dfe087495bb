use crate::test_utils::{layout, prepare, uniform_table};
use crate::{LayoutError, Table};
use gridset_style::{BorderStyle, LineKind};
use gridset_traits::MonospaceMetrics;
use gridset_tree::Tree;
use gridset_types::TablePath;

fn border(rows: (i64, i64), cols: (i64, i64), property: &str, value: &str) -> Tree {
    Tree::cwith(rows, cols, property, value.into())
}

#[test]
fn test_shared_line_takes_last_declaration() {
    let env = MonospaceMetrics::default();
    let tree = Tree::tformat(
        vec![
            border((1, -1), (1, -1), "cell-border", "1pt"),
            border((1, 1), (1, 1), "cell-rborder", "2pt"),
            border((1, 1), (2, 2), "cell-lborder", "3pt dashed"),
        ],
        uniform_table(2, 2, "x"),
    );
    let table = prepare(&env, &tree).unwrap();
    let plan = table.border_plan().unwrap();

    assert_eq!(plan.hlines.len(), 3);
    assert_eq!(plan.vlines.len(), 3);
    assert_eq!(
        plan.vlines[1].style_at(0),
        Some(BorderStyle {
            width: 3.0,
            kind: LineKind::Dashed
        })
    );
    assert_eq!(plan.vlines[1].style_at(1), Some(BorderStyle::solid(1.0)));
}

#[test]
fn test_later_declaration_wins_from_either_side() {
    let env = MonospaceMetrics::default();
    let tree = Tree::tformat(
        vec![
            border((1, 1), (2, 2), "cell-lborder", "3pt"),
            border((1, 1), (1, 1), "cell-rborder", "0.5pt dotted"),
        ],
        uniform_table(1, 2, "x"),
    );
    let table = prepare(&env, &tree).unwrap();
    let plan = table.border_plan().unwrap();

    assert_eq!(
        plan.vlines[1].style_at(0),
        Some(BorderStyle {
            width: 0.5,
            kind: LineKind::Dotted
        })
    );
    assert_eq!(plan.vlines[0].style_at(0), None);
}

#[test]
fn test_lines_inside_spans_are_suppressed() {
    let env = MonospaceMetrics::default();
    let tree = Tree::tformat(
        vec![
            border((1, -1), (1, -1), "cell-border", "1pt"),
            border((1, 1), (1, 1), "cell-col-span", "2"),
        ],
        uniform_table(2, 2, "x"),
    );
    let table = prepare(&env, &tree).unwrap();
    let plan = table.border_plan().unwrap();

    assert_eq!(plan.vlines[1].style_at(0), None);
    assert_eq!(plan.vlines[1].style_at(1), Some(BorderStyle::solid(1.0)));
    assert_eq!(plan.hlines[1].segments.len(), 2);
    assert!(plan.hlines[1].segments.iter().all(Option::is_some));
}

#[test]
fn test_runs_skip_undrawn_segments() {
    let env = MonospaceMetrics::default();
    let tree = Tree::tformat(
        vec![
            border((1, -1), (1, -1), "cell-tborder", "1pt"),
            border((1, 1), (2, 2), "cell-tborder", "none"),
        ],
        uniform_table(1, 4, "x"),
    );
    let table = prepare(&env, &tree).unwrap();
    let top = &table.border_plan().unwrap().hlines[0];

    let runs: Vec<_> = top.runs().iter().map(|r| (r.start, r.len)).collect();
    assert_eq!(runs, vec![(0, 1), (2, 2)]);
    assert_eq!(top.thickness(), 1.0);
}

#[test]
fn test_borders_occupy_space_between_tracks() {
    let env = MonospaceMetrics::default();
    let tree = Tree::tformat(
        vec![
            border((1, -1), (1, -1), "cell-border", "1pt"),
            border((1, 1), (2, 2), "cell-rborder", "2pt"),
        ],
        uniform_table(1, 2, "ab"),
    );
    let geometry = layout(&env, &tree).unwrap();

    let offsets: Vec<f32> = geometry.columns.iter().map(|t| t.offset).collect();
    assert_eq!(offsets, vec![1.0, 14.0]);
    assert_eq!(geometry.size.width, 1.0 + 12.0 + 1.0 + 12.0 + 2.0);
    assert_eq!(geometry.rows[0].offset, 1.0);
    assert_eq!(geometry.size.height, 14.0);
}

#[test]
fn test_merge_requires_resolved_spans() {
    let env = MonospaceMetrics::default();
    let mut table = Table::new(&env);
    table.typeset(&uniform_table(1, 1, "x"), TablePath::root()).unwrap();
    table.handle_decorations().unwrap();
    assert!(matches!(
        table.merge_borders(),
        Err(LayoutError::StageOrder { stage: "merge_borders", .. })
    ));
}
