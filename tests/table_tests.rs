mod common;

use common::fixtures::*;
use common::{CountingMetrics, TestResult};
use gridset::{
    GridsetError, LayoutConfig, LayoutError, MonospaceMetrics, SpanDistribution, Table, TablePath,
    Tree, geometry_to_json, load_tree_from_str, typeset_table,
};

#[test]
fn test_single_cell_table() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let env = MonospaceMetrics::default();
    let geometry = typeset_table(&env, &uniform_table(1, 1, "hello"), LayoutConfig::default())?;

    assert_eq!(geometry.column_widths(), vec![30.0]);
    assert_eq!(geometry.row_heights(), vec![12.0]);
    assert_eq!(geometry.cells.len(), 1);
    assert_eq!(geometry.size.width, 30.0);
    Ok(())
}

#[test]
fn test_twenty_by_twenty_grid() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let env = MonospaceMetrics::default();
    let tree = text_table(20, 20, |r, c| format!("{}{}", r, c));
    let geometry = typeset_table(&env, &tree, LayoutConfig::default())?;

    assert_eq!((geometry.nr_rows, geometry.nr_cols), (20, 20));
    assert_eq!(geometry.cells.len(), 400);
    // Rows 10 and up add a digit to every cell text.
    assert_eq!(geometry.column_widths()[0], 18.0);
    assert_eq!(geometry.column_widths()[19], 24.0);
    Ok(())
}

#[test]
fn test_matrix_of_nested_tables() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let env = MonospaceMetrics::default();
    let geometry = typeset_table(&env, &matrix_of_tables(), LayoutConfig::default())?;

    assert_eq!(geometry.column_widths(), vec![36.0, 24.0]);
    assert!(geometry.row_heights().iter().all(|h| *h == 24.0));

    let nested = geometry.cell_at(1, 0).and_then(|c| c.nested.as_ref()).ok_or("no nested table")?;
    assert_eq!(nested.path, TablePath::new(vec![1, 0]));
    assert_eq!(nested.column_widths(), vec![18.0, 18.0]);
    Ok(())
}

#[test]
fn test_eqnarray_alignment() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let env = MonospaceMetrics::default();
    let geometry = typeset_table(&env, &eqnarray(3), LayoutConfig::default())?;

    // "xxx" and "yyy+1" set the outer column widths.
    assert_eq!(geometry.column_widths(), vec![18.0, 6.0, 30.0]);
    let first = geometry.cell_at(0, 0).ok_or("missing cell")?;
    assert_eq!(first.content.x, 12.0);
    let last = geometry.cell_at(2, 2).ok_or("missing cell")?;
    assert_eq!(last.content.x, 24.0);
    Ok(())
}

#[test]
fn test_large_table_with_decorations() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let env = MonospaceMetrics::default();
    let tree = decorated(
        uniform_table(40, 40, "x"),
        &[(1, 1), (6, 6), (6, 30), (20, 20), (30, 6), (30, 30)],
    );
    let geometry = typeset_table(&env, &tree, LayoutConfig::default())?;

    assert_eq!((geometry.nr_rows, geometry.nr_cols), (48, 48));
    assert!(geometry.column_widths().iter().all(|w| *w == 6.0));
    Ok(())
}

#[test]
fn test_positioners_reuse_measurements() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let env = CountingMetrics::default();
    let mut table = Table::new(&env);
    table.typeset(&uniform_table(5, 4, "abc"), TablePath::root())?;
    table.handle_decorations()?;
    table.handle_span()?;
    table.merge_borders()?;

    for _ in 0..3 {
        table.position_columns(false)?;
        table.position_columns(true)?;
    }
    table.finish_horizontal()?;
    table.position_rows()?;
    table.finish()?;
    assert_eq!(env.queries(), 20);
    Ok(())
}

#[test]
fn test_proportional_distribution_from_config() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let env = MonospaceMetrics::default();
    let tree = Tree::tformat(
        vec![Tree::cwith((1, 1), (1, 1), "cell-col-span", "2".into())],
        Tree::table(vec![
            Tree::row(vec![Tree::text_cell("abcdefghij"), Tree::text_cell("")]),
            Tree::row(vec![Tree::text_cell("ab"), Tree::text_cell("abcd")]),
        ]),
    );

    let equal = typeset_table(&env, &tree, LayoutConfig::default())?;
    assert_eq!(equal.column_widths(), vec![24.0, 36.0]);

    let config = LayoutConfig {
        span_distribution: SpanDistribution::Proportional,
        ..LayoutConfig::default()
    };
    let proportional = typeset_table(&env, &tree, config)?;
    assert_eq!(proportional.column_widths(), vec![20.0, 40.0]);
    Ok(())
}

#[test]
fn test_table_from_json() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let tree = load_tree_from_str(
        r#"{"tag": "tformat", "children": [
            {"tag": "cwith", "children": ["1", "1", "1", "-1", "cell-bborder", "1pt"]},
            {"tag": "table", "children": [
                {"tag": "row", "children": [
                    {"tag": "cell", "children": ["Name"]},
                    {"tag": "cell", "children": ["Value"]}
                ]},
                {"tag": "row", "children": [
                    {"tag": "cell", "children": ["pi"]},
                    {"tag": "cell", "children": ["3.14159"]}
                ]}
            ]}
        ]}"#,
    )?;
    let env = MonospaceMetrics::default();
    let geometry = typeset_table(&env, &tree, LayoutConfig::default())?;

    assert_eq!(geometry.column_widths(), vec![24.0, 42.0]);
    assert_eq!(geometry.rows[1].offset, 13.0);
    assert_eq!(geometry.size.height, 25.0);

    let json = geometry_to_json(&geometry, false)?;
    assert!(json.contains("\"nr_cols\":2"));
    Ok(())
}

#[test]
fn test_malformed_tree_is_reported() {
    let _ = env_logger::builder().is_test(true).try_init();

    let env = MonospaceMetrics::default();
    let tree = Tree::table(vec![Tree::row(vec![Tree::text("not a cell")])]);
    let err = typeset_table(&env, &tree, LayoutConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        GridsetError::Layout(LayoutError::MalformedInput { .. })
    ));
}

#[test]
fn test_nesting_limit_from_config() {
    let _ = env_logger::builder().is_test(true).try_init();

    let env = MonospaceMetrics::default();
    let mut tree = uniform_table(1, 1, "x");
    for _ in 0..3 {
        tree = Tree::table(vec![Tree::row(vec![Tree::cell(tree)])]);
    }
    let config = LayoutConfig {
        max_nesting_depth: 2,
        ..LayoutConfig::default()
    };
    let err = typeset_table(&env, &tree, config).unwrap_err();
    assert!(matches!(
        err,
        GridsetError::Layout(LayoutError::NestingTooDeep { limit: 2, .. })
    ));
}
