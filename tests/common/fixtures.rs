use gridset::Tree;

/// A `rows` x `cols` table of text cells.
pub fn text_table(rows: usize, cols: usize, text: impl Fn(usize, usize) -> String) -> Tree {
    Tree::table(
        (0..rows)
            .map(|r| Tree::row((0..cols).map(|c| Tree::text_cell(text(r, c))).collect()))
            .collect(),
    )
}

pub fn uniform_table(rows: usize, cols: usize, text: &str) -> Tree {
    text_table(rows, cols, |_, _| text.to_string())
}

/// Eight entries around a center marker.
pub fn ring_decoration() -> Tree {
    Tree::table(vec![
        Tree::row(vec![Tree::text_cell("a"), Tree::text_cell("b"), Tree::text_cell("c")]),
        Tree::row(vec![Tree::text_cell("d"), Tree::cell(Tree::marker()), Tree::text_cell("e")]),
        Tree::row(vec![Tree::text_cell("f"), Tree::text_cell("g"), Tree::text_cell("h")]),
    ])
}

/// Wraps `table` with a ring decoration on each of the 1-based `cells`.
pub fn decorated(table: Tree, cells: &[(i64, i64)]) -> Tree {
    let annotations = cells
        .iter()
        .map(|&(r, c)| Tree::cwith((r, r), (c, c), "cell-decoration", ring_decoration()))
        .collect();
    Tree::tformat(annotations, table)
}

/// A 2x2 matrix whose cells are themselves small tables.
pub fn matrix_of_tables() -> Tree {
    let inner = |text: &str| Tree::cell(uniform_table(2, 2, text));
    Tree::table(vec![
        Tree::row(vec![inner("a"), inner("bb")]),
        Tree::row(vec![inner("ccc"), inner("d")]),
    ])
}

/// A three-column equation array: right, center and left aligned.
pub fn eqnarray(lines: usize) -> Tree {
    Tree::tformat(
        vec![
            Tree::cwith_columns((1, 1), "cell-halign", "r".into()),
            Tree::cwith_columns((2, 2), "cell-halign", "c".into()),
            Tree::cwith_columns((3, 3), "cell-halign", "l".into()),
        ],
        text_table(lines, 3, |r, c| match c {
            0 => "x".repeat(r + 1),
            1 => "=".to_string(),
            _ => format!("{}+1", "y".repeat(lines - r)),
        }),
    )
}
