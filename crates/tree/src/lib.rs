//! Input tree vocabulary for table descriptions.
//!
//! A table arrives as a labelled tree: `TFORMAT` wraps a `TABLE` together
//! with `CWITH` format annotations, a `TABLE` holds `ROW`s, a `ROW` holds
//! `CELL`s, and a `CELL` holds either opaque content or a nested table.
//! `TMARKER` only appears inside decoration sub-grids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// The label of a compound tree node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tag {
    Table,
    Row,
    Cell,
    Tformat,
    Cwith,
    Tmarker,
    Concat,
    /// Any other content-only node; the layout engine treats it as opaque.
    #[serde(untagged)]
    Other(String),
}

impl Tag {
    pub fn name(&self) -> &str {
        match self {
            Tag::Table => "table",
            Tag::Row => "row",
            Tag::Cell => "cell",
            Tag::Tformat => "tformat",
            Tag::Cwith => "cwith",
            Tag::Tmarker => "tmarker",
            Tag::Concat => "concat",
            Tag::Other(name) => name,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A node of the document tree: either a text atom or a labelled compound node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tree {
    Text(String),
    Node {
        tag: Tag,
        #[serde(default)]
        children: Vec<Tree>,
    },
}

impl Default for Tree {
    fn default() -> Self {
        Tree::Text(String::new())
    }
}

impl Tree {
    pub fn text(s: impl Into<String>) -> Self {
        Tree::Text(s.into())
    }

    pub fn node(tag: Tag, children: Vec<Tree>) -> Self {
        Tree::Node { tag, children }
    }

    /// A node with `arity` empty placeholder children, to be filled by index.
    pub fn with_arity(tag: Tag, arity: usize) -> Self {
        Tree::Node {
            tag,
            children: vec![Tree::default(); arity],
        }
    }

    /// A `CELL` holding the given content.
    pub fn cell(content: Tree) -> Self {
        Tree::node(Tag::Cell, vec![content])
    }

    /// A `CELL` holding a text atom.
    pub fn text_cell(s: impl Into<String>) -> Self {
        Tree::cell(Tree::text(s))
    }

    pub fn row(cells: Vec<Tree>) -> Self {
        Tree::node(Tag::Row, cells)
    }

    pub fn table(rows: Vec<Tree>) -> Self {
        Tree::node(Tag::Table, rows)
    }

    pub fn marker() -> Self {
        Tree::node(Tag::Tmarker, Vec::new())
    }

    /// `TFORMAT` with the given annotations followed by the table.
    pub fn tformat(annotations: Vec<Tree>, table: Tree) -> Self {
        let mut children = annotations;
        children.push(table);
        Tree::node(Tag::Tformat, children)
    }

    /// A `CWITH` over an explicit row and column range (1-based, inclusive,
    /// negative values counting from the end).
    pub fn cwith(
        rows: (i64, i64),
        cols: (i64, i64),
        property: impl Into<String>,
        value: Tree,
    ) -> Self {
        Tree::node(
            Tag::Cwith,
            vec![
                Tree::text(rows.0.to_string()),
                Tree::text(rows.1.to_string()),
                Tree::text(cols.0.to_string()),
                Tree::text(cols.1.to_string()),
                Tree::text(property),
                value,
            ],
        )
    }

    /// A `CWITH` over a column range across all rows.
    pub fn cwith_columns(cols: (i64, i64), property: impl Into<String>, value: Tree) -> Self {
        Tree::node(
            Tag::Cwith,
            vec![
                Tree::text(cols.0.to_string()),
                Tree::text(cols.1.to_string()),
                Tree::text(property),
                value,
            ],
        )
    }

    pub fn tag(&self) -> Option<&Tag> {
        match self {
            Tree::Node { tag, .. } => Some(tag),
            Tree::Text(_) => None,
        }
    }

    pub fn is(&self, expected: &Tag) -> bool {
        self.tag() == Some(expected)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Tree::Text(s) => Some(s),
            Tree::Node { .. } => None,
        }
    }

    pub fn children(&self) -> &[Tree] {
        match self {
            Tree::Node { children, .. } => children,
            Tree::Text(_) => &[],
        }
    }

    pub fn arity(&self) -> usize {
        self.children().len()
    }

    /// Appends a child; a no-op on text atoms.
    pub fn push(&mut self, child: Tree) {
        if let Tree::Node { children, .. } = self {
            children.push(child);
        }
    }

    /// Total number of characters in all text atoms below this node.
    pub fn text_len(&self) -> usize {
        match self {
            Tree::Text(s) => s.chars().count(),
            Tree::Node { children, .. } => children.iter().map(Tree::text_len).sum(),
        }
    }

    /// A short human-readable description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Tree::Text(s) if s.is_empty() => "empty text".to_string(),
            Tree::Text(s) => format!("text \"{}\"", s),
            Tree::Node { tag, children } => format!("{} node with {} children", tag, children.len()),
        }
    }
}

impl From<&str> for Tree {
    fn from(s: &str) -> Self {
        Tree::text(s)
    }
}

impl From<String> for Tree {
    fn from(s: String) -> Self {
        Tree::Text(s)
    }
}

impl Index<usize> for Tree {
    type Output = Tree;

    fn index(&self, index: usize) -> &Tree {
        &self.children()[index]
    }
}

impl IndexMut<usize> for Tree {
    fn index_mut(&mut self, index: usize) -> &mut Tree {
        match self {
            Tree::Node { children, .. } => &mut children[index],
            Tree::Text(_) => panic!("cannot index into a text atom"),
        }
    }
}
