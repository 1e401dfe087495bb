//! Structural addressing of tables inside a larger document.
//!
//! A `TablePath` is carried through every layout pass purely for
//! diagnostics: errors and log lines name the table they concern.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// The position of a table within the document tree, as child indices from the root.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, Serialize)]
pub struct TablePath(Arc<[usize]>);

impl TablePath {
    /// The path of the document root.
    pub fn root() -> Self {
        Self(Arc::from(Vec::new()))
    }

    /// Creates a path from a sequence of child indices.
    pub fn new(indices: impl Into<Vec<usize>>) -> Self {
        Self(Arc::from(indices.into()))
    }

    /// Returns a new path one level deeper.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.to_vec();
        indices.push(index);
        Self(indices.into())
    }

    /// Returns the path of a table nested inside the cell at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Self {
        let mut indices = self.0.to_vec();
        indices.extend([row, col]);
        Self(indices.into())
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<usize>> for TablePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices.into())
    }
}

impl From<&[usize]> for TablePath {
    fn from(indices: &[usize]) -> Self {
        Self(indices.into())
    }
}

impl AsRef<[usize]> for TablePath {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for TablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for index in self.0.iter() {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_creation() {
        let p1 = TablePath::new(vec![0, 3]);
        let p2 = TablePath::from(vec![0, 3]);
        let p3 = TablePath::root().child(0).child(3);

        assert_eq!(p1, p2);
        assert_eq!(p2, p3);
        assert_eq!(p1.as_slice(), &[0, 3]);
    }

    #[test]
    fn test_path_display() {
        assert_eq!(TablePath::root().to_string(), "/");
        assert_eq!(TablePath::new(vec![1, 2]).cell(4, 5).to_string(), "/1/2/4/5");
    }

    #[test]
    fn test_child_does_not_alias_parent() {
        let parent = TablePath::new(vec![7]);
        let child = parent.child(1);
        assert_eq!(parent.depth(), 1);
        assert_eq!(child.depth(), 2);
        assert!(!child.is_root());
    }

    #[test]
    fn test_hash_map_usage() {
        use std::collections::HashMap;

        let mut tables = HashMap::new();
        tables.insert(TablePath::new(vec![0]), 42);
        tables.insert(TablePath::new(vec![0, 1, 1]), 100);

        assert_eq!(tables.get(&TablePath::root().child(0)), Some(&42));
    }
}
