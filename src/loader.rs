//! Reading table trees from JSON and writing finished geometry back out.
//!
//! Trees use the untagged representation of `gridset_tree::Tree`: strings are
//! text atoms and `{"tag": "...", "children": [...]}` objects are nodes.

use crate::error::GridsetError;
use gridset_layout::TableGeometry;
use gridset_tree::Tree;
use std::fs;
use std::path::Path;

pub fn load_tree_from_str(json: &str) -> Result<Tree, GridsetError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_tree_from_path(path: impl AsRef<Path>) -> Result<Tree, GridsetError> {
    let path = path.as_ref();
    log::debug!("Loading table tree from {}", path.display());
    let json = fs::read_to_string(path)?;
    load_tree_from_str(&json)
}

pub fn geometry_to_json(geometry: &TableGeometry, pretty: bool) -> Result<String, GridsetError> {
    let json = if pretty {
        serde_json::to_string_pretty(geometry)?
    } else {
        serde_json::to_string(geometry)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridset_tree::Tag;

    #[test]
    fn test_load_tree_from_str() {
        let tree = load_tree_from_str(
            r#"{"tag": "tformat", "children": [
                {"tag": "cwith", "children": ["1", "-1", "cell-halign", "c"]},
                {"tag": "table", "children": [{"tag": "row", "children": [{"tag": "cell", "children": ["x"]}]}]}
            ]}"#,
        )
        .unwrap();
        assert!(tree.is(&Tag::Tformat));
        assert_eq!(tree[0].arity(), 4);
    }

    #[test]
    fn test_malformed_json_is_reported() {
        assert!(matches!(
            load_tree_from_str("{\"tag\": "),
            Err(GridsetError::Json(_))
        ));
    }
}
