use gridset_layout::LayoutError;
use thiserror::Error;

/// Errors surfaced by the integration crate.
#[derive(Error, Debug)]
pub enum GridsetError {
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
