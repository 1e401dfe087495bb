pub mod geometry;
pub mod ids;

pub use geometry::{Rect, Size, Track};
pub use ids::TablePath;
