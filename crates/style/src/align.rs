use serde::{Deserialize, Serialize};

/// Horizontal placement of a cell's content inside its column(s).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[derive(Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl HAlign {
    /// Offset of content of width `content` inside a slot of width `available`.
    pub fn offset(self, available: f32, content: f32) -> f32 {
        let slack = (available - content).max(0.0);
        match self {
            HAlign::Left => 0.0,
            HAlign::Center => slack / 2.0,
            HAlign::Right => slack,
        }
    }
}

/// Vertical placement of a cell's content inside its row(s).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[derive(Default)]
pub enum VAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

impl VAlign {
    pub fn offset(self, available: f32, content: f32) -> f32 {
        let slack = (available - content).max(0.0);
        match self {
            VAlign::Top => 0.0,
            VAlign::Center => slack / 2.0,
            VAlign::Bottom => slack,
        }
    }
}
