use crate::length::{Length, LengthContext};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[derive(Default)]
pub enum LineKind {
    None,
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// A border as declared in an annotation, before lengths are resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderSpec {
    pub width: Length,
    pub kind: LineKind,
}

impl BorderSpec {
    pub fn none() -> Self {
        Self {
            width: Length::zero(),
            kind: LineKind::None,
        }
    }

    pub fn resolve(&self, ctx: &LengthContext) -> BorderStyle {
        BorderStyle {
            width: self.width.resolve(ctx).max(0.0),
            kind: self.kind,
        }
    }
}

/// A resolved border, as stored in the border plan.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct BorderStyle {
    pub width: f32,
    pub kind: LineKind,
}

impl BorderStyle {
    pub fn solid(width: f32) -> Self {
        Self {
            width,
            kind: LineKind::Solid,
        }
    }

    /// Whether anything is painted for this border.
    pub fn is_drawn(&self) -> bool {
        self.kind != LineKind::None && self.width > 0.0
    }

    /// Space the border occupies on its grid line.
    pub fn thickness(&self) -> f32 {
        if self.is_drawn() { self.width } else { 0.0 }
    }
}
