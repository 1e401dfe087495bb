//! Lengths as written in cell annotations and their resolution to layout units.
use serde::{Deserialize, Serialize};

/// The unit a `Length` was written in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Unit {
    Pt,
    Px,
    In,
    Cm,
    Mm,
    /// Multiples of the environment's default line width.
    Ln,
    /// Multiples of the environment's font size.
    Em,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Length {
    pub value: f32,
    pub unit: Unit,
}

/// Environment values needed to turn relative lengths into points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthContext {
    pub line_width: f32,
    pub font_size: f32,
}

impl Default for LengthContext {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            font_size: 10.0,
        }
    }
}

impl Length {
    pub fn new(value: f32, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub fn pt(value: f32) -> Self {
        Self::new(value, Unit::Pt)
    }

    pub fn zero() -> Self {
        Self::pt(0.0)
    }

    /// Resolves this length to points.
    pub fn resolve(&self, ctx: &LengthContext) -> f32 {
        let factor = match self.unit {
            Unit::Pt | Unit::Px => 1.0,
            Unit::In => 72.0,
            Unit::Cm => 28.35,
            Unit::Mm => 2.835,
            Unit::Ln => ctx.line_width,
            Unit::Em => ctx.font_size,
        };
        self.value * factor
    }
}

/// A value per side of a cell.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct Sides<T> {
    pub left: T,
    pub right: T,
    pub top: T,
    pub bottom: T,
}

impl<T: Clone> Sides<T> {
    pub fn splat(value: T) -> Self {
        Self {
            left: value.clone(),
            right: value.clone(),
            top: value.clone(),
            bottom: value,
        }
    }
}

/// One side of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Top, Side::Bottom];
}

impl<T> Sides<T> {
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
            Side::Top => &self.top,
            Side::Bottom => &self.bottom,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
            Side::Top => &mut self.top,
            Side::Bottom => &mut self.bottom,
        }
    }
}

impl Sides<f32> {
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}
