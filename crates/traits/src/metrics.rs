//! The environment seam of the layout engine.
//!
//! The engine never computes typographic metrics itself. It asks a
//! `MetricEnvironment` for the intrinsic extent of each leaf cell and for the
//! style defaults that apply when a cell carries no annotation.

use gridset_style::{HAlign, LengthContext, Sides, VAlign};
use gridset_tree::{Tag, Tree};
use gridset_types::Size;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;
use thiserror::Error;

/// Error type for metric queries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    #[error("Content cannot be measured: {0}")]
    Unsupported(String),

    #[error("Metric lookup failed for '{content}': {message}")]
    LookupFailed { content: String, message: String },
}

/// Style defaults supplied by the environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableDefaults {
    pub halign: HAlign,
    pub valign: VAlign,
    /// Space between a cell's frame and its content.
    pub padding: Sides<f32>,
    /// The `ln` unit.
    pub line_width: f32,
    /// The `em` unit.
    pub font_size: f32,
}

impl Default for TableDefaults {
    fn default() -> Self {
        Self {
            halign: HAlign::Left,
            valign: VAlign::Top,
            padding: Sides::splat(0.0),
            line_width: 1.0,
            font_size: 10.0,
        }
    }
}

impl TableDefaults {
    pub fn length_context(&self) -> LengthContext {
        LengthContext {
            line_width: self.line_width,
            font_size: self.font_size,
        }
    }
}

/// A read-only oracle for intrinsic content metrics.
///
/// Implementations must be deterministic: measuring the same content twice
/// returns the same size. The engine may call `measure` once per leaf cell
/// per structural generation of a table and caches the result.
///
/// # Example
///
/// ```ignore
/// let env = MonospaceMetrics::new(6.0, 12.0);
/// let size = env.measure(&Tree::text("hello"))?;
/// assert_eq!(size.width, 30.0);
/// ```
pub trait MetricEnvironment: Send + Sync + Debug {
    /// Measures the intrinsic extent of leaf content.
    fn measure(&self, content: &Tree) -> Result<Size, MetricError>;

    /// Style defaults for cells without explicit annotations.
    fn defaults(&self) -> &TableDefaults;

    /// Returns a human-readable name for this environment (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// A fixed-advance metric environment.
///
/// Every character is `advance` wide and non-empty content is one line of
/// `line_height`. Individual text atoms can be given explicit sizes with
/// [`MonospaceMetrics::set_override`]. Works without any font data, which
/// makes it the reference environment for tests and the command line tool.
#[derive(Debug)]
pub struct MonospaceMetrics {
    advance: f32,
    line_height: f32,
    defaults: TableDefaults,
    overrides: RwLock<HashMap<String, Size>>,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(6.0, 12.0)
    }
}

impl MonospaceMetrics {
    pub fn new(advance: f32, line_height: f32) -> Self {
        Self {
            advance,
            line_height,
            defaults: TableDefaults::default(),
            overrides: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_defaults(mut self, defaults: TableDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Gives a text atom an explicit size instead of the computed one.
    ///
    /// Does nothing if the lock is poisoned.
    pub fn set_override(&self, text: impl Into<String>, size: Size) {
        if let Ok(mut overrides) = self.overrides.write() {
            overrides.insert(text.into(), size);
        }
    }

    fn measure_text(&self, text: &str) -> Result<Size, MetricError> {
        let overrides = self
            .overrides
            .read()
            .map_err(|_| MetricError::LookupFailed {
                content: text.to_string(),
                message: "override table lock poisoned".to_string(),
            })?;
        if let Some(size) = overrides.get(text) {
            return Ok(*size);
        }
        Ok(self.run_size(text.chars().count()))
    }

    fn run_size(&self, chars: usize) -> Size {
        if chars == 0 {
            Size::zero()
        } else {
            Size::new(chars as f32 * self.advance, self.line_height)
        }
    }
}

impl MetricEnvironment for MonospaceMetrics {
    fn measure(&self, content: &Tree) -> Result<Size, MetricError> {
        match content {
            Tree::Text(text) => self.measure_text(text),
            Tree::Node { tag, .. } => match tag {
                Tag::Table | Tag::Row | Tag::Cell | Tag::Tformat | Tag::Cwith | Tag::Tmarker => {
                    Err(MetricError::Unsupported(content.describe()))
                }
                Tag::Concat | Tag::Other(_) => Ok(self.run_size(content.text_len())),
            },
        }
    }

    fn defaults(&self) -> &TableDefaults {
        &self.defaults
    }

    fn name(&self) -> &'static str {
        "MonospaceMetrics"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_measured_per_character() {
        let env = MonospaceMetrics::new(5.0, 10.0);
        let size = env.measure(&Tree::text("hello")).unwrap();
        assert_eq!(size, Size::new(25.0, 10.0));
    }

    #[test]
    fn test_empty_text_has_no_extent() {
        let env = MonospaceMetrics::default();
        assert_eq!(env.measure(&Tree::text("")).unwrap(), Size::zero());
    }

    #[test]
    fn test_override_takes_precedence() {
        let env = MonospaceMetrics::new(5.0, 10.0);
        env.set_override("•", Size::new(3.0, 3.0));
        assert_eq!(env.measure(&Tree::text("•")).unwrap(), Size::new(3.0, 3.0));
        assert_eq!(env.measure(&Tree::text("••")).unwrap(), Size::new(10.0, 10.0));
    }

    #[test]
    fn test_compound_content_uses_all_atoms() {
        let env = MonospaceMetrics::new(2.0, 8.0);
        let concat = Tree::node(Tag::Concat, vec!["ab".into(), "c".into()]);
        assert_eq!(env.measure(&concat).unwrap(), Size::new(6.0, 8.0));
    }

    #[test]
    fn test_structural_tags_are_rejected() {
        let env = MonospaceMetrics::default();
        let result = env.measure(&Tree::marker());
        assert!(matches!(result, Err(MetricError::Unsupported(_))));
    }

    #[test]
    fn test_default_length_context() {
        let env = MonospaceMetrics::default();
        let ctx = env.defaults().length_context();
        assert_eq!(ctx.line_width, 1.0);
        assert_eq!(ctx.font_size, 10.0);
    }
}
