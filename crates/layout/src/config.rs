/// How a spanning cell's missing extent is shared among the tracks it spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpanDistribution {
    /// Every spanned track receives the same share; the last track absorbs
    /// the rounding remainder.
    #[default]
    Equal,
    /// Shares are weighted by the tracks' existing sizes. Falls back to
    /// `Equal` when every spanned track is still empty.
    Proportional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// The policy used by the column and row positioners when a cell spanning
    /// several tracks needs more room than those tracks provide.
    ///
    /// Defaults to `SpanDistribution::Equal`.
    pub span_distribution: SpanDistribution,

    /// The maximum depth of tables nested inside cells.
    ///
    /// Each nested table runs the full pipeline recursively while its parent
    /// is being built, so this bounds the recursion on hostile input.
    ///
    /// Defaults to `16`.
    pub max_nesting_depth: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            span_distribution: SpanDistribution::Equal,
            max_nesting_depth: 16,
        }
    }
}
