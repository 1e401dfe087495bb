/// Tolerance used when comparing layout quantities.
pub const EPSILON: f32 = 0.01;

/// Compares track sizes or offsets within `EPSILON`.
pub fn float_slices_fuzzy_eq(a: &[f32], b: &[f32]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < EPSILON)
}
