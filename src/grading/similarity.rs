use similar::{DiffOp, TextDiff};

/// Block-matching similarity ratio between two strings, computed over
/// characters: `2 * matches / (len(a) + len(b))`. Symmetric, 1.0 for
/// identical inputs, and 1.0 by convention when both strings are empty.
pub fn ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 1.0;
    }

    let diff = TextDiff::from_chars(a, b);
    let matches: usize = diff
        .ops()
        .iter()
        .filter_map(|op| match op {
            DiffOp::Equal { len, .. } => Some(*len),
            _ => None,
        })
        .sum();

    (2.0 * matches as f64) / total as f64
}
