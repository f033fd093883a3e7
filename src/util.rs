/// Asserts that a numerical value is in the provided interval `[a,b]` and panics
/// with a helpful message if not
///
/// ### Example
/// ```should_panic
/// let alpha = 2.0;
/// qsnake::assert_interval!(alpha, 0.0, 1.0);
/// ```
/// This panics with the message "Invalid value for \`alpha\`. Must be in the interval \[0, 1\]."
#[macro_export]
macro_rules! assert_interval {
    ($var:expr, $a:expr, $b:expr) => {
        assert!(
            $var >= $a && $var <= $b,
            "Invalid value for `{}`. Must be in the interval [{}, {}].",
            stringify!($var),
            $a,
            $b,
        );
    };
}

/// Arithmetic mean of a slice of scores, `0.0` when empty
pub fn mean(values: &[u32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| v as f64).sum::<f64>() as f32 / values.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_scores() {
        assert_eq!(mean(&[]), 0.0, "empty slice");
        assert_eq!(mean(&[1, 2, 3]), 2.0);
        assert_eq!(mean(&[0, 0, 1, 0]), 0.25);
    }

    #[test]
    #[should_panic(expected = "Must be in the interval")]
    fn assert_interval_panics() {
        let gamma = 1.5;
        assert_interval!(gamma, 0.0, 1.0);
    }
}
