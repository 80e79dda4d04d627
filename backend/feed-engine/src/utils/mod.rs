// Utility functions for feed-engine

/// Smallest range treated as a real spread of values
pub const NORMALIZATION_EPSILON: f64 = 1e-9;

/// Value assigned to every entry of a batch whose values are all equal
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Normalize a score to [0, 1] range
pub fn normalize_score(score: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if range < NORMALIZATION_EPSILON {
        NEUTRAL_SCORE
    } else {
        ((score - min) / range.max(NORMALIZATION_EPSILON)).clamp(0.0, 1.0)
    }
}

/// Min-max normalize a whole batch of values
///
/// A homogeneous batch maps to `NEUTRAL_SCORE` everywhere.
pub fn normalize_batch(values: &[f64]) -> Vec<f64> {
    let Some((min, max)) = min_max(values) else {
        return Vec::new();
    };
    values
        .iter()
        .map(|&v| normalize_score(v, min, max))
        .collect()
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_below_epsilon_is_neutral() {
        assert_eq!(normalize_score(1.0 + 1e-10, 1.0, 1.0 + 1e-10), NEUTRAL_SCORE);
        assert_eq!(
            normalize_batch(&[2.0, 2.0 + 1e-10, 2.0]),
            vec![NEUTRAL_SCORE; 3]
        );
        assert_eq!(normalize_score(1.0, 0.0, 1e-6), 1.0);
    }

    #[test]
    fn test_normalize_batch_bounds() {
        let values = [3.0, 17.5, 0.0, 1_700_000_000_000.0, 42.0];
        let normalized = normalize_batch(&values);

        assert_eq!(normalized.len(), values.len());
        assert!(normalized.iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(normalized[2], 0.0);
        assert_eq!(normalized[3], 1.0);
    }

    #[test]
    fn test_normalize_batch_homogeneous_is_neutral() {
        assert_eq!(normalize_batch(&[7.0, 7.0, 7.0]), vec![0.5, 0.5, 0.5]);
        assert_eq!(normalize_batch(&[0.0]), vec![0.5]);
    }

    #[test]
    fn test_normalize_batch_empty() {
        assert!(normalize_batch(&[]).is_empty());
    }
}
