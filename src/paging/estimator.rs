//! Token Estimator
//!
//! Approximates the serialized token cost of result items from a small
//! prefix sample, so the cost stays O(sample) whatever the result size.

use serde::Serialize;

/// Rough text-to-token ratio used throughout.
pub const CHARS_PER_TOKEN: usize = 4;

/// Number of leading items inspected by [`tokens_per_item`].
pub const SAMPLE_SIZE: usize = 5;

/// Estimated token count of a rendered text, rounded up.
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(CHARS_PER_TOKEN)
}

/// Average estimated tokens per item over the first [`SAMPLE_SIZE`] items.
///
/// Returns 0.0 for an empty slice; callers treat that as one item per page.
/// Items that fail to serialize are skipped rather than poisoning the sample.
pub fn tokens_per_item<T: Serialize>(items: &[T]) -> f64 {
    let sample = &items[..items.len().min(SAMPLE_SIZE)];

    let lengths: Vec<usize> = sample
        .iter()
        .filter_map(|item| serde_json::to_string(item).ok())
        .map(|text| text.len())
        .collect();

    if lengths.is_empty() {
        return 0.0;
    }

    let total: usize = lengths.iter().sum();
    total as f64 / lengths.len() as f64 / CHARS_PER_TOKEN as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
        assert_eq!(estimate_tokens(&"Hello world ".repeat(100)), 300);
    }

    #[test]
    fn test_empty_sample_is_zero() {
        let items: Vec<String> = Vec::new();
        assert_eq!(tokens_per_item(&items), 0.0);
    }

    #[test]
    fn test_fixed_width_items() {
        // Each serializes to 40 chars: 38 plus two quotes
        let items = vec!["x".repeat(38); 12];
        assert_eq!(tokens_per_item(&items), 10.0);
    }

    #[test]
    fn test_only_prefix_is_sampled() {
        let mut items = vec!["a".repeat(6); SAMPLE_SIZE];
        items.push("b".repeat(10_000));

        // "aaaaaa" with quotes is 8 chars -> 2 tokens; the huge tail item is ignored
        assert_eq!(tokens_per_item(&items), 2.0);
    }

    #[test]
    fn test_heterogeneous_records_are_averaged() {
        let items = vec![
            json!({"a": 1}),
            json!({"a": 1, "optional": "present", "more": [1, 2, 3]}),
        ];

        let short = serde_json::to_string(&items[0]).unwrap().len();
        let long = serde_json::to_string(&items[1]).unwrap().len();
        let expected = (short + long) as f64 / 2.0 / 4.0;

        assert_eq!(tokens_per_item(&items), expected);
    }

    #[test]
    fn test_estimate_grows_with_item_size() {
        let small = vec!["x".repeat(10); 3];
        let large = vec!["x".repeat(100); 3];
        assert!(tokens_per_item(&large) > tokens_per_item(&small));
    }
}
