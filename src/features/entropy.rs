use std::collections::HashMap;

/// Shannon entropy in bits over the character distribution of `text`.
///
/// Terms are summed in order of first occurrence so the result is
/// bit-identical between runs and matches the training pipeline.
pub fn shannon_entropy(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let mut slots: HashMap<char, usize> = HashMap::new();
    let mut counts: Vec<usize> = Vec::new();
    for c in text.chars() {
        let slot = *slots.entry(c).or_insert_with(|| {
            counts.push(0);
            counts.len() - 1
        });
        counts[slot] += 1;
    }

    let len = text.chars().count() as f64;
    let mut entropy = 0.0;

    for count in counts {
        let p = count as f64 / len;
        entropy -= p * p.log2();
    }

    entropy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string() {
        assert_eq!(shannon_entropy(""), 0.0);
    }

    #[test]
    fn test_single_symbol() {
        assert_eq!(shannon_entropy("aaaa"), 0.0);
    }

    #[test]
    fn test_uniform_symbols() {
        assert_eq!(shannon_entropy("abcd"), 2.0);
        assert_eq!(shannon_entropy("ab"), 1.0);
    }

    #[test]
    fn test_skewed_distribution() {
        // p = 3/4, 1/4
        let expected = -(0.75f64 * 0.75f64.log2()) - (0.25f64 * 0.25f64.log2());
        assert!((shannon_entropy("aaab") - expected).abs() < 1e-12);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert_eq!(shannon_entropy("éé"), 0.0);
    }
}
