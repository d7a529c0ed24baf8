use std::collections::HashMap;

/// Dice coefficient over character bigrams, in `[0, 1]`.
///
/// Equal inputs score 1. Inputs shorter than two characters contribute no
/// bigrams, and a non-positive denominator yields 0.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let denominator = a.len() as i64 + b.len() as i64 - 2;
    if denominator <= 0 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in a.windows(2) {
        *bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut intersection = 0usize;
    for pair in b.windows(2) {
        if let Some(count) = bigrams.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                intersection += 1;
            }
        }
    }

    2.0 * intersection as f64 / denominator as f64
}
