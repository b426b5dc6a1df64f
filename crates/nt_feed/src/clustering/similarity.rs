use std::collections::HashSet;
use super::NormalizedTitle;

/// Jaccard similarity of the two titles' token sets, in `[0, 1]`.
///
/// Repeated tokens count once. An empty title is similar to nothing, itself included.
pub fn similarity(a: &NormalizedTitle, b: &NormalizedTitle) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let set_a: HashSet<&str> = a.tokens().iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.tokens().iter().map(String::as_str).collect();

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.len() + set_b.len() - intersection;

    intersection as f64 / union as f64
}
