use std::collections::HashMap;
use nt_core::ScoredArticle;
use super::scoring::sort_by_score;

/// Penalizes repeats of a category, then re-sorts once.
///
/// Walking the score-sorted list, the n-th article of a category (0-based)
/// loses `n * penalty_weight * diversity_factor`. The adjustment is applied in
/// a single pass followed by a single stable re-sort; it is not iterated to a
/// fixed point, so same-category neighbours can survive a large enough score
/// gap. A non-positive `diversity_factor` leaves the list untouched.
pub fn rebalance(
    mut scored: Vec<ScoredArticle>,
    diversity_factor: f64,
    penalty_weight: f64,
) -> Vec<ScoredArticle> {
    if diversity_factor <= 0.0 {
        return scored;
    }

    let mut seen: HashMap<String, u32> = HashMap::new();
    for item in scored.iter_mut() {
        let prior = seen.entry(item.article.category_id.clone()).or_insert(0);
        if *prior > 0 {
            let penalty = f64::from(*prior) * penalty_weight * diversity_factor;
            item.score -= penalty;
            if let Some(breakdown) = item.breakdown.as_mut() {
                breakdown.diversity -= penalty;
            }
        }
        *prior += 1;
    }

    sort_by_score(&mut scored);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nt_core::{Article, ScoreBreakdown};

    fn scored(id: &str, category: &str, score: f64) -> ScoredArticle {
        let article = Article {
            id: id.to_string(),
            title: String::new(),
            source_id: "s".to_string(),
            category_id: category.to_string(),
            author: None,
            published_at: Utc::now(),
            view_count: 0,
            like_count: 0,
            bookmark_count: 0,
        };
        ScoredArticle::personalized(
            article,
            ScoreBreakdown {
                followed_source: score,
                ..Default::default()
            },
        )
    }

    fn ids(scored: &[ScoredArticle]) -> Vec<&str> {
        scored.iter().map(|s| s.article.id.as_str()).collect()
    }

    #[test]
    fn test_zero_factor_is_passthrough() {
        let input = vec![scored("a", "tech", 10.0), scored("b", "tech", 9.0)];
        let output = rebalance(input, 0.0, 10.0);

        assert_eq!(ids(&output), vec!["a", "b"]);
        assert_eq!(output[1].score, 9.0);
        assert_eq!(output[1].breakdown.unwrap().diversity, 0.0);
    }

    #[test]
    fn test_repeated_category_is_pushed_down() {
        let input = vec![
            scored("t1", "tech", 40.0),
            scored("t2", "tech", 39.0),
            scored("t3", "tech", 38.0),
            scored("s1", "sports", 35.0),
        ];

        let output = rebalance(input, 0.3, 10.0);

        // t2 loses 3, t3 loses 6
        assert_eq!(ids(&output), vec!["t1", "t2", "s1", "t3"]);
        assert!((output[1].score - 36.0).abs() < 1e-9);
        assert!((output[3].score - 32.0).abs() < 1e-9);
        assert!((output[3].breakdown.unwrap().diversity + 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_pass_keeps_large_margins() {
        let input = vec![
            scored("t1", "tech", 100.0),
            scored("t2", "tech", 90.0),
            scored("s1", "sports", 10.0),
        ];

        let output = rebalance(input, 0.3, 10.0);

        assert_eq!(ids(&output), vec!["t1", "t2", "s1"]);
    }

    #[test]
    fn test_breakdown_tracks_adjusted_score() {
        let input = (0..5).map(|i| scored(&format!("a{i}"), "tech", 50.0 - i as f64)).collect();

        let output = rebalance(input, 0.7, 10.0);

        for item in &output {
            let breakdown = item.breakdown.unwrap();
            assert!((breakdown.total() - item.score).abs() < 1e-9);
        }
    }

    #[test]
    fn test_ties_after_penalty_keep_walk_order() {
        let input = vec![
            scored("t1", "tech", 20.0),
            scored("t2", "tech", 13.0),
            scored("s1", "sports", 10.0),
        ];

        let output = rebalance(input, 0.3, 10.0);

        // t2 drops to 10.0 and ties with s1; stable sort keeps t2 first
        assert_eq!(ids(&output), vec!["t1", "t2", "s1"]);
    }
}
