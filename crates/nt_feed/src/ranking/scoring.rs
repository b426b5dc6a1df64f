use chrono::{DateTime, Utc};
use nt_core::{Article, ScoreBreakdown, ScoredArticle, UserProfile};
use serde::{Deserialize, Serialize};

/// Weights for every relevance factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub followed_source: f64,
    pub followed_author: f64,
    pub followed_category: f64,
    /// Multiplied by the profile's `[0, 1]` interest in the article's category.
    pub category_interest: f64,
    /// Recency contribution of an article published right now.
    pub recency: f64,
    pub recency_half_life_hours: f64,
    /// Engagement contribution of an article with `10^engagement_log_scale - 1` raw engagement.
    pub engagement: f64,
    pub engagement_log_scale: f64,
    /// Per prior same-category article, scaled by the diversity factor.
    pub diversity_penalty: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            followed_source: 50.0,
            followed_author: 40.0,
            followed_category: 30.0,
            category_interest: 20.0,
            recency: 25.0,
            recency_half_life_hours: 24.0,
            engagement: 15.0,
            engagement_log_scale: 3.0,
            diversity_penalty: 10.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Scores every candidate and sorts by descending score, keeping input order on ties.
    pub fn score(
        &self,
        candidates: Vec<Article>,
        profile: &UserProfile,
        now: DateTime<Utc>,
        recency_weight: f64,
    ) -> Vec<ScoredArticle> {
        let mut scored: Vec<ScoredArticle> = candidates
            .into_iter()
            .map(|article| {
                let breakdown = self.breakdown(&article, profile, now, recency_weight);
                ScoredArticle::personalized(article, breakdown)
            })
            .collect();

        sort_by_score(&mut scored);
        scored
    }

    pub fn breakdown(
        &self,
        article: &Article,
        profile: &UserProfile,
        now: DateTime<Utc>,
        recency_weight: f64,
    ) -> ScoreBreakdown {
        let w = &self.weights;

        let followed_source = if profile.followed_sources.contains(&article.source_id) {
            w.followed_source
        } else {
            0.0
        };
        let followed_author = match &article.author {
            Some(author) if profile.followed_authors.contains(author) => w.followed_author,
            _ => 0.0,
        };
        let followed_category = if profile.followed_categories.contains(&article.category_id) {
            w.followed_category
        } else {
            0.0
        };

        ScoreBreakdown {
            followed_source,
            followed_author,
            followed_category,
            category_interest: profile.interest_in(&article.category_id) * w.category_interest,
            recency: self.recency(article.published_at, now) * recency_weight,
            engagement: self.engagement(article.raw_engagement()),
            diversity: 0.0,
        }
    }

    /// Half-life decay of publish age. Future timestamps decay above the base weight.
    pub fn recency(&self, published_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        let hours_old = (now - published_at).num_milliseconds() as f64 / 3_600_000.0;
        0.5_f64.powf(hours_old / self.weights.recency_half_life_hours) * self.weights.recency
    }

    /// Log-compressed so viral articles cannot dominate the ranking.
    pub fn engagement(&self, raw_engagement: u64) -> f64 {
        let raw = raw_engagement.max(1) as f64;
        (raw + 1.0).log10() / self.weights.engagement_log_scale * self.weights.engagement
    }
}

/// Stable descending sort on score.
pub(crate) fn sort_by_score(scored: &mut [ScoredArticle]) {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
}
