use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub type ArticleId = String;
pub type SourceId = String;
pub type CategoryId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    #[serde(default)]
    pub title: String,
    pub source_id: SourceId,
    pub category_id: CategoryId,
    #[serde(default)]
    pub author: Option<String>,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub bookmark_count: u64,
}

impl Article {
    /// Weighted engagement: views + 3 * likes + 2 * bookmarks.
    pub fn raw_engagement(&self) -> u64 {
        self.view_count
            .saturating_add(self.like_count.saturating_mul(3))
            .saturating_add(self.bookmark_count.saturating_mul(2))
    }
}

/// Interest signals for one user, rebuilt on every request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub followed_sources: HashSet<SourceId>,
    pub followed_authors: HashSet<String>,
    pub followed_categories: HashSet<CategoryId>,
    /// Per-category interest in `[0, 1]`.
    pub category_interest: HashMap<CategoryId, f64>,
    /// Articles read recently; excluded from candidate pools.
    pub recently_read: HashSet<ArticleId>,
}

impl UserProfile {
    /// A profile with nothing to personalize on. Recent reads alone do not count.
    pub fn is_empty(&self) -> bool {
        self.followed_sources.is_empty()
            && self.followed_authors.is_empty()
            && self.followed_categories.is_empty()
            && self.category_interest.is_empty()
    }

    pub fn interest_in(&self, category_id: &str) -> f64 {
        self.category_interest.get(category_id).copied().unwrap_or(0.0)
    }
}

/// Reading behaviour for one category over a trailing window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryReadingAggregate {
    pub read_count: u64,
    pub total_time_seconds: f64,
    pub avg_scroll_depth_percent: f64,
}

/// Per-factor contributions to a relevance score.
///
/// `diversity` is the (non-positive) adjustment applied after ranking, so
/// `total()` always matches the score it was recorded for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub followed_source: f64,
    pub followed_author: f64,
    pub followed_category: f64,
    pub category_interest: f64,
    pub recency: f64,
    pub engagement: f64,
    pub diversity: f64,
}

impl ScoreBreakdown {
    pub fn base_total(&self) -> f64 {
        self.followed_source
            + self.followed_author
            + self.followed_category
            + self.category_interest
            + self.recency
            + self.engagement
    }

    pub fn total(&self) -> f64 {
        self.base_total() + self.diversity
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredArticle {
    pub article: Article,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
    pub is_personalized: bool,
}

impl ScoredArticle {
    pub fn personalized(article: Article, breakdown: ScoreBreakdown) -> Self {
        Self {
            article,
            score: breakdown.total(),
            breakdown: Some(breakdown),
            is_personalized: true,
        }
    }

    pub fn unranked(article: Article) -> Self {
        Self {
            article,
            score: 0.0,
            breakdown: None,
            is_personalized: false,
        }
    }
}

/// The same story as reported by several distinct sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryCluster {
    pub primary: Article,
    pub related: Vec<Article>,
}

impl StoryCluster {
    pub fn new(primary: Article) -> Self {
        Self {
            primary,
            related: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        1 + self.related.len()
    }

    pub fn is_singleton(&self) -> bool {
        self.related.is_empty()
    }

    pub fn articles(&self) -> impl Iterator<Item = &Article> {
        std::iter::once(&self.primary).chain(self.related.iter())
    }
}
