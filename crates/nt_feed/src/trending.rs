//! Profile-free ranking for anonymous and cold-start readers.

use chrono::{DateTime, Duration, Utc};
use nt_core::{Article, ScoredArticle};

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Articles published inside the trailing `window`, by weighted engagement
/// (views + 3 * likes + 2 * bookmarks), newest first on ties.
pub fn rank_trending(articles: &[Article], now: DateTime<Utc>, window: Duration) -> Vec<Article> {
    let cutoff = now - window;
    let mut trending: Vec<Article> = articles
        .iter()
        .filter(|article| article.published_at >= cutoff)
        .cloned()
        .collect();

    trending.sort_by(|a, b| {
        b.raw_engagement()
            .cmp(&a.raw_engagement())
            .then_with(|| b.published_at.cmp(&a.published_at))
    });
    trending
}

/// Wraps trending articles as unpersonalized feed items with a zero score.
pub fn into_fallback_items(articles: Vec<Article>) -> Vec<ScoredArticle> {
    articles.into_iter().map(ScoredArticle::unranked).collect()
}
