use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use crate::types::{Article, ArticleId, CategoryId, CategoryReadingAggregate, SourceId};
use crate::Result;

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Recent published articles, most recent first, skipping `exclude_ids`.
    async fn fetch_candidates(&self, limit: usize, exclude_ids: &HashSet<ArticleId>) -> Result<Vec<Article>>;

    /// Articles from the trending window, highest engagement first.
    async fn fetch_trending(&self, limit: usize, offset: usize) -> Result<Vec<Article>>;

    /// Number of published articles
    async fn count_published(&self) -> Result<usize>;

    /// Number of articles inside the trending window, i.e. the length of the
    /// full list `fetch_trending` pages through.
    async fn count_trending(&self) -> Result<usize>;
}

#[async_trait]
pub trait UserSignalStore: Send + Sync {
    async fn followed_sources(&self, user_id: &str) -> Result<HashSet<SourceId>>;

    async fn followed_authors(&self, user_id: &str) -> Result<HashSet<String>>;

    async fn followed_categories(&self, user_id: &str) -> Result<HashSet<CategoryId>>;

    /// Reading behaviour per category over the trailing `window_days`.
    async fn category_reading_aggregates(
        &self,
        user_id: &str,
        window_days: u32,
    ) -> Result<HashMap<CategoryId, CategoryReadingAggregate>>;

    /// IDs of articles read within the trailing `window_days`.
    async fn recently_read_ids(&self, user_id: &str, window_days: u32) -> Result<HashSet<ArticleId>>;
}
