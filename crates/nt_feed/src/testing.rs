//! In-crate fakes for the collaborator traits.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use nt_core::{
    Article, ArticleId, ArticleStore, CategoryId, CategoryReadingAggregate, Error, Result,
    SourceId, UserSignalStore,
};
use crate::trending::{rank_trending, DEFAULT_WINDOW_DAYS};

pub fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn article(id: &str, source: &str, category: &str, hours_old: i64) -> Article {
    Article {
        id: id.to_string(),
        title: format!("Story {id}"),
        source_id: source.to_string(),
        category_id: category.to_string(),
        author: None,
        published_at: now() - Duration::hours(hours_old),
        view_count: 10,
        like_count: 0,
        bookmark_count: 0,
    }
}

pub struct StaticArticles {
    articles: Vec<Article>,
    honour_exclusions: bool,
}

impl StaticArticles {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            articles,
            honour_exclusions: true,
        }
    }

    fn trending(&self) -> Vec<Article> {
        rank_trending(&self.articles, now(), Duration::days(DEFAULT_WINDOW_DAYS.into()))
    }

    /// Simulates a store that returns already-read articles anyway.
    pub fn ignoring_exclusions(mut self) -> Self {
        self.honour_exclusions = false;
        self
    }
}

#[async_trait]
impl ArticleStore for StaticArticles {
    async fn fetch_candidates(&self, limit: usize, exclude_ids: &HashSet<ArticleId>) -> Result<Vec<Article>> {
        let mut articles: Vec<Article> = self
            .articles
            .iter()
            .filter(|a| !self.honour_exclusions || !exclude_ids.contains(&a.id))
            .cloned()
            .collect();
        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        articles.truncate(limit);
        Ok(articles)
    }

    async fn fetch_trending(&self, limit: usize, offset: usize) -> Result<Vec<Article>> {
        Ok(self.trending().into_iter().skip(offset).take(limit).collect())
    }

    async fn count_published(&self) -> Result<usize> {
        Ok(self.articles.len())
    }

    async fn count_trending(&self) -> Result<usize> {
        Ok(self.trending().len())
    }
}

#[derive(Default)]
pub struct StaticSignals {
    sources: HashMap<String, HashSet<SourceId>>,
    authors: HashMap<String, HashSet<String>>,
    categories: HashMap<String, HashSet<CategoryId>>,
    aggregates: HashMap<String, HashMap<CategoryId, CategoryReadingAggregate>>,
    recent: HashMap<String, HashSet<ArticleId>>,
    failing: bool,
    windows: Mutex<Vec<u32>>,
}

impl StaticSignals {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn with_source(mut self, user: &str, source: &str) -> Self {
        self.sources.entry(user.to_string()).or_default().insert(source.to_string());
        self
    }

    pub fn with_author(mut self, user: &str, author: &str) -> Self {
        self.authors.entry(user.to_string()).or_default().insert(author.to_string());
        self
    }

    pub fn with_category(mut self, user: &str, category: &str) -> Self {
        self.categories.entry(user.to_string()).or_default().insert(category.to_string());
        self
    }

    pub fn with_aggregate(mut self, user: &str, category: &str, aggregate: CategoryReadingAggregate) -> Self {
        self.aggregates
            .entry(user.to_string())
            .or_default()
            .insert(category.to_string(), aggregate);
        self
    }

    pub fn with_recent_read(mut self, user: &str, article_id: &str) -> Self {
        self.recent.entry(user.to_string()).or_default().insert(article_id.to_string());
        self
    }

    pub fn requested_windows(&self) -> Vec<u32> {
        self.windows.lock().unwrap().clone()
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            return Err(Error::Storage("signal store unavailable".to_string()));
        }
        Ok(())
    }
}

fn lookup<T: Clone + Default>(map: &HashMap<String, T>, user_id: &str) -> T {
    map.get(user_id).cloned().unwrap_or_default()
}

#[async_trait]
impl UserSignalStore for StaticSignals {
    async fn followed_sources(&self, user_id: &str) -> Result<HashSet<SourceId>> {
        self.check()?;
        Ok(lookup(&self.sources, user_id))
    }

    async fn followed_authors(&self, user_id: &str) -> Result<HashSet<String>> {
        self.check()?;
        Ok(lookup(&self.authors, user_id))
    }

    async fn followed_categories(&self, user_id: &str) -> Result<HashSet<CategoryId>> {
        self.check()?;
        Ok(lookup(&self.categories, user_id))
    }

    async fn category_reading_aggregates(
        &self,
        user_id: &str,
        window_days: u32,
    ) -> Result<HashMap<CategoryId, CategoryReadingAggregate>> {
        self.check()?;
        self.windows.lock().unwrap().push(window_days);
        Ok(lookup(&self.aggregates, user_id))
    }

    async fn recently_read_ids(&self, user_id: &str, window_days: u32) -> Result<HashSet<ArticleId>> {
        self.check()?;
        self.windows.lock().unwrap().push(window_days);
        Ok(lookup(&self.recent, user_id))
    }
}
