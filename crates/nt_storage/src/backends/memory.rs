use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use nt_core::{
    Article, ArticleId, ArticleStore, CategoryId, CategoryReadingAggregate, Result, SourceId,
    UserSignalStore,
};
use nt_feed::trending::{rank_trending, DEFAULT_WINDOW_DAYS};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct ArticleCollection {
    articles: Vec<Article>,
}

impl ArticleCollection {
    pub fn new(articles: Vec<Article>) -> Self {
        let mut collection = Self::default();
        for article in &articles {
            collection.store_article(article);
        }
        collection
    }

    /// Inserts `article`, replacing any stored article with the same ID.
    pub fn store_article(&mut self, article: &Article) {
        if let Some(existing) = self.articles.iter_mut().find(|a| a.id == article.id) {
            *existing = article.clone();
        } else {
            self.articles.push(article.clone());
        }
    }

    pub fn candidates(&self, limit: usize, exclude_ids: &HashSet<ArticleId>) -> Vec<Article> {
        let mut articles: Vec<Article> = self
            .articles
            .iter()
            .filter(|a| !exclude_ids.contains(&a.id))
            .cloned()
            .collect();
        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        articles.truncate(limit);
        articles
    }

    pub fn trending(&self, now: DateTime<Utc>, window: Duration, limit: usize, offset: usize) -> Vec<Article> {
        rank_trending(&self.articles, now, window)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect()
    }

    pub fn trending_count(&self, now: DateTime<Utc>, window: Duration) -> usize {
        rank_trending(&self.articles, now, window).len()
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn all(&self) -> &[Article] {
        &self.articles
    }
}

/// Articles held in process memory.
///
/// Windows are measured from the wall clock unless a reference time is pinned with [`Self::at`].
#[derive(Clone)]
pub struct InMemoryArticleStore {
    store: Arc<RwLock<ArticleCollection>>,
    trending_window: Duration,
    as_of: Option<DateTime<Utc>>,
}

impl Default for InMemoryArticleStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl InMemoryArticleStore {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            store: Arc::new(RwLock::new(ArticleCollection::new(articles))),
            trending_window: Duration::days(DEFAULT_WINDOW_DAYS.into()),
            as_of: None,
        }
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.as_of = Some(now);
        self
    }

    pub fn with_trending_window(mut self, window: Duration) -> Self {
        self.trending_window = window;
        self
    }

    pub async fn store_article(&self, article: &Article) {
        self.store.write().await.store_article(article);
    }

    /// Snapshot of every stored article, in insertion order.
    pub async fn articles(&self) -> Vec<Article> {
        self.store.read().await.all().to_vec()
    }

    fn now(&self) -> DateTime<Utc> {
        self.as_of.unwrap_or_else(Utc::now)
    }
}

#[async_trait]
impl ArticleStore for InMemoryArticleStore {
    async fn fetch_candidates(&self, limit: usize, exclude_ids: &HashSet<ArticleId>) -> Result<Vec<Article>> {
        let store = self.store.read().await;
        Ok(store.candidates(limit, exclude_ids))
    }

    async fn fetch_trending(&self, limit: usize, offset: usize) -> Result<Vec<Article>> {
        let store = self.store.read().await;
        Ok(store.trending(self.now(), self.trending_window, limit, offset))
    }

    async fn count_published(&self) -> Result<usize> {
        let store = self.store.read().await;
        Ok(store.len())
    }

    async fn count_trending(&self) -> Result<usize> {
        let store = self.store.read().await;
        Ok(store.trending_count(self.now(), self.trending_window))
    }
}

/// One article read by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadEvent {
    pub article_id: ArticleId,
    pub category_id: CategoryId,
    pub read_at: DateTime<Utc>,
    #[serde(default)]
    pub time_spent_seconds: f64,
    #[serde(default)]
    pub scroll_depth_percent: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSignals {
    pub followed_sources: HashSet<SourceId>,
    pub followed_authors: HashSet<String>,
    pub followed_categories: HashSet<CategoryId>,
    pub reads: Vec<ReadEvent>,
}

impl UserSignals {
    fn reads_since(&self, cutoff: DateTime<Utc>) -> impl Iterator<Item = &ReadEvent> {
        self.reads.iter().filter(move |read| read.read_at >= cutoff)
    }

    pub fn aggregates_since(&self, cutoff: DateTime<Utc>) -> HashMap<CategoryId, CategoryReadingAggregate> {
        let mut totals: HashMap<CategoryId, (u64, f64, f64)> = HashMap::new();
        for read in self.reads_since(cutoff) {
            let entry = totals.entry(read.category_id.clone()).or_insert((0, 0.0, 0.0));
            entry.0 += 1;
            entry.1 += read.time_spent_seconds;
            entry.2 += read.scroll_depth_percent;
        }

        totals
            .into_iter()
            .map(|(category, (count, seconds, depth))| {
                let aggregate = CategoryReadingAggregate {
                    read_count: count,
                    total_time_seconds: seconds,
                    avg_scroll_depth_percent: depth / count as f64,
                };
                (category, aggregate)
            })
            .collect()
    }

    pub fn read_ids_since(&self, cutoff: DateTime<Utc>) -> HashSet<ArticleId> {
        self.reads_since(cutoff).map(|read| read.article_id.clone()).collect()
    }
}

/// Follows and reading history held in process memory. Unknown users have no signals.
#[derive(Clone, Default)]
pub struct InMemorySignalStore {
    users: Arc<RwLock<HashMap<String, UserSignals>>>,
    as_of: Option<DateTime<Utc>>,
}

impl InMemorySignalStore {
    pub fn new(users: HashMap<String, UserSignals>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users)),
            as_of: None,
        }
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.as_of = Some(now);
        self
    }

    pub async fn follow_source(&self, user_id: &str, source_id: &str) {
        let mut users = self.users.write().await;
        users.entry(user_id.to_string()).or_default().followed_sources.insert(source_id.to_string());
    }

    pub async fn follow_author(&self, user_id: &str, author: &str) {
        let mut users = self.users.write().await;
        users.entry(user_id.to_string()).or_default().followed_authors.insert(author.to_string());
    }

    pub async fn follow_category(&self, user_id: &str, category_id: &str) {
        let mut users = self.users.write().await;
        users.entry(user_id.to_string()).or_default().followed_categories.insert(category_id.to_string());
    }

    pub async fn record_read(&self, user_id: &str, read: ReadEvent) {
        let mut users = self.users.write().await;
        users.entry(user_id.to_string()).or_default().reads.push(read);
    }

    pub async fn knows_user(&self, user_id: &str) -> bool {
        self.users.read().await.contains_key(user_id)
    }

    async fn with_user<T: Default>(&self, user_id: &str, f: impl FnOnce(&UserSignals) -> T) -> T {
        let users = self.users.read().await;
        users.get(user_id).map(f).unwrap_or_default()
    }

    fn cutoff(&self, window_days: u32) -> DateTime<Utc> {
        self.as_of.unwrap_or_else(Utc::now) - Duration::days(window_days.into())
    }
}

#[async_trait]
impl UserSignalStore for InMemorySignalStore {
    async fn followed_sources(&self, user_id: &str) -> Result<HashSet<SourceId>> {
        Ok(self.with_user(user_id, |u| u.followed_sources.clone()).await)
    }

    async fn followed_authors(&self, user_id: &str) -> Result<HashSet<String>> {
        Ok(self.with_user(user_id, |u| u.followed_authors.clone()).await)
    }

    async fn followed_categories(&self, user_id: &str) -> Result<HashSet<CategoryId>> {
        Ok(self.with_user(user_id, |u| u.followed_categories.clone()).await)
    }

    async fn category_reading_aggregates(
        &self,
        user_id: &str,
        window_days: u32,
    ) -> Result<HashMap<CategoryId, CategoryReadingAggregate>> {
        let cutoff = self.cutoff(window_days);
        Ok(self.with_user(user_id, |u| u.aggregates_since(cutoff)).await)
    }

    async fn recently_read_ids(&self, user_id: &str, window_days: u32) -> Result<HashSet<ArticleId>> {
        let cutoff = self.cutoff(window_days);
        Ok(self.with_user(user_id, |u| u.read_ids_since(cutoff)).await)
    }
}
