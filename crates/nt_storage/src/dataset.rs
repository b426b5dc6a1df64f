use std::collections::{HashMap, HashSet};
use std::path::Path;
use chrono::{DateTime, Utc};
use nt_core::{Article, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::info;
use crate::backends::memory::{InMemoryArticleStore, InMemorySignalStore, UserSignals};

/// A JSON snapshot of articles and per-user signals.
///
/// ```json
/// {
///   "articles": [{ "id": "1", "title": "...", "source_id": "herald", "category_id": "politics",
///                  "published_at": "2024-05-01T08:00:00Z", "view_count": 120 }],
///   "users": { "reader": { "followed_sources": ["herald"],
///                          "reads": [{ "article_id": "7", "category_id": "science",
///                                      "read_at": "2024-04-30T20:00:00Z",
///                                      "time_spent_seconds": 240, "scroll_depth_percent": 85 }] } }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub articles: Vec<Article>,
    pub users: HashMap<String, UserSignals>,
}

impl Dataset {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let dataset = Self::from_json(&raw)?;
        info!(
            "Loaded {} articles and {} users from {}",
            dataset.articles.len(),
            dataset.users.len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let dataset: Self = serde_json::from_str(raw)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Article IDs must be unique and non-empty.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for article in &self.articles {
            if article.id.is_empty() {
                return Err(Error::Storage("article with an empty id".to_string()));
            }
            if !seen.insert(article.id.as_str()) {
                return Err(Error::Storage(format!("duplicate article id: {}", article.id)));
            }
        }
        Ok(())
    }

    pub fn into_stores(self) -> (InMemoryArticleStore, InMemorySignalStore) {
        (
            InMemoryArticleStore::new(self.articles),
            InMemorySignalStore::new(self.users),
        )
    }

    /// Like [`Self::into_stores`], with every time window measured from `now`.
    pub fn into_stores_at(self, now: DateTime<Utc>) -> (InMemoryArticleStore, InMemorySignalStore) {
        let (articles, signals) = self.into_stores();
        (articles.at(now), signals.at(now))
    }
}
