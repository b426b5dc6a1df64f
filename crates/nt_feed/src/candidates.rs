use std::collections::HashSet;
use nt_core::{Article, ArticleStore, Result, UserProfile};
use tracing::debug;

/// Largest pool ever scored for one request.
pub const MAX_POOL_SIZE: usize = 200;

/// Narrows the article store down to a bounded pool worth scoring.
#[derive(Debug, Clone)]
pub struct CandidateSelector {
    pool_limit: usize,
}

impl Default for CandidateSelector {
    fn default() -> Self {
        Self::new(MAX_POOL_SIZE)
    }
}

impl CandidateSelector {
    pub fn new(pool_limit: usize) -> Self {
        Self {
            pool_limit: pool_limit.min(MAX_POOL_SIZE),
        }
    }

    pub fn pool_limit(&self) -> usize {
        self.pool_limit
    }

    /// Recent articles the user has not read yet, most recent first.
    ///
    /// Exclusion, duplicate IDs and the pool bound are enforced here as well,
    /// whatever the store returns.
    pub async fn select(&self, store: &dyn ArticleStore, profile: &UserProfile) -> Result<Vec<Article>> {
        let fetched = store
            .fetch_candidates(self.pool_limit, &profile.recently_read)
            .await?;
        let fetched_count = fetched.len();

        let mut seen = HashSet::new();
        let candidates: Vec<Article> = fetched
            .into_iter()
            .filter(|article| !profile.recently_read.contains(&article.id))
            .filter(|article| seen.insert(article.id.clone()))
            .take(self.pool_limit)
            .collect();

        debug!(
            "Selected {} candidates ({} fetched, {} excluded as read)",
            candidates.len(),
            fetched_count,
            profile.recently_read.len()
        );
        Ok(candidates)
    }
}
