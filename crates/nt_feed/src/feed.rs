use std::fmt;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use nt_core::{ArticleStore, Result, ScoredArticle, UserProfile, UserSignalStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use crate::candidates::CandidateSelector;
use crate::config::{non_negative, EngineConfig};
use crate::profile::ProfileBuilder;
use crate::ranking::{rebalance, Scorer};
use crate::trending;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedRequest {
    pub user_id: Option<String>,
    /// Page size; `None` uses the configured default.
    pub limit: Option<usize>,
    pub offset: usize,
    /// Keep the per-factor breakdown on personalized items.
    pub include_breakdown: bool,
    pub recency_weight: Option<f64>,
    pub diversity_factor: Option<f64>,
}

impl FeedRequest {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    pub fn with_page(mut self, limit: usize, offset: usize) -> Self {
        self.limit = Some(limit);
        self.offset = offset;
        self
    }

    pub fn with_breakdown(mut self) -> Self {
        self.include_breakdown = true;
        self
    }

    /// Overrides follow the same rules as their `FeedConfig` counterparts.
    pub fn validate(&self) -> Result<()> {
        if let Some(recency_weight) = self.recency_weight {
            non_negative("recency_weight", recency_weight)?;
        }
        if let Some(diversity_factor) = self.diversity_factor {
            non_negative("diversity_factor", diversity_factor)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    pub items: Vec<ScoredArticle>,
    pub is_personalized: bool,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
}

/// Resolves a reader's profile and turns the candidate pool into a ranked page,
/// falling back to trending when there is nothing to personalize on.
pub struct FeedService {
    articles: Arc<dyn ArticleStore>,
    signals: Arc<dyn UserSignalStore>,
    config: EngineConfig,
    profiles: ProfileBuilder,
    candidates: CandidateSelector,
    scorer: Scorer,
}

impl fmt::Debug for FeedService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedService")
            .field("articles", &"<dyn ArticleStore>")
            .field("signals", &"<dyn UserSignalStore>")
            .field("config", &self.config)
            .finish()
    }
}

impl FeedService {
    pub fn new(
        articles: Arc<dyn ArticleStore>,
        signals: Arc<dyn UserSignalStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            articles,
            signals,
            profiles: ProfileBuilder::new(config.profile.clone()),
            candidates: CandidateSelector::new(config.feed.candidate_pool_size),
            scorer: Scorer::new(config.scoring.clone()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn get_personalized_feed(&self, request: &FeedRequest) -> Result<FeedPage> {
        self.get_personalized_feed_at(request, Utc::now()).await
    }

    /// Same as [`get_personalized_feed`](Self::get_personalized_feed) with an explicit clock.
    pub async fn get_personalized_feed_at(
        &self,
        request: &FeedRequest,
        now: DateTime<Utc>,
    ) -> Result<FeedPage> {
        request.validate()?;
        let limit = self.page_size(request);

        let Some(user_id) = request.user_id.as_deref() else {
            debug!("No user supplied, serving trending feed");
            return self.trending_page(limit, request.offset).await;
        };

        let profile = match self.profiles.build(self.signals.as_ref(), user_id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Failed to load signals for {}, serving trending feed: {}", user_id, e);
                return self.trending_page(limit, request.offset).await;
            }
        };

        if profile.is_empty() {
            debug!("Profile for {} is empty, serving trending feed", user_id);
            return self.trending_page(limit, request.offset).await;
        }

        let ranked = self.rank(&profile, request, now).await?;
        info!("Ranked {} candidates for {}", ranked.len(), user_id);

        let total = ranked.len();
        let mut items: Vec<ScoredArticle> = ranked
            .into_iter()
            .skip(request.offset)
            .take(limit)
            .collect();
        if !request.include_breakdown {
            for item in &mut items {
                item.breakdown = None;
            }
        }

        Ok(FeedPage {
            has_more: request.offset.saturating_add(items.len()) < total,
            items,
            is_personalized: true,
            total,
            offset: request.offset,
            limit,
        })
    }

    /// Scores and rebalances the whole candidate pool for `profile`.
    pub async fn rank(
        &self,
        profile: &UserProfile,
        request: &FeedRequest,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScoredArticle>> {
        request.validate()?;
        let recency_weight = request.recency_weight.unwrap_or(self.config.feed.recency_weight);
        let diversity_factor = request
            .diversity_factor
            .unwrap_or(self.config.feed.diversity_factor);

        let candidates = self.candidates.select(self.articles.as_ref(), profile).await?;
        let scored = self.scorer.score(candidates, profile, now, recency_weight);
        Ok(rebalance(
            scored,
            diversity_factor,
            self.scorer.weights().diversity_penalty,
        ))
    }

    async fn trending_page(&self, limit: usize, offset: usize) -> Result<FeedPage> {
        let (articles, total) = tokio::try_join!(
            self.articles.fetch_trending(limit, offset),
            self.articles.count_trending(),
        )?;
        let items = trending::into_fallback_items(articles);

        Ok(FeedPage {
            has_more: offset.saturating_add(items.len()) < total,
            items,
            is_personalized: false,
            total,
            offset,
            limit,
        })
    }

    fn page_size(&self, request: &FeedRequest) -> usize {
        request
            .limit
            .unwrap_or(self.config.feed.default_page_size)
            .min(self.config.feed.max_page_size)
    }
}
