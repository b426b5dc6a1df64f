use std::path::Path;
use nt_core::{Error, Result};
use serde::{Deserialize, Serialize};
use crate::candidates::MAX_POOL_SIZE;
use crate::clustering::ClusterConfig;
use crate::profile::ProfileConfig;
use crate::ranking::ScoringWeights;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub recency_weight: f64,
    /// Scales the repeated-category penalty; 0 disables rebalancing.
    pub diversity_factor: f64,
    pub candidate_pool_size: usize,
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            recency_weight: 1.0,
            diversity_factor: 0.3,
            candidate_pool_size: MAX_POOL_SIZE,
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

/// Every tunable of the engine. Missing sections and fields take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub clustering: ClusterConfig,
    pub scoring: ScoringWeights,
    pub profile: ProfileConfig,
    pub feed: FeedConfig,
}

impl EngineConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let threshold = self.clustering.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::Config(format!(
                "clustering.similarity_threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        non_negative("feed.recency_weight", self.feed.recency_weight)?;
        non_negative("feed.diversity_factor", self.feed.diversity_factor)?;
        positive("scoring.recency_half_life_hours", self.scoring.recency_half_life_hours)?;
        positive("scoring.engagement_log_scale", self.scoring.engagement_log_scale)?;
        if self.feed.max_page_size == 0 {
            return Err(Error::Config("feed.max_page_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

pub(crate) fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!("{} must be a finite non-negative number, got {}", name, value)))
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!("{} must be a finite positive number, got {}", name, value)))
    }
}
