use std::collections::HashMap;
use nt_core::{CategoryId, CategoryReadingAggregate, Result, UserProfile, UserSignalStore};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Trailing window for per-category reading aggregates.
    pub history_window_days: u32,
    /// Trailing window for articles excluded as already read.
    pub recent_read_window_days: u32,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            history_window_days: 30,
            recent_read_window_days: 7,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileBuilder {
    config: ProfileConfig,
}

impl ProfileBuilder {
    pub fn new(config: ProfileConfig) -> Self {
        Self { config }
    }

    pub async fn build(&self, signals: &dyn UserSignalStore, user_id: &str) -> Result<UserProfile> {
        let (followed_sources, followed_authors, followed_categories, aggregates, recently_read) = tokio::try_join!(
            signals.followed_sources(user_id),
            signals.followed_authors(user_id),
            signals.followed_categories(user_id),
            signals.category_reading_aggregates(user_id, self.config.history_window_days),
            signals.recently_read_ids(user_id, self.config.recent_read_window_days),
        )?;

        let profile = UserProfile {
            followed_sources,
            followed_authors,
            followed_categories,
            category_interest: category_interest(&aggregates),
            recently_read,
        };

        debug!(
            "Built profile for {}: {} sources, {} authors, {} categories, {} interests, {} recent reads",
            user_id,
            profile.followed_sources.len(),
            profile.followed_authors.len(),
            profile.followed_categories.len(),
            profile.category_interest.len(),
            profile.recently_read.len()
        );

        Ok(profile)
    }
}

/// Blends read share, time spent and scroll depth into a `[0, 1]` interest per category.
///
/// Read counts are relative to the user's most-read category. Categories
/// without reads in the window get no entry.
pub fn category_interest(
    aggregates: &HashMap<CategoryId, CategoryReadingAggregate>,
) -> HashMap<CategoryId, f64> {
    let max_reads = aggregates
        .values()
        .map(|a| a.read_count)
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    aggregates
        .iter()
        .filter(|(_, aggregate)| aggregate.read_count > 0)
        .map(|(category, aggregate)| {
            let read_share = aggregate.read_count as f64 / max_reads;
            let time_share = (aggregate.total_time_seconds / 3600.0).min(1.0);
            let depth_share = aggregate.avg_scroll_depth_percent / 100.0;
            let interest = 0.5 * read_share + 0.3 * time_share + 0.2 * depth_share;
            (category.clone(), interest.clamp(0.0, 1.0))
        })
        .collect()
}
