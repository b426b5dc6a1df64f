pub mod candidates;
pub mod clustering;
pub mod config;
pub mod feed;
pub mod profile;
pub mod ranking;
pub mod trending;

#[cfg(test)]
mod testing;

pub use candidates::CandidateSelector;
pub use clustering::{ClusterConfig, NormalizedTitle, StoryClusterer};
pub use config::{EngineConfig, FeedConfig};
pub use feed::{FeedPage, FeedRequest, FeedService};
pub use profile::{ProfileBuilder, ProfileConfig};
pub use ranking::{Scorer, ScoringWeights};

pub mod prelude {
    pub use super::{
        ClusterConfig, EngineConfig, FeedPage, FeedRequest, FeedService, StoryClusterer,
    };
    pub use nt_core::{Article, Error, Result, ScoredArticle, StoryCluster, UserProfile};
}
