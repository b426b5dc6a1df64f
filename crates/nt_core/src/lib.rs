pub mod error;
pub mod storage;
pub mod types;

pub use error::Error;
pub use storage::{ArticleStore, UserSignalStore};
pub use types::{
    Article, ArticleId, CategoryId, CategoryReadingAggregate, ScoreBreakdown, ScoredArticle,
    SourceId, StoryCluster, UserProfile,
};

pub type Result<T> = std::result::Result<T, Error>;
