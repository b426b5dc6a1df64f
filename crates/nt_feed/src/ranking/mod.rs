pub mod diversity;
pub mod scoring;

pub use diversity::rebalance;
pub use scoring::{Scorer, ScoringWeights};
