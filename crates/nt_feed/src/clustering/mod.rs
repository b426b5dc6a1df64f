use std::collections::HashSet;
use nt_core::{Article, StoryCluster};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod normalize;
pub mod similarity;

pub use normalize::NormalizedTitle;
pub use similarity::similarity;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// A candidate joins a cluster only when its similarity to the primary is above this.
    pub similarity_threshold: f64,
    pub max_related_per_cluster: usize,
    pub max_clusters: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.35,
            max_related_per_cluster: 4,
            max_clusters: 10,
        }
    }
}

/// Groups articles that report the same story from different sources.
///
/// Grouping is greedy and first-seen-wins: each unclustered article in input
/// order becomes a primary and claims later articles similar to *it*. Members
/// are never compared with each other and clusters are never merged, so a
/// different input order can yield different clusters. Cost is bounded by
/// `max_clusters * articles.len()` comparisons.
#[derive(Debug, Clone, Default)]
pub struct StoryClusterer {
    config: ClusterConfig,
}

impl StoryClusterer {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn cluster(&self, articles: &[Article]) -> Vec<StoryCluster> {
        let mut clusters = Vec::new();
        if self.config.max_clusters == 0 {
            return clusters;
        }

        // Titles are normalized lazily, at most once each.
        let mut titles: Vec<Option<NormalizedTitle>> = vec![None; articles.len()];
        let mut clustered: HashSet<&str> = HashSet::new();

        for (i, primary) in articles.iter().enumerate() {
            if !clustered.insert(primary.id.as_str()) {
                continue;
            }

            let primary_title = normalized(&mut titles, articles, i).clone();
            let mut sources: HashSet<&str> = HashSet::from([primary.source_id.as_str()]);
            let mut cluster = StoryCluster::new(primary.clone());

            for (j, candidate) in articles.iter().enumerate().skip(i + 1) {
                if cluster.related.len() >= self.config.max_related_per_cluster {
                    break;
                }
                if clustered.contains(candidate.id.as_str())
                    || sources.contains(candidate.source_id.as_str())
                {
                    continue;
                }

                let score = similarity(&primary_title, normalized(&mut titles, articles, j));
                if score > self.config.similarity_threshold {
                    debug!("Clustering {} with {} (similarity {:.3})", candidate.id, primary.id, score);
                    clustered.insert(candidate.id.as_str());
                    sources.insert(candidate.source_id.as_str());
                    cluster.related.push(candidate.clone());
                }
            }

            clusters.push(cluster);
            if clusters.len() >= self.config.max_clusters {
                break;
            }
        }

        debug!(
            "Built {} clusters from {} articles ({} grouped)",
            clusters.len(),
            articles.len(),
            clusters.iter().map(|c| c.related.len()).sum::<usize>()
        );
        clusters
    }
}

fn normalized<'a>(
    titles: &'a mut [Option<NormalizedTitle>],
    articles: &[Article],
    index: usize,
) -> &'a NormalizedTitle {
    titles[index].get_or_insert_with(|| NormalizedTitle::new(&articles[index].title))
}
