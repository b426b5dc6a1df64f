use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Args, Parser, Subcommand};
use nt_core::ArticleStore;
use nt_feed::{EngineConfig, FeedRequest, FeedService, StoryClusterer};
use nt_storage::Dataset;
use tracing::{debug, info, warn, Level};

mod render;

#[derive(Debug, Clone, Copy, PartialEq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0i64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if !current_number.is_empty() {
                let unit_seconds = match c {
                    's' => 1,
                    'm' => 60,
                    'h' => 3600,
                    'd' => 86400,
                    'w' => 604800,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                };
                total_seconds = add_component(total_seconds, &current_number, unit_seconds)
                    .ok_or_else(|| format!("Duration too large: {}", s))?;
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A bare number is a count of days
        if !current_number.is_empty() {
            total_seconds = add_component(total_seconds, &current_number, 86400)
                .ok_or_else(|| format!("Duration too large: {}", s))?;
            has_unit = true;
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }

        Duration::try_seconds(total_seconds)
            .map(HumanDuration)
            .ok_or_else(|| format!("Duration out of range: {}", s))
    }
}

fn add_component(total_seconds: i64, digits: &str, unit_seconds: i64) -> Option<i64> {
    digits
        .parse::<i64>()
        .ok()?
        .checked_mul(unit_seconds)?
        .checked_add(total_seconds)
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Personalized news feeds and same-story clustering", long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Engine configuration (JSON); missing fields keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Dataset with articles and user signals (JSON)
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Reference time for every time window, RFC 3339 (defaults to now)
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank the feed for a user, or the trending feed without one
    Feed(FeedArgs),
    /// Group articles reporting the same story from different sources
    Cluster(ClusterArgs),
}

#[derive(Args, Debug)]
struct FeedArgs {
    #[arg(long)]
    user: Option<String>,
    #[arg(long)]
    limit: Option<usize>,
    #[arg(long, default_value_t = 0)]
    offset: usize,
    /// Show the contribution of every scoring factor
    #[arg(long)]
    breakdown: bool,
    #[arg(long)]
    recency_weight: Option<f64>,
    /// Repeated-category penalty scale; 0 disables rebalancing
    #[arg(long)]
    diversity: Option<f64>,
    /// Trending window (e.g. 7d, 36h, 2w)
    #[arg(long)]
    trending_window: Option<HumanDuration>,
}

#[derive(Args, Debug)]
struct ClusterArgs {
    #[arg(long)]
    threshold: Option<f64>,
    #[arg(long)]
    max_related: Option<usize>,
    #[arg(long)]
    max_clusters: Option<usize>,
}

fn init_logging(verbose: bool) {
    if !tracing::dispatcher::has_been_set() {
        tracing_subscriber::fmt()
            .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn load_dataset(path: Option<&PathBuf>) -> Result<Dataset> {
    let path = path.context("--data is required")?;
    Dataset::from_json_file(path).with_context(|| format!("Failed to load dataset from {}", path.display()))
}

async fn run_feed(cli: &Cli, args: &FeedArgs, config: EngineConfig, now: DateTime<Utc>) -> Result<()> {
    let dataset = load_dataset(cli.data.as_ref())?;
    let (mut articles, signals) = dataset.into_stores_at(now);
    if let Some(window) = args.trending_window {
        articles = articles.with_trending_window(window.0);
    }
    debug!(
        "Catalogue holds {} published articles, {} in the trending window",
        articles.count_published().await?,
        articles.count_trending().await?
    );

    if let Some(user) = &args.user {
        if !signals.knows_user(user).await {
            warn!("User {} has no signals in the dataset, expect the trending feed", user);
        }
    }

    let service = FeedService::new(Arc::new(articles), Arc::new(signals), config);
    let request = FeedRequest {
        user_id: args.user.clone(),
        limit: args.limit,
        offset: args.offset,
        include_breakdown: args.breakdown,
        recency_weight: args.recency_weight,
        diversity_factor: args.diversity,
    };

    let page = service.get_personalized_feed_at(&request, now).await?;
    info!(
        "📰 Served {} of {} articles ({})",
        page.items.len(),
        page.total,
        if page.is_personalized { "personalized" } else { "trending" }
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print!("{}", render::feed_page(&page));
    }
    Ok(())
}

fn run_cluster(cli: &Cli, args: &ClusterArgs, mut config: EngineConfig) -> Result<()> {
    if let Some(threshold) = args.threshold {
        config.clustering.similarity_threshold = threshold;
    }
    if let Some(max_related) = args.max_related {
        config.clustering.max_related_per_cluster = max_related;
    }
    if let Some(max_clusters) = args.max_clusters {
        config.clustering.max_clusters = max_clusters;
    }
    config.validate()?;

    let dataset = load_dataset(cli.data.as_ref())?;
    let clusters = StoryClusterer::new(config.clustering).cluster(&dataset.articles);
    info!(
        "🧩 Built {} clusters from {} articles",
        clusters.len(),
        dataset.articles.len()
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&clusters)?);
    } else {
        print!("{}", render::clusters(&clusters));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_ref())?;
    let now = cli.now.unwrap_or_else(Utc::now);

    match &cli.command {
        Commands::Feed(args) => run_feed(&cli, args, config, now).await,
        Commands::Cluster(args) => run_cluster(&cli, args, config),
    }
}
