use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use nt_core::Article;
use nt_feed::{EngineConfig, FeedRequest, FeedService, StoryClusterer};
use nt_storage::{Dataset, InMemoryArticleStore, InMemorySignalStore, ReadEvent};

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn article(id: &str, title: &str, source: &str, category: &str, hours_old: i64, views: u64) -> Article {
    Article {
        id: id.to_string(),
        title: title.to_string(),
        source_id: source.to_string(),
        category_id: category.to_string(),
        author: None,
        published_at: now() - Duration::hours(hours_old),
        view_count: views,
        like_count: 0,
        bookmark_count: 0,
    }
}

fn newsroom() -> Vec<Article> {
    vec![
        article("1", "Zimbabwe Economy Grows 5 Percent", "A", "business", 2, 300),
        article("2", "Zimbabwe Economy Sees 5% Growth", "B", "business", 3, 120),
        article("3", "Local Football Team Wins Cup", "C", "sports", 1, 800),
        article("4", "Harare council approves water budget", "A", "politics", 5, 40),
        article("5", "Researchers map ancient river system", "D", "science", 6, 60),
        article("6", "Old archive story", "D", "science", 24 * 20, 5_000),
    ]
}

fn service(signals: InMemorySignalStore) -> FeedService {
    FeedService::new(
        Arc::new(InMemoryArticleStore::new(newsroom()).at(now())),
        Arc::new(signals.at(now())),
        EngineConfig::default(),
    )
}

fn ids(items: &[nt_core::ScoredArticle]) -> Vec<&str> {
    items.iter().map(|i| i.article.id.as_str()).collect()
}

#[tokio::test]
async fn test_anonymous_and_cold_start_share_trending_order() {
    let service = service(InMemorySignalStore::default());

    let anonymous = service
        .get_personalized_feed_at(&FeedRequest::anonymous(), now())
        .await
        .unwrap();
    let cold = service
        .get_personalized_feed_at(&FeedRequest::for_user("new-user-with-no-follows-or-history"), now())
        .await
        .unwrap();

    assert!(!anonymous.is_personalized);
    assert!(!cold.is_personalized);
    assert_eq!(ids(&anonymous.items), vec!["3", "1", "2", "5", "4"]);
    assert_eq!(ids(&anonymous.items), ids(&cold.items));
    assert!(cold.items.iter().all(|i| i.score == 0.0));
    assert_eq!(anonymous.total, 5);
    assert!(!anonymous.has_more);
}

#[tokio::test]
async fn test_followed_source_reader_gets_personalized_feed() {
    let signals = InMemorySignalStore::default();
    signals.follow_source("reader", "A").await;
    signals
        .record_read(
            "reader",
            ReadEvent {
                article_id: "5".to_string(),
                category_id: "science".to_string(),
                read_at: now() - Duration::days(1),
                time_spent_seconds: 300.0,
                scroll_depth_percent: 90.0,
            },
        )
        .await;

    let request = FeedRequest::for_user("reader").with_breakdown();
    let page = service(signals).get_personalized_feed_at(&request, now()).await.unwrap();

    assert!(page.is_personalized);
    assert_eq!(page.total, 5);
    assert!(!ids(&page.items).contains(&"5"));
    assert_eq!(ids(&page.items)[..2], ["1", "4"]);
    for item in &page.items {
        let breakdown = item.breakdown.unwrap();
        assert!((breakdown.total() - item.score).abs() < 1e-9);
    }
}

#[tokio::test]
async fn test_dataset_round_trip_through_feed() {
    let raw = serde_json::json!({
        "articles": newsroom(),
        "users": { "fan": { "followed_categories": ["sports"] } }
    })
    .to_string();

    let (articles, signals) = Dataset::from_json(&raw).unwrap().into_stores_at(now());
    let service = FeedService::new(Arc::new(articles), Arc::new(signals), EngineConfig::default());

    let page = service
        .get_personalized_feed_at(&FeedRequest::for_user("fan").with_page(1, 0), now())
        .await
        .unwrap();

    assert!(page.is_personalized);
    assert_eq!(ids(&page.items), vec!["3"]);
    assert!(page.has_more);
}

#[tokio::test]
async fn test_clustering_stored_articles() {
    let store = InMemoryArticleStore::new(newsroom());

    let clusters = StoryClusterer::default().cluster(&store.articles().await);

    assert_eq!(clusters.len(), 5);
    assert_eq!(clusters[0].primary.id, "1");
    assert_eq!(ids_of(&clusters[0].related), vec!["2"]);
    assert!(clusters[1..].iter().all(|c| c.is_singleton()));
}

fn ids_of(articles: &[Article]) -> Vec<&str> {
    articles.iter().map(|a| a.id.as_str()).collect()
}
