use nt_core::{ScoreBreakdown, StoryCluster};
use nt_feed::FeedPage;

pub fn feed_page(page: &FeedPage) -> String {
    let kind = if page.is_personalized { "Personalized" } else { "Trending" };
    let mut out = format!(
        "{} feed: {} items (offset {}, total {}{})\n",
        kind,
        page.items.len(),
        page.offset,
        page.total,
        if page.has_more { ", more available" } else { "" }
    );

    for (i, item) in page.items.iter().enumerate() {
        let article = &item.article;
        out.push_str(&format!(
            "{:>3}. [{:>7.2}] {} ({} / {}, {})\n",
            page.offset + i + 1,
            item.score,
            title_or_id(&article.title, &article.id),
            article.source_id,
            article.category_id,
            article.published_at.format("%Y-%m-%d %H:%M")
        ));
        if let Some(breakdown) = &item.breakdown {
            out.push_str(&format!("       {}\n", breakdown_line(breakdown)));
        }
    }
    out
}

fn breakdown_line(b: &ScoreBreakdown) -> String {
    format!(
        "source {:.1} | author {:.1} | category {:.1} | interest {:.1} | recency {:.1} | engagement {:.1} | diversity {:.1}",
        b.followed_source,
        b.followed_author,
        b.followed_category,
        b.category_interest,
        b.recency,
        b.engagement,
        b.diversity
    )
}

pub fn clusters(clusters: &[StoryCluster]) -> String {
    let mut out = String::new();
    for (i, cluster) in clusters.iter().enumerate() {
        let primary = &cluster.primary;
        out.push_str(&format!(
            "#{} {} [{}]\n",
            i + 1,
            title_or_id(&primary.title, &primary.id),
            primary.source_id
        ));
        for related in &cluster.related {
            out.push_str(&format!(
                "   - {} [{}]\n",
                title_or_id(&related.title, &related.id),
                related.source_id
            ));
        }
    }
    out
}

fn title_or_id<'a>(title: &'a str, id: &'a str) -> &'a str {
    if title.trim().is_empty() {
        id
    } else {
        title
    }
}
