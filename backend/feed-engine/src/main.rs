use anyhow::Context;
use chrono::{Duration, Utc};
use feed_engine::{
    ContentSourceClient, FeedConfig, FeedEngine, FeedEngineBuilder, FeedItem, HttpContentSource,
    MemorySource, RawItem, RawPost, RawReel,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true),
        )
        .init();

    let config = FeedConfig::from_env().context("Failed to load feed configuration")?;
    let engine = build_engine(&config)?;

    let initial = engine.load_initial_page().await;
    print_page("initial", &initial)?;

    let next = engine.load_next_page().await;
    print_page("next", &next)?;

    Ok(())
}

fn build_engine(config: &FeedConfig) -> anyhow::Result<FeedEngine> {
    let posts: Arc<dyn ContentSourceClient>;
    let reels: Arc<dyn ContentSourceClient>;

    match (&config.posts_source_url, &config.reels_source_url) {
        (Some(posts_url), Some(reels_url)) => {
            info!(posts = %posts_url, reels = %reels_url, "Using HTTP content sources");
            posts = Arc::new(HttpContentSource::new(posts_url.clone(), config.fetch_timeout())?);
            reels = Arc::new(HttpContentSource::new(reels_url.clone(), config.fetch_timeout())?);
        }
        _ => {
            info!("No source URLs configured, using seeded in-memory sources");
            let (post_items, reel_items) = demo_items();
            posts = Arc::new(MemorySource::new(post_items));
            reels = Arc::new(MemorySource::new(reel_items));
        }
    }

    Ok(FeedEngineBuilder::from_config(config)
        .source("posts", posts, config.posts_page_size)
        .source("reels", reels, config.reels_page_size)
        .build())
}

fn print_page(label: &str, items: &[FeedItem]) -> anyhow::Result<()> {
    info!(page = label, items = items.len(), "Loaded feed page");
    println!("{}", serde_json::to_string_pretty(items)?);
    Ok(())
}

fn demo_items() -> (Vec<RawItem>, Vec<RawItem>) {
    let now = Utc::now();

    let posts = (0..12)
        .map(|i| {
            let created = now - Duration::minutes(i * 37);
            RawItem::Post(RawPost {
                id: Some(format!("demo-post-{}", i)),
                author_id: format!("user-{}", i % 4),
                author_name: Some(format!("Demo author {}", i % 4)),
                author_is_premium: i % 5 == 0,
                text: format!("Demo post number {}", i),
                media_urls: if i % 2 == 0 {
                    vec![format!("https://cdn.nova.dev/demo/post-{}.jpg", i)]
                } else {
                    Vec::new()
                },
                video_url: (i % 3 == 0).then(|| format!("https://cdn.nova.dev/demo/post-{}.mp4", i)),
                created_at_ms: created.timestamp_millis(),
                like_count: (i as u32 * 7) % 40,
                comment_count: (i as u32 * 3) % 11,
            })
        })
        .collect();

    let reels = (0..6)
        .map(|i| {
            let created = now - Duration::minutes(i * 53 + 11);
            RawItem::Reel(RawReel {
                id: Some(format!("demo-reel-{}", i)),
                media_url: Some(format!("https://cdn.nova.dev/demo/reel-{}.mp4", i)),
                thumbnail_url: (i % 2 == 1)
                    .then(|| format!("https://cdn.nova.dev/demo/reel-{}.jpg", i)),
                created_at_ms: created.timestamp_millis(),
            })
        })
        .collect();

    (posts, reels)
}
