//! Feed assembly: merge, derive, rank, inject, fall back
//!
//! Workflow for one round:
//! 1. Convert each source's raw items (sources in registration order)
//! 2. Optionally synthesize reels from posts carrying a short video
//! 3. Rank the organic pool
//! 4. Inject ads
//! 5. Prepend Top Picks on the initial load, or emit the evergreen card when
//!    the round produced no content at all

use super::ads::{AdCreative, AdInjector};
use super::ranking::{RankingEngine, RankingWeights};
use crate::config::FeedConfig;
use crate::metrics;
use crate::models::{
    Author, EvergreenCard, FeedItem, PostItem, RawItem, RawPost, RawReel, ReelItem,
    SourceBatch, TopPick, TopPicks,
};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info};

/// Knobs that shape assembly; adjustable between loads
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblySettings {
    pub ad_interval: usize,
    pub enable_ads: bool,
    pub derive_reels: bool,
    pub weights: RankingWeights,
    pub ad_creatives: Vec<AdCreative>,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            ad_interval: 7,
            enable_ads: true,
            derive_reels: false,
            weights: RankingWeights::default(),
            ad_creatives: vec![AdCreative::default()],
        }
    }
}

impl From<&FeedConfig> for AssemblySettings {
    fn from(config: &FeedConfig) -> Self {
        Self {
            ad_interval: config.ad_interval,
            enable_ads: config.enable_ads,
            derive_reels: config.derive_reels,
            weights: RankingWeights {
                recency: config.recency_weight,
                engagement: config.engagement_weight,
                interest: config.interest_weight,
            },
            ad_creatives: vec![AdCreative::new(
                config.ad_image_url.clone(),
                config.ad_click_url.clone(),
            )],
        }
    }
}

/// Curated block shown first on the initial page
pub fn default_top_picks() -> TopPicks {
    let entries = [
        ("pick_trending", "Trending creators", "trending"),
        ("pick_editors", "Editors' choice", "editors"),
        ("pick_new", "New this week", "new"),
        ("pick_nearby", "Popular nearby", "nearby"),
    ]
    .into_iter()
    .map(|(id, title, slug)| TopPick {
        id: id.to_string(),
        title: title.to_string(),
        image_url: format!("https://cdn.nova.dev/top-picks/{}.jpg", slug),
    })
    .collect();

    TopPicks { entries }
}

/// Filler shown when a round has nothing else to show
pub fn evergreen_card() -> EvergreenCard {
    EvergreenCard {
        title: "You're all caught up".to_string(),
        caption: "Check back soon for fresh posts and reels.".to_string(),
    }
}

pub struct FeedAssembler {
    derive_reels: bool,
    ranking: RankingEngine,
    ads: AdInjector,
}

impl FeedAssembler {
    pub fn new(settings: &AssemblySettings) -> Self {
        Self {
            derive_reels: settings.derive_reels,
            ranking: RankingEngine::new(settings.weights),
            ads: AdInjector::new(settings.ad_interval, settings.enable_ads)
                .with_creatives(settings.ad_creatives.clone()),
        }
    }

    pub fn assemble(&self, batches: Vec<SourceBatch>, is_initial_load: bool) -> Vec<FeedItem> {
        let started = Instant::now();
        let mut seen: HashSet<String> = HashSet::new();
        let mut pool: Vec<FeedItem> = Vec::new();
        let mut dropped = 0usize;

        for batch in batches {
            for raw in batch.items {
                let Some(item) = convert(raw) else {
                    dropped += 1;
                    debug!(source = %batch.source, "Dropping malformed raw item");
                    continue;
                };
                if seen.insert(item.key()) {
                    pool.push(item);
                } else {
                    debug!(source = %batch.source, key = %item.key(), "Dropping duplicate item");
                }
            }
        }

        if self.derive_reels {
            let derived: Vec<FeedItem> = pool
                .iter()
                .filter_map(|item| match item {
                    FeedItem::Post(post) => derive_reel(post),
                    _ => None,
                })
                .collect();
            for item in derived {
                if seen.insert(item.key()) {
                    pool.push(item);
                }
            }
        }

        let organic_count = pool.len();
        let ranked = self.ranking.rank(pool);
        let mut page = self.ads.inject(ranked);

        if page.is_empty() {
            page.push(FeedItem::Evergreen(evergreen_card()));
        } else if is_initial_load {
            page.insert(0, FeedItem::TopPicks(default_top_picks()));
        }

        for item in &page {
            metrics::record_item_assembled(item.kind());
        }
        metrics::record_assembly_duration(started.elapsed());

        info!(
            initial = is_initial_load,
            organic = organic_count,
            dropped = dropped,
            total = page.len(),
            "Feed page assembled"
        );

        page
    }
}

/// Convert one raw item; `None` when a required field is missing
pub fn convert(raw: RawItem) -> Option<FeedItem> {
    match raw {
        RawItem::Post(post) => convert_post(post).map(FeedItem::Post),
        RawItem::Reel(reel) => convert_reel(reel).map(FeedItem::Reel),
    }
}

fn convert_post(raw: RawPost) -> Option<PostItem> {
    let id = non_blank(raw.id)?;
    Some(PostItem {
        id,
        author: Author {
            id: raw.author_id,
            display_name: raw.author_name,
            is_premium: raw.author_is_premium,
        },
        text: raw.text,
        media_urls: raw
            .media_urls
            .into_iter()
            .filter(|url| !url.trim().is_empty())
            .collect(),
        video_url: non_blank(raw.video_url),
        created_at_ms: raw.created_at_ms,
        like_count: raw.like_count,
        comment_count: raw.comment_count,
    })
}

fn convert_reel(raw: RawReel) -> Option<ReelItem> {
    Some(ReelItem {
        id: non_blank(raw.id)?,
        media_url: non_blank(raw.media_url)?,
        thumbnail_url: non_blank(raw.thumbnail_url),
        created_at_ms: raw.created_at_ms,
        derived_from: None,
    })
}

/// Reel synthesized from a post's short video, keyed by the post id
fn derive_reel(post: &PostItem) -> Option<FeedItem> {
    let media_url = post.video_url.clone()?;
    Some(FeedItem::Reel(ReelItem {
        id: format!("derived_{}", post.id),
        media_url,
        thumbnail_url: post.media_urls.first().cloned(),
        created_at_ms: post.created_at_ms,
        derived_from: Some(post.id.clone()),
    }))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
