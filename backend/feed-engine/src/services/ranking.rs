use crate::models::FeedItem;
use crate::utils::normalize_batch;
use tracing::debug;

/// Configurable weights for the composite score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingWeights {
    pub recency: f64,
    pub engagement: f64,
    pub interest: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            recency: 0.4,
            engagement: 0.4,
            interest: 0.2,
        }
    }
}

/// Un-normalized ranking signals for one item
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawMetrics {
    /// Creation time in milliseconds
    pub recency: f64,
    /// Sum of engagement counters
    pub engagement: f64,
    /// Secondary signals (premium author, media presence)
    pub interest: f64,
}

impl RawMetrics {
    pub fn of(item: &FeedItem) -> Self {
        match item {
            FeedItem::Post(post) => {
                let premium = if post.author.is_premium { 1.0 } else { 0.0 };
                let has_media = if post.media_urls.is_empty() && post.video_url.is_none() {
                    0.0
                } else {
                    1.0
                };
                Self {
                    recency: post.created_at_ms.max(0) as f64,
                    engagement: f64::from(post.like_count) + f64::from(post.comment_count),
                    interest: premium + has_media,
                }
            }
            FeedItem::Reel(reel) => Self {
                recency: reel.created_at_ms.max(0) as f64,
                engagement: 0.0,
                interest: if reel.thumbnail_url.is_some() { 1.5 } else { 1.0 },
            },
            FeedItem::Ad(_)
            | FeedItem::TopPicks(_)
            | FeedItem::Evergreen(_)
            | FeedItem::Loading
            | FeedItem::Error(_) => Self::default(),
        }
    }
}

/// Deterministic batch ranker
///
/// `rank` is a pure function of its input: each metric is min-max normalized
/// across the batch, combined with the weights, and items are ordered by
/// descending score with ties kept in input order.
#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    weights: RankingWeights,
}

impl RankingEngine {
    pub fn new(weights: RankingWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> RankingWeights {
        self.weights
    }

    /// Composite score per item, in input order
    pub fn score_batch(&self, items: &[FeedItem]) -> Vec<f64> {
        let metrics: Vec<RawMetrics> = items.iter().map(RawMetrics::of).collect();

        let recency = normalize_batch(&metrics.iter().map(|m| m.recency).collect::<Vec<_>>());
        let engagement =
            normalize_batch(&metrics.iter().map(|m| m.engagement).collect::<Vec<_>>());
        let interest = normalize_batch(&metrics.iter().map(|m| m.interest).collect::<Vec<_>>());

        recency
            .iter()
            .zip(&engagement)
            .zip(&interest)
            .map(|((r, e), i)| {
                self.weights.recency * r + self.weights.engagement * e + self.weights.interest * i
            })
            .collect()
    }

    /// Reorder `items` by composite score; the output is a permutation of the input
    pub fn rank(&self, items: Vec<FeedItem>) -> Vec<FeedItem> {
        let scores = self.score_batch(&items);

        let mut scored: Vec<(usize, f64, FeedItem)> = items
            .into_iter()
            .zip(scores)
            .enumerate()
            .map(|(index, (item, score))| (index, score, item))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        debug!(count = scored.len(), "Ranked feed batch");

        scored.into_iter().map(|(_, _, item)| item).collect()
    }
}
