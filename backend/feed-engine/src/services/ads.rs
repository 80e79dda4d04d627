use crate::metrics;
use crate::models::{AdItem, FeedItem};
use tracing::debug;
use uuid::Uuid;

/// Creative template an injected ad is built from
#[derive(Debug, Clone, PartialEq)]
pub struct AdCreative {
    pub image_url: String,
    pub click_url: Option<String>,
    pub weight: f64,
}

impl AdCreative {
    pub fn new(image_url: impl Into<String>, click_url: Option<String>) -> Self {
        Self {
            image_url: image_url.into(),
            click_url,
            weight: 1.0,
        }
    }
}

impl Default for AdCreative {
    fn default() -> Self {
        Self::new("https://ads.nova.dev/creative/default.png", None)
    }
}

/// Inserts one sponsored item after every `interval` organic items
///
/// Only posts and reels advance the counter. A trailing run shorter than the
/// interval gets no ad. Creatives are used round-robin.
#[derive(Debug, Clone)]
pub struct AdInjector {
    interval: usize,
    enabled: bool,
    creatives: Vec<AdCreative>,
}

impl AdInjector {
    pub fn new(interval: usize, enabled: bool) -> Self {
        Self {
            interval: interval.max(1),
            enabled,
            creatives: vec![AdCreative::default()],
        }
    }

    /// Replace the creative rotation; an empty list keeps the default creative
    pub fn with_creatives(mut self, creatives: Vec<AdCreative>) -> Self {
        if !creatives.is_empty() {
            self.creatives = creatives;
        }
        self
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn inject(&self, items: Vec<FeedItem>) -> Vec<FeedItem> {
        if !self.enabled {
            return items;
        }

        let mut output = Vec::with_capacity(items.len() + items.len() / self.interval);
        let mut since_last_ad = 0usize;
        let mut inserted = 0usize;

        for item in items {
            let organic = item.is_organic();
            output.push(item);
            if !organic {
                continue;
            }

            since_last_ad += 1;
            if since_last_ad == self.interval {
                output.push(FeedItem::Ad(self.next_ad(inserted)));
                inserted += 1;
                since_last_ad = 0;
            }
        }

        if inserted > 0 {
            debug!(ads = inserted, interval = self.interval, "Injected ads");
            metrics::record_ads_injected(inserted as u64);
        }

        output
    }

    fn next_ad(&self, sequence: usize) -> AdItem {
        let creative = &self.creatives[sequence % self.creatives.len()];
        AdItem {
            ad_id: Uuid::new_v4().to_string(),
            image_url: creative.image_url.clone(),
            click_url: creative.click_url.clone(),
            weight: creative.weight,
        }
    }
}
