#![allow(dead_code)]

use async_trait::async_trait;
use feed_engine::{
    ContentSourceClient, FeedItem, MemorySource, RawItem, RawPost, RawReel, SourceError,
    SourcePage, SourceResult,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

pub fn raw_post(id: &str, created_at_ms: i64, likes: u32) -> RawItem {
    RawItem::Post(RawPost {
        id: Some(id.to_string()),
        author_id: "author-1".to_string(),
        text: format!("post {}", id),
        created_at_ms,
        like_count: likes,
        ..Default::default()
    })
}

pub fn raw_reel(id: &str, created_at_ms: i64) -> RawItem {
    RawItem::Reel(RawReel {
        id: Some(id.to_string()),
        media_url: Some(format!("https://cdn.nova.dev/reels/{}.mp4", id)),
        thumbnail_url: None,
        created_at_ms,
    })
}

pub fn posts(n: usize) -> Vec<RawItem> {
    (0..n)
        .map(|i| raw_post(&format!("p{}", i), 1_000 + i as i64, (i % 7) as u32))
        .collect()
}

pub fn reels(n: usize) -> Vec<RawItem> {
    (0..n)
        .map(|i| raw_reel(&format!("r{}", i), 500 + i as i64 * 3))
        .collect()
}

pub fn organic_keys(items: &[FeedItem]) -> Vec<String> {
    items
        .iter()
        .filter(|i| i.is_organic())
        .map(FeedItem::key)
        .collect()
}

pub fn post_count(items: &[FeedItem]) -> usize {
    items.iter().filter(|i| matches!(i, FeedItem::Post(_))).count()
}

pub fn ad_count(items: &[FeedItem]) -> usize {
    items.iter().filter(|i| matches!(i, FeedItem::Ad(_))).count()
}

pub fn key_set(items: &[FeedItem]) -> HashSet<String> {
    items.iter().map(FeedItem::key).collect()
}

/// Wraps a source and parks its first `gated` calls until released
pub struct GatedSource {
    inner: MemorySource,
    remaining_gated: AtomicUsize,
    pub calls: AtomicUsize,
    pub entered: Notify,
    pub release: Notify,
}

impl GatedSource {
    pub fn new(inner: MemorySource, gated: usize) -> Self {
        Self {
            inner,
            remaining_gated: AtomicUsize::new(gated),
            calls: AtomicUsize::new(0),
            entered: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl ContentSourceClient for GatedSource {
    async fn fetch_page(&self, cursor: Option<String>, limit: usize) -> SourceResult<SourcePage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gated = self
            .remaining_gated
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if gated {
            self.entered.notify_one();
            self.release.notified().await;
        }
        self.inner.fetch_page(cursor, limit).await
    }
}

/// Always fails, counting how often it was asked
#[derive(Default)]
pub struct FailingSource {
    pub calls: AtomicUsize,
}

#[async_trait]
impl ContentSourceClient for FailingSource {
    async fn fetch_page(&self, _cursor: Option<String>, _limit: usize) -> SourceResult<SourcePage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SourceError::Unavailable("permission denied".to_string()))
    }
}

/// Answers only after `delay`
pub struct SlowSource {
    pub delay: Duration,
}

#[async_trait]
impl ContentSourceClient for SlowSource {
    async fn fetch_page(&self, _cursor: Option<String>, _limit: usize) -> SourceResult<SourcePage> {
        tokio::time::sleep(self.delay).await;
        Ok(SourcePage::new(vec![raw_post("late", 1, 0)], Some("late".to_string())))
    }
}
